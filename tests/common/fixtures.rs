use ggu::app::headless::HeadlessHost;
use ggu::app::PluginState;
use ggu::config::PluginConfig;
use ggu::model::document::Document;
use ggu::services::filter::formatter::{self, Formatter};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch directory plus a plugin state whose filters write there
pub struct Fixture {
    pub scratch: TempDir,
    pub state: PluginState,
    pub host: HeadlessHost,
}

impl Fixture {
    pub fn new(config: PluginConfig, document: Document) -> Self {
        super::tracing::init_tracing_from_env();
        let scratch = TempDir::new().unwrap();
        let mut host = HeadlessHost::with_document(document);
        let state = PluginState::load(config, None, &mut host).with_scratch_dir(scratch.path());
        Self {
            scratch,
            state,
            host,
        }
    }

    pub fn document(&self) -> &Document {
        self.host.document.as_ref().unwrap()
    }

    pub fn document_mut(&mut self) -> &mut Document {
        self.host.document.as_mut().unwrap()
    }

    /// Files left behind in the scratch directory
    pub fn leftover_files(&self) -> Vec<PathBuf> {
        list_dir(self.scratch.path())
    }
}

pub fn list_dir(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

/// Config with the JSON and XML formatters replaced by shell-free commands
pub fn config_with_formatters(json: &str, xml: &str) -> PluginConfig {
    PluginConfig {
        json_formatter: override_formatter(&formatter::json_default(), json),
        xml_formatter: override_formatter(&formatter::xml_default(), xml),
        ..Default::default()
    }
}

pub fn override_formatter(base: &Formatter, command: &str) -> Formatter {
    base.with_command(command, None).unwrap()
}
