//! Opening entries of the favourites menu.

use super::{Host, MessageTab, PluginState, Severity};
use rust_i18n::t;
use std::io;
use std::path::Path;

impl PluginState {
    /// Open a favourite in the host.
    ///
    /// A missing file under the scratch prefix is created empty first.
    /// Failures are also reported to the message window.
    pub fn open_favourite(&self, path: &Path, host: &mut dyn Host) -> io::Result<()> {
        let result = self
            .create_scratch_file(path)
            .and_then(|()| host.open_file(path));
        if let Err(e) = &result {
            let message = t!(
                "favourites.open_failed",
                path = path.display(),
                error = e
            );
            tracing::warn!("{}", message);
            host.switch_message_tab(MessageTab::Messages);
            host.msg_add(Severity::Error, None, &message);
        }
        result
    }

    fn create_scratch_file(&self, path: &Path) -> io::Result<()> {
        if path.is_file() || !path.starts_with(&self.config.scratch_prefix) {
            return Ok(());
        }
        tracing::debug!("Creating scratch favourite {:?}", path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::headless::HeadlessHost;
    use crate::config::PluginConfig;
    use std::fs;

    fn state_with_prefix(prefix: &Path, host: &mut HeadlessHost) -> PluginState {
        let config = PluginConfig {
            scratch_prefix: prefix.to_path_buf(),
            ..Default::default()
        };
        PluginState::load(config, None, host)
    }

    #[test]
    fn test_open_existing_favourite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();
        let mut host = HeadlessHost::default();
        let state = state_with_prefix(Path::new("/nonexistent-prefix"), &mut host);

        state.open_favourite(&path, &mut host).unwrap();
        assert_eq!(host.opened, vec![path]);
        assert_eq!(host.document.as_ref().unwrap().text(), "hello");
    }

    #[test]
    fn test_open_creates_missing_scratch_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("scratch").join("todo.txt");
        let mut host = HeadlessHost::default();
        let state = state_with_prefix(dir.path(), &mut host);

        state.open_favourite(&path, &mut host).unwrap();
        assert!(path.is_file());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        assert_eq!(host.opened, vec![path]);
    }

    #[test]
    fn test_open_missing_file_outside_prefix_reports_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        let mut host = HeadlessHost::default();
        let state = state_with_prefix(Path::new("/nonexistent-prefix"), &mut host);

        assert!(state.open_favourite(&path, &mut host).is_err());
        assert!(!path.exists());
        assert_eq!(host.messages.len(), 1);
        assert_eq!(host.messages[0].severity, Severity::Error);
        assert_eq!(host.message_tab, Some(MessageTab::Messages));
    }
}
