use crate::primitives::key_file::KeyFile;
use crate::services::filter::formatter::{self, Formatter};
use serde::Serialize;
use std::path::PathBuf;

/// Key-file group holding this plugin's settings
pub const PLUGIN_GROUP: &str = "geanygsantnerutils";

/// Default text offered in the pipe command prompt
pub const DEFAULT_PIPE_COMMAND: &str = "grep -i ";

/// Default prefix under which missing favourites are still listed (and
/// created on demand)
pub const DEFAULT_SCRATCH_PREFIX: &str = "/tmp";

/// Plugin configuration, read once from the host's `geany.conf`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PluginConfig {
    /// Raw favourites string: `label;path;label;path;---;...`
    pub favourites: String,

    /// Message window tab to switch to on load (0..=4), if any
    pub msgwin_tab: Option<i64>,

    /// Formatter used by the JSON pretty action
    pub json_formatter: Formatter,

    /// Formatter used by the XML/HTML pretty action
    pub xml_formatter: Formatter,

    /// Text pre-filled in the pipe prompt
    pub pipe_default: String,

    /// Favourites under this prefix are listed even when the file is missing
    pub scratch_prefix: PathBuf,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            favourites: String::new(),
            msgwin_tab: None,
            json_formatter: formatter::json_default(),
            xml_formatter: formatter::xml_default(),
            pipe_default: DEFAULT_PIPE_COMMAND.to_string(),
            scratch_prefix: PathBuf::from(DEFAULT_SCRATCH_PREFIX),
        }
    }
}

impl PluginConfig {
    /// Configuration file name inside the host's config or data directory
    pub const FILENAME: &'static str = "geany.conf";

    /// Build the configuration from a parsed key file. Missing keys keep their
    /// defaults.
    pub fn from_key_file(kf: &KeyFile) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(favourites) = kf.get_string(PLUGIN_GROUP, "favourites") {
            config.favourites = favourites;
        }
        config.msgwin_tab = kf.get_integer(PLUGIN_GROUP, "msgwin_tab");

        if let Some(command) = kf.get_string(PLUGIN_GROUP, "json_formatter") {
            let package = kf.get_string(PLUGIN_GROUP, "json_formatter_package");
            config.json_formatter = config
                .json_formatter
                .with_command(&command, package)
                .map_err(|e| ConfigError::ParseError(format!("json_formatter: {e}")))?;
        }
        if let Some(command) = kf.get_string(PLUGIN_GROUP, "xml_formatter") {
            let package = kf.get_string(PLUGIN_GROUP, "xml_formatter_package");
            config.xml_formatter = config
                .xml_formatter
                .with_command(&command, package)
                .map_err(|e| ConfigError::ParseError(format!("xml_formatter: {e}")))?;
        }

        if let Some(pipe_default) = kf.get_string(PLUGIN_GROUP, "pipe_default") {
            config.pipe_default = pipe_default;
        }
        if let Some(prefix) = kf.get_string(PLUGIN_GROUP, "scratch_prefix") {
            config.scratch_prefix = PathBuf::from(prefix);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scratch_prefix.as_os_str().is_empty() || !self.scratch_prefix.is_absolute() {
            return Err(ConfigError::ValidationError(
                "scratch_prefix must be an absolute path".to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PluginConfig::default();
        assert!(config.favourites.is_empty());
        assert_eq!(config.msgwin_tab, None);
        assert_eq!(config.json_formatter.package, "ruby");
        assert_eq!(config.xml_formatter.package, "tidy");
        assert_eq!(config.pipe_default, "grep -i ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_key_file() {
        let kf = KeyFile::parse(
            "[geanygsantnerutils]\n\
             favourites=A;/a.txt\n\
             msgwin_tab=3\n\
             json_formatter=jq --indent 2 .\n\
             json_formatter_package=jq\n\
             scratch_prefix=/var/tmp\n",
        )
        .unwrap();
        let config = PluginConfig::from_key_file(&kf).unwrap();
        assert_eq!(config.favourites, "A;/a.txt");
        assert_eq!(config.msgwin_tab, Some(3));
        assert_eq!(config.json_formatter.program(), Some("jq"));
        assert_eq!(config.json_formatter.args(), ["--indent", "2", "."]);
        assert_eq!(config.json_formatter.package, "jq");
        assert_eq!(config.scratch_prefix, PathBuf::from("/var/tmp"));
        // untouched keys keep defaults
        assert_eq!(config.xml_formatter.program(), Some("tidy"));
    }

    #[test]
    fn test_formatter_override_without_package_uses_program() {
        let kf = KeyFile::parse("[geanygsantnerutils]\nxml_formatter=xmllint --format -\n")
            .unwrap();
        let config = PluginConfig::from_key_file(&kf).unwrap();
        assert_eq!(config.xml_formatter.package, "xmllint");
    }

    #[test]
    fn test_invalid_formatter_override() {
        let kf = KeyFile::parse("[geanygsantnerutils]\njson_formatter=jq 'unterminated\n").unwrap();
        let err = PluginConfig::from_key_file(&kf).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));

        let kf = KeyFile::parse("[geanygsantnerutils]\njson_formatter=   \n").unwrap();
        assert!(PluginConfig::from_key_file(&kf).is_err());
    }

    #[test]
    fn test_relative_scratch_prefix_rejected() {
        let kf = KeyFile::parse("[geanygsantnerutils]\nscratch_prefix=tmp\n").unwrap();
        let err = PluginConfig::from_key_file(&kf).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_dump_as_json() {
        let json = serde_json::to_value(PluginConfig::default()).unwrap();
        assert_eq!(json["pipe_default"], "grep -i ");
        assert_eq!(json["xml_formatter"]["package"], "tidy");
    }
}
