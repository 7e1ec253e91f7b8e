//! Runtime configuration I/O operations.
//!
//! System directory detection and loading of the host's `geany.conf`.

use crate::config::{ConfigError, PluginConfig};
use crate::primitives::key_file::KeyFile;
use std::path::{Path, PathBuf};

/// Directories the plugin reads from.
///
/// Only the top-level `main` function should use `dirs::*` to construct this;
/// all other code should receive it by construction/parameter passing.
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// User config directory of the host editor, e.g. ~/.config/geany
    pub config_dir: PathBuf,

    /// System data directory of the host editor, holding the fallback
    /// geany.conf, e.g. /usr/share/geany
    pub data_dir: PathBuf,

    /// User's home directory, substituted for `$HOME` in favourites
    pub home_dir: Option<PathBuf>,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    /// This should ONLY be called from main()
    pub fn from_system() -> std::io::Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("geany");

        Ok(Self {
            config_dir,
            data_dir: PathBuf::from("/usr/share/geany"),
            home_dir: dirs::home_dir(),
        })
    }

    /// Create a DirectoryContext for testing with a temp directory
    /// All paths point to subdirectories within the provided temp_dir
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            config_dir: temp_dir.join("config"),
            data_dir: temp_dir.join("data"),
            home_dir: Some(temp_dir.join("home")),
        }
    }

    /// User configuration file path
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(PluginConfig::FILENAME)
    }

    /// System-wide fallback configuration file path
    pub fn system_config_path(&self) -> PathBuf {
        self.data_dir.join(PluginConfig::FILENAME)
    }

    /// The file configuration is read from: the user file when it is a regular
    /// file, the system file otherwise.
    pub fn effective_config_path(&self) -> PathBuf {
        let user = self.config_path();
        if user.is_file() {
            user
        } else {
            self.system_config_path()
        }
    }
}

/// Read and parse a key file from disk.
pub fn load_key_file(path: &Path) -> Result<KeyFile, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
    KeyFile::parse(&text).map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))
}

/// Load the plugin configuration from `path`.
pub fn load_from_file(path: &Path) -> Result<PluginConfig, ConfigError> {
    PluginConfig::from_key_file(&load_key_file(path)?)
}

/// Load the plugin configuration for `dir_context`.
///
/// A missing or unreadable file yields the defaults, as does a file that does
/// not parse; both are logged. Invalid plugin settings are an error.
pub fn load(dir_context: &DirectoryContext) -> Result<PluginConfig, ConfigError> {
    let path = dir_context.effective_config_path();
    tracing::debug!("Loading configuration from {:?}", path);

    match load_key_file(&path) {
        Ok(kf) => PluginConfig::from_key_file(&kf),
        Err(ConfigError::IoError(msg)) => {
            tracing::debug!("No configuration loaded: {}", msg);
            Ok(PluginConfig::default())
        }
        Err(e) => {
            tracing::warn!("Ignoring unparsable configuration: {}", e);
            Ok(PluginConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, text: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_user_config_preferred() {
        let temp = TempDir::new().unwrap();
        let ctx = DirectoryContext::for_testing(temp.path());
        write(&ctx.config_path(), "[geanygsantnerutils]\nmsgwin_tab=1\n");
        write(
            &ctx.system_config_path(),
            "[geanygsantnerutils]\nmsgwin_tab=4\n",
        );

        assert_eq!(ctx.effective_config_path(), ctx.config_path());
        assert_eq!(load(&ctx).unwrap().msgwin_tab, Some(1));
    }

    #[test]
    fn test_falls_back_to_system_config() {
        let temp = TempDir::new().unwrap();
        let ctx = DirectoryContext::for_testing(temp.path());
        write(
            &ctx.system_config_path(),
            "[geanygsantnerutils]\nmsgwin_tab=4\n",
        );

        assert_eq!(ctx.effective_config_path(), ctx.system_config_path());
        assert_eq!(load(&ctx).unwrap().msgwin_tab, Some(4));
    }

    #[test]
    fn test_directory_in_place_of_user_config_falls_back() {
        let temp = TempDir::new().unwrap();
        let ctx = DirectoryContext::for_testing(temp.path());
        fs::create_dir_all(ctx.config_path()).unwrap();
        assert_eq!(ctx.effective_config_path(), ctx.system_config_path());
    }

    #[test]
    fn test_missing_config_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let ctx = DirectoryContext::for_testing(temp.path());
        assert_eq!(load(&ctx).unwrap(), PluginConfig::default());
    }

    #[test]
    fn test_unparsable_config_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let ctx = DirectoryContext::for_testing(temp.path());
        write(&ctx.config_path(), "this is not a key file\n");
        assert_eq!(load(&ctx).unwrap(), PluginConfig::default());
    }

    #[test]
    fn test_invalid_setting_is_error() {
        let temp = TempDir::new().unwrap();
        let ctx = DirectoryContext::for_testing(temp.path());
        write(
            &ctx.config_path(),
            "[geanygsantnerutils]\nscratch_prefix=relative\n",
        );
        assert!(matches!(load(&ctx), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_load_from_file_reports_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_from_file(&temp.path().join("nope.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
