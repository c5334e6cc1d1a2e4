/*
 * Persists the user's preferences between runs. Nothing here is needed by the
 * search session itself; the presenter reads settings once at startup to
 * choose a backend and theme, and writes them back when a preference changes.
 *
 * Settings are stored as pretty-printed JSON (`settings.json`) in the per-user
 * local configuration directory, or in a directory injected by the caller.
 * Every field has a default, so files written by older versions still load.
 */
use crate::core::path_utils;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

const SETTINGS_FILENAME: &str = "settings.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    NoProjectDirectory,
    Serde(serde_json::Error),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::NoProjectDirectory => {
                write!(f, "Could not determine project directory for configuration")
            }
            ConfigError::Serde(e) => write!(f, "Configuration format error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            ConfigError::NoProjectDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /* Enumerate, then match candidates one by one on the session worker. */
    #[default]
    Sequential,
    /* Delegate to the multi-threaded engine. */
    Parallel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub backend: BackendKind,
    pub respect_ignore_files: bool,
    pub include_hidden: bool,
    /* Smallest progress advance the worker bothers to report. */
    pub progress_step: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            dark_mode: false,
            backend: BackendKind::Sequential,
            respect_ignore_files: false,
            include_hidden: true,
            progress_step: 0.01,
        }
    }
}

pub trait ConfigManagerOperations: Send + Sync {
    /* A missing settings file is not an error; defaults are returned. */
    fn load_settings(&self, app_name: &str) -> Result<AppSettings>;
    fn save_settings(&self, app_name: &str, settings: &AppSettings) -> Result<()>;
}

pub struct CoreConfigManager {
    config_dir_override: Option<PathBuf>,
}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {
            config_dir_override: None,
        }
    }

    // Settings are kept directly in `config_dir`, regardless of the app name.
    pub fn with_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        CoreConfigManager {
            config_dir_override: Some(config_dir.into()),
        }
    }

    fn settings_file_path(&self, app_name: &str) -> Result<PathBuf> {
        let config_dir = match &self.config_dir_override {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir.clone()
            }
            None => path_utils::get_base_app_config_local_dir(app_name)
                .ok_or(ConfigError::NoProjectDirectory)?,
        };
        Ok(config_dir.join(SETTINGS_FILENAME))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_settings(&self, app_name: &str) -> Result<AppSettings> {
        let file_path = self.settings_file_path(app_name)?;
        log::trace!("CoreConfigManager: Loading settings for '{app_name}' from {file_path:?}");
        if !file_path.exists() {
            log::debug!("CoreConfigManager: {file_path:?} does not exist, using defaults.");
            return Ok(AppSettings::default());
        }

        let reader = BufReader::new(File::open(&file_path)?);
        let settings: AppSettings = serde_json::from_reader(reader)?;
        log::debug!("CoreConfigManager: Loaded {settings:?} from {file_path:?}.");
        Ok(settings)
    }

    fn save_settings(&self, app_name: &str, settings: &AppSettings) -> Result<()> {
        let file_path = self.settings_file_path(app_name)?;
        let writer = BufWriter::new(File::create(&file_path)?);
        serde_json::to_writer_pretty(writer, settings)?;
        log::debug!("CoreConfigManager: Saved settings for '{app_name}' to {file_path:?}.");
        Ok(())
    }
}

/*
 * Loads settings for startup. Any failure is logged and replaced by the
 * defaults; a broken settings file must not keep the application from starting.
 */
pub fn load_settings_or_default(
    config_manager: &dyn ConfigManagerOperations,
    app_name: &str,
) -> AppSettings {
    match config_manager.load_settings(app_name) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Config: Could not load settings for '{app_name}', using defaults: {e}");
            AppSettings::default()
        }
    }
}

// Settings file location for `app_name` when no override is used.
pub fn default_settings_path(app_name: &str) -> Option<PathBuf> {
    path_utils::get_base_app_config_local_dir(app_name).map(|dir| dir.join(SETTINGS_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        // Arrange
        let dir = tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path());

        // Act
        let settings = manager.load_settings("AnyApp").unwrap();

        // Assert
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_save_then_load_returns_saved_settings() {
        // Arrange
        let dir = tempdir().unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path().join("nested"));
        let settings = AppSettings {
            dark_mode: true,
            backend: BackendKind::Parallel,
            respect_ignore_files: true,
            include_hidden: false,
            progress_step: 0.05,
        };

        // Act
        manager.save_settings("AnyApp", &settings).unwrap();
        let loaded = manager.load_settings("AnyApp").unwrap();

        // Assert
        assert_eq!(loaded, settings);
        assert!(dir.path().join("nested").join(SETTINGS_FILENAME).exists());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILENAME),
            r#"{ "dark_mode": true, "backend": "parallel" }"#,
        )
        .unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path());

        let loaded = manager.load_settings("AnyApp").unwrap();

        assert!(loaded.dark_mode);
        assert_eq!(loaded.backend, BackendKind::Parallel);
        assert_eq!(loaded.progress_step, AppSettings::default().progress_step);
        assert!(loaded.include_hidden, "Hidden entries are searched unless turned off");
    }

    #[test]
    fn test_corrupt_file_is_a_serde_error_and_startup_falls_back() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILENAME), "{ not json").unwrap();
        let manager = CoreConfigManager::with_config_dir(dir.path());

        match manager.load_settings("AnyApp") {
            Err(ConfigError::Serde(_)) => {}
            other => panic!("Expected a Serde error, got {other:?}"),
        }
        assert_eq!(
            load_settings_or_default(&manager, "AnyApp"),
            AppSettings::default()
        );
    }

    #[test]
    fn test_default_settings_path_names_the_settings_file() {
        let app_name = format!("OrionTest_Config_{}", rand::random::<u64>());
        if let Some(path) = default_settings_path(&app_name) {
            assert_eq!(path.file_name(), Some(std::ffi::OsStr::new(SETTINGS_FILENAME)));
            if let Some(parent) = path.parent() {
                let _ = fs::remove_dir_all(parent);
            }
        }
    }
}
