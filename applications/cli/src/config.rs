/// CLI configuration
use earshot_catalog::CatalogConfig;
use earshot_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "earshot.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EarshotConfig {
    #[serde(default = "default_catalog")]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    /// JSON document holding progress and bookmarks
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for EarshotConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            storage: StorageSettings::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl EarshotConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default file is optional.
    /// Environment variables use the `EARSHOT_` prefix with `__` between
    /// sections, e.g. `EARSHOT_CATALOG__BASE_URL`.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings.add_source(
                config::File::with_name(DEFAULT_CONFIG_FILE)
                    .format(config::FileFormat::Toml)
                    .required(false),
            ),
        };

        settings = settings.add_source(
            config::Environment::with_prefix("EARSHOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.catalog.base_url.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "catalog.base_url must not be empty".to_string(),
            ));
        }
        if self.playback.progress_save_interval_secs <= 0.0 {
            return Err(config::ConfigError::Message(
                "playback.progress_save_interval_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_catalog() -> CatalogConfig {
    CatalogConfig::new("http://localhost:3000")
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("earshot-state.json")
}
