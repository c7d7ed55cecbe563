/// CLI configuration
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use soul_session::SessionConfig;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "session.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default = "default_engine")]
    pub engine: EngineSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSettings {
    /// Interval between progress reports, in ms
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    /// Simulated playback speed (2.0 plays a track in half its length)
    #[serde(default = "default_speed")]
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// JSON catalogue of tracks; a small demo library is used when unset
    #[serde(default)]
    pub catalogue: Option<PathBuf>,

    /// Client id used for `browse`
    #[serde(default = "default_client_id")]
    pub client_id: String,
}

impl EngineSettings {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl CliConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `session.toml` is read if
    /// present. Environment variables prefixed with `SOUL_SESSION_` override
    /// the file, with `__` between section and key
    /// (`SOUL_SESSION_ENGINE__TICK_MS=100`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("SOUL_SESSION")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.engine.tick_ms == 0 {
            bail!("engine.tick_ms must be greater than zero");
        }

        if !self.engine.speed.is_finite() || self.engine.speed <= 0.0 {
            bail!("engine.speed must be a positive number, got {}", self.engine.speed);
        }

        if self.session.max_auto_advances == 0 {
            bail!("session.max_auto_advances must be at least 1");
        }

        if self.session.event_capacity == 0 {
            bail!("session.event_capacity must be at least 1");
        }

        if let Some(catalogue) = &self.library.catalogue {
            if !catalogue.exists() {
                bail!("Catalogue not found at {:?}", catalogue);
            }
        }

        Ok(())
    }
}

// Default values
fn default_engine() -> EngineSettings {
    EngineSettings {
        tick_ms: default_tick_ms(),
        speed: default_speed(),
    }
}

fn default_tick_ms() -> u64 {
    250
}

fn default_speed() -> f64 {
    1.0
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        catalogue: None,
        client_id: default_client_id(),
    }
}

fn default_client_id() -> String {
    SessionConfig::default().trusted_client
}

impl Default for EngineSettings {
    fn default() -> Self {
        default_engine()
    }
}

impl Default for LibrarySettings {
    fn default() -> Self {
        default_library()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = CliConfig::default();
        assert_eq!(config.engine.tick(), Duration::from_millis(250));
        assert_eq!(config.engine.speed, 1.0);
        assert_eq!(config.library.client_id, config.session.trusted_client);
        assert!(config.library.catalogue.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn load_reads_sections_from_file() {
        let file = write_config(
            r#"
            [session]
            max_auto_advances = 3

            [engine]
            tick_ms = 100
            speed = 4.0
            "#,
        );

        let config = CliConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.session.max_auto_advances, 3);
        assert_eq!(config.session.auto_advance_window_ms, 2000);
        assert_eq!(config.engine.tick_ms, 100);
        assert_eq!(config.engine.speed, 4.0);
        assert_eq!(config.library.client_id, "soul-player");
    }

    #[test]
    fn load_fails_for_missing_explicit_file() {
        let result = CliConfig::load(Some(Path::new("/nonexistent/session.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_zero_tick() {
        let mut config = CliConfig::default();
        config.engine.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_speed() {
        let mut config = CliConfig::default();
        config.engine.speed = f64::NAN;
        assert!(config.validate().is_err());

        config.engine.speed = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_catalogue() {
        let mut config = CliConfig::default();
        config.library.catalogue = Some(PathBuf::from("/nonexistent/catalogue.json"));
        assert!(config.validate().is_err());
    }
}
