//! Global whereabouts configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{WhereaboutsError, WhereaboutsResult};

static DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
static DEFAULT_TIMEZONE: &str = "Asia/Shanghai";
static DEFAULT_RECONNECT_DELAY: &str = "5s";

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_reconnect_delay() -> String {
    DEFAULT_RECONNECT_DELAY.to_string()
}

/// Configuration at ~/.config/whereabouts/config.toml, overridable with
/// `WHEREABOUTS_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BoardConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Zone every time on the board is displayed in, regardless of the
    /// viewer's system zone.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Fixed delay before the live stream reconnects (humantime syntax).
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay: String,

    /// One-click location labels for new entries.
    #[serde(default)]
    pub presets: Vec<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            server_url: default_server_url(),
            timezone: default_timezone(),
            reconnect_delay: default_reconnect_delay(),
            presets: Vec::new(),
        }
    }
}

impl BoardConfig {
    pub fn config_path() -> WhereaboutsResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| WhereaboutsError::Config("Could not determine config directory".into()))?
            .join("whereabouts");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, creating a commented default file first if needed.
    pub fn load() -> WhereaboutsResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> WhereaboutsResult<Self> {
        let config: BoardConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("WHEREABOUTS"))
            .build()
            .map_err(|e| WhereaboutsError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| WhereaboutsError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Check every derived setting up front so commands fail before doing any work.
    pub fn validate(&self) -> WhereaboutsResult<()> {
        self.server_url()?;
        self.timezone()?;
        self.reconnect_delay()?;
        Ok(())
    }

    pub fn server_url(&self) -> WhereaboutsResult<Url> {
        Url::parse(&self.server_url).map_err(|e| {
            WhereaboutsError::Config(format!("Invalid server_url '{}': {e}", self.server_url))
        })
    }

    pub fn timezone(&self) -> WhereaboutsResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| WhereaboutsError::Config(format!("Unknown timezone '{}'", self.timezone)))
    }

    pub fn reconnect_delay(&self) -> WhereaboutsResult<Duration> {
        humantime::parse_duration(&self.reconnect_delay).map_err(|e| {
            WhereaboutsError::Config(format!(
                "Invalid reconnect_delay '{}': {e}",
                self.reconnect_delay
            ))
        })
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> WhereaboutsResult<()> {
        let contents = format!(
            "\
# whereabouts configuration

# Board server:
# server_url = \"{}\"

# Zone all times are shown in:
# timezone = \"{}\"

# Delay before the live status stream reconnects:
# reconnect_delay = \"{}\"

# Location presets for new entries:
# presets = [\"Office\", \"Lab\", \"Home\"]
",
            DEFAULT_SERVER_URL, DEFAULT_TIMEZONE, DEFAULT_RECONNECT_DELAY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                WhereaboutsError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| WhereaboutsError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
