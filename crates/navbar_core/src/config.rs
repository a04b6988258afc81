//! Navbar configuration.
//!
//! Loading flow:
//! 1. Start from `NavbarConfig::default()`.
//! 2. If the JSON file exists, fields present in it replace defaults.
//! 3. `NAVBAR_*` environment variables override both.
//! 4. The result is validated before it is returned.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Scroll offset past which the chrome turns compact.
pub const DEFAULT_COMPACT_THRESHOLD_PX: f64 = 10.0;
pub const DEFAULT_TEAM_SLOT_KEY: &str = "team";
pub const DEFAULT_ADMIN_SLOT_KEY: &str = "admin_user";
pub const DEFAULT_BRAND: &str = "HackSpire";

pub const ENV_BRAND: &str = "NAVBAR_BRAND";
pub const ENV_TEAM_SLOT_KEY: &str = "NAVBAR_TEAM_SLOT_KEY";
pub const ENV_ADMIN_SLOT_KEY: &str = "NAVBAR_ADMIN_SLOT_KEY";
pub const ENV_COMPACT_THRESHOLD_PX: &str = "NAVBAR_COMPACT_THRESHOLD_PX";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidValue { field: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read navbar config: {err}"),
            Self::Json(err) => write!(f, "failed to parse navbar config JSON: {err}"),
            Self::InvalidValue { field, message } => {
                write!(f, "invalid navbar config value `{field}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// How the mobile disclosure panel chooses its links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobilePanelMode {
    /// Same identity-aware table as the desktop bar.
    #[default]
    Shared,
    /// Fixed guest-style panel regardless of identity.
    LegacyStatic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    /// Wordmark rendered next to the home link.
    pub brand: String,
    /// Session slot holding the signed-in team.
    pub team_slot_key: String,
    /// Session slot holding the signed-in organizer.
    pub admin_slot_key: String,
    /// Offsets strictly greater than this are compact.
    pub compact_threshold_px: f64,
    pub mobile_panel: MobilePanelMode,
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_string(),
            team_slot_key: DEFAULT_TEAM_SLOT_KEY.to_string(),
            admin_slot_key: DEFAULT_ADMIN_SLOT_KEY.to_string(),
            compact_threshold_px: DEFAULT_COMPACT_THRESHOLD_PX,
            mobile_panel: MobilePanelMode::Shared,
        }
    }
}

impl NavbarConfig {
    /// Parses a JSON document; absent fields keep their defaults.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks slot keys and threshold.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.team_slot_key.trim().is_empty() {
            return Err(invalid("team_slot_key", "must not be blank"));
        }
        if self.admin_slot_key.trim().is_empty() {
            return Err(invalid("admin_slot_key", "must not be blank"));
        }
        if self.team_slot_key == self.admin_slot_key {
            return Err(invalid(
                "admin_slot_key",
                format!("must differ from team_slot_key `{}`", self.team_slot_key),
            ));
        }
        if !self.compact_threshold_px.is_finite() || self.compact_threshold_px < 0.0 {
            return Err(invalid(
                "compact_threshold_px",
                format!(
                    "must be a finite non-negative number, got {}",
                    self.compact_threshold_px
                ),
            ));
        }
        Ok(())
    }

    /// Applies overrides from `lookup`, keyed by `NAVBAR_*` variable name.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<()> {
        if let Some(value) = lookup(ENV_BRAND) {
            self.brand = value;
        }
        if let Some(value) = lookup(ENV_TEAM_SLOT_KEY) {
            self.team_slot_key = value.trim().to_string();
        }
        if let Some(value) = lookup(ENV_ADMIN_SLOT_KEY) {
            self.admin_slot_key = value.trim().to_string();
        }
        if let Some(value) = lookup(ENV_COMPACT_THRESHOLD_PX) {
            self.compact_threshold_px = value.trim().parse::<f64>().map_err(|err| {
                invalid("compact_threshold_px", format!("`{value}` is not a number: {err}"))
            })?;
        }
        Ok(())
    }
}

/// Loads config from `path`, then environment overrides, then validates.
///
/// A missing file yields defaults; unreadable or malformed files are errors.
pub fn load_config_from_path(path: &Path) -> ConfigResult<NavbarConfig> {
    let mut config = if path.exists() {
        debug!(
            "event=config_load module=config status=start source=file path={}",
            path.display()
        );
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str::<NavbarConfig>(&raw)?
    } else {
        debug!(
            "event=config_load module=config status=start source=defaults path={}",
            path.display()
        );
        NavbarConfig::default()
    };

    config.apply_overrides(|name| std::env::var(name).ok())?;
    config.validate()?;

    info!(
        "event=config_load module=config status=ok team_slot={} admin_slot={} compact_threshold_px={} mobile_panel={:?}",
        config.team_slot_key, config.admin_slot_key, config.compact_threshold_px, config.mobile_panel
    );
    Ok(config)
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        message: message.into(),
    }
}
