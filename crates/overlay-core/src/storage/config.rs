//! TOML-based overlay configuration.
//!
//! Stores the service-wide defaults that per-call settings override:
//! - Toast timing (timeout, extension, progress bar, pause on hover)
//! - Toast layout (position, stacking order, visible limit, icon)
//! - Modal presentation and stacking limit
//!
//! Configuration is stored at `~/.config/overlay/config.toml`.
//! Durations are expressed in milliseconds.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::modal::{ModalPosition, ModalSize};
use crate::toast::{IconKind, ToastPosition};

/// Toast defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToastConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Lifetime substituted once the pointer leaves a hovered toast.
    /// Zero disables the extension.
    #[serde(default = "default_extended_timeout_ms")]
    pub extended_timeout_ms: u64,
    #[serde(default)]
    pub disable_timeout: bool,
    #[serde(default = "default_true")]
    pub show_progress_bar: bool,
    #[serde(default = "default_true")]
    pub pause_progress_on_hover: bool,
    #[serde(default = "default_true")]
    pub show_close_button: bool,
    #[serde(default)]
    pub icon: IconKind,
    #[serde(default)]
    pub position: ToastPosition,
    /// Newest toast rendered first instead of last.
    #[serde(default)]
    pub newest_on_top: bool,
    /// Visible toasts beyond this limit wait in a FIFO queue. Unlimited if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_toast_count: Option<usize>,
}

/// Modal defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalConfig {
    #[serde(default)]
    pub position: ModalPosition,
    #[serde(default)]
    pub size: ModalSize,
    #[serde(default)]
    pub hide_header: bool,
    #[serde(default)]
    pub hide_close_button: bool,
    #[serde(default)]
    pub disable_background_cancel: bool,
    /// Maximum number of stacked modals. Unlimited if unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_active: Option<usize>,
}

/// Overlay configuration.
///
/// Serialized to/from TOML at `~/.config/overlay/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default)]
    pub modal: ModalConfig,
}

fn default_timeout_ms() -> u64 {
    5_000
}
fn default_extended_timeout_ms() -> u64 {
    10_000
}
fn default_true() -> bool {
    true
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            extended_timeout_ms: default_extended_timeout_ms(),
            disable_timeout: false,
            show_progress_bar: true,
            pause_progress_on_hover: true,
            show_close_button: true,
            icon: IconKind::default(),
            position: ToastPosition::default(),
            newest_on_top: false,
            max_toast_count: None,
        }
    }
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            position: ModalPosition::default(),
            size: ModalSize::default(),
            hide_header: false,
            hide_close_button: false,
            disable_background_cancel: false,
            max_active: None,
        }
    }
}

impl ToastConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn extended_timeout(&self) -> Duration {
        Duration::from_millis(self.extended_timeout_ms)
    }

    /// # Errors
    /// Rejects a zero timeout while timeouts are enabled, a zero visible
    /// limit, and an extension shorter than the timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timeouts(
            "toast",
            self.timeout(),
            self.extended_timeout(),
            self.disable_timeout,
        )?;
        if self.max_toast_count == Some(0) {
            return Err(ConfigError::invalid(
                "toast.max_toast_count",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }
}

impl ModalConfig {
    /// # Errors
    /// Rejects a zero stacking limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_active == Some(0) {
            return Err(ConfigError::invalid(
                "modal.max_active",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }
}

/// Shared by the global defaults and per-call toast settings.
pub(crate) fn validate_timeouts(
    scope: &str,
    timeout: Duration,
    extended: Duration,
    disabled: bool,
) -> Result<(), ConfigError> {
    if disabled {
        return Ok(());
    }
    if timeout.is_zero() {
        return Err(ConfigError::invalid(
            &format!("{scope}.timeout_ms"),
            "must be greater than zero unless the timeout is disabled",
        ));
    }
    if !extended.is_zero() && extended < timeout {
        return Err(ConfigError::invalid(
            &format!("{scope}.extended_timeout_ms"),
            format!(
                "{} ms is shorter than the timeout of {} ms",
                extended.as_millis(),
                timeout.as_millis()
            ),
        ));
    }
    Ok(())
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let new_value = match obj.get(part) {
                Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| ConfigError::invalid(key, e.to_string()))?,
                ),
                Some(serde_json::Value::Number(_)) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|e| ConfigError::invalid(key, e.to_string()))?
                        .into(),
                ),
                // Enums serialize as a bare name or as a one-key object carrying
                // a payload; unset optionals are absent. Accept JSON objects and
                // numbers, falling back to a bare string.
                Some(_) | None => match serde_json::from_str::<serde_json::Value>(value) {
                    Ok(v @ (serde_json::Value::Object(_) | serde_json::Value::Number(_))) => v,
                    _ => serde_json::Value::String(value.into()),
                },
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// validated, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a specific file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// # Errors
    /// Returns the first invalid section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.toast.validate()?;
        self.modal.validate()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key, validating the result. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the resulting config is invalid. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let section = key.split('.').next().unwrap_or_default();
        if !matches!(section, "toast" | "modal") {
            return Err(ConfigError::UnknownKey(key.to_string()).into());
        }
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)
            .map_err(|e| ConfigError::invalid(key, e.to_string()))?;
        let reread = serde_json::to_value(&updated)?;
        if Self::get_json_value_by_path(&reread, key).is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()).into());
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
