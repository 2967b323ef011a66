pub(crate) mod config;

pub use config::{Config, ModalConfig, ToastConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/overlay[-dev]/` based on OVERLAY_ENV.
///
/// Set OVERLAY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("OVERLAY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("overlay-dev")
    } else {
        base_dir.join("overlay")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
