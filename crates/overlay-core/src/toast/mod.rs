//! Toast notifications.
//!
//! - [`settings`] - per-call overrides, levels, icons, positions
//! - [`instance`] - one toast as seen by the renderer, owning its countdown
//! - [`service`] - the registry of visible and queued toasts
//!
//! # Usage
//!
//! ```ignore
//! let toasts = ToastService::new(config.toast.clone())?;
//! toasts.subscribe(|visible| render(visible));
//! let id = toasts.show_success("Image saved")?;
//! ```

mod instance;
mod service;
mod settings;

pub use instance::{ToastContent, ToastId, ToastInstance};
pub use service::{ToastService, ToastSubscriber};
pub use settings::{
    ClickHandler, IconKind, ResolvedToastSettings, ToastLevel, ToastPosition, ToastSettings,
};
