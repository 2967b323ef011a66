//! # Overlay Core Library
//!
//! State and lifecycle for transient UI overlays: toast notifications and
//! modal dialogs. Rendering is left to whoever subscribes to the services.
//!
//! ## Architecture
//!
//! - **Countdown timer**: a wall-clock-based, suspendable state machine scheduled
//!   on the ambient tokio runtime, with progress ticks and a one-time extension
//! - **Toast registry**: ordered visible toasts plus an overflow queue, each
//!   visible toast owning its own countdown
//! - **Modal coordinator**: a stack of dialogs whose results resolve exactly once
//! - **Storage**: TOML-based defaults for both services
//!
//! ## Key Components
//!
//! - [`CountdownTimer`]: Suspendable countdown
//! - [`ToastService`]: Toast registry
//! - [`ModalService`]: Modal coordinator
//! - [`Config`]: Configuration management

pub mod error;
pub mod events;
pub mod modal;
pub mod storage;
pub mod timer;
pub mod toast;

pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use modal::{
    ModalDescriptor, ModalId, ModalOptions, ModalReference, ModalResult, ModalService,
};
pub use storage::{Config, ModalConfig, ToastConfig};
pub use timer::{CountdownTimer, TimerPhase};
pub use toast::{
    IconKind, ToastContent, ToastId, ToastInstance, ToastLevel, ToastPosition, ToastService,
    ToastSettings,
};
