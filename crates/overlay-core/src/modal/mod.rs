//! Modal dialogs.
//!
//! A caller spawns a modal through [`ModalService::show`] and awaits
//! [`ModalReference::result`]. Whichever close path runs first (a confirm
//! button, the close button, a background click, `cancel_all`) decides the
//! result; the others are no-ops.

mod options;
mod reference;
mod service;

pub use options::{ModalDescriptor, ModalOptions, ModalPosition, ModalSize, ResolvedModalOptions};
pub use reference::{ModalId, ModalReference, ModalResult};
pub use service::{ModalService, ModalSubscriber};
