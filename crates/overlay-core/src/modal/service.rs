//! Modal coordinator.
//!
//! Spawns modals on a stack (the last entry is the one in front), hands the
//! caller a [`ModalReference`] to await, and drops the entry as soon as the
//! reference resolves. One render-surface subscriber is told about every
//! change, synchronously and without the stack lock held.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::options::ModalDescriptor;
use super::reference::{ModalId, ModalReference, ModalResult};
use crate::error::{CoreError, Result};
use crate::storage::ModalConfig;

/// Render-surface callback, invoked with the active modals, front-most last.
pub type ModalSubscriber = Arc<dyn Fn(&[ModalReference]) + Send + Sync>;

pub(crate) struct Shared {
    config: ModalConfig,
    stack: Mutex<Vec<ModalReference>>,
    subscriber: Mutex<Option<ModalSubscriber>>,
}

#[derive(Clone)]
pub struct ModalService {
    shared: Arc<Shared>,
}

impl ModalService {
    /// # Errors
    /// Returns a configuration error if `config` is invalid.
    pub fn new(config: ModalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                stack: Mutex::new(Vec::new()),
                subscriber: Mutex::new(None),
            }),
        })
    }

    pub(super) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    fn stack(&self) -> MutexGuard<'_, Vec<ModalReference>> {
        self.shared
            .stack
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn subscriber_slot(&self) -> MutexGuard<'_, Option<ModalSubscriber>> {
        self.shared
            .subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &ModalConfig {
        &self.shared.config
    }

    /// Install the render surface, replacing any previous one.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&[ModalReference]) + Send + Sync + 'static,
    {
        *self.subscriber_slot() = Some(Arc::new(handler));
    }

    pub fn unsubscribe(&self) {
        self.subscriber_slot().take();
    }

    fn notify(&self) {
        let Some(subscriber) = self.subscriber_slot().clone() else {
            return;
        };
        let snapshot = self.active();
        subscriber(&snapshot);
    }

    /// Active modals, front-most last.
    pub fn active(&self) -> Vec<ModalReference> {
        self.stack().clone()
    }

    pub fn active_count(&self) -> usize {
        self.stack().len()
    }

    /// The front-most modal.
    pub fn top(&self) -> Option<ModalReference> {
        self.stack().last().cloned()
    }

    /// Spawn a modal and return its reference immediately.
    ///
    /// # Errors
    /// `InvalidOperation` when the configured stacking limit is reached.
    pub fn show(&self, descriptor: ModalDescriptor) -> Result<ModalReference> {
        let options = descriptor.options.clone().resolve(&self.shared.config);
        let modal = ModalReference::new(descriptor, options, Arc::downgrade(&self.shared));

        {
            let mut stack = self.stack();
            if let Some(max) = self.shared.config.max_active {
                if stack.len() >= max {
                    return Err(CoreError::InvalidOperation(format!(
                        "modal limit of {max} reached"
                    )));
                }
            }
            stack.push(modal.clone());
        }

        debug!(id = %modal.id(), component = modal.component(), "modal shown");
        self.notify();
        Ok(modal)
    }

    /// Spawn a component with no parameters and default options.
    ///
    /// # Errors
    /// Same as [`show`](Self::show).
    pub fn show_component(&self, component: impl Into<String>) -> Result<ModalReference> {
        self.show(ModalDescriptor::new(component))
    }

    /// Resolve every active modal as cancelled. Notifies once.
    pub fn cancel_all(&self) -> usize {
        let drained = std::mem::take(&mut *self.stack());
        let cancelled = drained
            .iter()
            .filter(|modal| modal.resolve(ModalResult::cancel()))
            .count();
        if !drained.is_empty() {
            self.notify();
        }
        cancelled
    }

    /// Drop a resolved modal from the stack.
    pub(super) fn detach(&self, id: ModalId) {
        let removed = {
            let mut stack = self.stack();
            let before = stack.len();
            stack.retain(|modal| modal.id() != id);
            stack.len() != before
        };
        if removed {
            self.notify();
        }
    }
}

impl Default for ModalService {
    fn default() -> Self {
        Self {
            shared: Arc::new(Shared {
                config: ModalConfig::default(),
                stack: Mutex::new(Vec::new()),
                subscriber: Mutex::new(None),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn show_pushes_and_close_pops() {
        let service = ModalService::default();
        let modal = service.show_component("Confirm").unwrap();
        assert_eq!(service.active_count(), 1);
        assert_eq!(service.top(), Some(modal.clone()));

        assert!(modal.close());
        assert_eq!(service.active_count(), 0);
    }

    #[test]
    fn stack_orders_front_most_last() {
        let service = ModalService::default();
        let first = service.show_component("Settings").unwrap();
        let second = service.show_component("Confirm").unwrap();
        assert_eq!(service.top(), Some(second.clone()));

        second.close();
        assert_eq!(service.top(), Some(first));
    }

    #[test]
    fn closing_a_lower_modal_keeps_the_top() {
        let service = ModalService::default();
        let lower = service.show_component("Settings").unwrap();
        let upper = service.show_component("Confirm").unwrap();
        lower.close_with(ModalResult::ok(json!("saved")));
        assert_eq!(service.active(), vec![upper]);
    }

    #[test]
    fn limit_rejects_extra_modals() {
        let service = ModalService::new(ModalConfig {
            max_active: Some(1),
            ..ModalConfig::default()
        })
        .unwrap();
        let first = service.show_component("A").unwrap();
        assert!(matches!(
            service.show_component("B"),
            Err(CoreError::InvalidOperation(_))
        ));
        first.close();
        assert!(service.show_component("B").is_ok());
    }

    #[test]
    fn zero_limit_is_a_config_error() {
        let result = ModalService::new(ModalConfig {
            max_active: Some(0),
            ..ModalConfig::default()
        });
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn subscriber_tracks_stack_changes() {
        let service = ModalService::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        service.subscribe({
            let seen = Arc::clone(&seen);
            move |active| seen.lock().unwrap().push(active.len())
        });

        let a = service.show_component("A").unwrap();
        let _b = service.show_component("B").unwrap();
        a.close();
        a.close();
        service.cancel_all();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 1, 0]);
    }

    #[test]
    fn cancel_all_resolves_everything_as_cancelled() {
        let service = ModalService::default();
        let a = service.show_component("A").unwrap();
        let b = service.show_component("B").unwrap();
        assert_eq!(service.cancel_all(), 2);
        assert!(a.try_result().unwrap().is_cancelled());
        assert!(b.try_result().unwrap().is_cancelled());
        assert!(!a.close_with(ModalResult::ok_empty()));
        assert_eq!(service.active_count(), 0);
    }

    #[test]
    fn background_click_respects_options() {
        let service = ModalService::default();
        let sticky = service
            .show(ModalDescriptor::new("Sticky").options(crate::modal::ModalOptions {
                disable_background_cancel: Some(true),
                ..Default::default()
            }))
            .unwrap();
        assert!(!sticky.background_click());
        assert!(!sticky.is_resolved());

        let loose = service.show_component("Loose").unwrap();
        assert!(loose.background_click());
        assert!(loose.try_result().unwrap().is_cancelled());
    }

    #[test]
    fn subscriber_may_close_from_callback() {
        let service = ModalService::default();
        service.subscribe(|active| {
            if active.len() > 1 {
                active[0].close();
            }
        });
        service.show_component("A").unwrap();
        let b = service.show_component("B").unwrap();
        assert_eq!(service.active(), vec![b]);
    }
}
