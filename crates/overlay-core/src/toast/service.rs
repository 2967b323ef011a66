//! Toast registry.
//!
//! The `ToastService` is the single source of truth for which toasts are
//! visible and in what order. It limits the number of visible toasts (the
//! rest wait in a FIFO queue), owns each visible toast's countdown, and
//! reports every change to one render-surface subscriber.
//!
//! Subscribers are called synchronously, after the state lock is released,
//! with a snapshot of the visible collection. They may call back into the
//! service.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tracing::{debug, warn};

use super::instance::{ToastContent, ToastId, ToastInstance};
use super::settings::{ToastLevel, ToastSettings};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::storage::ToastConfig;

/// Render-surface callback, invoked with the visible toasts in render order.
pub type ToastSubscriber = Arc<dyn Fn(&[Arc<ToastInstance>]) + Send + Sync>;

#[derive(Default)]
struct State {
    visible: Vec<Arc<ToastInstance>>,
    queue: VecDeque<Arc<ToastInstance>>,
}

pub(crate) struct Shared {
    config: ToastConfig,
    state: Mutex<State>,
    subscriber: Mutex<Option<ToastSubscriber>>,
}

/// Cheap to clone; clones share one registry.
#[derive(Clone)]
pub struct ToastService {
    shared: Arc<Shared>,
}

impl ToastService {
    /// # Errors
    /// Returns a configuration error if `config` is invalid.
    pub fn new(config: ToastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(State::default()),
                subscriber: Mutex::new(None),
            }),
        })
    }

    pub(super) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn subscriber_slot(&self) -> MutexGuard<'_, Option<ToastSubscriber>> {
        self.shared
            .subscriber
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &ToastConfig {
        &self.shared.config
    }

    // ── Subscription ─────────────────────────────────────────────────

    /// Install the render surface, replacing any previous one.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&[Arc<ToastInstance>]) + Send + Sync + 'static,
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
        let snapshot = self.visible();
        subscriber(&snapshot);
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Visible toasts in render order.
    pub fn visible(&self) -> Vec<Arc<ToastInstance>> {
        self.state().visible.clone()
    }

    pub fn visible_ids(&self) -> Vec<ToastId> {
        self.state().visible.iter().map(|t| t.id()).collect()
    }

    pub fn visible_count(&self) -> usize {
        self.state().visible.len()
    }

    pub fn queued_count(&self) -> usize {
        self.state().queue.len()
    }

    /// Look up a visible or queued toast.
    pub fn get(&self, id: ToastId) -> Option<Arc<ToastInstance>> {
        let state = self.state();
        state
            .visible
            .iter()
            .chain(state.queue.iter())
            .find(|t| t.id() == id)
            .cloned()
    }

    /// Build a snapshot event of the visible collection.
    pub fn snapshot(&self) -> Event {
        let state = self.state();
        Event::ToastsChanged {
            visible: state.visible.iter().map(|t| t.id()).collect(),
            queued: state.queue.len(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn show_info(&self, message: impl Into<String>) -> Result<ToastId> {
        self.show_message(ToastLevel::Info, message, ToastSettings::default())
    }

    pub fn show_success(&self, message: impl Into<String>) -> Result<ToastId> {
        self.show_message(ToastLevel::Success, message, ToastSettings::default())
    }

    pub fn show_warning(&self, message: impl Into<String>) -> Result<ToastId> {
        self.show_message(ToastLevel::Warning, message, ToastSettings::default())
    }

    pub fn show_error(&self, message: impl Into<String>) -> Result<ToastId> {
        self.show_message(ToastLevel::Error, message, ToastSettings::default())
    }

    /// Show a text toast.
    ///
    /// # Errors
    /// Invalid settings, or a timed toast requested outside a tokio runtime.
    /// Nothing is created on error.
    pub fn show_message(
        &self,
        level: ToastLevel,
        message: impl Into<String>,
        settings: ToastSettings,
    ) -> Result<ToastId> {
        self.show(
            Some(level),
            ToastContent::Message {
                text: message.into(),
            },
            settings,
        )
    }

    /// Show a renderer-defined component as a toast.
    ///
    /// # Errors
    /// Same as [`show_message`](Self::show_message).
    pub fn show_custom(
        &self,
        component: impl Into<String>,
        parameters: serde_json::Value,
        settings: ToastSettings,
    ) -> Result<ToastId> {
        self.show(
            None,
            ToastContent::Custom {
                component: component.into(),
                parameters,
            },
            settings,
        )
    }

    fn show(
        &self,
        level: Option<ToastLevel>,
        content: ToastContent,
        settings: ToastSettings,
    ) -> Result<ToastId> {
        let resolved = settings.resolve(&self.shared.config)?;
        if !resolved.disable_timeout && tokio::runtime::Handle::try_current().is_err() {
            return Err(CoreError::InvalidOperation(
                "timed toasts require a tokio runtime".into(),
            ));
        }

        let toast = Arc::new(ToastInstance::new(
            level,
            content,
            resolved,
            Arc::downgrade(&self.shared),
        ));
        let id = toast.id();

        let visible = {
            let mut state = self.state();
            let full = self
                .shared
                .config
                .max_toast_count
                .is_some_and(|max| state.visible.len() >= max);
            if full {
                state.queue.push_back(Arc::clone(&toast));
            } else {
                self.insert_visible(&mut state, Arc::clone(&toast));
            }
            !full
        };

        if visible {
            if let Err(e) = toast.mount() {
                self.detach(|t| t.id() == id);
                return Err(e);
            }
        }
        debug!(%id, ?level, queued = !visible, "toast shown");
        self.notify();
        Ok(id)
    }

    fn insert_visible(&self, state: &mut State, toast: Arc<ToastInstance>) {
        if self.shared.config.newest_on_top {
            state.visible.insert(0, toast);
        } else {
            state.visible.push(toast);
        }
    }

    /// Remove a visible or queued toast.
    ///
    /// Returns `false` if it was not present; a timer elapse and a user close
    /// may race to remove the same toast.
    pub fn remove(&self, id: ToastId) -> bool {
        let removed = self.remove_where(|t| t.id() == id);
        if removed > 0 {
            debug!(%id, "toast removed");
            self.notify();
        }
        removed > 0
    }

    /// Remove everything, visible and queued. Notifies once.
    pub fn clear_all(&self) {
        let (visible, queued) = {
            let mut state = self.state();
            (
                std::mem::take(&mut state.visible),
                std::mem::take(&mut state.queue),
            )
        };
        for toast in &visible {
            toast.unmount();
        }
        debug!(visible = visible.len(), queued = queued.len(), "toasts cleared");
        self.notify();
    }

    /// Remove visible and queued toasts of one level.
    pub fn clear_level(&self, level: ToastLevel) -> usize {
        self.clear_where(|t| t.level() == Some(level))
    }

    /// Remove visible and queued custom-component toasts.
    pub fn clear_custom(&self) -> usize {
        self.clear_where(ToastInstance::is_custom)
    }

    /// Drop queued toasts without touching visible ones.
    pub fn clear_queue(&self) -> usize {
        let mut state = self.state();
        let dropped = state.queue.len();
        state.queue.clear();
        dropped
    }

    /// Drop queued toasts of one level.
    pub fn clear_queue_level(&self, level: ToastLevel) -> usize {
        let mut state = self.state();
        let before = state.queue.len();
        state.queue.retain(|t| t.level() != Some(level));
        before - state.queue.len()
    }

    fn clear_where(&self, predicate: impl Fn(&ToastInstance) -> bool) -> usize {
        let removed = self.remove_where(predicate);
        if removed > 0 {
            self.notify();
        }
        removed
    }

    /// Remove matching toasts, dispose their timers and promote queued ones.
    /// Does not notify.
    fn remove_where(&self, predicate: impl Fn(&ToastInstance) -> bool) -> usize {
        let (removed, queued_removed, promoted) = {
            let mut state = self.state();
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.visible)
                .into_iter()
                .partition(|t| predicate(t.as_ref()));
            state.visible = kept;

            let queued_before = state.queue.len();
            state.queue.retain(|t| !predicate(t.as_ref()));
            let queued_removed = queued_before - state.queue.len();

            let mut promoted = Vec::new();
            let max = self.shared.config.max_toast_count.unwrap_or(usize::MAX);
            while state.visible.len() < max {
                let Some(next) = state.queue.pop_front() else {
                    break;
                };
                promoted.push(Arc::clone(&next));
                self.insert_visible(&mut state, next);
            }
            (removed, queued_removed, promoted)
        };

        for toast in &removed {
            toast.unmount();
        }
        for toast in promoted {
            if let Err(e) = toast.mount() {
                warn!(id = %toast.id(), error = %e, "queued toast could not start its timer");
            }
        }
        removed.len() + queued_removed
    }

    /// Undo a failed insertion without notifying.
    fn detach(&self, predicate: impl Fn(&ToastInstance) -> bool) {
        let mut state = self.state();
        state.visible.retain(|t| !predicate(t.as_ref()));
        state.queue.retain(|t| !predicate(t.as_ref()));
    }
}

impl Default for ToastService {
    fn default() -> Self {
        Self {
            shared: Arc::new(Shared {
                config: ToastConfig::default(),
                state: Mutex::new(State::default()),
                subscriber: Mutex::new(None),
            }),
        }
    }
}
