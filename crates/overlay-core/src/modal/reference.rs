//! Handle to a spawned modal and its single-assignment result.

use std::fmt;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use super::options::{ModalDescriptor, ResolvedModalOptions};
use super::service::{ModalService, Shared};
use crate::error::Result;

/// Unique identifier for a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModalId(Uuid);

impl ModalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ModalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Outcome of a modal. A cancelled result carries no data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalResult {
    pub cancelled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ModalResult {
    pub fn ok(data: impl Into<serde_json::Value>) -> Self {
        Self {
            cancelled: false,
            data: Some(data.into()),
        }
    }

    /// Confirmed without a payload.
    pub fn ok_empty() -> Self {
        Self {
            cancelled: false,
            data: None,
        }
    }

    pub fn cancel() -> Self {
        Self {
            cancelled: true,
            data: None,
        }
    }

    /// # Errors
    /// Returns an error if `data` cannot be serialized.
    pub fn from_data<T: Serialize>(data: &T) -> Result<Self> {
        Ok(Self::ok(serde_json::to_value(data)?))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Decode the payload into a concrete type.
    ///
    /// # Errors
    /// Returns an error if the payload does not match `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        match &self.data {
            Some(value) => Ok(Some(T::deserialize(value)?)),
            None => Ok(None),
        }
    }
}

struct Inner {
    id: ModalId,
    component: String,
    parameters: serde_json::Map<String, serde_json::Value>,
    options: ResolvedModalOptions,
    opened_at: DateTime<Utc>,
    result: watch::Sender<Option<ModalResult>>,
    coordinator: Weak<Shared>,
}

/// Returned by [`ModalService::show`]. Clones share the same result.
#[derive(Clone)]
pub struct ModalReference {
    inner: Arc<Inner>,
}

impl ModalReference {
    pub(super) fn new(
        descriptor: ModalDescriptor,
        options: ResolvedModalOptions,
        coordinator: Weak<Shared>,
    ) -> Self {
        let (result, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                id: ModalId::new(),
                component: descriptor.component,
                parameters: descriptor.parameters,
                options,
                opened_at: Utc::now(),
                result,
                coordinator,
            }),
        }
    }

    pub fn id(&self) -> ModalId {
        self.inner.id
    }

    pub fn component(&self) -> &str {
        &self.inner.component
    }

    pub fn parameters(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.inner.parameters
    }

    pub fn options(&self) -> &ResolvedModalOptions {
        &self.inner.options
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.inner.opened_at
    }

    pub fn is_resolved(&self) -> bool {
        self.inner.result.borrow().is_some()
    }

    /// The result, if already resolved.
    pub fn try_result(&self) -> Option<ModalResult> {
        self.inner.result.borrow().clone()
    }

    /// Wait for the modal to close. Any number of callers may wait.
    pub async fn result(&self) -> ModalResult {
        let mut rx = self.inner.result.subscribe();
        let result = match rx.wait_for(Option::is_some).await {
            Ok(slot) => slot.clone().unwrap_or_else(ModalResult::cancel),
            Err(_) => ModalResult::cancel(),
        };
        result
    }

    /// Dismiss without a payload.
    ///
    /// Returns `false` if the modal was already resolved.
    pub fn close(&self) -> bool {
        self.close_with(ModalResult::cancel())
    }

    /// Resolve with `result`. The first close wins; later calls change nothing
    /// and return `false`.
    pub fn close_with(&self, result: ModalResult) -> bool {
        if !self.resolve(result) {
            return false;
        }
        if let Some(shared) = self.inner.coordinator.upgrade() {
            ModalService::from_shared(shared).detach(self.id());
        }
        true
    }

    /// Click outside the dialog. Cancels unless background cancel is disabled.
    pub fn background_click(&self) -> bool {
        if self.inner.options.disable_background_cancel {
            return false;
        }
        self.close()
    }

    /// Set the result cell without touching the coordinator.
    pub(super) fn resolve(&self, result: ModalResult) -> bool {
        let id = self.inner.id;
        self.inner.result.send_if_modified(move |slot| {
            if slot.is_some() {
                return false;
            }
            debug!(%id, cancelled = result.cancelled, "modal resolved");
            *slot = Some(result);
            true
        })
    }
}

impl PartialEq for ModalReference {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for ModalReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalReference")
            .field("id", &self.inner.id)
            .field("component", &self.inner.component)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}
