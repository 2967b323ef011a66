//! A single toast as seen by the render surface.
//!
//! The instance owns its countdown while visible and holds a weak link back to
//! the registry so that the timer, the close button and the click handler can
//! all ask the registry to remove it.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::service::{Shared, ToastService};
use super::settings::{ResolvedToastSettings, ToastLevel};
use crate::error::Result;
use crate::timer::{CountdownTimer, TimerPhase};

/// Unique identifier for a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToastId(Uuid);

impl ToastId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What the toast displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToastContent {
    Message { text: String },
    /// A renderer-defined component, identified by name.
    Custom {
        component: String,
        #[serde(default)]
        parameters: serde_json::Value,
    },
}

pub struct ToastInstance {
    id: ToastId,
    timestamp: DateTime<Utc>,
    level: Option<ToastLevel>,
    content: ToastContent,
    settings: ResolvedToastSettings,
    timer: Mutex<Option<CountdownTimer>>,
    /// Set under the `timer` lock once the toast has left the registry.
    retired: AtomicBool,
    /// Percent of lifetime remaining, 100 -> 0.
    progress: Arc<AtomicU8>,
    /// Cleared while the pointer hovers a pausable toast.
    progress_visible: AtomicBool,
    registry: Weak<Shared>,
}

impl ToastInstance {
    pub(super) fn new(
        level: Option<ToastLevel>,
        content: ToastContent,
        settings: ResolvedToastSettings,
        registry: Weak<Shared>,
    ) -> Self {
        Self {
            id: ToastId::new(),
            timestamp: Utc::now(),
            level,
            content,
            settings,
            timer: Mutex::new(None),
            retired: AtomicBool::new(false),
            progress: Arc::new(AtomicU8::new(100)),
            progress_visible: AtomicBool::new(true),
            registry,
        }
    }

    fn timer(&self) -> MutexGuard<'_, Option<CountdownTimer>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> ToastId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// `None` for custom content.
    pub fn level(&self) -> Option<ToastLevel> {
        self.level
    }

    pub fn content(&self) -> &ToastContent {
        &self.content
    }

    pub fn message(&self) -> Option<&str> {
        match &self.content {
            ToastContent::Message { text } => Some(text),
            ToastContent::Custom { .. } => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.content, ToastContent::Custom { .. })
    }

    pub fn settings(&self) -> &ResolvedToastSettings {
        &self.settings
    }

    pub fn is_timed(&self) -> bool {
        !self.settings.disable_timeout
    }

    /// Percent of the lifetime remaining.
    pub fn progress(&self) -> u8 {
        self.progress.load(Ordering::Relaxed)
    }

    pub fn show_progress_bar(&self) -> bool {
        self.is_timed()
            && self.settings.show_progress_bar
            && self.progress_visible.load(Ordering::Relaxed)
    }

    pub fn show_icon(&self) -> bool {
        self.settings.icon.is_visible()
    }

    /// `None` while queued or when the timeout is disabled.
    pub fn timer_phase(&self) -> Option<TimerPhase> {
        self.timer().as_ref().map(CountdownTimer::phase)
    }

    // ── Interactions ─────────────────────────────────────────────────

    /// Ask the owning registry to remove this toast.
    ///
    /// Returns `false` if it was already gone.
    pub fn close(&self) -> bool {
        match self.registry.upgrade() {
            Some(shared) => ToastService::from_shared(shared).remove(self.id),
            None => false,
        }
    }

    pub fn click(&self) {
        if let Some(on_click) = &self.settings.on_click {
            on_click();
        }
    }

    /// Pointer entered: freeze the countdown when pause-on-hover is enabled.
    pub fn mouse_enter(&self) {
        if !self.settings.pause_progress_on_hover {
            return;
        }
        self.progress_visible.store(false, Ordering::Relaxed);
        if let Some(timer) = self.timer().as_ref() {
            timer.pause();
        }
    }

    /// Pointer left: resume, and grant the one-time extension.
    pub fn mouse_leave(&self) {
        if !self.settings.pause_progress_on_hover {
            return;
        }
        self.progress_visible.store(true, Ordering::Relaxed);
        if let Some(timer) = self.timer().as_ref() {
            timer.unpause();
            timer.extend();
        }
    }

    // ── Lifecycle (driven by the registry) ───────────────────────────

    /// Create and start the countdown once the toast becomes visible.
    /// No-op once the toast has been unmounted.
    pub(super) fn mount(&self) -> Result<()> {
        if !self.is_timed() {
            return Ok(());
        }
        let mut slot = self.timer();
        if slot.is_some() || self.retired.load(Ordering::Acquire) {
            return Ok(());
        }

        let id = self.id;
        let registry = self.registry.clone();
        let mut timer = CountdownTimer::new(self.settings.timeout, self.settings.extended_timeout)?
            .on_elapsed(move || {
                if let Some(shared) = registry.upgrade() {
                    debug!(%id, "toast timed out");
                    ToastService::from_shared(shared).remove(id);
                }
            });
        if self.settings.show_progress_bar {
            let progress = Arc::clone(&self.progress);
            timer = timer.on_tick(move |pct| {
                progress.store(100u8.saturating_sub(pct), Ordering::Relaxed);
            });
        }
        timer.start()?;
        *slot = Some(timer);
        Ok(())
    }

    /// Dispose the countdown. Called exactly when the toast leaves the registry.
    pub(super) fn unmount(&self) {
        let timer = {
            let mut slot = self.timer();
            self.retired.store(true, Ordering::Release);
            slot.take()
        };
        if let Some(timer) = timer {
            timer.dispose();
        }
    }
}

impl fmt::Debug for ToastInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastInstance")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp)
            .field("level", &self.level)
            .field("content", &self.content)
            .field("settings", &self.settings)
            .field("progress", &self.progress())
            .finish()
    }
}
