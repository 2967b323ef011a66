use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modal::{ModalId, ModalResult};
use crate::toast::{ToastId, ToastLevel};

/// Every lifecycle transition in the overlay services produces an Event.
/// Renderers and the CLI consume them as JSON lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    TimerTick {
        percent_elapsed: u8,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    /// The one-time extension switched the timer to its longer lifetime.
    TimerExtended {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    TimerElapsed {
        after_ms: u64,
        at: DateTime<Utc>,
    },
    TimerDisposed {
        at: DateTime<Utc>,
    },
    ToastShown {
        id: ToastId,
        level: Option<ToastLevel>,
        queued: bool,
        at: DateTime<Utc>,
    },
    /// Snapshot of the visible collection, in render order.
    ToastsChanged {
        visible: Vec<ToastId>,
        queued: usize,
        at: DateTime<Utc>,
    },
    ModalShown {
        id: ModalId,
        component: String,
        at: DateTime<Utc>,
    },
    ModalClosed {
        id: ModalId,
        result: ModalResult,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Serialize to a single JSON line.
    pub fn to_json_line(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_in_snake_case() {
        let event = Event::TimerPaused {
            remaining_ms: 3000,
            at: Utc::now(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&event.to_json_line().unwrap()).unwrap();
        assert_eq!(json["type"], "timer_paused");
        assert_eq!(json["remaining_ms"], 3000);
    }
}
