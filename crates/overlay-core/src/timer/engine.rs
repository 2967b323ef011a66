//! Countdown timer implementation.
//!
//! The countdown is a wall-clock-based state machine driven by a single
//! scheduled task on the ambient tokio runtime. Elapsed time is recomputed
//! from `tokio::time::Instant` on every tick instead of being decremented, so
//! pause/resume cycles never accumulate drift.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Elapsed
//!   any non-terminal state -> Disposed
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let timer = CountdownTimer::new(Duration::from_secs(5), Duration::from_secs(10))?
//!     .on_tick(|pct| println!("{pct}%"))
//!     .on_elapsed(|| println!("done"));
//! timer.start()?;
//! timer.finished().await;
//! ```

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Notify};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::{ConfigError, CoreError, Result};
use crate::events::Event;

/// Progress cadence used unless overridden with [`CountdownTimer::with_tick_interval`].
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    /// Reached its full duration; the elapsed callback has fired.
    Elapsed,
    /// Cancelled before elapsing; no callback will ever fire again.
    Disposed,
}

impl TimerPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, TimerPhase::Elapsed | TimerPhase::Disposed)
    }
}

type TickCallback = Arc<dyn Fn(u8) + Send + Sync>;
type ElapsedCallback = Box<dyn FnOnce() + Send>;

thread_local! {
    /// Address of the timer whose tick callback is running on this thread.
    static TICKING: Cell<usize> = const { Cell::new(0) };
}

struct Inner {
    phase: TimerPhase,
    tick_interval: Duration,
    /// Elapsed time banked before the most recent resume.
    accumulated: Duration,
    /// Set while running.
    resumed_at: Option<Instant>,
    extension_applied: bool,
    on_tick: Option<TickCallback>,
    on_elapsed: Option<ElapsedCallback>,
}

struct Shared {
    total: Duration,
    extended: Duration,
    inner: Mutex<Inner>,
    /// Held while a tick callback runs; `pause` and `dispose` wait on it.
    tick_gate: Mutex<()>,
    resumed: Notify,
    cancel: CancellationToken,
    phase_tx: watch::Sender<TimerPhase>,
}

enum Advance {
    Progress(u8, Option<TickCallback>),
    Paused,
    Elapsed(Option<TickCallback>, Option<ElapsedCallback>),
    Stop,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn address(&self) -> usize {
        self as *const Shared as usize
    }

    /// Invoke `on_tick` unless the timer stopped running since the tick was
    /// evaluated.
    fn fire_tick(&self, pct: u8, on_tick: &TickCallback) {
        let _gate = self.tick_gate.lock().unwrap_or_else(PoisonError::into_inner);
        if self.lock().phase != TimerPhase::Running {
            return;
        }
        TICKING.with(|t| t.set(self.address()));
        on_tick(pct);
        TICKING.with(|t| t.set(0));
    }

    /// Wait for an in-flight tick callback to return. A callback that pauses
    /// or disposes its own timer does not wait on itself.
    fn quiesce(&self) {
        if TICKING.with(Cell::get) == self.address() {
            return;
        }
        drop(self.tick_gate.lock().unwrap_or_else(PoisonError::into_inner));
    }

    fn current_duration(&self, inner: &Inner) -> Duration {
        if inner.extension_applied {
            self.extended
        } else {
            self.total
        }
    }

    /// Uncapped elapsed time at `now`.
    fn raw_elapsed(&self, inner: &Inner, now: Instant) -> Duration {
        match inner.resumed_at {
            Some(resumed_at) => inner.accumulated + now.saturating_duration_since(resumed_at),
            None => inner.accumulated,
        }
    }

    fn elapsed(&self, inner: &Inner, now: Instant) -> Duration {
        self.raw_elapsed(inner, now).min(self.current_duration(inner))
    }

    fn set_phase(&self, inner: &mut Inner, phase: TimerPhase) {
        inner.phase = phase;
        self.phase_tx.send_replace(phase);
    }

    /// Evaluate the timer at the current instant. Runs once per tick.
    fn advance(&self) -> Advance {
        let mut inner = self.lock();
        match inner.phase {
            TimerPhase::Running => {
                let duration = self.current_duration(&inner);
                let elapsed = self.raw_elapsed(&inner, Instant::now());
                if elapsed >= duration {
                    inner.accumulated = duration;
                    inner.resumed_at = None;
                    self.set_phase(&mut inner, TimerPhase::Elapsed);
                    Advance::Elapsed(inner.on_tick.take(), inner.on_elapsed.take())
                } else {
                    Advance::Progress(percent(elapsed, duration), inner.on_tick.clone())
                }
            }
            TimerPhase::Paused => Advance::Paused,
            TimerPhase::Idle | TimerPhase::Elapsed | TimerPhase::Disposed => Advance::Stop,
        }
    }
}

/// Integer percent of `duration` covered by `elapsed`, clamped to 0..=100.
fn percent(elapsed: Duration, duration: Duration) -> u8 {
    if duration.is_zero() {
        return 100;
    }
    (elapsed.as_nanos().saturating_mul(100) / duration.as_nanos()).min(100) as u8
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

async fn run(shared: Arc<Shared>, tick_interval: Duration) {
    let mut ticker = time::interval_at(Instant::now() + tick_interval, tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = shared.cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        match shared.advance() {
            Advance::Progress(pct, on_tick) => {
                if let Some(on_tick) = on_tick {
                    shared.fire_tick(pct, &on_tick);
                }
            }
            Advance::Paused => {
                tokio::select! {
                    biased;
                    () = shared.cancel.cancelled() => return,
                    () = shared.resumed.notified() => {}
                }
                ticker.reset();
            }
            Advance::Elapsed(on_tick, on_elapsed) => {
                debug!(duration_ms = millis(shared.total), "countdown elapsed");
                if let Some(on_tick) = on_tick {
                    on_tick(100);
                }
                if let Some(on_elapsed) = on_elapsed {
                    on_elapsed();
                }
                return;
            }
            Advance::Stop => return,
        }
    }
}

/// Suspendable countdown with an optional one-time extension.
///
/// Owns at most one scheduled task. Dropping the timer disposes it.
pub struct CountdownTimer {
    shared: Arc<Shared>,
}

impl CountdownTimer {
    /// Create an idle timer.
    ///
    /// `extended` replaces `total` once [`extend`](Self::extend) is called; it is
    /// ignored unless longer than `total`.
    ///
    /// # Errors
    /// Returns a configuration error if `total` is zero.
    pub fn new(total: Duration, extended: Duration) -> Result<Self> {
        if total.is_zero() {
            return Err(ConfigError::invalid("timeout", "must be greater than zero").into());
        }
        let (phase_tx, _) = watch::channel(TimerPhase::Idle);
        Ok(Self {
            shared: Arc::new(Shared {
                total,
                extended,
                inner: Mutex::new(Inner {
                    phase: TimerPhase::Idle,
                    tick_interval: DEFAULT_TICK_INTERVAL,
                    accumulated: Duration::ZERO,
                    resumed_at: None,
                    extension_applied: false,
                    on_tick: None,
                    on_elapsed: None,
                }),
                tick_gate: Mutex::new(()),
                resumed: Notify::new(),
                cancel: CancellationToken::new(),
                phase_tx,
            }),
        })
    }

    /// Override the progress cadence. Zero is bumped to one millisecond.
    pub fn with_tick_interval(self, interval: Duration) -> Self {
        self.shared.lock().tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Register the progress callback, called with percent of the current
    /// duration elapsed. Must be set before `start`.
    pub fn on_tick<F>(self, callback: F) -> Self
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.shared.lock().on_tick = Some(Arc::new(callback));
        self
    }

    /// Register the terminal callback. Fires at most once.
    pub fn on_elapsed<F>(self, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.lock().on_elapsed = Some(Box::new(callback));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.shared.lock().phase
    }

    pub fn total(&self) -> Duration {
        self.shared.total
    }

    pub fn extended(&self) -> Duration {
        self.shared.extended
    }

    /// Total or extended duration, whichever is in force.
    pub fn current_duration(&self) -> Duration {
        let inner = self.shared.lock();
        self.shared.current_duration(&inner)
    }

    pub fn is_extended(&self) -> bool {
        self.shared.lock().extension_applied
    }

    pub fn elapsed(&self) -> Duration {
        let inner = self.shared.lock();
        self.shared.elapsed(&inner, Instant::now())
    }

    pub fn remaining(&self) -> Duration {
        let inner = self.shared.lock();
        self.shared
            .current_duration(&inner)
            .saturating_sub(self.shared.elapsed(&inner, Instant::now()))
    }

    /// 0 ..= 100 percent of the current duration elapsed.
    pub fn percent_elapsed(&self) -> u8 {
        let inner = self.shared.lock();
        percent(
            self.shared.elapsed(&inner, Instant::now()),
            self.shared.current_duration(&inner),
        )
    }

    /// Wait until the timer elapses or is disposed.
    pub async fn finished(&self) -> TimerPhase {
        let mut rx = self.shared.phase_tx.subscribe();
        let phase = match rx.wait_for(|phase| phase.is_terminal()).await {
            Ok(phase) => *phase,
            Err(_) => TimerPhase::Disposed,
        };
        phase
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Schedule the countdown on the current tokio runtime.
    ///
    /// Returns immediately; use [`finished`](Self::finished) to wait. Starting
    /// an already started timer is a no-op.
    ///
    /// # Errors
    /// `InvalidOperation` if the timer was disposed or no runtime is active.
    pub fn start(&self) -> Result<Option<Event>> {
        let handle = tokio::runtime::Handle::try_current().map_err(|_| {
            CoreError::InvalidOperation("countdown started outside a tokio runtime".into())
        })?;

        let (tick_interval, duration) = {
            let mut inner = self.shared.lock();
            match inner.phase {
                TimerPhase::Idle => {}
                TimerPhase::Disposed => {
                    return Err(CoreError::InvalidOperation(
                        "cannot start a disposed countdown".into(),
                    ));
                }
                TimerPhase::Running | TimerPhase::Paused | TimerPhase::Elapsed => {
                    return Ok(None);
                }
            }
            inner.resumed_at = Some(Instant::now());
            self.shared.set_phase(&mut inner, TimerPhase::Running);
            (inner.tick_interval, self.shared.current_duration(&inner))
        };

        handle.spawn(run(Arc::clone(&self.shared), tick_interval));
        debug!(duration_ms = millis(duration), "countdown started");
        Ok(Some(Event::TimerStarted {
            duration_ms: millis(duration),
            at: Utc::now(),
        }))
    }

    /// Freeze elapsed time. No-op unless running. No tick fires once this
    /// returns.
    pub fn pause(&self) -> Option<Event> {
        let remaining = {
            let mut inner = self.shared.lock();
            if inner.phase != TimerPhase::Running {
                return None;
            }
            let now = Instant::now();
            inner.accumulated = self.shared.elapsed(&inner, now);
            inner.resumed_at = None;
            self.shared.set_phase(&mut inner, TimerPhase::Paused);
            self.shared.current_duration(&inner).saturating_sub(inner.accumulated)
        };
        self.shared.quiesce();
        Some(Event::TimerPaused {
            remaining_ms: millis(remaining),
            at: Utc::now(),
        })
    }

    /// Resume from the frozen elapsed time. No-op unless paused.
    pub fn unpause(&self) -> Option<Event> {
        let event = {
            let mut inner = self.shared.lock();
            if inner.phase != TimerPhase::Paused {
                return None;
            }
            inner.resumed_at = Some(Instant::now());
            self.shared.set_phase(&mut inner, TimerPhase::Running);
            let remaining = self.shared.current_duration(&inner).saturating_sub(inner.accumulated);
            Event::TimerResumed {
                remaining_ms: millis(remaining),
                at: Utc::now(),
            }
        };
        self.shared.resumed.notify_one();
        Some(event)
    }

    /// Switch to the extended duration, keeping elapsed time. Applies once,
    /// and only when the extended duration is longer than the total.
    pub fn extend(&self) -> Option<Event> {
        let mut inner = self.shared.lock();
        if inner.extension_applied
            || inner.phase.is_terminal()
            || self.shared.extended <= self.shared.total
        {
            return None;
        }
        inner.extension_applied = true;
        debug!(duration_ms = millis(self.shared.extended), "countdown extended");
        Some(Event::TimerExtended {
            duration_ms: millis(self.shared.extended),
            at: Utc::now(),
        })
    }

    /// Cancel scheduled work. No callback fires afterwards. Idempotent.
    pub fn dispose(&self) -> Option<Event> {
        let (released, was_live) = {
            let mut inner = self.shared.lock();
            if inner.phase == TimerPhase::Disposed {
                return None;
            }
            let was_live = inner.phase != TimerPhase::Elapsed;
            if was_live {
                inner.resumed_at = None;
                self.shared.set_phase(&mut inner, TimerPhase::Disposed);
            }
            ((inner.on_tick.take(), inner.on_elapsed.take()), was_live)
        };
        self.shared.cancel.cancel();
        self.shared.quiesce();
        drop(released);

        was_live.then(|| Event::TimerDisposed { at: Utc::now() })
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.lock();
        f.debug_struct("CountdownTimer")
            .field("phase", &inner.phase)
            .field("total", &self.shared.total)
            .field("extended", &self.shared.extended)
            .field("extension_applied", &inner.extension_applied)
            .field("accumulated", &inner.accumulated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn zero_total_is_rejected() {
        let err = CountdownTimer::new(Duration::ZERO, ms(1000)).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn start_outside_runtime_is_invalid() {
        let timer = CountdownTimer::new(ms(1000), Duration::ZERO).unwrap();
        assert!(matches!(timer.start(), Err(CoreError::InvalidOperation(_))));
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn pause_and_unpause_from_idle_are_noops() {
        let timer = CountdownTimer::new(ms(1000), Duration::ZERO).unwrap();
        assert!(timer.pause().is_none());
        assert!(timer.unpause().is_none());
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(percent(ms(0), ms(1000)), 0);
        assert_eq!(percent(ms(250), ms(1000)), 25);
        assert_eq!(percent(ms(5000), ms(1000)), 100);
    }

    #[test]
    fn sub_millisecond_durations_do_not_divide_by_zero() {
        let micros = Duration::from_micros;
        assert_eq!(percent(micros(250), micros(500)), 50);
        assert_eq!(percent(Duration::ZERO, micros(1)), 0);

        let timer = CountdownTimer::new(micros(500), Duration::ZERO).unwrap();
        assert_eq!(timer.percent_elapsed(), 0);
        assert_eq!(timer.remaining(), micros(500));
    }

    /// Run `stop` against a 1 ms ticker on a multi-thread runtime and count
    /// ticks that land after it returned.
    async fn ticks_after_stop(stop: fn(&CountdownTimer)) -> usize {
        let mut late = 0;
        for round in 0..200u64 {
            let stopped = Arc::new(std::sync::atomic::AtomicBool::new(false));
            let late_ticks = Arc::new(AtomicUsize::new(0));
            let timer = CountdownTimer::new(ms(60_000), Duration::ZERO)
                .unwrap()
                .with_tick_interval(ms(1))
                .on_tick({
                    let stopped = Arc::clone(&stopped);
                    let late_ticks = Arc::clone(&late_ticks);
                    move |_| {
                        if stopped.load(Ordering::SeqCst) {
                            late_ticks.fetch_add(1, Ordering::SeqCst);
                        }
                        std::hint::spin_loop();
                    }
                });
            timer.start().unwrap();
            time::sleep(Duration::from_micros(500 + (round % 7) * 300)).await;

            stop(&timer);
            stopped.store(true, Ordering::SeqCst);
            time::sleep(ms(5)).await;
            late += late_ticks.load(Ordering::SeqCst);
        }
        late
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn no_tick_after_dispose_returns_across_threads() {
        let late = ticks_after_stop(|timer| {
            timer.dispose();
        })
        .await;
        assert_eq!(late, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn no_tick_after_pause_returns_across_threads() {
        let late = ticks_after_stop(|timer| {
            timer.pause();
        })
        .await;
        assert_eq!(late, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn tick_callback_may_dispose_its_own_timer() {
        let slot: Arc<Mutex<Option<Arc<CountdownTimer>>>> = Arc::new(Mutex::new(None));
        let ticks = Arc::new(AtomicUsize::new(0));
        let timer = Arc::new(
            CountdownTimer::new(ms(1000), Duration::ZERO)
                .unwrap()
                .on_tick({
                    let slot = Arc::clone(&slot);
                    let ticks = Arc::clone(&ticks);
                    move |_| {
                        ticks.fetch_add(1, Ordering::SeqCst);
                        if let Some(timer) = slot.lock().unwrap().as_ref() {
                            timer.dispose();
                        }
                    }
                }),
        );
        *slot.lock().unwrap() = Some(Arc::clone(&timer));

        timer.start().unwrap();
        assert_eq!(timer.finished().await, TimerPhase::Disposed);
        assert_eq!(ticks.load(Ordering::SeqCst), 1);
        slot.lock().unwrap().take();
    }

    #[tokio::test(start_paused = true)]
    async fn start_pause_resume() {
        let timer = CountdownTimer::new(ms(5000), Duration::ZERO).unwrap();
        assert!(timer.start().unwrap().is_some());
        assert_eq!(timer.phase(), TimerPhase::Running);
        assert!(timer.start().unwrap().is_none(), "second start is a no-op");

        time::sleep(ms(1000)).await;
        assert!(timer.pause().is_some());
        assert!(timer.pause().is_none(), "pause is idempotent");
        assert_eq!(timer.phase(), TimerPhase::Paused);

        time::sleep(ms(3000)).await;
        assert_eq!(timer.elapsed(), ms(1000));
        assert_eq!(timer.remaining(), ms(4000));

        assert!(timer.unpause().is_some());
        assert!(timer.unpause().is_none(), "unpause is idempotent");
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn elapses_once_with_final_tick() {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        let fired = Arc::new(AtomicUsize::new(0));
        let timer = CountdownTimer::new(ms(1000), Duration::ZERO)
            .unwrap()
            .on_tick({
                let ticks = Arc::clone(&ticks);
                move |pct| ticks.lock().unwrap().push(pct)
            })
            .on_elapsed({
                let fired = Arc::clone(&fired);
                move || {
                    fired.fetch_add(1, Ordering::SeqCst);
                }
            });

        timer.start().unwrap();
        assert_eq!(timer.finished().await, TimerPhase::Elapsed);
        time::sleep(ms(500)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        let ticks = ticks.lock().unwrap();
        assert_eq!(ticks.last(), Some(&100));
        assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ticks.len(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_while_paused() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let timer = CountdownTimer::new(ms(2000), Duration::ZERO)
            .unwrap()
            .on_tick({
                let ticks = Arc::clone(&ticks);
                move |_| {
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            });

        timer.start().unwrap();
        time::sleep(ms(550)).await;
        timer.pause();
        let before = ticks.load(Ordering::SeqCst);
        time::sleep(ms(5000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), before);
        assert_eq!(timer.phase(), TimerPhase::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_suppresses_callbacks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let timer = CountdownTimer::new(ms(1000), Duration::ZERO)
            .unwrap()
            .on_tick({
                let calls = Arc::clone(&calls);
                move |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                }
            })
            .on_elapsed({
                let calls = Arc::clone(&calls);
                move || {
                    calls.fetch_add(1000, Ordering::SeqCst);
                }
            });

        timer.start().unwrap();
        time::sleep(ms(450)).await;
        assert!(timer.dispose().is_some());
        assert!(timer.dispose().is_none(), "dispose is idempotent");
        let seen = calls.load(Ordering::SeqCst);
        assert!(seen < 1000);

        time::sleep(ms(5000)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
        assert_eq!(timer.finished().await, TimerPhase::Disposed);
        assert!(matches!(timer.start(), Err(CoreError::InvalidOperation(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_disposes_it() {
        let fired = Arc::new(AtomicUsize::new(0));
        let timer = CountdownTimer::new(ms(500), Duration::ZERO)
            .unwrap()
            .on_elapsed({
                let fired = Arc::clone(&fired);
                move || {
                    fired.fetch_add(1, Ordering::SeqCst);
                }
            });
        timer.start().unwrap();
        drop(timer);
        time::sleep(ms(2000)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn extend_switches_to_longer_duration_once() {
        let start = Instant::now();
        let timer = CountdownTimer::new(ms(1000), ms(3000)).unwrap();
        timer.start().unwrap();

        time::sleep(ms(500)).await;
        assert!(timer.extend().is_some());
        assert!(timer.extend().is_none());
        assert!(timer.is_extended());
        assert_eq!(timer.current_duration(), ms(3000));

        timer.finished().await;
        let took = start.elapsed();
        assert!(took >= ms(3000) && took <= ms(3100), "took {took:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn extend_is_ignored_when_not_longer() {
        let timer = CountdownTimer::new(ms(1000), ms(500)).unwrap();
        timer.start().unwrap();
        assert!(timer.extend().is_none());
        assert_eq!(timer.current_duration(), ms(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn custom_tick_interval_controls_cadence() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let timer = CountdownTimer::new(ms(1000), Duration::ZERO)
            .unwrap()
            .with_tick_interval(ms(250))
            .on_tick({
                let ticks = Arc::clone(&ticks);
                move |_| {
                    ticks.fetch_add(1, Ordering::SeqCst);
                }
            });
        timer.start().unwrap();
        timer.finished().await;
        assert_eq!(ticks.load(Ordering::SeqCst), 4);
    }
}
