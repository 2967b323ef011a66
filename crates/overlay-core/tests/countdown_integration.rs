//! Integration tests for the countdown timer against a paused tokio clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use overlay_core::{CountdownTimer, TimerPhase};
use proptest::prelude::*;
use tokio::sync::oneshot;
use tokio::time::{sleep, Instant};

const TICK: Duration = Duration::from_millis(100);

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[tokio::test(start_paused = true)]
async fn test_pause_shifts_elapse_by_paused_time() {
    let start = Instant::now();
    let (tx, rx) = oneshot::channel();
    let timer = CountdownTimer::new(ms(5_000), ms(10_000))
        .unwrap()
        .with_tick_interval(TICK)
        .on_elapsed(move || {
            let _ = tx.send(Instant::now());
        });

    timer.start().unwrap();
    sleep(ms(2_000)).await;
    timer.pause().expect("running timer pauses");
    sleep(ms(2_000)).await;
    timer.unpause().expect("paused timer resumes");

    let fired_at = rx.await.unwrap();
    let took = fired_at - start;
    assert!(
        took >= ms(7_000) && took <= ms(7_000) + TICK,
        "elapsed after {took:?}, expected ~7s"
    );
    assert_eq!(timer.phase(), TimerPhase::Elapsed);
    assert_eq!(timer.remaining(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_dispose_racing_a_pending_tick() {
    let calls = Arc::new(AtomicUsize::new(0));
    let timer = CountdownTimer::new(ms(1_000), Duration::ZERO)
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
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });

    timer.start().unwrap();
    // Land exactly on a tick boundary.
    sleep(ms(500)).await;
    timer.dispose();
    let seen = calls.load(Ordering::SeqCst);

    sleep(ms(3_000)).await;
    assert_eq!(calls.load(Ordering::SeqCst), seen);
    assert_eq!(timer.phase(), TimerPhase::Disposed);
}

#[tokio::test(start_paused = true)]
async fn test_progress_is_relative_to_extended_duration() {
    let last = Arc::new(AtomicUsize::new(0));
    let timer = CountdownTimer::new(ms(1_000), ms(2_000))
        .unwrap()
        .on_tick({
            let last = Arc::clone(&last);
            move |pct| last.store(pct as usize, Ordering::SeqCst)
        });

    timer.start().unwrap();
    sleep(ms(550)).await;
    assert_eq!(last.load(Ordering::SeqCst), 50);

    timer.extend();
    sleep(ms(100)).await;
    assert_eq!(last.load(Ordering::SeqCst), 30);
    assert_eq!(timer.percent_elapsed(), 32);
}

/// Run the timer through `cycles` of (run, pause) and report how long it took
/// to elapse alongside the total time spent paused.
fn run_with_pauses(total: Duration, cycles: &[(u64, u64)]) -> (Duration, Duration) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();

    rt.block_on(async {
        let start = Instant::now();
        let timer = CountdownTimer::new(total, Duration::ZERO).unwrap();
        timer.start().unwrap();

        let mut ran = Duration::ZERO;
        let mut paused = Duration::ZERO;
        for &(run, pause) in cycles {
            let run = ms(run);
            if ran + run + TICK >= total {
                break;
            }
            sleep(run).await;
            ran += run;
            timer.pause();
            sleep(ms(pause)).await;
            paused += ms(pause);
            timer.unpause();
        }

        assert_eq!(timer.finished().await, TimerPhase::Elapsed);
        (start.elapsed(), paused)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_pause_cycles_never_drift(
        cycles in prop::collection::vec((1u64..1_500, 1u64..3_000), 0..6)
    ) {
        let total = ms(5_000);
        let (took, paused) = run_with_pauses(total, &cycles);
        let expected = total + paused;
        prop_assert!(took >= expected, "fired early: {:?} < {:?}", took, expected);
        prop_assert!(took <= expected + TICK, "fired late: {:?} > {:?}", took, expected + TICK);
    }
}
