use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use overlay_core::{CountdownTimer, Event};
use tokio::sync::mpsc;
use tokio::time::sleep;

use super::emit;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a countdown to completion, printing lifecycle events as JSON lines
    Run {
        /// Countdown length in milliseconds
        #[arg(long, default_value = "5000")]
        total_ms: u64,
        /// Extended length in milliseconds, applied by --extend-at-ms (0 = none)
        #[arg(long, default_value = "0")]
        extended_ms: u64,
        /// Progress cadence in milliseconds
        #[arg(long, default_value = "100")]
        tick_ms: u64,
        /// Pause after this many milliseconds of wall-clock time
        #[arg(long)]
        pause_at_ms: Option<u64>,
        /// How long to stay paused
        #[arg(long, default_value = "0")]
        pause_for_ms: u64,
        /// Apply the extension after this many milliseconds of wall-clock time
        #[arg(long)]
        extend_at_ms: Option<u64>,
        /// Also print every progress tick
        #[arg(long)]
        ticks: bool,
    },
}

enum Step {
    Pause,
    Resume,
    Extend,
}

/// Pause, resume and extend commands ordered by wall-clock offset.
fn script(
    pause_at_ms: Option<u64>,
    pause_for_ms: u64,
    extend_at_ms: Option<u64>,
) -> Vec<(u64, Step)> {
    let mut steps = Vec::new();
    if let Some(at) = pause_at_ms {
        steps.push((at, Step::Pause));
        steps.push((at + pause_for_ms, Step::Resume));
    }
    if let Some(at) = extend_at_ms {
        steps.push((at, Step::Extend));
    }
    steps.sort_by_key(|(at, _)| *at);
    steps
}

pub async fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            total_ms,
            extended_ms,
            tick_ms,
            pause_at_ms,
            pause_for_ms,
            extend_at_ms,
            ticks,
        } => {
            let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
            let mut timer = CountdownTimer::new(
                Duration::from_millis(total_ms),
                Duration::from_millis(extended_ms),
            )?
            .with_tick_interval(Duration::from_millis(tick_ms));
            if ticks {
                timer = timer.on_tick(move |pct| {
                    let _ = tick_tx.send(pct);
                });
            }

            let started = tokio::time::Instant::now();
            if let Some(event) = timer.start()? {
                emit(&event)?;
            }

            let commands = async {
                let mut offset = 0;
                for (at, step) in script(pause_at_ms, pause_for_ms, extend_at_ms) {
                    sleep(Duration::from_millis(at.saturating_sub(offset))).await;
                    offset = at;
                    let event = match step {
                        Step::Pause => timer.pause(),
                        Step::Resume => timer.unpause(),
                        Step::Extend => timer.extend(),
                    };
                    if let Some(event) = event {
                        emit(&event)?;
                    }
                }
                Ok::<_, Box<dyn std::error::Error>>(())
            };
            let progress = async {
                while let Some(pct) = tick_rx.recv().await {
                    emit(&Event::TimerTick {
                        percent_elapsed: pct,
                        at: Utc::now(),
                    })?;
                }
                Ok::<_, Box<dyn std::error::Error>>(())
            };

            tokio::select! {
                _ = timer.finished() => {}
                result = async { tokio::try_join!(commands, progress) } => { result?; }
            }
            // Flush ticks delivered before the elapse.
            while let Ok(pct) = tick_rx.try_recv() {
                emit(&Event::TimerTick {
                    percent_elapsed: pct,
                    at: Utc::now(),
                })?;
            }

            emit(&Event::TimerElapsed {
                after_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                at: Utc::now(),
            })?;
        }
    }
    Ok(())
}
