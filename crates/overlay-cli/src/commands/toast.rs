use std::time::Duration;

use chrono::Utc;
use clap::{Subcommand, ValueEnum};
use overlay_core::{Config, Event, ToastLevel, ToastService, ToastSettings};
use tokio::sync::mpsc;

use super::emit;

#[derive(Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Info,
    Success,
    Warning,
    Error,
}

impl From<LevelArg> for ToastLevel {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Info => ToastLevel::Info,
            LevelArg::Success => ToastLevel::Success,
            LevelArg::Warning => ToastLevel::Warning,
            LevelArg::Error => ToastLevel::Error,
        }
    }
}

#[derive(Subcommand)]
pub enum ToastAction {
    /// Show toasts and print every registry change until they are all gone
    Show {
        /// One toast per message, shown in order
        #[arg(required = true)]
        messages: Vec<String>,
        #[arg(long, value_enum, default_value = "info")]
        level: LevelArg,
        /// Per-toast timeout in milliseconds (defaults to the config file)
        #[arg(long)]
        timeout_ms: Option<u64>,
        /// Keep toasts until closed; prints the final snapshot and exits
        #[arg(long)]
        disable_timeout: bool,
        /// Limit visible toasts; the rest wait in a queue
        #[arg(long)]
        max_visible: Option<usize>,
        /// Insert new toasts at the front
        #[arg(long)]
        newest_on_top: bool,
        /// Close the first toast right after showing everything
        #[arg(long)]
        close_first: bool,
    },
}

/// Nothing visible and nothing waiting.
fn is_empty_snapshot(event: &Event) -> bool {
    matches!(event, Event::ToastsChanged { visible, queued: 0, .. } if visible.is_empty())
}

pub async fn run(action: ToastAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ToastAction::Show {
            messages,
            level,
            timeout_ms,
            disable_timeout,
            max_visible,
            newest_on_top,
            close_first,
        } => {
            let mut config = Config::load_or_default().toast;
            if max_visible.is_some() {
                config.max_toast_count = max_visible;
            }
            config.newest_on_top |= newest_on_top;
            let service = ToastService::new(config)?;

            let (tx, mut rx) = mpsc::unbounded_channel();
            service.subscribe({
                let service = service.clone();
                move |_| {
                    let _ = tx.send(service.snapshot());
                }
            });

            let mut settings = ToastSettings::new();
            if let Some(ms) = timeout_ms {
                settings = settings.timeout(Duration::from_millis(ms));
            }
            if disable_timeout {
                settings = settings.disable_timeout();
            }

            let mut shown = Vec::with_capacity(messages.len());
            for message in messages {
                let id = service.show_message(level.into(), message, settings.clone())?;
                emit(&Event::ToastShown {
                    id,
                    level: Some(level.into()),
                    queued: !service.visible_ids().contains(&id),
                    at: Utc::now(),
                })?;
                shown.push(id);
            }
            if close_first {
                if let Some(first) = shown.first() {
                    service.remove(*first);
                }
            }

            if disable_timeout {
                while let Ok(event) = rx.try_recv() {
                    emit(&event)?;
                }
            } else {
                while let Some(event) = rx.recv().await {
                    emit(&event)?;
                    if is_empty_snapshot(&event) {
                        break;
                    }
                }
            }

            // The subscriber holds a service handle; drop it to release the registry.
            service.unsubscribe();
            service.clear_all();
        }
    }
    Ok(())
}
