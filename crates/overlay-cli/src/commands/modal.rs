use std::time::Duration;

use chrono::Utc;
use clap::Subcommand;
use overlay_core::{Config, Event, ModalDescriptor, ModalResult, ModalService};
use tokio::time::sleep;

use super::emit;

#[derive(Subcommand)]
pub enum ModalAction {
    /// Open a modal, resolve it after a delay and print its result
    Show {
        /// Component name handed to the renderer
        component: String,
        #[arg(long)]
        title: Option<String>,
        /// Component parameter as key=value; the value is parsed as JSON when possible
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, serde_json::Value)>,
        /// Confirm with this JSON payload
        #[arg(long, conflicts_with_all = ["cancel", "background_click"])]
        answer: Option<String>,
        /// Dismiss without a payload
        #[arg(long)]
        cancel: bool,
        /// Simulate a click outside the dialog
        #[arg(long)]
        background_click: bool,
        /// Delay before the modal is resolved, in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,
    },
}

fn parse_param(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

pub async fn run(action: ModalAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ModalAction::Show {
            component,
            title,
            params,
            answer,
            cancel,
            background_click,
            delay_ms,
        } => {
            let answer = answer
                .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
                .transpose()?;

            let service = ModalService::new(Config::load_or_default().modal)?;
            let mut descriptor = ModalDescriptor::new(component);
            if let Some(title) = title {
                descriptor = descriptor.title(title);
            }
            for (key, value) in params {
                descriptor = descriptor.parameter(key, value);
            }

            let modal = service.show(descriptor)?;
            emit(&Event::ModalShown {
                id: modal.id(),
                component: modal.component().to_string(),
                at: Utc::now(),
            })?;

            let resolver = tokio::spawn({
                let modal = modal.clone();
                async move {
                    sleep(Duration::from_millis(delay_ms)).await;
                    if background_click {
                        if !modal.background_click() {
                            tracing::warn!(id = %modal.id(), "background cancel is disabled");
                            modal.close();
                        }
                    } else if cancel {
                        modal.close();
                    } else {
                        let result = answer.map_or_else(ModalResult::ok_empty, ModalResult::ok);
                        modal.close_with(result);
                    }
                }
            });

            let result = modal.result().await;
            resolver.await?;
            emit(&Event::ModalClosed {
                id: modal.id(),
                result,
                at: Utc::now(),
            })?;
        }
    }
    Ok(())
}
