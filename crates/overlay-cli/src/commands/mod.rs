pub mod config;
pub mod modal;
pub mod timer;
pub mod toast;

use overlay_core::Event;

/// Print one event as a JSON line on stdout.
pub fn emit(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", event.to_json_line()?);
    Ok(())
}
