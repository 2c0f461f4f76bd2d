//! Spinner shown while the mounted screen waits on the tutor.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// Start a steady-ticking spinner with `message`. Call `finish_and_clear` when done.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.magenta} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["✿ ", "❀ ", "✾ ", "❁ ", "✽ "]);
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar.enable_steady_tick(TICK);
    bar
}
