#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared terminal utilities for the crime dashboard CLI.
//!
//! [`init_logger`] installs the process logger and [`Spinner`] is the
//! loading indicator shown while a view's query is in flight.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use indicatif::MultiProgress;

/// Loading indicator for a single in-flight request.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Adds a ticking spinner showing `message` to `multi`.
    #[must_use]
    pub fn start(multi: &MultiProgress, message: &str) -> Self {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar }
    }

    /// Stops the spinner, leaving `message` on screen.
    pub fn finish(self, message: impl Into<String>) {
        self.bar.finish_with_message(message.into());
    }

    /// Stops the spinner and removes it from the terminal.
    pub fn finish_and_clear(self) {
        self.bar.finish_and_clear();
    }
}

/// Installs `pretty_env_logger`, filtered by `RUST_LOG`, as the process
/// logger. Log lines go through the returned [`MultiProgress`], so a
/// [`Spinner`] must be started on it for its line to stay below the log
/// output.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // a second call keeps the first logger

    log::set_max_level(level);

    multi
}
