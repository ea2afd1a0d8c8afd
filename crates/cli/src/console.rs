use colored::Colorize;
use std::sync::atomic::{AtomicUsize, Ordering};

use events::ResultsListener;
use j1939_core::Outcome;

/// Prints result lines to stdout, coloured by severity, and counts
/// outcomes for the closing summary.
#[derive(Default)]
pub struct ConsoleListener {
    warnings: AtomicUsize,
    failures: AtomicUsize,
    infos: AtomicUsize,
}

impl ConsoleListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn infos(&self) -> usize {
        self.infos.load(Ordering::Relaxed)
    }
}

impl ResultsListener for ConsoleListener {
    fn add_outcome(&self, _part_number: u8, _step_number: u8, outcome: Outcome, _message: &str) {
        let counter = match outcome {
            Outcome::Fail => &self.failures,
            Outcome::Warn => &self.warnings,
            Outcome::Info => &self.infos,
            Outcome::Pass => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn on_result(&self, result: &str) {
        let line = if result.starts_with("FAIL:") {
            result.red().bold()
        } else if result.starts_with("WARN:") {
            result.yellow()
        } else if result.starts_with("INFO:") {
            result.cyan()
        } else {
            result.normal()
        };
        println!("{}", line);
    }
}
