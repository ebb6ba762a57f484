//! Failure notifications on stderr.

use std::io::{self, Write};

use enrolly_api::Notifier;

use crate::output;

/// Prints each failed request as one `✗ message` line on stderr.
pub struct StderrNotifier {
    color: bool,
}

impl StderrNotifier {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Notifier for StderrNotifier {
    fn notify_error(&self, message: &str) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", output::failure_line(message, self.color));
    }
}
