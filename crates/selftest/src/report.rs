//! Test reporter - line-oriented progress and summary output
//!
//! ```text
//! Running tests from src/math.rs:
//! 	add_bad ... failed (1 + 1 != 3 at src/math.rs:14)
//! 	add_ok ... passed
//!
//! Test results: passed 1/2, failed 1/2
//! ```

use crate::failure::Failure;
use colored::*;
use std::fmt;
use std::io::Write;
use std::time::Duration;

/// Writes the run report to a diagnostic stream
///
/// Write errors never interrupt a run: the first one is logged and the rest
/// of the report is dropped.
pub struct Reporter<W: Write> {
    out: W,
    color: Option<ColorOverride>,
    broken: bool,
}

/// Forces `colored` on while alive
///
/// The override is process-wide, so it is released whenever the reporter goes
/// away, finished or not.
struct ColorOverride;

impl ColorOverride {
    fn install() -> Self {
        colored::control::set_override(true);
        ColorOverride
    }
}

impl Drop for ColorOverride {
    fn drop(&mut self) {
        colored::control::unset_override();
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self {
            out,
            color: color.then(ColorOverride::install),
            broken: false,
        }
    }

    pub fn group_start(&mut self, file: &str) {
        self.emit(format_args!("Running tests from {}:\n", file));
    }

    /// Printed before the body runs so a hanging case is identifiable
    pub fn case_start(&mut self, name: &str) {
        self.emit(format_args!("\t{} ... ", name));
        self.flush();
    }

    pub fn case_passed(&mut self) {
        let word = if self.color.is_some() {
            "passed".green().to_string()
        } else {
            "passed".to_string()
        };
        self.emit(format_args!("{}\n", word));
    }

    pub fn case_failed(&mut self, failure: &Failure) {
        let word = if self.color.is_some() {
            "failed".red().bold().to_string()
        } else {
            "failed".to_string()
        };
        self.emit(format_args!("{} ({})\n", word, failure));
    }

    pub fn group_end(&mut self) {
        self.emit(format_args!("\n"));
    }

    pub fn summary(&mut self, passed: usize, failed: usize) {
        let total = passed + failed;
        self.emit(format_args!(
            "Test results: passed {}/{}, failed {}/{}\n",
            passed, total, failed, total
        ));
    }

    pub fn timing(&mut self, elapsed: Duration) {
        self.emit(format_args!("Time: {:.2?}\n", elapsed));
    }

    /// Flush and hand back the stream
    pub fn finish(mut self) -> W {
        self.flush();
        self.out
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if self.broken {
            return;
        }
        if let Err(error) = self.out.write_fmt(args) {
            tracing::warn!(%error, "failed to write test report");
            self.broken = true;
        }
    }

    fn flush(&mut self) {
        if self.broken {
            return;
        }
        if let Err(error) = self.out.flush() {
            tracing::warn!(%error, "failed to flush test report");
            self.broken = true;
        }
    }
}
