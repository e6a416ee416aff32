//! Failure records - the outcome of a single test invocation

use std::borrow::Cow;
use std::fmt;

/// Result of running a test body. `Err` carries the first failed check.
pub type Outcome = Result<(), Failure>;

/// File and line a check was written at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the caller of a `#[track_caller]` function
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A failed check: what was checked and where
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {location}")]
pub struct Failure {
    message: Cow<'static, str>,
    location: SourceLocation,
}

impl Failure {
    pub fn new(message: impl Into<Cow<'static, str>>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }

    /// Textual form of the failed check, e.g. `1 + 1 != 3`
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

/// Per-case outcome holder
///
/// Reset to absent immediately before the owning case runs and read by the
/// runner right after; nothing else writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailureRecord {
    failure: Option<Failure>,
}

impl FailureRecord {
    pub fn is_present(&self) -> bool {
        self.failure.is_some()
    }

    pub fn failure(&self) -> Option<&Failure> {
        self.failure.as_ref()
    }

    pub(crate) fn reset(&mut self) {
        self.failure = None;
    }

    pub(crate) fn record(&mut self, failure: Failure) {
        self.failure = Some(failure);
    }
}
