//! Test case declarations

use crate::failure::{Failure, Outcome, SourceLocation};
use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::panic;
use std::sync::Once;

thread_local! {
    /// Set while this thread runs a case body; the panic hook stays silent
    static QUIET_PANICS: Cell<bool> = const { Cell::new(false) };
}

/// A named test body declared with `test_case!`
///
/// Instances are `'static` and never mutated; their outcome lives in the
/// registry entry that links them into a file group.
pub struct TestCase {
    name: &'static str,
    file: &'static str,
    line: u32,
    body: fn() -> Outcome,
}

impl TestCase {
    pub const fn new(name: &'static str, file: &'static str, line: u32, body: fn() -> Outcome) -> Self {
        Self {
            name,
            file,
            line,
            body,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Source file the case was declared in; also the name of its file group
    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.file, self.line)
    }

    /// Run the body once
    ///
    /// A panicking body is reported as a failure at the declaration site when
    /// the binary unwinds; with `panic = "abort"` the process ends instead.
    ///
    /// The panic message goes into the failure instead of stderr, so the
    /// report keeps one line per case. Panics on other threads, or outside a
    /// case, still reach the previously installed hook.
    pub fn invoke(&self) -> Outcome {
        install_quiet_hook();
        let was_quiet = QUIET_PANICS.with(|quiet| quiet.replace(true));
        let result = panic::catch_unwind(self.body);
        QUIET_PANICS.with(|quiet| quiet.set(was_quiet));

        match result {
            Ok(outcome) => outcome,
            Err(payload) => Err(Failure::new(
                format!("panicked: {}", panic_message(payload.as_ref())),
                self.location(),
            )),
        }
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("file", &self.file)
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

/// Wrap the current panic hook once so that it skips panics raised by case bodies
fn install_quiet_hook() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !QUIET_PANICS.with(Cell::get) {
                previous(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(feature = "tests-active")]
inventory::collect!(TestCase);

#[cfg(test)]
mod tests {
    use super::*;

    fn passing() -> Outcome {
        Ok(())
    }

    fn failing() -> Outcome {
        Err(Failure::new("left != right", SourceLocation::new("case.rs", 99)))
    }

    fn panicking() -> Outcome {
        let values: Vec<u8> = Vec::new();
        if values.is_empty() {
            panic!("index {} out of range", 3);
        }
        Ok(())
    }

    #[test]
    fn test_accessors() {
        let case = TestCase::new("passing", "src/lib.rs", 10, passing);
        assert_eq!(case.name(), "passing");
        assert_eq!(case.file(), "src/lib.rs");
        assert_eq!(case.line(), 10);
        assert_eq!(case.location().to_string(), "src/lib.rs:10");
    }

    #[test]
    fn test_invoke_passing_and_failing() {
        assert!(TestCase::new("passing", "a.rs", 1, passing).invoke().is_ok());

        let failure = TestCase::new("failing", "a.rs", 2, failing)
            .invoke()
            .unwrap_err();
        assert_eq!(failure.message(), "left != right");
        assert_eq!(failure.location().line, 99);
    }

    #[test]
    fn test_invoke_captures_panic() {
        let case = TestCase::new("panicking", "src/store.rs", 40, panicking);
        let failure = case.invoke().unwrap_err();
        assert_eq!(failure.message(), "panicked: index 3 out of range");
        assert_eq!(failure.location(), case.location());
    }

    #[test]
    fn test_invoke_restores_panic_reporting() {
        let case = TestCase::new("panicking", "src/store.rs", 40, panicking);
        assert!(case.invoke().is_err());
        assert!(!QUIET_PANICS.with(Cell::get));

        assert!(TestCase::new("passing", "a.rs", 1, passing).invoke().is_ok());
        assert!(!QUIET_PANICS.with(Cell::get));
    }

    #[test]
    fn test_debug_omits_body() {
        let case = TestCase::new("passing", "a.rs", 1, passing);
        let debug = format!("{:?}", case);
        assert!(debug.contains("\"passing\""));
        assert!(!debug.contains("body"));
    }
}
