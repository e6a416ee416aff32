//! Selftest - inline unit tests for the host binary
//!
//! Declare tests in any source file, next to the code they exercise. They
//! register themselves before `main` runs; the host hands its arguments to
//! [`run`], which executes every registered case when `--unittest` is present.
//!
//! ```
//! fn double(x: i32) -> i32 {
//!     x * 2
//! }
//!
//! selftest::test_case!(double_small {
//!     selftest::check_eq!(double(2), 4);
//!     selftest::check!(double(1) > 0);
//! });
//!
//! fn main() {
//!     let status = selftest::run(std::env::args_os());
//!     if status.tests_ran() {
//!         std::process::exit(if status.success() { 0 } else { 1 });
//!     }
//! }
//! ```
//!
//! # Modes
//!
//! Declarations are live only when the crate is built with the
//! `tests-active` feature. Without it (the default) `test_case!` bodies are
//! type-checked but compiled to unreachable stubs, the checks only evaluate
//! their operands, and [`run`] always reports success without running
//! anything. [`ACTIVE`] tells which mode was compiled in.
//!
//! # Reporting
//!
//! Reports go to stderr:
//!
//! ```text
//! Running tests from src/math.rs:
//! 	add_bad ... failed (1 + 1 != 3 at src/math.rs:14)
//! 	add_ok ... passed
//!
//! Test results: passed 1/2, failed 1/2
//! ```
//!
//! Order, colour and an optional timing line are read from `selftest.toml`
//! and `SELFTEST_*` variables (see `selftest-config`).

mod macros;

pub mod case;
pub mod check;
pub mod failure;
pub mod registry;
pub mod report;
pub mod runner;

pub use case::TestCase;
pub use check::{ensure, ensure_eq, Truthy};
pub use failure::{Failure, FailureRecord, Outcome, SourceLocation};
pub use registry::{CaseEntry, FileGroup, Registry};
pub use report::Reporter;
pub use runner::{has_trigger, run, RunStatus, Runner, TRIGGER};
pub use selftest_config::{ColorChoice, Order, ReportConfig};

/// Whether this build registers and runs declared tests
pub const ACTIVE: bool = cfg!(feature = "tests-active");

/// Look at the process-wide registry
///
/// The registry is built from the declared cases on first use.
#[cfg(feature = "tests-active")]
pub fn inspect<R>(f: impl FnOnce(&Registry) -> R) -> R {
    let registry = registry::global::lock();
    f(&registry)
}

/// Look at the process-wide registry
///
/// Tests are stripped in this build, so it is always empty.
#[cfg(not(feature = "tests-active"))]
pub fn inspect<R>(f: impl FnOnce(&Registry) -> R) -> R {
    f(&Registry::new())
}

#[doc(hidden)]
pub mod __private {
    #[cfg(feature = "tests-active")]
    pub use inventory;

    use crate::Outcome;

    /// Value a `test_case!` body may end with
    pub trait IntoOutcome {
        fn into_outcome(self) -> Outcome;
    }

    impl IntoOutcome for () {
        fn into_outcome(self) -> Outcome {
            Ok(())
        }
    }

    impl IntoOutcome for Outcome {
        fn into_outcome(self) -> Outcome {
            self
        }
    }
}
