//! Test runner - execute registered tests when the host asks for them

use crate::registry::{ordered_indices, Registry};
use crate::report::Reporter;
use selftest_config::{ConfigLoader, Order, ReportConfig};
use std::ffi::OsStr;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::time::{Duration, Instant};

/// Command-line token that switches the host into test mode
pub const TRIGGER: &str = "--unittest";

/// Whether `args` contains [`TRIGGER`] as an exact match, at any position
pub fn has_trigger<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter().any(|arg| arg.as_ref() == OsStr::new(TRIGGER))
}

/// Summary of one call into the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStatus {
    ran: bool,
    passed: usize,
    failed: usize,
    elapsed: Duration,
}

impl RunStatus {
    /// The trigger was absent (or tests are stripped): vacuous success
    pub fn not_run() -> Self {
        Self::default()
    }

    /// True iff no case failed
    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Whether the registry was executed
    pub fn tests_ran(&self) -> bool {
        self.ran
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// `SUCCESS` when every case passed, `FAILURE` otherwise
    pub fn exit_code(&self) -> ExitCode {
        if self.success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Test runner with report configuration
#[derive(Debug, Clone)]
pub struct Runner {
    order: Order,
    color: bool,
    timing: bool,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

impl Runner {
    /// Create a runner reporting to stderr with the given settings
    pub fn new(report: ReportConfig) -> Self {
        Self {
            order: report.order,
            color: report.color.should_color(io::stderr().is_terminal()),
            timing: report.timing,
        }
    }

    /// Create a runner from `selftest.toml` and `SELFTEST_*` variables
    ///
    /// Configuration problems are logged and the defaults used instead.
    pub fn from_env() -> Self {
        let start = std::env::current_dir().unwrap_or_else(|_| ".".into());
        match ConfigLoader::new().load_from_directory(&start) {
            Ok(config) => Self::new(config.report),
            Err(error) => {
                tracing::warn!(%error, "ignoring invalid selftest configuration");
                Self::default()
            }
        }
    }

    /// Force colouring on or off
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn with_timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }

    /// Execute `registry` if `args` contains the trigger
    ///
    /// Without the trigger nothing is written and no failure record changes.
    pub fn run_with<I, S, W>(&self, args: I, registry: &mut Registry, out: W) -> RunStatus
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
        W: Write,
    {
        if !has_trigger(args) {
            return RunStatus::not_run();
        }
        self.execute(registry, out)
    }

    /// Run every case in `registry` and report to `out`
    ///
    /// Each case's failure record is reset, the body invoked, and the record
    /// inspected. A failing case never stops the run.
    pub fn execute<W: Write>(&self, registry: &mut Registry, out: W) -> RunStatus {
        let start = Instant::now();
        let mut reporter = Reporter::new(out, self.color);
        let mut passed = 0;
        let mut failed = 0;

        for group_index in ordered_indices(registry.group_count(), self.order) {
            let group = registry.group_mut(group_index);
            reporter.group_start(group.name());

            for case_index in ordered_indices(group.len(), self.order) {
                let entry = group.case_mut(case_index);
                let case = entry.case();
                reporter.case_start(case.name());

                entry.failure_mut().reset();
                tracing::trace!(file = case.file(), name = case.name(), "running test case");
                if let Err(failure) = case.invoke() {
                    entry.failure_mut().record(failure);
                }

                match entry.failure().failure() {
                    Some(failure) => {
                        failed += 1;
                        reporter.case_failed(failure);
                    }
                    None => {
                        passed += 1;
                        reporter.case_passed();
                    }
                }
            }

            reporter.group_end();
        }

        let elapsed = start.elapsed();
        reporter.summary(passed, failed);
        if self.timing {
            reporter.timing(elapsed);
        }
        reporter.finish();

        tracing::debug!(passed, failed, elapsed = ?elapsed, "test run finished");
        RunStatus {
            ran: true,
            passed,
            failed,
            elapsed,
        }
    }

    /// Execute the process-wide registry if `args` contains the trigger
    #[cfg(feature = "tests-active")]
    pub fn run_global<I, S, W>(&self, args: I, out: W) -> RunStatus
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
        W: Write,
    {
        if !has_trigger(args) {
            return RunStatus::not_run();
        }
        let mut registry = crate::registry::global::lock();
        self.execute(&mut registry, out)
    }

    /// Tests are stripped: nothing to execute, whatever the arguments
    #[cfg(not(feature = "tests-active"))]
    pub fn run_global<I, S, W>(&self, _args: I, _out: W) -> RunStatus
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
        W: Write,
    {
        RunStatus::not_run()
    }
}

/// Run all registered tests if `args` contains `--unittest`
///
/// Reports to stderr. Typical use at the top of `main`:
///
/// ```no_run
/// use std::process::ExitCode;
///
/// fn main() -> ExitCode {
///     let status = selftest::run(std::env::args_os());
///     if status.tests_ran() {
///         return status.exit_code();
///     }
///     // normal program logic
///     ExitCode::SUCCESS
/// }
/// ```
#[cfg(feature = "tests-active")]
pub fn run<I, S>(args: I) -> RunStatus
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    if !has_trigger(args) {
        return RunStatus::not_run();
    }
    Runner::from_env().run_global([TRIGGER], io::stderr().lock())
}

/// Tests are stripped: always succeeds without running anything
#[cfg(not(feature = "tests-active"))]
pub fn run<I, S>(_args: I) -> RunStatus
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    RunStatus::not_run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::TestCase;
    use crate::failure::{Failure, Outcome, SourceLocation};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn add_ok() -> Outcome {
        crate::ensure_eq(&(1 + 1), &2, "1 + 1 != 2")
    }

    fn add_bad() -> Outcome {
        if 1 + 1 != 3 {
            return Err(Failure::new("1 + 1 != 3", SourceLocation::new("src/a.rs", 7)));
        }
        Ok(())
    }

    fn is_true() -> Outcome {
        crate::ensure(&true, "true is not true")
    }

    static ADD_OK: TestCase = TestCase::new("add_ok", "src/a.rs", 3, add_ok);
    static ADD_BAD: TestCase = TestCase::new("add_bad", "src/a.rs", 6, add_bad);
    static IS_TRUE: TestCase = TestCase::new("is_true", "src/b.rs", 2, is_true);

    fn scenario() -> Registry {
        Registry::from_cases([&ADD_OK, &ADD_BAD, &IS_TRUE])
    }

    fn plain_runner() -> Runner {
        Runner::default().with_color(false).with_timing(false)
    }

    fn run_to_string(runner: &Runner, args: &[&str], registry: &mut Registry) -> (RunStatus, String) {
        let mut out = Vec::new();
        let status = runner.run_with(args, registry, &mut out);
        (status, String::from_utf8(out).unwrap())
    }

    fn failure_snapshot(registry: &Registry) -> Vec<Option<Failure>> {
        registry
            .groups(Order::Declaration)
            .flat_map(|group| group.cases(Order::Declaration))
            .map(|entry| entry.failure().failure().cloned())
            .collect()
    }

    #[test]
    fn test_two_files_scenario() {
        let mut registry = scenario();
        let (status, output) = run_to_string(&plain_runner(), &["prog", "--unittest"], &mut registry);

        assert_eq!(
            output,
            "Running tests from src/b.rs:\n\
             \tis_true ... passed\n\
             \n\
             Running tests from src/a.rs:\n\
             \tadd_bad ... failed (1 + 1 != 3 at src/a.rs:7)\n\
             \tadd_ok ... passed\n\
             \n\
             Test results: passed 2/3, failed 1/3\n"
        );
        assert!(status.tests_ran());
        assert!(!status.success());
        assert_eq!((status.passed(), status.failed(), status.total()), (2, 1, 3));
    }

    #[test]
    fn test_declaration_order_report() {
        let mut registry = scenario();
        let runner = plain_runner().with_order(Order::Declaration);
        let (_, output) = run_to_string(&runner, &["--unittest"], &mut registry);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Running tests from src/a.rs:",
                "\tadd_ok ... passed",
                "\tadd_bad ... failed (1 + 1 != 3 at src/a.rs:7)",
                "",
                "Running tests from src/b.rs:",
                "\tis_true ... passed",
                "",
                "Test results: passed 2/3, failed 1/3",
            ]
        );
    }

    #[test]
    fn test_without_trigger_is_silent_success() {
        let mut registry = scenario();
        let runner = plain_runner();

        // Leave a failure behind, then make sure a trigger-less call keeps it.
        runner.execute(&mut registry, io::sink());
        let before = failure_snapshot(&registry);

        let (status, output) = run_to_string(&runner, &["prog", "--verbose", "unittest"], &mut registry);
        assert!(status.success());
        assert!(!status.tests_ran());
        assert_eq!(status, RunStatus::not_run());
        assert!(output.is_empty());
        assert_eq!(failure_snapshot(&registry), before);
    }

    #[rstest]
    #[case(&["--unittest"], true)]
    #[case(&["prog", "--unittest"], true)]
    #[case(&["prog", "a", "--unittest", "b"], true)]
    #[case(&["prog", "--unittest=1"], false)]
    #[case(&["prog", "-unittest"], false)]
    #[case(&["prog", "--UNITTEST"], false)]
    #[case(&["prog", " --unittest"], false)]
    #[case(&[], false)]
    fn test_trigger_detection(#[case] args: &[&str], #[case] expected: bool) {
        assert_eq!(has_trigger(args), expected);
    }

    proptest! {
        #[test]
        fn test_trigger_found_at_any_position(
            args in proptest::collection::vec("[a-z-]{0,12}", 0..8),
            position in any::<prop::sample::Index>(),
        ) {
            let mut args = args;
            let at = position.index(args.len() + 1);
            args.insert(at, TRIGGER.to_string());
            prop_assert!(has_trigger(&args));
        }

        #[test]
        fn test_no_trigger_never_runs(args in proptest::collection::vec("[a-z-]{0,12}", 0..8)) {
            prop_assume!(!args.iter().any(|a| a == TRIGGER));
            let mut registry = scenario();
            let mut out = Vec::new();
            let status = plain_runner().run_with(&args, &mut registry, &mut out);
            prop_assert!(status.success());
            prop_assert!(!status.tests_ran());
            prop_assert!(out.is_empty());
        }
    }

    static FLAKY_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn fails_first_time() -> Outcome {
        if FLAKY_CALLS.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(Failure::new("first call", SourceLocation::new("src/c.rs", 4)));
        }
        Ok(())
    }

    static FLAKY: TestCase = TestCase::new("flaky", "src/c.rs", 2, fails_first_time);

    #[test]
    fn test_failure_record_reset_before_each_run() {
        let mut registry = Registry::from_cases([&FLAKY]);
        let runner = plain_runner();

        let first = runner.execute(&mut registry, io::sink());
        assert_eq!(first.failed(), 1);
        assert_eq!(failure_snapshot(&registry).len(), 1);
        assert!(failure_snapshot(&registry)[0].is_some());

        let second = runner.execute(&mut registry, io::sink());
        assert!(second.success());
        assert_eq!(failure_snapshot(&registry), vec![None]);
    }

    fn panics() -> Outcome {
        let limit: Option<u32> = None;
        let _ = limit.unwrap_or_else(|| panic!("no limit configured"));
        Ok(())
    }

    static PANICS: TestCase = TestCase::new("panics", "src/d.rs", 11, panics);
    static AFTER_PANIC: TestCase = TestCase::new("after_panic", "src/d.rs", 20, is_true);

    #[test]
    fn test_panic_marks_only_that_case_failed() {
        let mut registry = Registry::from_cases([&AFTER_PANIC, &PANICS]);
        let (status, output) = run_to_string(&plain_runner(), &["--unittest"], &mut registry);

        assert_eq!((status.passed(), status.failed()), (1, 1));
        assert!(output.contains("\tpanics ... failed (panicked: no limit configured at src/d.rs:11)\n"));
        assert!(output.contains("\tafter_panic ... passed\n"));
    }

    #[test]
    fn test_failure_isolation_independent_of_order() {
        for order in [Order::Reverse, Order::Declaration] {
            let mut registry = Registry::from_cases([&ADD_OK, &ADD_BAD]);
            let status = plain_runner().with_order(order).execute(&mut registry, io::sink());
            assert_eq!((status.passed(), status.failed(), status.total()), (1, 1, 2));

            let ok = registry
                .groups(order)
                .flat_map(|group| group.cases(order))
                .find(|entry| entry.case().name() == "add_ok")
                .unwrap();
            assert!(!ok.failure().is_present());
        }
    }

    #[test]
    fn test_empty_registry_run() {
        let mut registry = Registry::new();
        let (status, output) = run_to_string(&plain_runner(), &["--unittest"], &mut registry);
        assert!(status.success());
        assert!(status.tests_ran());
        assert_eq!(output, "Test results: passed 0/0, failed 0/0\n");
    }

    #[test]
    fn test_timing_line_follows_summary() {
        let mut registry = Registry::from_cases([&IS_TRUE]);
        let runner = plain_runner().with_timing(true);
        let (_, output) = run_to_string(&runner, &["--unittest"], &mut registry);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[lines.len() - 2], "Test results: passed 1/1, failed 0/1");
        assert!(lines[lines.len() - 1].starts_with("Time: "));
    }

    #[test]
    fn test_not_run_is_vacuous_success() {
        let status = RunStatus::not_run();
        assert!(status.success());
        assert!(!status.tests_ran());
        assert_eq!(status.total(), 0);
    }

    #[cfg(not(feature = "tests-active"))]
    #[test]
    fn test_stripped_run_ignores_trigger() {
        let status = run(["prog", "--unittest"]);
        assert!(status.success());
        assert!(!status.tests_ran());

        let mut out = Vec::new();
        let status = plain_runner().run_global(["--unittest"], &mut out);
        assert_eq!(status, RunStatus::not_run());
        assert!(out.is_empty());
    }
}
