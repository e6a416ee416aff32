//! Test registry
//!
//! Links every declared test case into the file group of the source file it
//! was declared in, and every file group into the registry.
//!
//! Both links behave as prepends: walking the registry in its natural
//! (reverse) order yields the most recently linked file group first, and
//! within a group the most recently registered case first. Storage keeps
//! registration order so declaration order is available as well.

use crate::case::TestCase;
use crate::failure::FailureRecord;
use selftest_config::Order;
use std::collections::HashMap;

/// A registered case together with the outcome of its latest run
#[derive(Debug)]
pub struct CaseEntry {
    case: &'static TestCase,
    failure: FailureRecord,
}

impl CaseEntry {
    pub fn case(&self) -> &'static TestCase {
        self.case
    }

    pub fn failure(&self) -> &FailureRecord {
        &self.failure
    }

    pub(crate) fn failure_mut(&mut self) -> &mut FailureRecord {
        &mut self.failure
    }
}

/// All test cases declared in one source file
#[derive(Debug)]
pub struct FileGroup {
    name: &'static str,
    cases: Vec<CaseEntry>,
}

impl FileGroup {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            cases: Vec::new(),
        }
    }

    /// The originating file's path, as produced by `file!()`
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Cases in the requested order
    pub fn cases(&self, order: Order) -> impl Iterator<Item = &CaseEntry> + '_ {
        ordered_indices(self.cases.len(), order).map(move |i| &self.cases[i])
    }

    pub(crate) fn case_mut(&mut self, index: usize) -> &mut CaseEntry {
        &mut self.cases[index]
    }
}

/// Process-wide collection of file groups
#[derive(Debug, Default)]
pub struct Registry {
    groups: Vec<FileGroup>,
    /// File name -> position in `groups`; presence marks a group as linked
    linked: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry by registering each case in turn
    pub fn from_cases<I>(cases: I) -> Self
    where
        I: IntoIterator<Item = &'static TestCase>,
    {
        let mut registry = Self::new();
        for case in cases {
            registry.register(case);
        }
        registry
    }

    /// Link `case` into its file group, linking the group on first use
    ///
    /// Infallible. A name already present in the group is kept as a separate
    /// case and logged.
    pub fn register(&mut self, case: &'static TestCase) {
        let index = match self.linked.get(case.file()) {
            Some(&index) => index,
            None => {
                let index = self.groups.len();
                self.groups.push(FileGroup::new(case.file()));
                self.linked.insert(case.file(), index);
                tracing::trace!(file = case.file(), "linked file group");
                index
            }
        };

        let group = &mut self.groups[index];
        if group.cases.iter().any(|entry| entry.case.name() == case.name()) {
            tracing::warn!(
                file = case.file(),
                name = case.name(),
                line = case.line(),
                "test case name declared more than once in the same file"
            );
        }
        group.cases.push(CaseEntry {
            case,
            failure: FailureRecord::default(),
        });
    }

    /// File groups in the requested order
    pub fn groups(&self, order: Order) -> impl Iterator<Item = &FileGroup> + '_ {
        ordered_indices(self.groups.len(), order).map(move |i| &self.groups[i])
    }

    /// Number of file groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of registered cases across all groups
    pub fn case_count(&self) -> usize {
        self.groups.iter().map(FileGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub(crate) fn group_mut(&mut self, index: usize) -> &mut FileGroup {
        &mut self.groups[index]
    }
}

/// Positions `0..len` in the order a walk should visit them
pub(crate) fn ordered_indices(len: usize, order: Order) -> Box<dyn Iterator<Item = usize>> {
    match order {
        Order::Reverse => Box::new((0..len).rev()),
        Order::Declaration => Box::new(0..len),
    }
}

#[cfg(feature = "tests-active")]
pub(crate) mod global {
    use super::Registry;
    use crate::case::TestCase;
    use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

    static GLOBAL: OnceLock<Mutex<Registry>> = OnceLock::new();

    /// Lock the registry built from every `test_case!` in the binary
    ///
    /// The first call feeds the submitted cases through [`Registry::register`]
    /// sorted by file and line, so the resulting chains are deterministic.
    pub(crate) fn lock() -> MutexGuard<'static, Registry> {
        GLOBAL
            .get_or_init(|| {
                let mut cases: Vec<&'static TestCase> =
                    inventory::iter::<TestCase>.into_iter().collect();
                cases.sort_by(|a, b| a.file().cmp(b.file()).then(a.line().cmp(&b.line())));

                let registry = Registry::from_cases(cases);
                tracing::debug!(
                    files = registry.group_count(),
                    cases = registry.case_count(),
                    "built test registry"
                );
                Mutex::new(registry)
            })
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
