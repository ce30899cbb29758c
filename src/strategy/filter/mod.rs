//! Suite and test filtering for suitest.
//!
//! A filter decides which suites a run is meant to execute. Only suites that
//! every installed filter admits are used as starting points for dependency
//! resolution. This is about intent, not necessity: a suite that no filter
//! admits is still executed when an admitted suite (transitively) depends on
//! it, because the admitted suite could not be judged without it.
//!
//! Inside an admitted suite the filters also decide per test. Rejected tests
//! are skipped without leaving an outcome. Suites that only run because
//! something depends on them always run all of their tests.
//!
//! Filters are combined into a [`FilterChain`]; a suite or test has to pass
//! every filter in the chain. An empty chain admits everything.
//!
//! Implement [`Filter`] to define a filter strategy for suitest.

use crate::{suite::Suite, test::Test};

mod no;
pub use no::*;

mod default;
pub use default::*;

mod tag;
pub use tag::*;

/// A strategy for selecting which suites and tests a run is meant to execute.
pub trait Filter {
    /// Whether `suite` should be a root of the run.
    fn is_suite_ok(&self, suite: &Suite) -> bool;

    /// Whether `test` of an admitted `suite` should run.
    ///
    /// Defaults to admitting every test.
    fn is_test_ok(&self, suite: &Suite, test: &Test) -> bool {
        let _ = (suite, test);
        true
    }
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    fn is_suite_ok(&self, suite: &Suite) -> bool {
        (**self).is_suite_ok(suite)
    }

    fn is_test_ok(&self, suite: &Suite, test: &Test) -> bool {
        (**self).is_test_ok(suite, test)
    }
}

/// Handle returned by [`FilterChain::add`], used to remove the filter again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterHandle(usize);

/// Ordered set of filters that all have to agree.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<(FilterHandle, Box<dyn Filter>)>,
    next: usize,
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("len", &self.filters.len())
            .finish_non_exhaustive()
    }
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, filter: impl Filter + 'static) -> FilterHandle {
        let handle = FilterHandle(self.next);
        self.next += 1;
        self.filters.push((handle, Box::new(filter)));
        handle
    }

    /// Remove a previously added filter, returning it if it was still present.
    pub fn remove(&mut self, handle: FilterHandle) -> Option<Box<dyn Filter>> {
        let position = self.filters.iter().position(|(h, _)| *h == handle)?;
        Some(self.filters.remove(position).1)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn admits_suite(&self, suite: &Suite) -> bool {
        self.filters.iter().all(|(_, filter)| filter.is_suite_ok(suite))
    }

    pub fn admits_test(&self, suite: &Suite, test: &Test) -> bool {
        self.filters
            .iter()
            .all(|(_, filter)| filter.is_test_ok(suite, test))
    }
}
