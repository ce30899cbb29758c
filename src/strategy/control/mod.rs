//! Failure control for suitest.
//!
//! The orchestrator never decides on its own whether something that went
//! wrong is fatal. Every fault, failed dependency, unknown dependency name and
//! dependency cycle is handed to a [`Control`], and the returned decision is
//! followed as is.
//!
//! The same trait also receives the begin and end notifications of the run,
//! every suite, every test attempt and every recorded check. This makes a
//! control the natural place for reporting, and the place to implement retry
//! behavior: returning `true` from [`Control::on_test_end`] runs the same test
//! again.
//!
//! All hooks are called in-line on the thread driving the run, in a fixed
//! order:
//!
//! ```text
//! on_begin
//!   on_suite_begin
//!     on_test_begin
//!       on_assert*            (per attempt, repeated while on_test_end == true)
//!     on_test_end
//!   on_suite_end
//! on_end
//! ```
//!
//! The decision hooks ([`on_exception`](Control::on_exception),
//! [`on_dependency_fail`](Control::on_dependency_fail),
//! [`on_unknown_dependency`](Control::on_unknown_dependency)) have no default,
//! every control has to make these decisions explicitly.
//!
//! Implement [`Control`] to define how suitest reacts to failures.

use crate::{
    fault::Fault,
    origin::Identity,
    outcome::{AssertOutcome, TestOutcome},
    report::{EnvironmentOutcome, SuiteOutcome},
    suite::{FixtureKind, Suite},
    test::Test,
};

mod console;
pub use console::*;

mod forward;
pub use forward::*;

/// Decision after a fixture or test body faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionAction {
    /// Continue as if the callable completed normally.
    Ignore,

    /// Like [`Ignore`](Self::Ignore), but a faulted test body additionally gets
    /// a failed check with a fixed message appended. Fixtures treat this as
    /// `Ignore`.
    Proceed,

    /// Stop the enclosing unit and continue with the next one.
    ///
    /// For a fixture this stops the whole suite. For a test body it ends the
    /// current attempt; the leave fixture still runs.
    AbortCurrent,

    /// Stop the whole run.
    Abort,
}

/// Decision after a dependency of a suite did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyAction {
    /// Run the suite anyway.
    Ignore,

    /// Skip the suite; its outcome becomes `Unknown`.
    AbortCurrent,

    /// Stop the whole run.
    Abort,
}

/// Decision after a dependency name did not match any registered suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnknownDependencyAction {
    /// Drop the dependency and continue resolving.
    Ignore,

    /// Fail resolution, nothing is executed.
    Abort,
}

/// What faulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    Fixture(FixtureKind),
    Test,
}

/// Everything known about a fault when it is reported.
#[derive(Debug, Clone, Copy)]
pub struct FaultSite<'r> {
    pub kind: FaultKind,
    /// Name and declaration site of the callable that faulted.
    pub identity: &'r Identity,
    pub suite: &'r Suite,
    /// Only diagnostic, the run treats every fault the same.
    pub fault: &'r Fault,
}

/// Decision maker and observer for a run.
pub trait Control {
    /// Called once resolution succeeded, with the suites in execution order.
    fn on_begin(&mut self, order: &[&Suite]) {
        let _ = order;
    }

    fn on_suite_begin(&mut self, suite: &Suite) {
        let _ = suite;
    }

    /// Called once per test, before its first attempt.
    fn on_test_begin(&mut self, suite: &Suite, test: &Test) {
        let _ = (suite, test);
    }

    fn on_assert(&mut self, assert: &AssertOutcome) {
        let _ = assert;
    }

    /// Called after every test attempt. Returning `true` runs the test again,
    /// only the outcome of the last attempt is kept.
    fn on_test_end(&mut self, outcome: &TestOutcome) -> bool {
        let _ = outcome;
        false
    }

    fn on_suite_end(&mut self, outcome: &SuiteOutcome) {
        let _ = outcome;
    }

    /// Called after the last executed suite, also when the run was aborted.
    fn on_end(&mut self, outcome: &EnvironmentOutcome) {
        let _ = outcome;
    }

    fn on_exception(&mut self, site: &FaultSite<'_>) -> ExceptionAction;

    fn on_dependency_fail(
        &mut self,
        running: &Suite,
        failed: &Suite,
        outcome: &SuiteOutcome,
    ) -> DependencyAction;

    fn on_unknown_dependency(&mut self, from: &Suite, name: &str) -> UnknownDependencyAction;

    /// Called once when resolution finds a cycle.
    ///
    /// `cycle` starts with the suite that closed the cycle, followed by the
    /// suites that lead back to it, outward along the dependency chain.
    fn on_unsolvable_dependencies(&mut self, cycle: &[&Suite]) {
        let _ = cycle;
    }
}

impl std::fmt::Debug for dyn Control {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Control(...)")
    }
}

impl<C: Control + ?Sized> Control for &mut C {
    fn on_begin(&mut self, order: &[&Suite]) {
        (**self).on_begin(order)
    }

    fn on_suite_begin(&mut self, suite: &Suite) {
        (**self).on_suite_begin(suite)
    }

    fn on_test_begin(&mut self, suite: &Suite, test: &Test) {
        (**self).on_test_begin(suite, test)
    }

    fn on_assert(&mut self, assert: &AssertOutcome) {
        (**self).on_assert(assert)
    }

    fn on_test_end(&mut self, outcome: &TestOutcome) -> bool {
        (**self).on_test_end(outcome)
    }

    fn on_suite_end(&mut self, outcome: &SuiteOutcome) {
        (**self).on_suite_end(outcome)
    }

    fn on_end(&mut self, outcome: &EnvironmentOutcome) {
        (**self).on_end(outcome)
    }

    fn on_exception(&mut self, site: &FaultSite<'_>) -> ExceptionAction {
        (**self).on_exception(site)
    }

    fn on_dependency_fail(
        &mut self,
        running: &Suite,
        failed: &Suite,
        outcome: &SuiteOutcome,
    ) -> DependencyAction {
        (**self).on_dependency_fail(running, failed, outcome)
    }

    fn on_unknown_dependency(&mut self, from: &Suite, name: &str) -> UnknownDependencyAction {
        (**self).on_unknown_dependency(from, name)
    }

    fn on_unsolvable_dependencies(&mut self, cycle: &[&Suite]) {
        (**self).on_unsolvable_dependencies(cycle)
    }
}
