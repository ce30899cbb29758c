use std::{
    borrow::Cow,
    process::{ExitCode, Termination},
};

use crate::{
    error::RunError,
    outcome::{Aggregate, Outcome, TestOutcome},
    suite::SuiteId,
};

/// Outcome of one suite, holding one [`TestOutcome`] per test that actually ran.
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub suite: SuiteId,
    pub name: Cow<'static, str>,
    tests: Vec<TestOutcome>,
    total: Aggregate,
}

impl SuiteOutcome {
    pub(crate) fn new(suite: SuiteId, name: Cow<'static, str>) -> Self {
        Self {
            suite,
            name,
            tests: Vec::new(),
            total: Aggregate::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: TestOutcome) {
        self.total.add(outcome.outcome());
        self.tests.push(outcome);
    }

    /// Used when a failed dependency short-circuits the suite.
    pub(crate) fn force(&mut self, outcome: Outcome) {
        self.total.overwrite(outcome);
    }

    pub fn outcome(&self) -> Outcome {
        self.total.total()
    }

    pub fn tests(&self) -> &[TestOutcome] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Find the outcome of the first test run under `name`.
    pub fn get(&self, name: &str) -> Option<&TestOutcome> {
        self.tests.iter().find(|outcome| outcome.name == name)
    }
}

/// Outcome of a whole run, holding the suite outcomes in execution order.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentOutcome {
    suites: Vec<SuiteOutcome>,
    total: Aggregate,
}

impl EnvironmentOutcome {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, outcome: SuiteOutcome) -> usize {
        self.total.add(outcome.outcome());
        self.suites.push(outcome);
        self.suites.len() - 1
    }

    pub fn outcome(&self) -> Outcome {
        self.total.total()
    }

    pub fn suites(&self) -> &[SuiteOutcome] {
        &self.suites
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SuiteOutcome> {
        self.suites.iter().find(|outcome| outcome.name == name)
    }

    /// Names of the executed suites, in execution order.
    pub fn order(&self) -> impl Iterator<Item = &str> {
        self.suites.iter().map(|outcome| outcome.name.as_ref())
    }
}

/// Everything a caller gets back from [`Environment::run`](crate::Environment::run).
///
/// The outcome is always present: empty if resolution failed, partial if the
/// run was aborted.
#[derive(Debug)]
#[non_exhaustive]
pub struct RunReport {
    pub outcome: EnvironmentOutcome,
    pub error: Option<RunError>,
}

impl RunReport {
    pub fn completed(&self) -> bool {
        self.error.is_none()
    }

    pub fn succeeded(&self) -> bool {
        self.completed() && self.outcome.outcome().is_success()
    }
}

impl Termination for RunReport {
    fn report(self) -> ExitCode {
        match self.succeeded() {
            true => ExitCode::SUCCESS,
            false => ExitCode::FAILURE,
        }
    }
}
