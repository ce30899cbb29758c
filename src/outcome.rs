//! Outcomes and their aggregation.
//!
//! Every level of a run (assertion, test, suite, environment) ends up as an
//! [`Outcome`]. The levels above the assertion fold the outcomes of their
//! children into an [`Aggregate`], which always holds the most severe outcome
//! seen so far.

use std::{borrow::Cow, fmt::Display, time::Duration};

use crate::{
    origin::{Identity, Origin},
    test::TestId,
};

/// The result of a single unit of a run.
///
/// Variants are declared in ascending severity, so the derived ordering is
/// the severity ordering: `Fail > Unknown > Success`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    #[default]
    Success,
    Unknown,
    Fail,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Outcome::Unknown)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Outcome::Fail)
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        match value {
            true => Outcome::Success,
            false => Outcome::Fail,
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Outcome::Success => "Succeeded",
            Outcome::Unknown => "Unknown",
            Outcome::Fail => "Failed",
        })
    }
}

/// Running fold over child outcomes.
///
/// The total is the most severe outcome ever added, independent of the order
/// in which outcomes arrive. Once `Fail` is reached only
/// [`overwrite`](Self::overwrite) can change it again.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate(Outcome);

impl Aggregate {
    pub const fn new() -> Self {
        Self(Outcome::Success)
    }

    pub fn add(&mut self, outcome: Outcome) {
        self.0 = self.0.max(outcome);
    }

    pub fn total(&self) -> Outcome {
        self.0
    }

    pub(crate) fn overwrite(&mut self, outcome: Outcome) {
        self.0 = outcome;
    }
}

impl FromIterator<Outcome> for Aggregate {
    fn from_iter<T: IntoIterator<Item = Outcome>>(iter: T) -> Self {
        let mut aggregate = Aggregate::new();
        iter.into_iter().for_each(|outcome| aggregate.add(outcome));
        aggregate
    }
}

/// A single recorded check inside a test body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertOutcome {
    pub outcome: Outcome,
    pub message: Cow<'static, str>,
    pub identity: Identity,
    pub test: TestId,
    pub(crate) test_origin: Origin,
}

impl AssertOutcome {
    pub(crate) fn new(
        identity: Identity,
        passed: bool,
        message: impl Into<Cow<'static, str>>,
        test: TestId,
        test_origin: Origin,
    ) -> Self {
        Self {
            outcome: passed.into(),
            message: message.into(),
            identity,
            test,
            test_origin,
        }
    }

    /// The file the check was declared in, falling back to the file of the
    /// owning test when the check itself carries none.
    pub fn file(&self) -> &'static str {
        match self.identity.origin.is_known() {
            true => self.identity.origin.file,
            false => self.test_origin.file,
        }
    }

    pub fn line(&self) -> u32 {
        self.identity.origin.line
    }

    pub fn passed(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Outcome of one test attempt.
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub test: TestId,
    pub name: Cow<'static, str>,
    pub duration: Duration,
    asserts: Vec<AssertOutcome>,
    total: Aggregate,
}

impl TestOutcome {
    pub(crate) fn new(test: TestId, name: Cow<'static, str>) -> Self {
        Self {
            test,
            name,
            duration: Duration::ZERO,
            asserts: Vec::new(),
            total: Aggregate::new(),
        }
    }

    pub(crate) fn push(&mut self, assert: AssertOutcome) {
        self.total.add(assert.outcome);
        self.asserts.push(assert);
    }

    pub fn outcome(&self) -> Outcome {
        self.total.total()
    }

    pub fn asserts(&self) -> &[AssertOutcome] {
        &self.asserts
    }

    pub fn assert_count(&self) -> usize {
        self.asserts.len()
    }

    pub fn failed_asserts(&self) -> impl Iterator<Item = &AssertOutcome> {
        self.asserts.iter().filter(|assert| !assert.passed())
    }
}
