use std::{collections::HashMap, time::Instant};

use tracing::{debug, trace, warn};

use crate::{
    control::{Control, DependencyAction, ExceptionAction, FaultKind, FaultSite},
    environment::Registry,
    error::RunError,
    fault::{Fault, guard},
    filter::FilterChain,
    origin::Identity,
    outcome::{AssertOutcome, Outcome, TestOutcome},
    report::{EnvironmentOutcome, SuiteOutcome},
    suite::{FixtureKind, Suite, SuiteId},
    test::{Test, TestContext, TestId},
};

/// Message of the failed check appended when a faulted test body is continued
/// with [`ExceptionAction::Proceed`].
pub(crate) const FAULT_CHECK_MESSAGE: &str = "test body faulted";

/// Where a halted run continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    /// Stop the current suite, continue with the next one.
    Current,
    /// Stop the run.
    Run,
}

/// Drives one run over an already resolved order.
pub(crate) struct Scheduler<'e> {
    registry: &'e Registry,
    filters: &'e FilterChain,
    control: &'e mut dyn Control,
    /// Position of each executed suite in the environment outcome.
    recorded: HashMap<SuiteId, usize>,
}

impl<'e> Scheduler<'e> {
    pub(crate) fn new(
        registry: &'e Registry,
        filters: &'e FilterChain,
        control: &'e mut dyn Control,
    ) -> Self {
        Self {
            registry,
            filters,
            control,
            recorded: HashMap::new(),
        }
    }

    pub(crate) fn run(
        mut self,
        order: &[SuiteId],
        admitted: &[bool],
    ) -> (EnvironmentOutcome, Option<RunError>) {
        let registry = self.registry;
        let suites: Vec<&Suite> = order.iter().map(|id| registry.get(*id)).collect();
        debug!(suites = suites.len(), "run started");
        self.control.on_begin(&suites);

        let mut outcome = EnvironmentOutcome::new();
        let mut error = None;

        for (id, suite) in order.iter().zip(suites.iter().copied()) {
            let filter_tests = admitted.get(id.0).copied().unwrap_or(false);
            let (suite_outcome, halt) = self.run_suite(*id, suite, filter_tests, &outcome);
            let index = outcome.push(suite_outcome);
            self.recorded.insert(*id, index);

            if halt == Some(Halt::Run) {
                warn!(suite = suite.name(), "run aborted");
                error = Some(RunError::Aborted {
                    suite: suite.identity.name.clone(),
                });
                break;
            }
        }

        debug!(outcome = %outcome.outcome(), suites = outcome.len(), "run finished");
        self.control.on_end(&outcome);
        (outcome, error)
    }

    fn run_suite(
        &mut self,
        id: SuiteId,
        suite: &Suite,
        filter_tests: bool,
        done: &EnvironmentOutcome,
    ) -> (SuiteOutcome, Option<Halt>) {
        let mut outcome = SuiteOutcome::new(id, suite.identity.name.clone());
        self.control.on_suite_begin(suite);
        debug!(suite = suite.name(), "suite started");

        let halt = match self.check_dependencies(suite, done) {
            Ok(()) => self.run_body(id, suite, filter_tests, &mut outcome).err(),
            Err(halt) => {
                outcome.force(Outcome::Unknown);
                Some(halt)
            }
        };

        self.control.on_suite_end(&outcome);
        debug!(suite = suite.name(), outcome = %outcome.outcome(), "suite finished");
        (outcome, halt)
    }

    fn check_dependencies(&mut self, suite: &Suite, done: &EnvironmentOutcome) -> Result<(), Halt> {
        let registry = self.registry;
        for name in suite.dependencies() {
            // ignored unknown dependencies are not part of the order
            let Some(dependency) = registry.lookup(name) else {
                continue;
            };
            let Some(recorded) = self.recorded.get(&dependency).map(|index| &done.suites()[*index])
            else {
                continue;
            };
            if recorded.outcome().is_success() {
                continue;
            }

            let action =
                self.control
                    .on_dependency_fail(suite, registry.get(dependency), recorded);
            debug!(suite = suite.name(), dependency = name, ?action, "dependency did not succeed");
            match action {
                DependencyAction::Ignore => {}
                DependencyAction::AbortCurrent => return Err(Halt::Current),
                DependencyAction::Abort => return Err(Halt::Run),
            }
        }
        Ok(())
    }

    fn run_body(
        &mut self,
        id: SuiteId,
        suite: &Suite,
        filter_tests: bool,
        outcome: &mut SuiteOutcome,
    ) -> Result<(), Halt> {
        self.fixture(suite, FixtureKind::Init)?;

        for (index, test) in suite.tests().iter().enumerate() {
            if filter_tests && !self.filters.admits_test(suite, test) {
                trace!(suite = suite.name(), test = test.name(), "test filtered");
                continue;
            }
            outcome.push(self.run_test(suite, test, TestId::new(id, index))?);
        }

        self.fixture(suite, FixtureKind::Exit)
    }

    fn run_test(&mut self, suite: &Suite, test: &Test, id: TestId) -> Result<TestOutcome, Halt> {
        self.control.on_test_begin(suite, test);

        let mut attempt = 0usize;
        loop {
            attempt += 1;
            trace!(suite = suite.name(), test = test.name(), attempt, "test attempt");

            let mut outcome = TestOutcome::new(id, test.identity.name.clone());
            self.fixture(suite, FixtureKind::Enter)?;
            self.attempt(suite, test, &mut outcome)?;
            self.fixture(suite, FixtureKind::Leave)?;

            if !self.control.on_test_end(&outcome) {
                return Ok(outcome);
            }
        }
    }

    fn attempt(&mut self, suite: &Suite, test: &Test, outcome: &mut TestOutcome) -> Result<(), Halt> {
        let start = Instant::now();
        let result = {
            let mut ctx = TestContext::new(test, outcome, &mut *self.control);
            guard(|| test.call(&mut ctx).0)
        };
        outcome.duration = start.elapsed();

        let Err(fault) = result else {
            return Ok(());
        };

        match self.on_fault(suite, FaultKind::Test, &test.identity, &fault) {
            ExceptionAction::Ignore | ExceptionAction::AbortCurrent => Ok(()),
            ExceptionAction::Proceed => {
                let assert = AssertOutcome::new(
                    Identity::new(test.identity.name.clone(), test.origin()),
                    false,
                    FAULT_CHECK_MESSAGE,
                    outcome.test,
                    test.origin(),
                );
                self.control.on_assert(&assert);
                outcome.push(assert);
                Ok(())
            }
            ExceptionAction::Abort => Err(Halt::Run),
        }
    }

    /// Run the fixture of `kind`, if the suite has one.
    fn fixture(&mut self, suite: &Suite, kind: FixtureKind) -> Result<(), Halt> {
        let Some(fixture) = suite.fixture(kind) else {
            return Ok(());
        };
        trace!(suite = suite.name(), fixture = fixture.identity.name(), "fixture");

        let Err(fault) = guard(|| fixture.call().0) else {
            return Ok(());
        };

        match self.on_fault(suite, FaultKind::Fixture(kind), &fixture.identity, &fault) {
            ExceptionAction::Ignore | ExceptionAction::Proceed => Ok(()),
            ExceptionAction::AbortCurrent => Err(Halt::Current),
            ExceptionAction::Abort => Err(Halt::Run),
        }
    }

    fn on_fault(
        &mut self,
        suite: &Suite,
        kind: FaultKind,
        identity: &Identity,
        fault: &Fault,
    ) -> ExceptionAction {
        let action = self.control.on_exception(&FaultSite {
            kind,
            identity,
            suite,
            fault,
        });
        warn!(
            suite = suite.name(),
            callable = identity.name(),
            fault = fault.message(),
            ?action,
            "fault"
        );
        action
    }
}
