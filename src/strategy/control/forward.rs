use std::borrow::Cow;

use crossbeam_channel::{Receiver, Sender};

use crate::{
    control::{
        Control, DependencyAction, ExceptionAction, FaultKind, FaultSite, UnknownDependencyAction,
    },
    outcome::{AssertOutcome, Outcome, TestOutcome},
    report::{EnvironmentOutcome, SuiteOutcome},
    suite::Suite,
    test::Test,
};

/// Owned snapshot of a single control hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RunEvent {
    Begin {
        order: Vec<Cow<'static, str>>,
    },
    SuiteBegin {
        suite: Cow<'static, str>,
    },
    TestBegin {
        suite: Cow<'static, str>,
        test: Cow<'static, str>,
    },
    Assert {
        message: Cow<'static, str>,
        outcome: Outcome,
    },
    TestEnd {
        test: Cow<'static, str>,
        outcome: Outcome,
        repeat: bool,
    },
    SuiteEnd {
        suite: Cow<'static, str>,
        outcome: Outcome,
    },
    End {
        outcome: Outcome,
    },
    Fault {
        kind: FaultKind,
        name: Cow<'static, str>,
        message: String,
        action: ExceptionAction,
    },
    DependencyFailed {
        running: Cow<'static, str>,
        failed: Cow<'static, str>,
        action: DependencyAction,
    },
    UnknownDependency {
        from: Cow<'static, str>,
        name: String,
        action: UnknownDependencyAction,
    },
    Unsolvable {
        cycle: Vec<Cow<'static, str>>,
    },
}

/// A [`Control`] that delegates every decision to `C` and mirrors each hook
/// as a [`RunEvent`] into a channel.
///
/// This lets a reporter render a run from another thread while the run itself
/// stays on the calling thread. Decisions are always taken by `C`, in-line.
/// Events are dropped silently once the receiver is gone.
#[derive(Debug)]
pub struct ForwardingControl<C> {
    inner: C,
    tx: Sender<RunEvent>,
}

impl<C: Control> ForwardingControl<C> {
    /// Wrap `inner`, returning the receiving end of an unbounded event channel.
    pub fn new(inner: C) -> (Self, Receiver<RunEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { inner, tx }, rx)
    }

    /// Wrap `inner`, sending into an existing channel.
    pub fn with_sender(inner: C, tx: Sender<RunEvent>) -> Self {
        Self { inner, tx }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn into_inner(self) -> C {
        self.inner
    }

    fn send(&self, event: RunEvent) {
        let _ = self.tx.send(event);
    }
}

impl<C: Control> Control for ForwardingControl<C> {
    fn on_begin(&mut self, order: &[&Suite]) {
        self.inner.on_begin(order);
        self.send(RunEvent::Begin {
            order: order.iter().map(|suite| suite.identity.name.clone()).collect(),
        });
    }

    fn on_suite_begin(&mut self, suite: &Suite) {
        self.inner.on_suite_begin(suite);
        self.send(RunEvent::SuiteBegin {
            suite: suite.identity.name.clone(),
        });
    }

    fn on_test_begin(&mut self, suite: &Suite, test: &Test) {
        self.inner.on_test_begin(suite, test);
        self.send(RunEvent::TestBegin {
            suite: suite.identity.name.clone(),
            test: test.identity.name.clone(),
        });
    }

    fn on_assert(&mut self, assert: &AssertOutcome) {
        self.inner.on_assert(assert);
        self.send(RunEvent::Assert {
            message: assert.message.clone(),
            outcome: assert.outcome,
        });
    }

    fn on_test_end(&mut self, outcome: &TestOutcome) -> bool {
        let repeat = self.inner.on_test_end(outcome);
        self.send(RunEvent::TestEnd {
            test: outcome.name.clone(),
            outcome: outcome.outcome(),
            repeat,
        });
        repeat
    }

    fn on_suite_end(&mut self, outcome: &SuiteOutcome) {
        self.inner.on_suite_end(outcome);
        self.send(RunEvent::SuiteEnd {
            suite: outcome.name.clone(),
            outcome: outcome.outcome(),
        });
    }

    fn on_end(&mut self, outcome: &EnvironmentOutcome) {
        self.inner.on_end(outcome);
        self.send(RunEvent::End {
            outcome: outcome.outcome(),
        });
    }

    fn on_exception(&mut self, site: &FaultSite<'_>) -> ExceptionAction {
        let action = self.inner.on_exception(site);
        self.send(RunEvent::Fault {
            kind: site.kind,
            name: site.identity.name.clone(),
            message: site.fault.message().to_owned(),
            action,
        });
        action
    }

    fn on_dependency_fail(
        &mut self,
        running: &Suite,
        failed: &Suite,
        outcome: &SuiteOutcome,
    ) -> DependencyAction {
        let action = self.inner.on_dependency_fail(running, failed, outcome);
        self.send(RunEvent::DependencyFailed {
            running: running.identity.name.clone(),
            failed: failed.identity.name.clone(),
            action,
        });
        action
    }

    fn on_unknown_dependency(&mut self, from: &Suite, name: &str) -> UnknownDependencyAction {
        let action = self.inner.on_unknown_dependency(from, name);
        self.send(RunEvent::UnknownDependency {
            from: from.identity.name.clone(),
            name: name.to_owned(),
            action,
        });
        action
    }

    fn on_unsolvable_dependencies(&mut self, cycle: &[&Suite]) {
        self.inner.on_unsolvable_dependencies(cycle);
        self.send(RunEvent::Unsolvable {
            cycle: cycle.iter().map(|suite| suite.identity.name.clone()).collect(),
        });
    }
}
