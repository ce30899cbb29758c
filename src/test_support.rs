use std::{
    io,
    sync::{Arc, Mutex},
};

use crate::{
    control::{
        Control, DependencyAction, ExceptionAction, FaultSite, SupportsColor,
        UnknownDependencyAction,
    },
    outcome::{AssertOutcome, TestOutcome},
    report::{EnvironmentOutcome, SuiteOutcome},
    suite::Suite,
    test::Test,
};

/// Control that logs every hook as one line and answers with fixed decisions.
#[derive(Debug)]
pub struct Recorder {
    pub events: Vec<String>,
    pub exception: ExceptionAction,
    pub dependency: DependencyAction,
    pub unknown: UnknownDependencyAction,
    /// How many more times `on_test_end` asks for a repeat, across all tests.
    pub repeats: usize,
}

impl Default for Recorder {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            exception: ExceptionAction::AbortCurrent,
            dependency: DependencyAction::AbortCurrent,
            unknown: UnknownDependencyAction::Abort,
            repeats: 0,
        }
    }
}

fn joined(suites: &[&Suite]) -> String {
    suites
        .iter()
        .map(|suite| suite.name())
        .collect::<Vec<_>>()
        .join(",")
}

impl Control for Recorder {
    fn on_begin(&mut self, order: &[&Suite]) {
        self.events.push(format!("begin {}", joined(order)));
    }

    fn on_suite_begin(&mut self, suite: &Suite) {
        self.events.push(format!("suite_begin {}", suite.name()));
    }

    fn on_test_begin(&mut self, suite: &Suite, test: &Test) {
        self.events
            .push(format!("test_begin {} {}", suite.name(), test.name()));
    }

    fn on_assert(&mut self, assert: &AssertOutcome) {
        self.events
            .push(format!("assert {} {}", assert.message, assert.outcome));
    }

    fn on_test_end(&mut self, outcome: &TestOutcome) -> bool {
        self.events
            .push(format!("test_end {} {}", outcome.name, outcome.outcome()));
        match self.repeats {
            0 => false,
            _ => {
                self.repeats -= 1;
                true
            }
        }
    }

    fn on_suite_end(&mut self, outcome: &SuiteOutcome) {
        self.events
            .push(format!("suite_end {} {}", outcome.name, outcome.outcome()));
    }

    fn on_end(&mut self, outcome: &EnvironmentOutcome) {
        self.events.push(format!("end {}", outcome.outcome()));
    }

    fn on_exception(&mut self, site: &FaultSite<'_>) -> ExceptionAction {
        self.events
            .push(format!("fault {} {}", site.identity.name(), site.fault));
        self.exception
    }

    fn on_dependency_fail(
        &mut self,
        running: &Suite,
        failed: &Suite,
        _: &SuiteOutcome,
    ) -> DependencyAction {
        self.events
            .push(format!("dependency {} {}", running.name(), failed.name()));
        self.dependency
    }

    fn on_unknown_dependency(&mut self, from: &Suite, name: &str) -> UnknownDependencyAction {
        self.events.push(format!("unknown {} {name}", from.name()));
        self.unknown
    }

    fn on_unsolvable_dependencies(&mut self, cycle: &[&Suite]) {
        self.events.push(format!("unsolvable {}", joined(cycle)));
    }
}

/// Shared in-memory writer, clones write into the same buffer.
#[derive(Debug, Default, Clone)]
pub struct Buffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("poison error"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SupportsColor for Buffer {
    fn supports_color(&self) -> bool {
        false
    }
}

impl Buffer {
    pub fn to_string_lossy(&self) -> String {
        match self.0.lock() {
            Ok(guard) => String::from_utf8_lossy(&guard).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }
}
