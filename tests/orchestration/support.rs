use suitest::{
    AssertOutcome, EnvironmentOutcome, Suite, SuiteOutcome, Test, TestOutcome,
    control::{Control, DependencyAction, ExceptionAction, FaultSite, UnknownDependencyAction},
};

/// Control with fixed answers that keeps a line per hook.
#[derive(Debug)]
pub struct Policy {
    pub log: Vec<String>,
    pub exception: ExceptionAction,
    pub dependency: DependencyAction,
    pub unknown: UnknownDependencyAction,
    pub repeats: usize,
    pub cycles: Vec<Vec<String>>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            exception: ExceptionAction::AbortCurrent,
            dependency: DependencyAction::AbortCurrent,
            unknown: UnknownDependencyAction::Abort,
            repeats: 0,
            cycles: Vec::new(),
        }
    }
}

impl Policy {
    pub fn with_exception(self, exception: ExceptionAction) -> Self {
        Self { exception, ..self }
    }

    pub fn with_dependency(self, dependency: DependencyAction) -> Self {
        Self { dependency, ..self }
    }

    pub fn with_unknown(self, unknown: UnknownDependencyAction) -> Self {
        Self { unknown, ..self }
    }

    pub fn with_repeats(self, repeats: usize) -> Self {
        Self { repeats, ..self }
    }

    pub fn logged(&self, prefix: &str) -> Vec<&str> {
        self.log
            .iter()
            .map(String::as_str)
            .filter(|line| line.starts_with(prefix))
            .collect()
    }
}

impl Control for Policy {
    fn on_suite_begin(&mut self, suite: &Suite) {
        self.log.push(format!("suite {}", suite.name()));
    }

    fn on_test_begin(&mut self, suite: &Suite, test: &Test) {
        self.log.push(format!("test {}::{}", suite.name(), test.name()));
    }

    fn on_assert(&mut self, assert: &AssertOutcome) {
        self.log.push(format!("assert {}", assert.message));
    }

    fn on_test_end(&mut self, outcome: &TestOutcome) -> bool {
        self.log.push(format!("attempt {} {}", outcome.name, outcome.outcome()));
        match self.repeats {
            0 => false,
            _ => {
                self.repeats -= 1;
                true
            }
        }
    }

    fn on_suite_end(&mut self, outcome: &SuiteOutcome) {
        self.log.push(format!("done {} {}", outcome.name, outcome.outcome()));
    }

    fn on_end(&mut self, outcome: &EnvironmentOutcome) {
        self.log.push(format!("end {}", outcome.outcome()));
    }

    fn on_exception(&mut self, site: &FaultSite<'_>) -> ExceptionAction {
        self.log.push(format!("fault {}", site.identity.name()));
        self.exception
    }

    fn on_dependency_fail(
        &mut self,
        running: &Suite,
        failed: &Suite,
        outcome: &SuiteOutcome,
    ) -> DependencyAction {
        self.log.push(format!(
            "dependency {} needs {} ({})",
            running.name(),
            failed.name(),
            outcome.outcome()
        ));
        self.dependency
    }

    fn on_unknown_dependency(&mut self, from: &Suite, name: &str) -> UnknownDependencyAction {
        self.log.push(format!("unknown {} -> {name}", from.name()));
        self.unknown
    }

    fn on_unsolvable_dependencies(&mut self, cycle: &[&Suite]) {
        self.cycles
            .push(cycle.iter().map(|suite| suite.name().to_string()).collect());
    }
}
