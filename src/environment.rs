use std::{borrow::Cow, cell::RefCell, collections::HashMap};

use tracing::{debug, warn};

use crate::{
    control::{ConsoleControl, Control},
    error::{RegisterError, RunError},
    filter::{Filter, FilterChain, FilterHandle},
    report::{EnvironmentOutcome, RunReport},
    resolve::resolve,
    scheduler::Scheduler,
    suite::{Fixture, Suite, SuiteId},
    test::{Test, TestId},
};

/// Arena of registered suites plus the name index used to resolve dependencies.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    suites: Vec<Suite>,
    by_name: HashMap<Cow<'static, str>, SuiteId>,
}

impl Registry {
    pub(crate) fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub(crate) fn get(&self, id: SuiteId) -> &Suite {
        &self.suites[id.0]
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<SuiteId> {
        self.by_name.get(name).copied()
    }

    fn get_mut(&mut self, id: SuiteId) -> Result<&mut Suite, RegisterError> {
        self.suites
            .get_mut(id.0)
            .ok_or(RegisterError::UnknownSuite { index: id.0 })
    }

    fn insert(&mut self, mut suite: Suite) -> Result<SuiteId, RegisterError> {
        if self.by_name.contains_key(suite.name()) {
            return Err(RegisterError::DuplicateSuite {
                name: suite.identity.name.clone(),
            });
        }

        let id = SuiteId(self.suites.len());
        suite.assign(id);
        self.by_name.insert(suite.identity.name.clone(), id);
        self.suites.push(suite);
        Ok(id)
    }
}

/// Registry of suites together with the installed control and filters.
///
/// Registration is expected to be finished before [`run`](Self::run) is
/// called; suites may name dependencies that are registered after them.
#[derive(Debug, Default)]
pub struct Environment {
    registry: Registry,
    control: Option<Box<dyn Control>>,
    filters: FilterChain,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_control(mut self, control: impl Control + 'static) -> Self {
        self.set_control(control);
        self
    }

    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.add_filter(filter);
        self
    }

    pub fn set_control(&mut self, control: impl Control + 'static) {
        self.control = Some(Box::new(control));
    }

    /// Uninstall the current control, returning it.
    pub fn take_control(&mut self) -> Option<Box<dyn Control>> {
        self.control.take()
    }

    pub fn has_control(&self) -> bool {
        self.control.is_some()
    }

    pub fn add_filter(&mut self, filter: impl Filter + 'static) -> FilterHandle {
        self.filters.add(filter)
    }

    pub fn remove_filter(&mut self, handle: FilterHandle) -> Option<Box<dyn Filter>> {
        self.filters.remove(handle)
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    /// Register a suite. Names have to be unique.
    pub fn add_suite(&mut self, suite: Suite) -> Result<SuiteId, RegisterError> {
        let id = self.registry.insert(suite)?;
        debug!(suite = %self.registry.get(id).identity, index = id.0, "registered suite");
        Ok(id)
    }

    pub fn add_test(&mut self, suite: SuiteId, test: Test) -> Result<TestId, RegisterError> {
        let index = self.registry.get_mut(suite)?.push_test(test);
        Ok(TestId::new(suite, index))
    }

    pub fn add_dependency(
        &mut self,
        suite: SuiteId,
        name: impl Into<Cow<'static, str>>,
    ) -> Result<(), RegisterError> {
        self.registry.get_mut(suite)?.push_dependency(name.into());
        Ok(())
    }

    pub fn add_tag(
        &mut self,
        suite: SuiteId,
        tag: impl Into<Cow<'static, str>>,
    ) -> Result<(), RegisterError> {
        self.registry.get_mut(suite)?.insert_tag(tag.into());
        Ok(())
    }

    /// Install a fixture, replacing one of the same kind.
    pub fn set_fixture(&mut self, suite: SuiteId, fixture: Fixture) -> Result<(), RegisterError> {
        self.registry.get_mut(suite)?.set_fixture(fixture);
        Ok(())
    }

    pub fn suites(&self) -> &[Suite] {
        self.registry.suites()
    }

    #[cfg(test)]
    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn suite(&self, id: SuiteId) -> Option<&Suite> {
        self.registry.suites().get(id.0)
    }

    pub fn suite_by_name(&self, name: &str) -> Option<&Suite> {
        self.registry.lookup(name).map(|id| self.registry.get(id))
    }

    pub fn len(&self) -> usize {
        self.registry.suites().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.suites().is_empty()
    }

    /// Resolve and execute all admitted suites with the installed control.
    ///
    /// Without an installed control a [`ConsoleControl`] on stdout is used for
    /// this run only.
    pub fn run(&mut self) -> RunReport {
        let Self {
            registry,
            control,
            filters,
        } = self;

        match control {
            Some(control) => execute(registry, filters, &mut **control),
            None => {
                warn!("no control installed, falling back to console reporting");
                let mut fallback = ConsoleControl::default();
                execute(registry, filters, &mut fallback)
            }
        }
    }

    /// Resolve and execute with `control` instead of the installed one.
    pub fn run_with(&self, control: &mut dyn Control) -> RunReport {
        execute(&self.registry, &self.filters, control)
    }
}

fn execute(registry: &Registry, filters: &FilterChain, control: &mut dyn Control) -> RunReport {
    let admitted: Vec<bool> = registry
        .suites()
        .iter()
        .map(|suite| filters.admits_suite(suite))
        .collect();

    let order = match resolve(registry, &admitted, control) {
        Ok(order) => order,
        Err(err) => {
            warn!("{err}");
            return RunReport {
                outcome: EnvironmentOutcome::new(),
                error: Some(RunError::Resolve(err)),
            };
        }
    };

    let (outcome, error) = Scheduler::new(registry, filters, control).run(&order, &admitted);
    RunReport { outcome, error }
}

thread_local! {
    static DEFAULT_ENVIRONMENT: RefCell<Environment> = RefCell::new(Environment::new());
}

/// Access the default [`Environment`] of the current thread.
///
/// This is a convenience for hosts that register from many places. Calling
/// it again from inside `f` (for example from a running test) panics.
pub fn with_default<R>(f: impl FnOnce(&mut Environment) -> R) -> R {
    DEFAULT_ENVIRONMENT.with_borrow_mut(f)
}
