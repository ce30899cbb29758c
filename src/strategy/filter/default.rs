use crate::{filter::Filter, suite::Suite, test::Test};

/// Name based filter, matching the usual `cargo test <filter> --skip <skip>` workflow.
///
/// Suites are matched by their name, tests by `suite::test`. Without any
/// include pattern everything not skipped is admitted.
#[derive(Debug, Default, Clone)]
pub struct NameFilter {
    exact: bool,
    filter: Vec<String>,
    skip: Vec<String>,
}

impl NameFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exact(self, exact: bool) -> Self {
        Self { exact, ..self }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter.push(filter.into());
        self
    }

    pub fn with_skip(mut self, skip: impl Into<String>) -> Self {
        self.skip.push(skip.into());
        self
    }

    fn matches(&self, name: &str, pattern: &str) -> bool {
        match self.exact {
            true => name == pattern,
            false => name.contains(pattern),
        }
    }

    fn matches_any(&self, patterns: &[String], names: &[&str]) -> bool {
        patterns
            .iter()
            .any(|pattern| names.iter().any(|name| self.matches(name, pattern)))
    }
}

impl Filter for NameFilter {
    fn is_suite_ok(&self, suite: &Suite) -> bool {
        if self.matches_any(&self.skip, &[suite.name()]) {
            return false;
        }

        // a pattern naming one of the tests keeps the suite around
        self.filter.is_empty()
            || self.matches_any(&self.filter, &[suite.name()])
            || suite.tests().iter().any(|test| {
                let path = format!("{}::{}", suite.name(), test.name());
                self.matches_any(&self.filter, &[path.as_str()])
            })
    }

    fn is_test_ok(&self, suite: &Suite, test: &Test) -> bool {
        let path = format!("{}::{}", suite.name(), test.name());
        let names = [suite.name(), path.as_str()];
        let in_filter = self.filter.is_empty() || self.matches_any(&self.filter, &names);
        in_filter && !self.matches_any(&self.skip, &names)
    }
}
