use std::borrow::Cow;

use crate::{filter::Filter, suite::Suite};

/// Admits suites by their tags.
///
/// A suite is admitted when it carries at least one of the required tags
/// (or none are required) and none of the excluded ones. Tests are not
/// affected.
#[derive(Debug, Default, Clone)]
pub struct TagFilter {
    require_any: Vec<Cow<'static, str>>,
    exclude: Vec<Cow<'static, str>>,
}

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.require_any.push(tag.into());
        self
    }

    pub fn with_excluded(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.exclude.push(tag.into());
        self
    }
}

impl Filter for TagFilter {
    fn is_suite_ok(&self, suite: &Suite) -> bool {
        let required = self.require_any.is_empty()
            || self.require_any.iter().any(|tag| suite.has_tag(tag));
        required && !self.exclude.iter().any(|tag| suite.has_tag(tag))
    }
}
