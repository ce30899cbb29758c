use std::borrow::Cow;

use thiserror::Error;

/// An error raised while registering suites or tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegisterError {
    #[error("a suite named `{name}` is already registered")]
    DuplicateSuite { name: Cow<'static, str> },

    #[error("no suite with index {index} is registered")]
    UnknownSuite { index: usize },
}

/// Why no execution order could be computed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("suite `{suite}` depends on unknown suite `{dependency}`")]
    UnknownDependency {
        suite: Cow<'static, str>,
        dependency: String,
    },

    #[error("unsolvable suite dependencies, cycle through: {}", cycle.join(", "))]
    Unsolvable { cycle: Vec<Cow<'static, str>> },
}

/// Why a run did not complete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RunError {
    #[error("dependency resolution failed")]
    Resolve(#[from] ResolveError),

    #[error("run aborted while executing suite `{suite}`")]
    Aborted { suite: Cow<'static, str> },
}
