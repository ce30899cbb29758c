//! Hierarchical test orchestration.
//!
//! Tests are grouped into named [`Suite`]s. A suite owns optional fixtures,
//! runs its tests in registration order and may depend on other suites by
//! name. An [`Environment`] resolves these dependencies into an execution
//! order and runs every admitted suite, handing each fault and failed
//! dependency to a [`Control`](control::Control) which decides how to go on.

mod origin;
pub use origin::*;

pub mod outcome;
pub use outcome::{AssertOutcome, Outcome, TestOutcome};

mod report;
pub use report::*;

mod error;
pub use error::*;

mod fault;
pub use fault::Fault;

pub use test::*;

mod suite;
pub use suite::*;

mod environment;
pub use environment::{Environment, with_default};

mod resolve;
mod scheduler;

mod strategy;
pub use strategy::*;

#[cfg(test)]
mod test_support;
