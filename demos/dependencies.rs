use std::{cell::Cell, rc::Rc, thread};

use suitest::{
    Environment, Outcome, RegisterError, RunReport, Suite, SuiteOutcome, TestContext,
    TestOutcome, check,
    control::{
        Control, DependencyAction, ExceptionAction, FaultSite, ForwardingControl, RunEvent,
        UnknownDependencyAction,
    },
    filter::TagFilter,
    origin,
};

/// Gives every failed test one more attempt. Suites with a failed dependency
/// are skipped.
#[derive(Debug, Default)]
struct Lenient {
    retried: bool,
}

impl Control for Lenient {
    fn on_test_end(&mut self, outcome: &TestOutcome) -> bool {
        let retry = outcome.outcome().is_fail() && !self.retried;
        self.retried = retry;
        retry
    }

    fn on_exception(&mut self, _: &FaultSite<'_>) -> ExceptionAction {
        ExceptionAction::Proceed
    }

    fn on_dependency_fail(
        &mut self,
        _: &Suite,
        _: &Suite,
        _: &SuiteOutcome,
    ) -> DependencyAction {
        DependencyAction::AbortCurrent
    }

    fn on_unknown_dependency(&mut self, _: &Suite, _: &str) -> UnknownDependencyAction {
        UnknownDependencyAction::Abort
    }
}

fn main() -> Result<RunReport, RegisterError> {
    let mut env = Environment::new().with_filter(TagFilter::new().with_required("service"));
    let connections = Rc::new(Cell::new(0));
    let flaky = Rc::new(Cell::new(0));

    let open = Rc::clone(&connections);
    let close = Rc::clone(&connections);
    let query = Rc::clone(&connections);
    env.add_suite(
        Suite::new("database", origin!())
            .init(origin!(), move || open.set(open.get() + 1))
            .exit(origin!(), move || close.set(close.get() - 1))
            .test("query", origin!(), move |ctx: &mut TestContext<'_>| {
                check!(ctx, query.get() == 1, "connection open");
            }),
    )?;

    let attempts = Rc::clone(&flaky);
    env.add_suite(
        Suite::new("cache", origin!())
            .depends_on("database")
            .test("warm up", origin!(), move |ctx: &mut TestContext<'_>| {
                attempts.set(attempts.get() + 1);
                check!(ctx, attempts.get() > 1, "warm on attempt {}", attempts.get());
            }),
    )?;

    env.add_suite(
        Suite::new("api", origin!())
            .tag("service")
            .depends_on("cache")
            .test("status", origin!(), |ctx: &mut TestContext<'_>| {
                check!(ctx, 200 + 4 == 204);
            }),
    )?;

    let (mut control, events) = ForwardingControl::new(Lenient::default());
    let printer = thread::spawn(move || {
        for event in events {
            match event {
                RunEvent::SuiteEnd { suite, outcome } => println!("{suite}: {outcome}"),
                RunEvent::TestEnd {
                    test,
                    outcome: Outcome::Fail,
                    repeat: true,
                } => println!("  retrying {test}"),
                _ => {}
            }
        }
    });

    let report = env.run_with(&mut control);
    drop(control);
    let _ = printer.join();

    println!("connections left open: {}", connections.get());
    Ok(report)
}
