use pretty_assertions::assert_eq;
use suitest::{
    Environment, ResolveError, RunError, Suite, TestContext, check,
    control::{DependencyAction, UnknownDependencyAction},
    origin,
};

use crate::support::Policy;

fn graph(edges: &[(&'static str, &[&'static str])]) -> Environment {
    let mut env = Environment::new();
    for (name, deps) in edges {
        let mut suite = Suite::new(*name, origin!());
        for dep in *deps {
            suite = suite.depends_on(*dep);
        }
        env.add_suite(suite).unwrap();
    }
    env
}

fn position(order: &[&str], name: &str) -> usize {
    order.iter().position(|n| *n == name).unwrap()
}

#[test]
fn every_dependency_runs_before_its_dependents() {
    let edges: &[(&'static str, &[&'static str])] = &[
        ("deploy", &["build", "test"]),
        ("test", &["build"]),
        ("lint", &[]),
        ("build", &["fetch"]),
        ("fetch", &[]),
        ("docs", &["build"]),
    ];
    let env = graph(edges);
    let report = env.run_with(&mut Policy::default());
    assert!(report.succeeded());

    let order: Vec<&str> = report.outcome.order().collect();
    assert_eq!(order.len(), edges.len());
    for (name, deps) in edges {
        for dep in *deps {
            assert!(
                position(&order, dep) < position(&order, name),
                "{dep} should precede {name} in {order:?}"
            );
        }
    }
}

#[test]
fn unconstrained_suites_keep_registration_order() {
    let env = graph(&[("c", &[]), ("a", &[]), ("b", &["z"]), ("z", &[])]);
    let report = env.run_with(&mut Policy::default());
    assert_eq!(report.outcome.order().collect::<Vec<_>>(), ["c", "a", "z", "b"]);
}

#[test]
fn dependency_outcome_is_known_before_dependency_check() {
    let mut env = Environment::new();
    env.add_suite(
        Suite::new("top", origin!())
            .depends_on("base")
            .test("t", origin!(), |_: &mut TestContext<'_>| {}),
    )
    .unwrap();
    env.add_suite(Suite::new("base", origin!()).test(
        "breaks",
        origin!(),
        |ctx: &mut TestContext<'_>| {
            check!(ctx, false, "base broke");
        },
    ))
    .unwrap();

    let mut policy = Policy::default().with_dependency(DependencyAction::Ignore);
    let report = env.run_with(&mut policy);

    let base_done = policy.log.iter().position(|l| l == "done base Failed").unwrap();
    let check = policy
        .log
        .iter()
        .position(|l| l == "dependency top needs base (Failed)")
        .unwrap();
    assert!(base_done < check);
    assert_eq!(report.outcome.get("top").unwrap().len(), 1);
}

#[test]
fn mutual_dependency_reports_exactly_both() {
    let env = graph(&[("x", &["y"]), ("y", &["x"]), ("free", &[])]);
    let mut policy = Policy::default();
    let report = env.run_with(&mut policy);

    assert_eq!(policy.cycles, [vec!["x".to_string(), "y".to_string()]]);
    assert!(report.outcome.is_empty());
    assert!(policy.logged("suite").is_empty());
    assert_eq!(
        report.error,
        Some(RunError::Resolve(ResolveError::Unsolvable {
            cycle: vec!["x".into(), "y".into()]
        }))
    );
}

#[test]
fn unknown_dependency_aborts_before_anything_runs() {
    let env = graph(&[("ok", &[]), ("broken", &["nowhere"])]);
    let mut policy = Policy::default().with_unknown(UnknownDependencyAction::Abort);
    let report = env.run_with(&mut policy);

    assert!(policy.cycles.is_empty());
    assert!(report.outcome.is_empty());
    assert_eq!(policy.log, ["unknown broken -> nowhere"]);
    assert!(matches!(
        report.error,
        Some(RunError::Resolve(ResolveError::UnknownDependency { .. }))
    ));
}

#[test]
fn ignored_unknown_dependency_runs_the_suite() {
    let env = graph(&[("broken", &["nowhere"])]);
    let mut policy = Policy::default().with_unknown(UnknownDependencyAction::Ignore);
    let report = env.run_with(&mut policy);

    assert!(report.succeeded());
    assert_eq!(report.outcome.order().collect::<Vec<_>>(), ["broken"]);
}
