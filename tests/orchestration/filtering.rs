use pretty_assertions::assert_eq;
use suitest::{
    Environment, Outcome, Suite, TestContext, check,
    control::DependencyAction,
    filter::{Filter, NameFilter, NoFilter, TagFilter},
    origin,
};

use crate::support::Policy;

fn env() -> Environment {
    let mut env = Environment::new();
    env.add_suite(
        Suite::new("storage", origin!())
            .tag("slow")
            .test("open", origin!(), |ctx: &mut TestContext<'_>| {
                check!(ctx, false, "disk missing");
            })
            .test("close", origin!(), |_: &mut TestContext<'_>| {}),
    )
    .unwrap();
    env.add_suite(
        Suite::new("api", origin!())
            .tag("fast")
            .depends_on("storage")
            .test("get", origin!(), |_: &mut TestContext<'_>| {})
            .test("put", origin!(), |_: &mut TestContext<'_>| {}),
    )
    .unwrap();
    env.add_suite(
        Suite::new("cli", origin!())
            .tag("fast")
            .test("help", origin!(), |_: &mut TestContext<'_>| {}),
    )
    .unwrap();
    env
}

#[test]
fn filtered_dependency_still_runs_for_admitted_dependent() {
    let env = env().with_filter(TagFilter::new().with_required("fast").with_excluded("slow"));
    let mut policy = Policy::default().with_dependency(DependencyAction::AbortCurrent);
    let report = env.run_with(&mut policy);

    assert_eq!(report.outcome.order().collect::<Vec<_>>(), ["storage", "api", "cli"]);
    // the dependency check sees the real outcome of the filtered suite
    assert_eq!(report.outcome.get("storage").unwrap().outcome(), Outcome::Fail);
    assert_eq!(policy.logged("dependency"), ["dependency api needs storage (Failed)"]);
    assert_eq!(report.outcome.get("api").unwrap().outcome(), Outcome::Unknown);
}

#[test]
fn filtered_suite_without_dependents_is_skipped() {
    let env = env().with_filter(TagFilter::new().with_excluded("slow").with_excluded("fast"));
    let report = env.run_with(&mut Policy::default());
    assert!(report.outcome.is_empty());
    assert!(report.succeeded());
}

#[test]
fn name_filter_selects_tests_of_root_suites_only() {
    let env = env().with_filter(NameFilter::new().with_filter("api::put"));
    let report = env.run_with(&mut Policy::default().with_dependency(DependencyAction::Ignore));

    assert_eq!(report.outcome.order().collect::<Vec<_>>(), ["storage", "api"]);
    assert_eq!(report.outcome.get("storage").unwrap().len(), 2);
    let api = report.outcome.get("api").unwrap();
    assert_eq!(
        api.tests().iter().map(|t| t.name.as_ref()).collect::<Vec<_>>(),
        ["put"]
    );
}

#[test]
fn skip_patterns_drop_single_tests() {
    let env = env().with_filter(NameFilter::new().with_skip("storage::open"));
    let report = env.run_with(&mut Policy::default());

    assert!(report.succeeded());
    let storage = report.outcome.get("storage").unwrap();
    assert_eq!(storage.len(), 1);
    assert!(storage.get("open").is_none());
}

#[test]
fn filters_compose_and_can_be_removed() {
    let mut env = env();
    let tags = env.add_filter(TagFilter::new().with_required("fast"));
    env.add_filter(NameFilter::new().with_skip("cli"));
    env.add_filter(NoFilter);
    assert_eq!(env.filters().len(), 3);

    let report = env.run_with(&mut Policy::default().with_dependency(DependencyAction::Ignore));
    assert_eq!(report.outcome.order().collect::<Vec<_>>(), ["storage", "api"]);

    let removed = env.remove_filter(tags).unwrap();
    assert!(!removed.is_suite_ok(env.suite_by_name("storage").unwrap()));
    assert!(env.remove_filter(tags).is_none());

    let report = env.run_with(&mut Policy::default().with_dependency(DependencyAction::Ignore));
    assert_eq!(report.outcome.order().collect::<Vec<_>>(), ["storage", "api"]);
}
