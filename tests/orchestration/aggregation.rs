use pretty_assertions::assert_eq;
use suitest::{
    Environment, Outcome, Suite, TestContext, check, control::DependencyAction, origin,
    outcome::Aggregate,
};

use crate::support::Policy;

const ALL: [Outcome; 3] = [Outcome::Success, Outcome::Unknown, Outcome::Fail];

#[test]
fn aggregate_is_severity_maximum_in_any_order() {
    for a in ALL {
        for b in ALL {
            for c in ALL {
                for d in ALL {
                    let feed = [a, b, c, d];
                    let expected = feed.iter().copied().max().unwrap();
                    let forward: Aggregate = feed.iter().copied().collect();
                    let backward: Aggregate = feed.iter().rev().copied().collect();
                    assert_eq!(forward.total(), expected);
                    assert_eq!(backward.total(), expected);
                }
            }
        }
    }
}

#[test]
fn outcomes_fold_up_to_environment() {
    let mut env = Environment::new();
    env.add_suite(
        Suite::new("mixed", origin!())
            .test("good", origin!(), |ctx: &mut TestContext<'_>| {
                check!(ctx, true);
            })
            .test("bad", origin!(), |ctx: &mut TestContext<'_>| {
                check!(ctx, true, "first holds");
                check!(ctx, false, "second breaks");
                check!(ctx, true, "third holds");
            })
            .test("empty", origin!(), |_: &mut TestContext<'_>| {}),
    )
    .unwrap();
    env.add_suite(Suite::new("clean", origin!()).test(
        "good",
        origin!(),
        |ctx: &mut TestContext<'_>| {
            check!(ctx, true);
        },
    ))
    .unwrap();

    let report = env.run_with(&mut Policy::default());
    let mixed = report.outcome.get("mixed").unwrap();

    assert_eq!(mixed.get("good").unwrap().outcome(), Outcome::Success);
    assert_eq!(mixed.get("bad").unwrap().outcome(), Outcome::Fail);
    assert_eq!(
        mixed
            .get("bad")
            .unwrap()
            .failed_asserts()
            .map(|assert| assert.message.as_ref())
            .collect::<Vec<_>>(),
        ["second breaks"]
    );
    assert_eq!(mixed.get("empty").unwrap().outcome(), Outcome::Success);
    assert_eq!(mixed.outcome(), Outcome::Fail);
    assert_eq!(report.outcome.get("clean").unwrap().outcome(), Outcome::Success);
    assert_eq!(report.outcome.outcome(), Outcome::Fail);
    assert!(report.completed());
    assert!(!report.succeeded());
}

#[test]
fn skipped_suite_counts_as_unknown() {
    let mut env = Environment::new();
    env.add_suite(Suite::new("base", origin!()).test(
        "breaks",
        origin!(),
        |ctx: &mut TestContext<'_>| {
            check!(ctx, false);
        },
    ))
    .unwrap();
    env.add_suite(Suite::new("top", origin!()).depends_on("base")).unwrap();

    let mut policy = Policy::default().with_dependency(DependencyAction::AbortCurrent);
    let report = env.run_with(&mut policy);

    assert_eq!(report.outcome.get("top").unwrap().outcome(), Outcome::Unknown);
    assert_eq!(policy.logged("dependency"), ["dependency top needs base (Failed)"]);
}
