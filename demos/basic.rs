use suitest::{
    Environment, Origin, RegisterError, RunReport, Suite, Test, TestContext, TestFnHandle,
    TestResult, check, origin,
};

fn parses_numbers(ctx: &mut TestContext<'_>) -> TestResult {
    let parsed: Result<i32, _> = "42".parse();
    check!(ctx, parsed == Ok(42));
    ().into()
}

fn rejects_garbage(ctx: &mut TestContext<'_>) {
    check!(ctx, "4x2".parse::<i32>().is_err(), "4x2 must not parse");
}

fn main() -> Result<RunReport, RegisterError> {
    let mut env = Environment::new();

    let parsing = env.add_suite(Suite::new("parsing", origin!()).test(
        "rejects garbage",
        origin!(),
        rejects_garbage,
    ))?;
    env.add_test(
        parsing,
        Test::from_handle(
            "parses numbers",
            Origin::new(file!(), line!()),
            TestFnHandle::from_const_fn(parses_numbers),
        ),
    )?;

    env.add_suite(
        Suite::new("formatting", origin!())
            .depends_on("parsing")
            .test("pads", origin!(), |ctx: &mut TestContext<'_>| {
                check!(ctx, format!("{:>4}", 7) == "   7");
            })
            .test("hex", origin!(), |ctx: &mut TestContext<'_>| {
                check!(ctx, format!("{:x}", 255) == "ff", "255 in hex");
            }),
    )?;

    // no control installed, the console fallback reports to stdout
    Ok(env.run())
}
