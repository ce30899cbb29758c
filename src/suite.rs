use std::{borrow::Cow, collections::BTreeSet, fmt::Debug};

use crate::{
    origin::{Identity, Origin},
    test::{Test, TestResult},
};

/// Index of a registered suite inside its [`Environment`](crate::Environment).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SuiteId(pub(crate) usize);

impl SuiteId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// When a fixture runs relative to the tests of its suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    /// Once, before the first test.
    Init,
    /// Once, after the last test.
    Exit,
    /// Before every test attempt.
    Enter,
    /// After every test attempt.
    Leave,
}

impl FixtureKind {
    pub const fn default_name(&self) -> &'static str {
        match self {
            FixtureKind::Init => "suite.init",
            FixtureKind::Exit => "suite.exit",
            FixtureKind::Enter => "suite.fixture_enter",
            FixtureKind::Leave => "suite.fixture_leave",
        }
    }
}

pub trait FixtureFn {
    fn call_fixture(&self) -> TestResult;
}

impl<F, T> FixtureFn for F
where
    F: Fn() -> T,
    T: Into<TestResult>,
{
    fn call_fixture(&self) -> TestResult {
        (self)().into()
    }
}

pub struct Fixture {
    pub kind: FixtureKind,
    pub identity: Identity,
    function: Box<dyn FixtureFn>,
}

impl Fixture {
    pub fn new<F, T>(kind: FixtureKind, origin: Origin, f: F) -> Self
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        Self {
            kind,
            identity: Identity::new(kind.default_name(), origin),
            function: Box::new(f),
        }
    }

    pub fn with_name(self, name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            identity: Identity::new(name, self.identity.origin),
            ..self
        }
    }

    pub(crate) fn call(&self) -> TestResult {
        self.function.call_fixture()
    }
}

impl Debug for Fixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fixture")
            .field("kind", &self.kind)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct Fixtures {
    init: Option<Fixture>,
    exit: Option<Fixture>,
    enter: Option<Fixture>,
    leave: Option<Fixture>,
}

impl Fixtures {
    fn slot(&mut self, kind: FixtureKind) -> &mut Option<Fixture> {
        match kind {
            FixtureKind::Init => &mut self.init,
            FixtureKind::Exit => &mut self.exit,
            FixtureKind::Enter => &mut self.enter,
            FixtureKind::Leave => &mut self.leave,
        }
    }

    fn get(&self, kind: FixtureKind) -> Option<&Fixture> {
        match kind {
            FixtureKind::Init => self.init.as_ref(),
            FixtureKind::Exit => self.exit.as_ref(),
            FixtureKind::Enter => self.enter.as_ref(),
            FixtureKind::Leave => self.leave.as_ref(),
        }
    }
}

/// A named group of tests with shared fixtures and dependencies on other suites.
///
/// Dependencies are plain names and are only looked up when a run is
/// resolved, so a suite may depend on one that is registered later.
#[derive(Debug)]
#[non_exhaustive]
pub struct Suite {
    pub identity: Identity,
    pub(crate) id: Option<SuiteId>,
    dependencies: Vec<Cow<'static, str>>,
    tests: Vec<Test>,
    tags: BTreeSet<Cow<'static, str>>,
    fixtures: Fixtures,
}

impl Suite {
    pub fn new(name: impl Into<Cow<'static, str>>, origin: Origin) -> Self {
        Self {
            identity: Identity::new(name, origin),
            id: None,
            dependencies: Vec::new(),
            tests: Vec::new(),
            tags: BTreeSet::new(),
            fixtures: Fixtures::default(),
        }
    }

    pub fn depends_on(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.push_dependency(name.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.insert_tag(tag.into());
        self
    }

    pub fn test<F, T>(mut self, name: impl Into<Cow<'static, str>>, origin: Origin, f: F) -> Self
    where
        F: Fn(&mut crate::TestContext<'_>) -> T + 'static,
        T: Into<TestResult>,
    {
        self.push_test(Test::new(name, origin, f));
        self
    }

    pub fn with_test(mut self, test: Test) -> Self {
        self.push_test(test);
        self
    }

    pub fn with_fixture(mut self, fixture: Fixture) -> Self {
        self.set_fixture(fixture);
        self
    }

    pub fn init<F, T>(self, origin: Origin, f: F) -> Self
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.with_fixture(Fixture::new(FixtureKind::Init, origin, f))
    }

    pub fn exit<F, T>(self, origin: Origin, f: F) -> Self
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.with_fixture(Fixture::new(FixtureKind::Exit, origin, f))
    }

    pub fn enter<F, T>(self, origin: Origin, f: F) -> Self
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.with_fixture(Fixture::new(FixtureKind::Enter, origin, f))
    }

    pub fn leave<F, T>(self, origin: Origin, f: F) -> Self
    where
        F: Fn() -> T + 'static,
        T: Into<TestResult>,
    {
        self.with_fixture(Fixture::new(FixtureKind::Leave, origin, f))
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }

    pub fn origin(&self) -> Origin {
        self.identity.origin
    }

    /// Index of this suite, `None` until it has been registered.
    pub fn id(&self) -> Option<SuiteId> {
        self.id
    }

    pub fn dependencies(&self) -> impl ExactSizeIterator<Item = &str> {
        self.dependencies.iter().map(|name| name.as_ref())
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|tag| tag.as_ref())
    }

    pub fn fixture(&self, kind: FixtureKind) -> Option<&Fixture> {
        self.fixtures.get(kind)
    }

    pub(crate) fn dependency(&self, index: usize) -> Option<&str> {
        self.dependencies.get(index).map(|name| name.as_ref())
    }

    pub(crate) fn push_dependency(&mut self, name: Cow<'static, str>) {
        self.dependencies.push(name);
    }

    pub(crate) fn insert_tag(&mut self, tag: Cow<'static, str>) {
        self.tags.insert(tag);
    }

    /// Fixtures of the same kind replace each other.
    pub(crate) fn set_fixture(&mut self, fixture: Fixture) {
        let kind = fixture.kind;
        *self.fixtures.slot(kind) = Some(fixture);
    }

    pub(crate) fn push_test(&mut self, mut test: Test) -> usize {
        let index = self.tests.len();
        test.id = self.id.map(|suite| crate::TestId::new(suite, index));
        self.tests.push(test);
        index
    }

    /// Bind this suite and all of its tests to their final position.
    pub(crate) fn assign(&mut self, id: SuiteId) {
        self.id = Some(id);
        for (index, test) in self.tests.iter_mut().enumerate() {
            test.id = Some(crate::TestId::new(id, index));
        }
    }
}
