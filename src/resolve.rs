//! Dependency resolution.
//!
//! Computes an execution order in which every suite comes after all suites it
//! depends on, using a depth first search with three marks per suite. Roots are
//! taken in registration order and dependencies in declaration order, so the
//! order is deterministic for a fixed registration.

use tracing::{debug, trace, warn};

use crate::{
    control::{Control, UnknownDependencyAction},
    environment::Registry,
    error::ResolveError,
    suite::{Suite, SuiteId},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Finished,
}

#[derive(Debug)]
enum Interrupt {
    /// Suites of the cycle, starting with the one whose revisit closed it.
    Cycle(Vec<SuiteId>),
    Unknown(ResolveError),
}

/// A suite on the search path and the next of its dependencies to look at.
#[derive(Debug, Clone, Copy)]
struct Frame {
    suite: SuiteId,
    next: usize,
}

struct Resolver<'e, 'c> {
    registry: &'e Registry,
    control: &'c mut dyn Control,
    marks: Vec<Mark>,
    order: Vec<SuiteId>,
    path: Vec<Frame>,
}

impl<'e, 'c> Resolver<'e, 'c> {
    fn enter(&mut self, suite: SuiteId) {
        self.marks[suite.0] = Mark::OnStack;
        self.path.push(Frame { suite, next: 0 });
    }

    /// Search from `root` with an explicit path, so chain length is not bound
    /// by the thread stack.
    fn visit(&mut self, root: SuiteId) -> Result<(), Interrupt> {
        let registry = self.registry;
        self.enter(root);

        while let Some(frame) = self.path.last_mut() {
            let current = frame.suite;
            let suite = registry.get(current);

            let Some(name) = suite.dependency(frame.next) else {
                self.path.pop();
                self.marks[current.0] = Mark::Finished;
                self.order.push(current);
                continue;
            };
            frame.next += 1;

            let Some(dependency) = registry.lookup(name) else {
                match self.control.on_unknown_dependency(suite, name) {
                    UnknownDependencyAction::Ignore => {
                        debug!(suite = suite.name(), dependency = name, "ignoring unknown dependency");
                        continue;
                    }
                    UnknownDependencyAction::Abort => {
                        return Err(Interrupt::Unknown(ResolveError::UnknownDependency {
                            suite: suite.identity.name.clone(),
                            dependency: name.to_owned(),
                        }));
                    }
                }
            };

            match self.marks[dependency.0] {
                Mark::Finished => {}
                Mark::OnStack => return Err(Interrupt::Cycle(self.cycle(dependency))),
                Mark::Unvisited => {
                    trace!(suite = suite.name(), dependency = name, "visiting dependency");
                    self.enter(dependency);
                }
            }
        }

        Ok(())
    }

    /// `closing` followed by the path from its top back down to `closing`.
    fn cycle(&self, closing: SuiteId) -> Vec<SuiteId> {
        std::iter::once(closing)
            .chain(
                self.path
                    .iter()
                    .rev()
                    .map(|frame| frame.suite)
                    .take_while(|suite| *suite != closing),
            )
            .collect()
    }
}

/// Order all suites reachable from the admitted ones.
///
/// `admitted[i]` says whether the suite with index `i` may be used as a root.
/// On a cycle the participants are reported to the control once; an aborted
/// unknown dependency is reported through the error only.
pub(crate) fn resolve(
    registry: &Registry,
    admitted: &[bool],
    control: &mut dyn Control,
) -> Result<Vec<SuiteId>, ResolveError> {
    let mut resolver = Resolver {
        registry,
        control,
        marks: vec![Mark::Unvisited; registry.suites().len()],
        order: Vec::with_capacity(registry.suites().len()),
        path: Vec::new(),
    };

    for (index, _) in admitted.iter().enumerate().filter(|(_, admitted)| **admitted) {
        if resolver.marks[index] != Mark::Unvisited {
            continue;
        }

        match resolver.visit(SuiteId(index)) {
            Ok(()) => {}
            Err(Interrupt::Unknown(err)) => return Err(err),
            Err(Interrupt::Cycle(members)) => {
                let cycle: Vec<&Suite> = members.iter().map(|id| registry.get(*id)).collect();
                warn!(
                    cycle = ?cycle.iter().map(|suite| suite.name()).collect::<Vec<_>>(),
                    "unsolvable suite dependencies"
                );
                resolver.control.on_unsolvable_dependencies(&cycle);
                return Err(ResolveError::Unsolvable {
                    cycle: cycle.iter().map(|suite| suite.identity.name.clone()).collect(),
                });
            }
        }
    }

    debug!(
        order = ?resolver
            .order
            .iter()
            .map(|id| registry.get(*id).name())
            .collect::<Vec<_>>(),
        "resolved suite order"
    );
    Ok(resolver.order)
}
