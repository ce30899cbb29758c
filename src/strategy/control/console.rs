use std::io;

use tracing::warn;

use crate::{
    control::{Control, DependencyAction, ExceptionAction, FaultSite, UnknownDependencyAction},
    outcome::{Outcome, TestOutcome},
    report::SuiteOutcome,
    suite::Suite,
    test::Test,
};

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ColorSetting {
    #[default]
    Automatic,
    Always,
    Never,
}

pub(crate) mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
}

pub trait SupportsColor {
    fn supports_color(&self) -> bool;
}

impl<T: io::IsTerminal> SupportsColor for T {
    fn supports_color(&self) -> bool {
        self.is_terminal()
    }
}

/// Minimal reporting control that prints progress to a writer.
///
/// This is what a run falls back to when no control is installed. Its
/// decisions: faults abort the current unit, failed dependencies skip the
/// dependent suite, unknown dependencies abort resolution.
#[derive(Debug)]
pub struct ConsoleControl<W: io::Write> {
    target: W,
    color_setting: ColorSetting,
    errors: Vec<io::Error>,
}

impl Default for ConsoleControl<io::Stdout> {
    fn default() -> Self {
        Self {
            target: io::stdout(),
            color_setting: Default::default(),
            errors: Vec::new(),
        }
    }
}

impl<W: io::Write> ConsoleControl<W> {
    pub fn with_target<WithTarget: io::Write>(
        self,
        with_target: WithTarget,
    ) -> ConsoleControl<WithTarget> {
        ConsoleControl {
            target: with_target,
            color_setting: self.color_setting,
            errors: self.errors,
        }
    }

    pub fn with_color_setting(self, color_setting: impl Into<ColorSetting>) -> Self {
        ConsoleControl {
            color_setting: color_setting.into(),
            ..self
        }
    }

    pub fn target(&self) -> &W {
        &self.target
    }

    pub fn into_target(self) -> W {
        self.target
    }

    /// Write errors collected while reporting.
    pub fn errors(&self) -> &[io::Error] {
        &self.errors
    }

    fn emit(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            warn!("failed to write run report: {err}");
            self.errors.push(err);
        }
    }
}

impl<W: io::Write + SupportsColor> ConsoleControl<W> {
    /// Return whether this control will currently emit colored output.
    pub fn use_color(&self) -> bool {
        match self.color_setting {
            ColorSetting::Automatic => self.target.supports_color(),
            ColorSetting::Always => true,
            ColorSetting::Never => false,
        }
    }

    fn write_outcome(&mut self, outcome: Outcome) -> io::Result<()> {
        use colors::*;
        match (outcome, self.use_color()) {
            (outcome, false) => write!(self.target, "{outcome}"),
            (Outcome::Success, true) => write!(self.target, "{GREEN}{outcome}{RESET}"),
            (Outcome::Unknown, true) => write!(self.target, "{YELLOW}{outcome}{RESET}"),
            (Outcome::Fail, true) => write!(self.target, "{RED}{outcome}{RESET}"),
        }
    }

    fn write_test_end(&mut self, outcome: &TestOutcome) -> io::Result<()> {
        self.write_outcome(outcome.outcome())?;
        writeln!(self.target)?;

        if outcome.outcome().is_fail() {
            for assert in outcome.asserts() {
                write!(self.target, "     {:?} --> ", assert.message)?;
                self.write_outcome(assert.outcome)?;
                writeln!(self.target)?;
            }
        }
        Ok(())
    }
}

impl<W: io::Write + SupportsColor> Control for ConsoleControl<W> {
    fn on_suite_begin(&mut self, suite: &Suite) {
        let result = writeln!(self.target, "Run Testsuite {:?}:", suite.name());
        self.emit(result);
    }

    fn on_test_begin(&mut self, _: &Suite, test: &Test) {
        let result = write!(self.target, "   {} --> ", test.name());
        self.emit(result);
    }

    fn on_test_end(&mut self, outcome: &TestOutcome) -> bool {
        let result = self.write_test_end(outcome);
        self.emit(result);
        false
    }

    fn on_suite_end(&mut self, _: &SuiteOutcome) {
        let result = writeln!(self.target);
        self.emit(result);
    }

    fn on_exception(&mut self, site: &FaultSite<'_>) -> ExceptionAction {
        let result = writeln!(
            self.target,
            "Fault in {:?} ({}): {}",
            site.identity.name(),
            site.identity.origin,
            site.fault
        );
        self.emit(result);
        ExceptionAction::AbortCurrent
    }

    fn on_dependency_fail(
        &mut self,
        running: &Suite,
        failed: &Suite,
        _: &SuiteOutcome,
    ) -> DependencyAction {
        let result = writeln!(
            self.target,
            "Dependency {:?} needed by {:?} failed.",
            failed.name(),
            running.name()
        );
        self.emit(result);
        DependencyAction::AbortCurrent
    }

    fn on_unknown_dependency(&mut self, from: &Suite, name: &str) -> UnknownDependencyAction {
        let result = writeln!(
            self.target,
            "Missing dependency {name:?} of {:?}.",
            from.name()
        );
        self.emit(result);
        UnknownDependencyAction::Abort
    }

    fn on_unsolvable_dependencies(&mut self, cycle: &[&Suite]) {
        let result = (|| -> io::Result<()> {
            writeln!(self.target, "Can not solve dependencies, cycle through:")?;
            for suite in cycle {
                writeln!(self.target, "   {}", suite.name())?;
            }
            Ok(())
        })();
        self.emit(result);
    }
}
