use std::{borrow::Cow, fmt::Display};

/// The place in the source where something was declared.
///
/// Usually built with the [`origin!`](crate::origin) macro.
/// An empty `file` means the declaration site is unknown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Origin {
    pub file: &'static str,
    pub line: u32,
}

impl Origin {
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    pub const fn unknown() -> Self {
        Self { file: "", line: 0 }
    }

    pub const fn is_known(&self) -> bool {
        !self.file.is_empty()
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.is_known() {
            true => write!(f, "{}:{}", self.file, self.line),
            false => write!(f, "<unknown>:{}", self.line),
        }
    }
}

/// Name plus declaration site of a suite, test or fixture.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub name: Cow<'static, str>,
    pub origin: Origin,
}

impl Identity {
    pub fn new(name: impl Into<Cow<'static, str>>, origin: Origin) -> Self {
        Self {
            name: name.into(),
            origin,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.origin)
    }
}

/// Capture the current file and line as an [`Origin`].
#[macro_export]
macro_rules! origin {
    () => {
        $crate::Origin::new(file!(), line!())
    };
}
