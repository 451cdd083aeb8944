use std::fmt;

/// Which part of the generator raised an error. Rendered as the two letters
/// after the leading `K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    /// `KEN`: enum registration and property resolution
    EN,
    /// `KDC`: schema, program and configuration documents
    DC,
    /// `KFS`: reading inputs and writing the generated document
    FS,
    /// `KIN`: generator bugs
    IN,
}

/// Broad class of an error, the digit following the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Syntax,
    Resolution,
    Validation,
    Conflict,
    Missing,
    Warning,
    Internal,
}

impl Category {
    pub const fn digit(self) -> u8 {
        match self {
            Self::Syntax => 0,
            Self::Resolution => 1,
            Self::Validation => 2,
            Self::Conflict => 3,
            Self::Missing => 4,
            Self::Warning => 8,
            Self::Internal => 9,
        }
    }
}

/// A stable diagnostic code such as `KEN2001`.
///
/// Codes are part of the tool's output contract: tests and downstream
/// tooling match on them, so a code is never reused for a different error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorCode {
    pub domain: Domain,
    pub category: Category,
    pub sequence: u16,
}

impl ErrorCode {
    pub const fn new(
        domain: Domain,
        category: Category,
        sequence: u16,
    ) -> Self {
        Self {
            domain,
            category,
            sequence,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "K{:?}{}{:03}",
            self.domain,
            self.category.digit(),
            self.sequence
        )
    }
}

/// Whether a problem stops the property it was found on.
///
/// Warnings are reported alongside the generated code; errors replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl From<Severity> for miette::Severity {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Warning => miette::Severity::Warning,
            Severity::Error => miette::Severity::Error,
        }
    }
}
