//! Errors raised by enumgen.
//!
//! Every error has a stable `K<domain><category><seq>` code, a message,
//! optional help and a severity, and renders through `miette` via
//! [`CompilerError::to_report`].
//!
//! ```
//! use enumgen_errors::{CompilerError, EnumError, Span};
//!
//! let err: CompilerError = EnumError::invalid_literal("NotARealType", "BlobType")
//!     .at(Span::new(10, 24))
//!     .build();
//!
//! assert_eq!(err.error_code().to_string(), "KEN2001");
//! ```

#![allow(clippy::large_enum_variant)]

mod builder;
mod code;
mod diagnostic;
#[macro_use]
mod macros;
mod span;

pub mod domains;

pub use builder::{DomainError, ErrorBuilder, Spanned, Unlocated, Unspanned};
pub use code::{Category, Domain, ErrorCode, Severity};
pub use diagnostic::ErrorReport;
pub use domains::{DocumentError, EnumError, FilesystemError, InternalError};
pub use span::{HasSpan, Span};

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

#[derive(Debug, Clone, PartialEq)]
pub enum CompilerError {
    Enum(EnumError),
    Document(DocumentError),
    Filesystem(FilesystemError),
    Internal(InternalError),

    /// The program document the inner error's span points into.
    WithSource {
        inner: Box<CompilerError>,
        path: PathBuf,
        source: Arc<String>,
    },
}

macro_rules! each_domain {
    ($err:expr, $method:ident) => {
        match $err {
            CompilerError::Enum(e) => e.$method(),
            CompilerError::Document(e) => e.$method(),
            CompilerError::Filesystem(e) => e.$method(),
            CompilerError::Internal(e) => e.$method(),
            CompilerError::WithSource { inner, .. } => inner.$method(),
        }
    };
}

impl CompilerError {
    pub fn error_code(&self) -> ErrorCode {
        each_domain!(self, error_code)
    }

    pub fn message(&self) -> String {
        each_domain!(self, message)
    }

    pub fn severity(&self) -> Severity {
        each_domain!(self, severity)
    }

    pub fn help_text(&self) -> Option<&'static str> {
        each_domain!(self, help_text)
    }

    pub fn span(&self) -> Option<Span> {
        each_domain!(self, span)
    }

    pub fn is_fatal(&self) -> bool {
        self.severity().is_fatal()
    }

    pub fn as_enum_error(&self) -> Option<&EnumError> {
        match self {
            Self::Enum(e) => Some(e),
            Self::WithSource { inner, .. } => inner.as_enum_error(),
            _ => None,
        }
    }

    pub fn with_source(
        self,
        path: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Self {
        self.with_source_arc(path, Arc::new(source.into()))
    }

    /// Attaches a document shared between many errors of one run.
    pub fn with_source_arc(
        self,
        path: impl Into<PathBuf>,
        source: Arc<String>,
    ) -> Self {
        Self::WithSource {
            inner: Box::new(self),
            path: path.into(),
            source,
        }
    }

    /// The document closest to the error, if one was attached.
    pub fn source_document(&self) -> Option<(&Path, &str)> {
        match self {
            Self::WithSource {
                inner,
                path,
                source,
            } => {
                inner
                    .source_document()
                    .or(Some((path.as_path(), source.as_str())))
            },
            _ => None,
        }
    }

    pub fn to_report(&self) -> miette::Report {
        miette::Report::new(ErrorReport::from(self))
    }
}

impl std::fmt::Display for CompilerError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for CompilerError {}

impl From<std::io::Error> for CompilerError {
    fn from(e: std::io::Error) -> Self {
        FilesystemError::io_error(e.to_string())
            .unlocated()
            .build()
    }
}

impl From<glob::PatternError> for CompilerError {
    fn from(e: glob::PatternError) -> Self {
        FilesystemError::invalid_glob(e.to_string())
            .unlocated()
            .build()
    }
}

impl From<glob::GlobError> for CompilerError {
    fn from(e: glob::GlobError) -> Self {
        FilesystemError::io_error(e.to_string())
            .unlocated()
            .build()
    }
}

pub type Result<T, E = CompilerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_answer_for_the_inner_error() {
        let err = EnumError::invalid_literal("Blocky", "BlobType")
            .at(Span::new(6, 12))
            .build()
            .with_source("program.yaml", "type: Blocky");

        assert_eq!(err.error_code().to_string(), "KEN2001");
        assert_eq!(err.span(), Some(Span::new(6, 12)));
        assert_eq!(err.message(), "'Blocky' is not a valid value for enum BlobType");
        assert!(err.as_enum_error().is_some());

        let (path, source) = err.source_document().unwrap();
        assert_eq!(path, Path::new("program.yaml"));
        assert_eq!(source, "type: Blocky");
    }

    #[test]
    fn innermost_document_wins() {
        let err = EnumError::empty("x:y:Z")
            .unlocated()
            .build()
            .with_source("inner.yaml", "a")
            .with_source("outer.yaml", "b");

        assert_eq!(err.source_document().map(|(_, s)| s), Some("a"));
    }

    #[test]
    fn io_errors_are_filesystem_errors() {
        let err: CompilerError = std::io::Error::other("disk full").into();
        assert_eq!(err.error_code().to_string(), "KFS9001");
        assert!(err.is_fatal());
        assert_eq!(err.as_enum_error(), None);
    }
}
