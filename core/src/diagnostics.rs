//! Structured per-property diagnostics.
//!
//! The core never prints: every problem found while generating is delivered
//! to a [`DiagnosticSink`] and the caller decides how to render it.

use std::{path::Path, sync::Arc};

use enumgen_errors::{CompilerError, EnumError, Severity, Span};

use crate::Ident;

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnknownEnumType,
    InvalidEnumLiteral,
    ApplyOnSyncValue,
    UnsafeEnumConversion,
    Other,
}

impl From<&CompilerError> for DiagnosticKind {
    fn from(err: &CompilerError) -> Self {
        match err.as_enum_error() {
            Some(EnumError::UnknownEnumType { .. }) => Self::UnknownEnumType,
            Some(EnumError::InvalidEnumLiteral { .. }) => Self::InvalidEnumLiteral,
            Some(EnumError::ApplyOnSyncValue { .. }) => Self::ApplyOnSyncValue,
            Some(EnumError::UnsafeEnumConversion { .. }) => Self::UnsafeEnumConversion,
            _ => Self::Other,
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub resource: Ident,
    pub property: Ident,
    pub span: Option<Span>,
}

impl std::fmt::Display for Location {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource, self.property)?;
        if let Some(span) = self.span {
            write!(f, " @ {span}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub location: Location,
    pub detail: String,
    pub severity: Severity,
    pub error: CompilerError,
}

impl Diagnostic {
    pub fn new(
        location: Location,
        error: CompilerError,
    ) -> Self {
        let location = Location {
            span: location.span.or_else(|| error.span()),
            ..location
        };

        Self {
            kind: DiagnosticKind::from(&error),
            detail: error.message(),
            severity: error.severity(),
            location,
            error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_fatal()
    }

    /// Attaches the program document so the error renders with its span.
    pub fn in_source(
        self,
        path: &Path,
        source: Arc<String>,
    ) -> Self {
        Self {
            error: self.error.with_source_arc(path, source),
            ..self
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.error.error_code(),
            self.location,
            self.detail
        )
    }
}

pub trait DiagnosticSink {
    fn report(
        &mut self,
        diagnostic: Diagnostic,
    );
}

impl<F: FnMut(Diagnostic)> DiagnosticSink for F {
    fn report(
        &mut self,
        diagnostic: Diagnostic,
    ) {
        self(diagnostic)
    }
}

/// Collects diagnostics in report order.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(
        &mut self,
        diagnostic: Diagnostic,
    ) {
        tracing::debug!("{diagnostic}");
        self.items.push(diagnostic);
    }
}

#[cfg(test)]
mod test {
    use enumgen_errors::{EnumError, Span};

    use super::*;

    fn location() -> Location {
        Location {
            resource: "faviconpng".into(),
            property: "type".into(),
            span: None,
        }
    }

    #[test]
    fn kind_and_span_come_from_the_error() {
        let err = EnumError::invalid_literal("NotARealType", "azure-native:storage:BlobType")
            .at(Span::new(5, 19))
            .build();
        let diagnostic = Diagnostic::new(location(), err);

        assert_eq!(diagnostic.kind, DiagnosticKind::InvalidEnumLiteral);
        assert_eq!(diagnostic.location.span, Some(Span::new(5, 19)));
        assert!(diagnostic.is_error());
        assert_eq!(
            diagnostic.to_string(),
            "[KEN2001] faviconpng.type @ 5..19: 'NotARealType' is not a valid value for enum azure-native:storage:BlobType"
        );
    }

    #[test]
    fn warnings_are_not_errors() {
        let mut sink = Diagnostics::new();
        sink.report(Diagnostic::new(
            location(),
            EnumError::unsafe_conversion("faviconpng.type", "BlobType")
                .unlocated()
                .build(),
        ));

        assert!(!sink.has_errors());
        assert_eq!(sink.warnings().count(), 1);
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = vec![];
        let mut sink = |d: Diagnostic| seen.push(d.kind);
        sink.report(Diagnostic::new(
            location(),
            EnumError::unknown_type("x:y:Z")
                .unlocated()
                .build(),
        ));

        assert_eq!(seen, [DiagnosticKind::UnknownEnumType]);
    }

    #[test]
    fn attached_source_keeps_the_diagnostic() {
        let err = EnumError::invalid_literal("Blocky", "BlobType")
            .at(Span::new(6, 12))
            .build();
        let diagnostic = Diagnostic::new(location(), err)
            .in_source(Path::new("program.yaml"), Arc::new("type: Blocky".into()));

        assert_eq!(diagnostic.kind, DiagnosticKind::InvalidEnumLiteral);
        assert_eq!(diagnostic.location.span, Some(Span::new(6, 12)));
        assert!(diagnostic.error.source_document().is_some());
    }
}
