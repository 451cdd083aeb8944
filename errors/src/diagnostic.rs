//! Rendering a [`CompilerError`] through `miette`.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};

use crate::{CompilerError, ErrorCode, Severity, Span};

/// Snapshot of a [`CompilerError`] in the shape `miette` draws.
///
/// When the error carries its program document the span is drawn inline;
/// otherwise only the code, message and help are shown.
#[derive(Debug)]
pub struct ErrorReport {
    code: ErrorCode,
    message: String,
    severity: Severity,
    help: Option<&'static str>,
    span: Option<Span>,
    document: Option<NamedSource<String>>,
}

impl From<&CompilerError> for ErrorReport {
    fn from(err: &CompilerError) -> Self {
        Self {
            code: err.error_code(),
            message: err.message(),
            severity: err.severity(),
            help: err.help_text(),
            span: err.span(),
            document: err
                .source_document()
                .map(|(path, text)| NamedSource::new(path.display().to_string(), text.to_string())),
        }
    }
}

impl std::fmt::Display for ErrorReport {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ErrorReport {}

impl Diagnostic for ErrorReport {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(self.severity.into())
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.help
            .map(|help| Box::new(help) as Box<dyn std::fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.document
            .as_ref()
            .map(|doc| doc as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        // a span is meaningless without the text it indexes into
        self.document.as_ref()?;
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.message.clone()),
            span,
        ))))
    }
}
