//! Location decisions for domain errors.
//!
//! Constructors return an `ErrorBuilder<Unspanned, _>`. Only a builder that
//! has been pointed at a program location, or explicitly marked as having
//! none, can become a [`CompilerError`].
//!
//! ```
//! use enumgen_errors::{CompilerError, EnumError, Span};
//!
//! let located: CompilerError = EnumError::invalid_literal("NotARealType", "BlobType")
//!     .at(Span::new(4, 18))
//!     .build();
//!
//! let unlocated: CompilerError = EnumError::unknown_type("BlobKind")
//!     .unlocated()
//!     .build();
//!
//! assert_eq!(located.span(), Some(Span::new(4, 18)));
//! assert_eq!(unlocated.span(), None);
//! ```

use crate::{CompilerError, HasSpan, Span};

pub struct Unspanned;

pub struct Spanned(Span);

/// Schema documents, configuration and files have no program location.
pub struct Unlocated;

/// A domain enum generated by `define_domain_errors!`.
pub trait DomainError: Sized {
    fn into_compiler_error(self) -> CompilerError;

    fn with_span(
        self,
        span: Span,
    ) -> Self;
}

pub struct ErrorBuilder<S, E> {
    error: E,
    state: S,
}

impl<E: DomainError> ErrorBuilder<Unspanned, E> {
    pub fn new(error: E) -> Self {
        Self {
            error,
            state: Unspanned,
        }
    }

    pub fn at(
        self,
        span: impl Into<Span>,
    ) -> ErrorBuilder<Spanned, E> {
        ErrorBuilder {
            error: self.error,
            state: Spanned(span.into()),
        }
    }

    pub fn at_node<T: HasSpan>(
        self,
        node: &T,
    ) -> ErrorBuilder<Spanned, E> {
        self.at(node.span())
    }

    pub fn unlocated(self) -> ErrorBuilder<Unlocated, E> {
        ErrorBuilder {
            error: self.error,
            state: Unlocated,
        }
    }
}

impl<E: DomainError> ErrorBuilder<Spanned, E> {
    pub fn build(self) -> CompilerError {
        let Spanned(span) = self.state;
        self.error
            .with_span(span)
            .into_compiler_error()
    }
}

impl<E: DomainError> ErrorBuilder<Unlocated, E> {
    pub fn build(self) -> CompilerError {
        self.error.into_compiler_error()
    }
}

impl<E: DomainError> From<ErrorBuilder<Spanned, E>> for CompilerError {
    fn from(builder: ErrorBuilder<Spanned, E>) -> Self {
        builder.build()
    }
}

impl<E: DomainError> From<ErrorBuilder<Unlocated, E>> for CompilerError {
    fn from(builder: ErrorBuilder<Unlocated, E>) -> Self {
        builder.build()
    }
}
