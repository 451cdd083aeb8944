/// Declares one error domain.
///
/// Each variant names the constructor that builds it and the string fields
/// its message interpolates:
///
/// ```ignore
/// define_domain_errors! {
///     pub enum EnumError in Enum {
///         UnknownEnumType => unknown_type(name) {
///             code: (EN, Resolution, 1),
///             message: "unknown enum type: '{name}'",
///             help: "check the type token against the loaded schemas",
///         },
///     }
/// }
/// ```
///
/// `in Enum` is the [`CompilerError`](crate::CompilerError) variant the domain
/// is wrapped into. Every variant also carries an optional program span.
#[macro_export]
macro_rules! define_domain_errors {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $wrap:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $ctor:ident ( $($field:ident),* $(,)? ) {
                    code: ($domain:ident, $category:ident, $seq:literal),
                    message: $msg:literal
                    $(, help: $help:literal)?
                    $(, severity: $severity:ident)?
                    $(,)?
                }
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant {
                    $($field: String,)*
                    span: Option<$crate::Span>,
                },
            )*
        }

        impl $name {
            $(
                pub fn $ctor($($field: impl Into<String>),*) -> $crate::ErrorBuilder<$crate::Unspanned, Self> {
                    $crate::ErrorBuilder::new(Self::$variant {
                        $($field: $field.into(),)*
                        span: None,
                    })
                }
            )*

            pub const fn error_code(&self) -> $crate::ErrorCode {
                match self {
                    $(
                        Self::$variant { .. } => $crate::ErrorCode::new(
                            $crate::Domain::$domain,
                            $crate::Category::$category,
                            $seq,
                        ),
                    )*
                }
            }

            pub fn message(&self) -> String {
                match self {
                    $(Self::$variant { $($field,)* .. } => format!($msg $(, $field = $field)*),)*
                }
            }

            pub fn help_text(&self) -> Option<&'static str> {
                match self {
                    $(Self::$variant { .. } => $crate::define_domain_errors!(@help $($help)?),)*
                }
            }

            pub fn severity(&self) -> $crate::Severity {
                match self {
                    $(Self::$variant { .. } => $crate::define_domain_errors!(@severity $($severity)?),)*
                }
            }

            pub fn span(&self) -> Option<$crate::Span> {
                match self {
                    $(Self::$variant { span, .. } => *span,)*
                }
            }
        }

        impl $crate::DomainError for $name {
            fn into_compiler_error(self) -> $crate::CompilerError {
                $crate::CompilerError::$wrap(self)
            }

            fn with_span(
                mut self,
                at: $crate::Span,
            ) -> Self {
                match &mut self {
                    $(Self::$variant { span, .. } => *span = Some(at),)*
                }
                self
            }
        }

        impl From<$name> for $crate::CompilerError {
            fn from(e: $name) -> Self {
                Self::$wrap(e)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.message())
            }
        }

        impl std::error::Error for $name {}
    };

    (@help) => { None };
    (@help $help:literal) => { Some($help) };
    (@severity) => { $crate::Severity::Error };
    (@severity $severity:ident) => { $crate::Severity::$severity };
}
