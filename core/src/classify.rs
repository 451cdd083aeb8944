//! Classification of property values by evaluation time.
//!
//! Classification depends only on the shape of the IR: no enum or registry
//! information is consulted here.

use enumgen_errors::{CompilerError, EnumError, HasSpan, Span};

use crate::{
    Ident, LiteralValue,
    ir::{Binding, OutputRef, Transform, ValueExpr},
};

/// An enum-typed property value, classified by when its value becomes known.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "class", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Known while generating.
    Literal { value: LiteralValue, span: Span },
    /// Known synchronously when the program runs.
    Identifier { name: Ident, span: Span },
    /// Known only after `source` resolves; `transforms` apply in order.
    AsyncChain {
        source: OutputRef,
        transforms: Vec<Transform>,
        span: Span,
    },
}

impl PropertyValue {
    pub fn is_async(&self) -> bool {
        matches!(self, Self::AsyncChain { .. })
    }

    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::Identifier { .. } => "identifier",
            Self::AsyncChain { .. } => "async chain",
        }
    }
}

impl HasSpan for PropertyValue {
    fn span(&self) -> Span {
        match self {
            Self::Literal { span, .. }
            | Self::Identifier { span, .. }
            | Self::AsyncChain { span, .. } => *span,
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Classifier;

impl Classifier {
    pub fn classify(
        &self,
        expr: &ValueExpr,
    ) -> Result<PropertyValue, CompilerError> {
        match expr {
            ValueExpr::Literal { value, span } => {
                Ok(PropertyValue::Literal {
                    value: value.clone(),
                    span: *span,
                })
            },
            ValueExpr::Var {
                binding: Binding::Output { source },
                span,
                ..
            } => {
                Ok(PropertyValue::AsyncChain {
                    source: source.clone(),
                    transforms: vec![],
                    span: *span,
                })
            },
            ValueExpr::Var {
                name,
                binding: Binding::Unknown,
                span,
            } => {
                Ok(PropertyValue::Identifier {
                    name: name.clone(),
                    span: *span,
                })
            },
            ValueExpr::Output { source, span } => {
                Ok(PropertyValue::AsyncChain {
                    source: source.clone(),
                    transforms: vec![],
                    span: *span,
                })
            },
            ValueExpr::Apply {
                target,
                transform,
                span,
            } => {
                match self.classify(target)? {
                    PropertyValue::AsyncChain {
                        source,
                        mut transforms,
                        ..
                    } => {
                        transforms.push(transform.clone());
                        Ok(PropertyValue::AsyncChain {
                            source,
                            transforms,
                            span: *span,
                        })
                    },
                    sync => {
                        tracing::debug!(
                            "apply '{}' on {} value rejected",
                            transform,
                            sync.class_name()
                        );
                        Err(EnumError::apply_on_sync_value(transform.name.as_str())
                            .at(*span)
                            .build())
                    },
                }
            },
        }
    }
}
