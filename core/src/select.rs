use std::sync::Arc;

use enumgen_errors::{CompilerError, EnumError, HasSpan};

use crate::{
    EnumType, Ident,
    classify::PropertyValue,
    ir::{OutputRef, Transform},
    registry::EnumRegistry,
};

/// How an enum-typed property value is produced in generated code.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// A named member of the enum, checked during generation.
    Direct { member: Ident },
    /// Parse the variable `raw` into the enum when the program runs.
    EagerParse { raw: Ident },
    /// Parse once `source` resolves, after applying `transforms`.
    DeferredParse {
        source: OutputRef,
        transforms: Vec<Transform>,
    },
}

impl ResolutionStrategy {
    /// Whether the value was checked against the enum during generation.
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Direct { .. })
    }

    /// The upstream output this value waits on.
    pub fn dependency(&self) -> Option<&OutputRef> {
        match self {
            Self::DeferredParse { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Direct { .. } => "direct",
            Self::EagerParse { .. } => "eager-parse",
            Self::DeferredParse { .. } => "deferred-parse",
        }
    }
}

impl std::fmt::Display for ResolutionStrategy {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Direct { member } => write!(f, "direct({member})"),
            Self::EagerParse { raw } => write!(f, "eager-parse({raw})"),
            Self::DeferredParse { source, transforms } => {
                write!(f, "deferred-parse({source}")?;
                for transform in transforms {
                    write!(f, " |> {transform}")?;
                }
                write!(f, ")")
            },
        }
    }
}

/// Chooses the strategy for a classified value. Pure: the same inputs always
/// give the same strategy.
pub fn select(
    value: &PropertyValue,
    ty: &EnumType,
) -> Result<ResolutionStrategy, CompilerError> {
    let strategy = match value {
        PropertyValue::Literal { value: literal, .. } => {
            let Some(member) = ty.member_for(literal) else {
                return Err(EnumError::invalid_literal(literal.to_string(), ty.name().as_str())
                    .at_node(value)
                    .build());
            };
            ResolutionStrategy::Direct {
                member: member.name.clone(),
            }
        },
        PropertyValue::Identifier { name, .. } => ResolutionStrategy::EagerParse { raw: name.clone() },
        PropertyValue::AsyncChain {
            source, transforms, ..
        } => {
            ResolutionStrategy::DeferredParse {
                source: source.clone(),
                transforms: transforms.clone(),
            }
        },
    };

    tracing::debug!("{} {} -> {strategy}", ty.name(), value.class_name());
    Ok(strategy)
}

/// Registry-backed selection.
#[derive(Debug, Clone, Copy)]
pub struct Selector<'r> {
    registry: &'r EnumRegistry,
}

impl<'r> Selector<'r> {
    pub fn new(registry: &'r EnumRegistry) -> Self {
        Self { registry }
    }

    /// Looks up `enum_type` and selects against it. An unknown type is
    /// reported at the value's span.
    pub fn resolve(
        &self,
        value: &PropertyValue,
        enum_type: &Ident,
    ) -> Result<(Arc<EnumType>, ResolutionStrategy), CompilerError> {
        let ty = self
            .registry
            .lookup(enum_type)
            .map_err(|_| {
                EnumError::unknown_type(enum_type.as_str())
                    .at(value.span())
                    .build()
            })?;
        let strategy = select(value, &ty)?;
        Ok((ty, strategy))
    }

    pub fn select_by_name(
        &self,
        value: &PropertyValue,
        enum_type: &Ident,
    ) -> Result<ResolutionStrategy, CompilerError> {
        self.resolve(value, enum_type)
            .map(|(_, strategy)| strategy)
    }
}
