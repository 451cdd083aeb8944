//! The per-property generation pass.
//!
//! Each enum-typed property moves through
//! `Unclassified -> Classified -> Resolved -> Emitted`, or stops in `Failed`
//! carrying the error. Resources are processed in parallel; outcomes keep
//! program order.

use std::{collections::BTreeSet, sync::Arc};

use enumgen_errors::{CompilerError, EnumError, HasSpan};
use rayon::prelude::*;

use crate::{
    EnumType, Ident,
    classify::{Classifier, PropertyValue},
    diagnostics::{Diagnostic, DiagnosticSink, Location},
    generate::EnumEmitter,
    ir::{Program, Property, Resource, ValueExpr},
    registry::EnumRegistry,
    select::{ResolutionStrategy, Selector},
};

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyState {
    Unclassified {
        expr: ValueExpr,
    },
    Classified {
        value: PropertyValue,
    },
    Resolved {
        ty: Arc<EnumType>,
        strategy: ResolutionStrategy,
    },
    Emitted {
        ty: Arc<EnumType>,
        strategy: ResolutionStrategy,
        code: String,
    },
    Failed {
        error: CompilerError,
    },
}

impl PropertyState {
    pub fn new(property: &Property) -> Self {
        Self::Unclassified {
            expr: property.value.clone(),
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            Self::Unclassified { .. } => "unclassified",
            Self::Classified { .. } => "classified",
            Self::Resolved { .. } => "resolved",
            Self::Emitted { .. } => "emitted",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Emitted { .. } | Self::Failed { .. })
    }

    /// Performs one transition. Terminal states are returned unchanged.
    pub fn advance(
        self,
        property: &Property,
        registry: &EnumRegistry,
        emitter: &dyn EnumEmitter,
    ) -> Self {
        let from = self.stage();
        let next = match self {
            Self::Unclassified { expr } => {
                match Classifier.classify(&expr) {
                    Ok(value) => Self::Classified { value },
                    Err(error) => Self::Failed { error },
                }
            },
            Self::Classified { value } => {
                match Selector::new(registry).resolve(&value, &property.enum_type) {
                    Ok((ty, strategy)) => Self::Resolved { ty, strategy },
                    Err(error) => Self::Failed { error },
                }
            },
            Self::Resolved { ty, strategy } => {
                let code = emitter.render(&ty, &strategy);
                Self::Emitted { ty, strategy, code }
            },
            terminal => terminal,
        };

        tracing::trace!("{}: {from} -> {}", property.name, next.stage());
        next
    }

    pub fn strategy(&self) -> Option<&ResolutionStrategy> {
        match self {
            Self::Resolved { strategy, .. } | Self::Emitted { strategy, .. } => Some(strategy),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Emitted { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&CompilerError> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyOutcome {
    pub name: Ident,
    pub enum_type: Ident,
    pub span: enumgen_errors::Span,
    pub state: PropertyState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceOutcome {
    pub name: Ident,
    pub token: Ident,
    pub properties: Vec<PropertyOutcome>,
    /// Upstream resources whose outputs feed deferred conversions.
    pub dependencies: BTreeSet<Ident>,
}

impl ResourceOutcome {
    pub fn property(
        &self,
        name: &str,
    ) -> Option<&PropertyOutcome> {
        self.properties
            .iter()
            .find(|p| p.name.as_str() == name)
    }
}

pub struct Pass<'a> {
    registry: &'a EnumRegistry,
    emitter: &'a dyn EnumEmitter,
    warn_unsafe: bool,
}

impl<'a> Pass<'a> {
    pub fn new(
        registry: &'a EnumRegistry,
        emitter: &'a dyn EnumEmitter,
    ) -> Self {
        Self {
            registry,
            emitter,
            warn_unsafe: false,
        }
    }

    pub fn warn_unsafe(
        mut self,
        warn_unsafe: bool,
    ) -> Self {
        self.warn_unsafe = warn_unsafe;
        self
    }

    pub fn run_property(
        &self,
        property: &Property,
    ) -> PropertyOutcome {
        let mut state = PropertyState::new(property);
        while !state.is_terminal() {
            state = state.advance(property, self.registry, self.emitter);
        }

        PropertyOutcome {
            name: property.name.clone(),
            enum_type: property.enum_type.clone(),
            span: property.value.span(),
            state,
        }
    }

    pub fn run_resource(
        &self,
        resource: &Resource,
    ) -> ResourceOutcome {
        let properties: Vec<_> = resource
            .properties
            .iter()
            .map(|p| self.run_property(p))
            .collect();

        let dependencies = properties
            .iter()
            .filter_map(|p| p.state.strategy()?.dependency())
            .map(|source| source.resource.clone())
            .collect();

        ResourceOutcome {
            name: resource.name.clone(),
            token: resource.token.clone(),
            properties,
            dependencies,
        }
    }

    /// Runs every resource of `program`. One failed property never stops the
    /// others; failures (and unsafe conversions, when enabled) go to `sink`
    /// in program order.
    pub fn run(
        &self,
        program: &Program,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<ResourceOutcome> {
        tracing::info!("resolving {} resources", program.resources.len());

        let outcomes: Vec<ResourceOutcome> = program
            .resources
            .par_iter()
            .map(|resource| self.run_resource(resource))
            .collect();

        for resource in &outcomes {
            for property in &resource.properties {
                let location = Location {
                    resource: resource.name.clone(),
                    property: property.name.clone(),
                    span: None,
                };

                match &property.state {
                    PropertyState::Failed { error } => {
                        sink.report(Diagnostic::new(location, error.clone()));
                    },
                    PropertyState::Emitted { ty, strategy, .. } if self.warn_unsafe && !strategy.is_safe() => {
                        let warning = EnumError::unsafe_conversion(
                            format!("{}.{}", resource.name, property.name),
                            ty.name().as_str(),
                        )
                        .at(property.span)
                        .build();
                        sink.report(Diagnostic::new(location, warning));
                    },
                    _ => {},
                }
            }
        }

        outcomes
    }
}
