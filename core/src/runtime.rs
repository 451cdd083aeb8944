//! Reference evaluator for resolution strategies.
//!
//! Evaluates a [`ResolutionStrategy`] the way the emitted code behaves when the
//! generated program runs: direct members are immediate, eager parses read a
//! variable, and deferred parses wait for their upstream output. A value that
//! is not a declared member fails with `RuntimeEnumParseFailure`; nothing ever
//! falls back to a default member.

use std::collections::BTreeMap;

use enumgen_errors::{CompilerError, EnumError, InternalError};

use crate::{
    EnumMember, EnumType, EnumValueType, Ident, LiteralValue,
    ir::{OutputRef, Transform},
    select::ResolutionStrategy,
};

/// Resolution state of an upstream resource output.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OutputState {
    #[default]
    Pending,
    Resolved(LiteralValue),
}

/// Where a runtime conversion was performed.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOrigin {
    Eager { variable: Ident },
    Deferred { source: OutputRef },
}

impl std::fmt::Display for ParseOrigin {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Eager { variable } => write!(f, "from variable {variable}"),
            Self::Deferred { source } => write!(f, "from output {source}"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Resolution<'t> {
    Ready(&'t EnumMember),
    Pending { waiting_on: OutputRef },
}

/// Runtime values visible to the generated program.
#[derive(Debug, Default, Clone)]
pub struct RuntimeEnv {
    variables: BTreeMap<Ident, LiteralValue>,
    outputs: BTreeMap<OutputRef, OutputState>,
}

impl RuntimeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variable(
        mut self,
        name: impl Into<Ident>,
        value: impl Into<LiteralValue>,
    ) -> Self {
        self.variables
            .insert(name.into(), value.into());
        self
    }

    pub fn with_output(
        mut self,
        source: OutputRef,
        state: OutputState,
    ) -> Self {
        self.outputs.insert(source, state);
        self
    }

    /// Marks `source` as resolved to `value`.
    pub fn resolve(
        &mut self,
        source: OutputRef,
        value: impl Into<LiteralValue>,
    ) {
        self.outputs
            .insert(source, OutputState::Resolved(value.into()));
    }

    pub fn output(
        &self,
        source: &OutputRef,
    ) -> &OutputState {
        const PENDING: &OutputState = &OutputState::Pending;
        self.outputs
            .get(source)
            .unwrap_or(PENDING)
    }

    /// Evaluates `strategy` against `ty`.
    pub fn evaluate<'t>(
        &self,
        strategy: &ResolutionStrategy,
        ty: &'t EnumType,
    ) -> Result<Resolution<'t>, CompilerError> {
        match strategy {
            ResolutionStrategy::Direct { member } => {
                ty.member_named(member)
                    .map(Resolution::Ready)
                    .ok_or_else(|| {
                        InternalError::internal(format!(
                            "direct member '{member}' is not declared by {}",
                            ty.name()
                        ))
                        .unlocated()
                        .build()
                    })
            },
            ResolutionStrategy::EagerParse { raw } => {
                let value = self.variables.get(raw).ok_or_else(|| {
                    InternalError::internal(format!("variable '{raw}' is not bound"))
                        .unlocated()
                        .build()
                })?;
                parse(ty, value, &ParseOrigin::Eager { variable: raw.clone() }).map(Resolution::Ready)
            },
            ResolutionStrategy::DeferredParse { source, transforms } => {
                let OutputState::Resolved(value) = self.output(source) else {
                    tracing::trace!("{source} still pending");
                    return Ok(Resolution::Pending {
                        waiting_on: source.clone(),
                    });
                };

                let mut value = value.clone();
                for transform in transforms {
                    value = apply(transform, value)?;
                }
                parse(ty, &value, &ParseOrigin::Deferred {
                    source: source.clone(),
                })
                .map(Resolution::Ready)
            },
        }
    }
}

/// Applies a named transform. String transforms leave int values untouched.
pub fn apply(
    transform: &Transform,
    value: LiteralValue,
) -> Result<LiteralValue, CompilerError> {
    let f: fn(&str) -> String = match transform.name.as_str() {
        "identity" => return Ok(value),
        "to_lower" => str::to_lowercase,
        "to_upper" => str::to_uppercase,
        "trim" => |s| s.trim().to_string(),
        other => {
            return Err(InternalError::internal(format!("unknown transform '{other}'"))
                .unlocated()
                .build());
        },
    };

    Ok(match value {
        LiteralValue::String(s) => LiteralValue::String(f(&s)),
        int @ LiteralValue::Int(_) => int,
    })
}

/// Parses a runtime value into a member of `ty`.
///
/// Int enums also accept the decimal text of a member value, matching how a
/// string-typed configuration value is converted.
pub fn parse<'t>(
    ty: &'t EnumType,
    value: &LiteralValue,
    origin: &ParseOrigin,
) -> Result<&'t EnumMember, CompilerError> {
    let coerced = match (ty.kind(), value) {
        (EnumValueType::Int, LiteralValue::String(text)) => {
            text.trim()
                .parse::<i64>()
                .ok()
                .map(LiteralValue::Int)
        },
        _ => None,
    };

    coerced
        .as_ref()
        .and_then(|v| ty.member_for(v))
        .or_else(|| ty.member_for(value))
        .ok_or_else(|| {
            tracing::debug!("runtime parse of '{value}' into {} failed", ty.name());
            EnumError::runtime_parse_failure(value.to_string(), ty.name().as_str(), origin.to_string())
                .unlocated()
                .build()
        })
}

#[cfg(test)]
mod test {
    use enumgen_errors::EnumError;
    use test_case::test_case;

    use super::*;

    fn blob_type() -> EnumType {
        EnumType::builder()
            .name("azure-native:storage:BlobType")
            .members(
                ["Block", "Page", "Append"]
                    .into_iter()
                    .map(|m| EnumMember::builder().name(m).value(m).build())
                    .collect(),
            )
            .build()
            .unwrap()
    }

    fn index_document() -> OutputRef {
        OutputRef::new("staticwebsite", "indexDocument")
    }

    #[test]
    fn direct_is_immediate() {
        let ty = blob_type();
        let resolution = RuntimeEnv::new()
            .evaluate(&ResolutionStrategy::Direct { member: "Append".into() }, &ty)
            .unwrap();
        assert_eq!(resolution, Resolution::Ready(&ty.members()[2]));
    }

    #[test]
    fn eager_parse_reads_the_variable() {
        let ty = blob_type();
        let env = RuntimeEnv::new().with_variable("typeVar", "Block");

        let resolution = env
            .evaluate(&ResolutionStrategy::EagerParse { raw: "typeVar".into() }, &ty)
            .unwrap();
        assert_eq!(resolution, Resolution::Ready(&ty.members()[0]));
    }

    #[test]
    fn eager_parse_fails_loudly() {
        let ty = blob_type();
        let env = RuntimeEnv::new().with_variable("typeVar", "Blob");

        let err = env
            .evaluate(&ResolutionStrategy::EagerParse { raw: "typeVar".into() }, &ty)
            .unwrap_err();
        assert!(matches!(
            err.as_enum_error(),
            Some(EnumError::RuntimeEnumParseFailure { value, origin, .. })
                if value == "Blob" && origin == "from variable typeVar"
        ));
    }

    #[test]
    fn deferred_parse_waits_then_resolves() {
        let ty = blob_type();
        let strategy = ResolutionStrategy::DeferredParse {
            source: index_document(),
            transforms: vec![Transform::new("trim")],
        };
        let mut env = RuntimeEnv::new();

        assert_eq!(
            env.evaluate(&strategy, &ty).unwrap(),
            Resolution::Pending {
                waiting_on: index_document()
            }
        );

        env.resolve(index_document(), "  Page ");
        assert_eq!(
            env.evaluate(&strategy, &ty).unwrap(),
            Resolution::Ready(&ty.members()[1])
        );
    }

    #[test]
    fn deferred_parse_failure_names_the_output() {
        let ty = blob_type();
        let strategy = ResolutionStrategy::DeferredParse {
            source: index_document(),
            transforms: vec![Transform::new("to_lower")],
        };
        let env = RuntimeEnv::new().with_output(index_document(), OutputState::Resolved("Block".into()));

        let err = env.evaluate(&strategy, &ty).unwrap_err();
        assert_eq!(
            err.message(),
            "cannot convert 'block' to azure-native:storage:BlobType (from output staticwebsite.indexDocument): not a declared member"
        );
    }

    #[test_case("identity", "  MiXed ", "  MiXed "; "identity")]
    #[test_case("to_lower", "MiXed", "mixed"; "lower")]
    #[test_case("to_upper", "MiXed", "MIXED"; "upper")]
    #[test_case("trim", "  MiXed ", "MiXed"; "trim")]
    fn string_transforms(
        name: &str,
        input: &str,
        expected: &str,
    ) {
        assert_eq!(
            apply(&Transform::new(name), input.into()).unwrap(),
            LiteralValue::from(expected)
        );
    }

    #[test]
    fn transforms_leave_ints_alone() {
        assert_eq!(
            apply(&Transform::new("to_upper"), LiteralValue::Int(4)).unwrap(),
            LiteralValue::Int(4)
        );
        assert!(apply(&Transform::new("reverse"), "x".into()).is_err());
    }

    #[test]
    fn int_enum_accepts_numeric_text() {
        let ty = EnumType::builder()
            .name("compute:Priority")
            .members(vec![
                EnumMember::builder().name("Low").value(1_i64).build(),
                EnumMember::builder().name("High").value(2_i64).build(),
            ])
            .build()
            .unwrap();
        let origin = ParseOrigin::Eager {
            variable: "priority".into(),
        };

        assert_eq!(parse(&ty, &"2".into(), &origin).unwrap().name.as_str(), "High");
        assert_eq!(parse(&ty, &LiteralValue::Int(1), &origin).unwrap().name.as_str(), "Low");
        assert!(parse(&ty, &"3".into(), &origin).is_err());
    }
}
