//! Program IR consumed by the classifier.
//!
//! The upstream program parser produces these explicitly tagged values; nothing
//! here inspects runtime values to guess what an expression is.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use enumgen_errors::{HasSpan, Span};

use crate::{Ident, LiteralValue, utils::extension_of};

/// Reference to an output of another resource: the dependency edge a deferred
/// conversion must preserve.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutputRef {
    pub resource: Ident,
    pub output: Ident,
}

impl OutputRef {
    pub fn new(
        resource: impl Into<Ident>,
        output: impl Into<Ident>,
    ) -> Self {
        Self {
            resource: resource.into(),
            output: output.into(),
        }
    }
}

impl std::fmt::Display for OutputRef {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource, self.output)
    }
}

/// A named value-to-value function applied to an output as it resolves.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Transform {
    pub name: Ident,
}

impl Transform {
    pub fn new(name: impl Into<Ident>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Transform {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// What the parser knows about the value a variable is bound to.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    /// A local, config value or parameter: its value exists only at runtime.
    #[default]
    Unknown,
    /// The variable holds (or is derived from) another resource's output.
    Output { source: OutputRef },
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueExpr {
    Literal {
        value: LiteralValue,
        #[serde(default)]
        span: Span,
    },
    Var {
        name: Ident,
        #[serde(default)]
        binding: Binding,
        #[serde(default)]
        span: Span,
    },
    Output {
        source: OutputRef,
        #[serde(default)]
        span: Span,
    },
    Apply {
        target: Box<ValueExpr>,
        transform: Transform,
        #[serde(default)]
        span: Span,
    },
}

impl ValueExpr {
    pub fn literal(value: impl Into<LiteralValue>) -> Self {
        Self::Literal {
            value: value.into(),
            span: Span::default(),
        }
    }

    pub fn var(name: impl Into<Ident>) -> Self {
        Self::Var {
            name: name.into(),
            binding: Binding::Unknown,
            span: Span::default(),
        }
    }

    pub fn var_bound_to(
        name: impl Into<Ident>,
        source: OutputRef,
    ) -> Self {
        Self::Var {
            name: name.into(),
            binding: Binding::Output { source },
            span: Span::default(),
        }
    }

    pub fn output(source: OutputRef) -> Self {
        Self::Output {
            source,
            span: Span::default(),
        }
    }

    pub fn apply(
        self,
        transform: impl Into<Ident>,
    ) -> Self {
        let span = self.span();
        Self::Apply {
            target: Box::new(self),
            transform: Transform::new(transform),
            span,
        }
    }

    pub fn at(
        mut self,
        new_span: impl Into<Span>,
    ) -> Self {
        match &mut self {
            Self::Literal { span, .. }
            | Self::Var { span, .. }
            | Self::Output { span, .. }
            | Self::Apply { span, .. } => *span = new_span.into(),
        }
        self
    }
}

impl HasSpan for ValueExpr {
    fn span(&self) -> Span {
        match self {
            Self::Literal { span, .. }
            | Self::Var { span, .. }
            | Self::Output { span, .. }
            | Self::Apply { span, .. } => *span,
        }
    }
}

/// A property whose schema type is an enum.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
pub struct Property {
    #[builder(into)]
    pub name: Ident,
    #[serde(rename = "enum")]
    #[builder(into)]
    pub enum_type: Ident,
    pub value: ValueExpr,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, bon::Builder)]
pub struct Resource {
    #[builder(into)]
    pub name: Ident,
    /// Resource type token, e.g. `azure-native:storage:Blob`.
    #[builder(into)]
    pub token: Ident,
    #[serde(default)]
    #[builder(default)]
    pub properties: Vec<Property>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// The source file spans index into, relative to the IR document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Program {
    pub fn load_data(
        data: &[u8],
        ext: &str,
        document: &str,
    ) -> crate::Result<Self> {
        let parsed: crate::Result<Self> = match ext {
            "yaml" | "yml" => serde_yaml::from_slice(data).map_err(Into::into),
            "json" => serde_json::from_slice(data).map_err(Into::into),
            "toml" => {
                std::str::from_utf8(data)
                    .map_err(|e| {
                        crate::Error::from(
                            enumgen_errors::DocumentError::parse_error(document, e.to_string())
                                .unlocated()
                                .build(),
                        )
                    })
                    .and_then(|text| toml::from_str(text).map_err(Into::into))
            },
            other => {
                return Err(enumgen_errors::DocumentError::unsupported_format(document, other)
                    .unlocated()
                    .build()
                    .into());
            },
        };

        parsed.map_err(crate::Error::with_source_init(document.to_string()))
    }

    pub fn load_from_path(path: &Path) -> crate::Result<Self> {
        tracing::info!("loading program '{}'", path.display());

        let data = std::fs::read(path)
            .map_err(crate::Error::from_with_source_init(path.display().to_string()))?;
        Self::load_data(&data, &extension_of(path), &path.display().to_string())
    }

    /// Reads the source file named by `source`, resolved against the
    /// directory of the IR document at `document`.
    pub fn read_source(
        &self,
        document: &Path,
    ) -> crate::Result<Option<(PathBuf, Arc<String>)>> {
        let Some(source) = &self.source else {
            return Ok(None);
        };

        let path = document
            .parent()
            .map(|dir| dir.join(source))
            .unwrap_or_else(|| source.clone());
        tracing::debug!("reading program source '{}'", path.display());

        let text = std::fs::read_to_string(&path)
            .map_err(crate::Error::from_with_source_init(path.display().to_string()))?;
        Ok(Some((path, Arc::new(text))))
    }
}
