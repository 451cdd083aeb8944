//! .NET SDK rendering.
//!
//! Runtime conversions match a value against member values first and then
//! against member names, like [`crate::runtime::parse`]. String enums whose
//! member names are their values use `System.Enum.Parse<T>`; any other string
//! enum gets an inline `switch` over its values. Int enums cast through
//! `System.Enum.IsDefined` so an undeclared value throws instead of producing
//! an unnamed enum value.

use std::{collections::BTreeMap, fmt::Write};

use convert_case::{Case, Casing};

use crate::{
    EnumType, EnumValueType,
    config::CSharpConfig,
    generate::{
        EnumEmitter, Language,
        pass::{PropertyState, ResourceOutcome},
    },
    ir::Transform,
    select::ResolutionStrategy,
};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class", "const",
    "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event", "explicit", "extern",
    "false", "finally", "fixed", "float", "for", "foreach", "goto", "if", "implicit", "in", "int", "interface",
    "internal", "is", "lock", "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof",
    "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

pub struct CSharpEmitter {
    namespace_aliases: BTreeMap<String, String>,
}

impl CSharpEmitter {
    pub fn new(config: &CSharpConfig) -> Self {
        Self {
            namespace_aliases: config.namespace_aliases.clone(),
        }
    }

    /// Maps a schema token `package:module:Name` to `Package.Module.Name`.
    /// Module paths split on `/` become nested namespaces.
    pub fn type_path(
        &self,
        token: &str,
    ) -> String {
        let mut parts: Vec<&str> = token.split(':').collect();
        let Some(name) = parts.pop() else {
            return token.to_string();
        };

        let mut path = vec![];
        for (idx, part) in parts.into_iter().enumerate() {
            match self.namespace_aliases.get(part) {
                Some(alias) if idx == 0 => path.push(alias.clone()),
                _ => {
                    path.extend(
                        part.split('/')
                            .filter(|s| !s.is_empty())
                            .map(|s| s.to_case(Case::Pascal)),
                    );
                },
            }
        }
        path.push(name.to_string());
        path.join(".")
    }

    fn undeclared(
        ty: &str,
        operand: &str,
    ) -> String {
        format!("throw new System.ArgumentException($\"{{{operand}}} is not a declared member of {ty}\")")
    }

    /// Accepts an int or its decimal text, as configuration values arrive as
    /// either.
    fn checked_cast(
        ty: &str,
        operand: &str,
    ) -> String {
        let int = format!("System.Convert.ToInt32({operand})");
        format!(
            "System.Enum.IsDefined(typeof({ty}), {int}) ? ({ty}){int} : {}",
            Self::undeclared(ty, operand)
        )
    }

    /// Whether `System.Enum.Parse<T>` finds every member by its value.
    fn parses_by_name(ty: &EnumType) -> bool {
        ty.members().iter().all(|m| {
            m.value.as_str() == Some(m.name.as_str()) && ident(m.name.as_str()) == m.name.as_str()
        })
    }

    fn parse_string(
        ty: &EnumType,
        ty_path: &str,
        operand: &str,
    ) -> String {
        if Self::parses_by_name(ty) {
            return format!("System.Enum.Parse<{ty_path}>({operand})");
        }

        // values first, then names no value shadows
        let keys = ty
            .members()
            .iter()
            .filter_map(|m| m.value.as_str().map(|v| (v, m)))
            .chain(ty.members().iter().map(|m| (m.name.as_str(), m)));

        let mut seen = vec![];
        let mut out = format!("{operand} switch {{ ");
        for (key, member) in keys {
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            let _ = write!(
                out,
                "{} => {ty_path}.{}, ",
                string_literal(key),
                ident(member.name.as_str())
            );
        }
        let _ = write!(out, "_ => {} }}", Self::undeclared(ty_path, operand));
        out
    }

    fn transform(
        transform: &Transform,
        kind: EnumValueType,
    ) -> Option<String> {
        let builtin = match transform.name.as_str() {
            "identity" => return None,
            "to_lower" => "v => v.ToLowerInvariant()",
            "to_upper" => "v => v.ToUpperInvariant()",
            "trim" => "v => v.Trim()",
            other => return Some(other.to_case(Case::Pascal)),
        };
        // case and padding never change a number
        (kind == EnumValueType::String).then(|| builtin.to_string())
    }
}

/// A C# identifier for `name`: separators are camel-cased away, a leading
/// digit gets `_` and keywords get `@`.
pub(crate) fn ident(name: &str) -> String {
    let name: String = if name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        name.to_string()
    } else {
        name.to_case(Case::Camel)
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect()
    };

    match name.chars().next() {
        None => "_".to_string(),
        Some(c) if c.is_ascii_digit() => format!("_{name}"),
        _ if KEYWORDS.contains(&name.as_str()) => format!("@{name}"),
        _ => name,
    }
}

/// A regular C# string literal holding `value`.
pub(crate) fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl EnumEmitter for CSharpEmitter {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn render(
        &self,
        ty: &EnumType,
        strategy: &ResolutionStrategy,
    ) -> String {
        let ty_path = self.type_path(ty.name().as_str());

        match strategy {
            ResolutionStrategy::Direct { member } => format!("{ty_path}.{}", ident(member.as_str())),
            ResolutionStrategy::EagerParse { raw } => {
                let raw = ident(raw.as_str());
                match ty.kind() {
                    EnumValueType::String => Self::parse_string(ty, &ty_path, &raw),
                    EnumValueType::Int => Self::checked_cast(&ty_path, &raw),
                }
            },
            ResolutionStrategy::DeferredParse { source, transforms } => {
                let mut out = format!(
                    "{}.{}",
                    ident(source.resource.as_str()),
                    source
                        .output
                        .as_str()
                        .to_case(Case::Pascal)
                );

                for apply in transforms
                    .iter()
                    .filter_map(|t| Self::transform(t, ty.kind()))
                {
                    let _ = write!(out, ".Apply({apply})");
                }

                let _ = match ty.kind() {
                    EnumValueType::String if Self::parses_by_name(ty) => {
                        write!(out, ".Apply(System.Enum.Parse<{ty_path}>)")
                    },
                    EnumValueType::String => write!(out, ".Apply(v => {})", Self::parse_string(ty, &ty_path, "v")),
                    EnumValueType::Int => write!(out, ".Apply(v => {})", Self::checked_cast(&ty_path, "v")),
                };
                out
            },
        }
    }

    fn render_document(
        &self,
        resources: &[ResourceOutcome],
    ) -> String {
        let mut out = String::from("// <auto-generated>enumgen</auto-generated>\n");

        for resource in resources {
            let ty_path = self.type_path(resource.token.as_str());
            let var = ident(resource.name.as_str());

            let _ = writeln!(out);
            if !resource.dependencies.is_empty() {
                let deps: Vec<_> = resource
                    .dependencies
                    .iter()
                    .map(|d| ident(d.as_str()))
                    .collect();
                let _ = writeln!(out, "// {var} waits on: {}", deps.join(", "));
            }
            let _ = writeln!(
                out,
                "var {var} = new {ty_path}({}, new {ty_path}Args\n{{",
                string_literal(resource.name.as_str())
            );

            for property in &resource.properties {
                let name = property
                    .name
                    .as_str()
                    .to_case(Case::Pascal);
                match &property.state {
                    PropertyState::Emitted { code, .. } => {
                        let _ = writeln!(out, "    {name} = {code},");
                    },
                    PropertyState::Failed { error } => {
                        let _ = writeln!(out, "    // {name} skipped: [{}] {}", error.error_code(), error.message());
                    },
                    other => {
                        let _ = writeln!(out, "    // {name} skipped: {}", other.stage());
                    },
                }
            }

            let _ = writeln!(out, "}});");
        }

        out
    }
}
