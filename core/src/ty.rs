use std::fmt::Display;

use convert_case::Casing;
use enumgen_errors::{CompilerError, EnumError};

/// Qualified name of a schema entity, e.g. `azure-native:storage:BlobType`.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ident(String);

impl Ident {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self::from(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Ident {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for Ident {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

/// The primitive kind underlying an enum.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnumValueType {
    String,
    Int,
}

impl Display for EnumValueType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Int => "int",
        })
    }
}

/// A compile-time constant: the literal value of an enum member, or a literal
/// written in a program.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum LiteralValue {
    Int(i64),
    String(String),
}

impl LiteralValue {
    pub fn kind(&self) -> EnumValueType {
        match self {
            Self::Int(_) => EnumValueType::Int,
            Self::String(_) => EnumValueType::String,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Int(_) => None,
        }
    }
}

impl Display for LiteralValue {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, bon::Builder)]
pub struct EnumMember {
    #[builder(into)]
    pub name: Ident,
    #[builder(into)]
    pub value: LiteralValue,
    #[builder(into)]
    pub description: Option<String>,
}

/// A member as written in a schema document. `name` may be omitted for string
/// members, in which case it is derived from the value.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct MemberDefinition {
    #[serde(default)]
    pub name: Option<String>,
    pub value: LiteralValue,
    #[serde(default)]
    pub description: Option<String>,
}

/// An enum as written in a schema document.
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
pub struct EnumDefinition {
    pub name: Ident,
    #[serde(default)]
    pub description: Option<String>,
    /// Primitive kind; inferred from the first member when omitted.
    #[serde(default, rename = "type")]
    pub kind: Option<EnumValueType>,
    pub members: Vec<MemberDefinition>,
}

/// A schema-declared enum type. Immutable once constructed; all invariants
/// (non-empty, single primitive kind, unique member names and values) hold for
/// every value of this type.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct EnumType {
    name: Ident,
    description: Option<String>,
    kind: EnumValueType,
    members: Vec<EnumMember>,
}

#[bon::bon]
impl EnumType {
    #[builder]
    pub fn new(
        #[builder(into)] name: Ident,
        #[builder(into)] description: Option<String>,
        kind: Option<EnumValueType>,
        members: Vec<EnumMember>,
    ) -> Result<Self, CompilerError> {
        let Some(first) = members.first() else {
            return Err(EnumError::empty(name.as_str())
                .unlocated()
                .build());
        };
        let kind = kind.unwrap_or_else(|| first.value.kind());

        for (idx, member) in members.iter().enumerate() {
            let found = member.value.kind();
            if found != kind {
                return Err(EnumError::mixed_kinds(
                    name.as_str(),
                    member.name.as_str(),
                    kind.to_string(),
                    found.to_string(),
                )
                .unlocated()
                .build());
            }

            for prior in &members[..idx] {
                if prior.name == member.name {
                    return Err(EnumError::duplicate_member(name.as_str(), member.name.as_str())
                        .unlocated()
                        .build());
                }
                if prior.value == member.value {
                    return Err(EnumError::duplicate_value(
                        name.as_str(),
                        prior.name.as_str(),
                        member.name.as_str(),
                        member.value.to_string(),
                    )
                    .unlocated()
                    .build());
                }
            }
        }

        Ok(Self {
            name,
            description,
            kind,
            members,
        })
    }
}

impl EnumType {
    pub fn name(&self) -> &Ident {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn kind(&self) -> EnumValueType {
        self.kind
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// The short type name: the last `:`-separated segment of the qualified name.
    pub fn short_name(&self) -> &str {
        self.name
            .as_str()
            .rsplit(':')
            .next()
            .unwrap_or(self.name.as_str())
    }

    pub fn member_named(
        &self,
        name: &Ident,
    ) -> Option<&EnumMember> {
        self.members
            .iter()
            .find(|m| &m.name == name)
    }

    /// The member a literal denotes.
    ///
    /// Values are matched first. For string enums a literal equal to a member
    /// name also denotes that member, which is what the generated SDKs accept
    /// when parsing at runtime.
    pub fn member_for(
        &self,
        literal: &LiteralValue,
    ) -> Option<&EnumMember> {
        if literal.kind() != self.kind {
            return None;
        }

        self.members
            .iter()
            .find(|m| &m.value == literal)
            .or_else(|| {
                let text = literal.as_str()?;
                self.members
                    .iter()
                    .find(|m| m.name.as_str() == text)
            })
    }
}

impl TryFrom<EnumDefinition> for EnumType {
    type Error = CompilerError;

    fn try_from(def: EnumDefinition) -> Result<Self, Self::Error> {
        let mut members = Vec::with_capacity(def.members.len());
        for member in def.members {
            let name = match (member.name, &member.value) {
                (Some(name), _) => name,
                (None, LiteralValue::String(value)) => value.to_case(convert_case::Case::Pascal),
                (None, LiteralValue::Int(value)) => {
                    return Err(EnumError::unnamed_member(def.name.as_str(), value.to_string())
                        .unlocated()
                        .build());
                },
            };
            members.push(EnumMember {
                name: name.into(),
                value: member.value,
                description: member.description,
            });
        }

        EnumType::builder()
            .name(def.name)
            .maybe_description(def.description)
            .maybe_kind(def.kind)
            .members(members)
            .build()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use enumgen_errors::EnumError;

    fn member(
        name: &str,
        value: impl Into<LiteralValue>,
    ) -> EnumMember {
        EnumMember::builder()
            .name(name)
            .value(value)
            .build()
    }

    #[test]
    fn builds_string_enum() {
        let ty = EnumType::builder()
            .name("azure-native:storage:BlobType")
            .members(vec![
                member("Block", "Block"),
                member("Page", "Page"),
                member("Append", "Append"),
            ])
            .build()
            .unwrap();

        assert_eq!(ty.kind(), EnumValueType::String);
        assert_eq!(ty.short_name(), "BlobType");
        assert_eq!(
            ty.members()
                .iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>(),
            ["Block", "Page", "Append"]
        );
    }

    #[test]
    fn member_for_matches_value_then_name() {
        let ty = EnumType::builder()
            .name("storage:SkuName")
            .members(vec![
                member("StandardLrs", "Standard_LRS"),
                member("PremiumLrs", "Premium_LRS"),
            ])
            .build()
            .unwrap();

        let by_value = ty.member_for(&"Standard_LRS".into()).unwrap();
        assert_eq!(by_value.name.as_str(), "StandardLrs");

        let by_name = ty.member_for(&"PremiumLrs".into()).unwrap();
        assert_eq!(by_name.name.as_str(), "PremiumLrs");

        assert!(ty.member_for(&"standard_lrs".into()).is_none());
        assert!(ty.member_for(&LiteralValue::Int(0)).is_none());
    }

    #[test]
    fn rejects_empty_enum() {
        let err = EnumType::builder()
            .name("x:y:Empty")
            .members(vec![])
            .build()
            .unwrap_err();
        assert!(matches!(
            err.as_enum_error(),
            Some(EnumError::EmptyEnum { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_values() {
        let err = EnumType::builder()
            .name("x:y:Dup")
            .members(vec![member("A", 1_i64), member("B", 1_i64)])
            .build()
            .unwrap_err();
        assert_eq!(
            err.message(),
            "enum x:y:Dup: members 'A' and 'B' share the value 1"
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = EnumType::builder()
            .name("x:y:Dup")
            .members(vec![member("A", 1_i64), member("A", 2_i64)])
            .build()
            .unwrap_err();
        assert!(matches!(
            err.as_enum_error(),
            Some(EnumError::DuplicateEnumMember { .. })
        ));
    }

    #[test]
    fn rejects_mixed_kinds() {
        let err = EnumType::builder()
            .name("x:y:Mixed")
            .members(vec![member("A", 1_i64), member("B", "b")])
            .build()
            .unwrap_err();
        assert_eq!(err.message(), "member 'B' of x:y:Mixed is string, expected int");
    }

    #[test]
    fn declared_kind_wins_over_first_member() {
        let err = EnumType::builder()
            .name("x:y:Declared")
            .kind(EnumValueType::String)
            .members(vec![member("A", 1_i64)])
            .build()
            .unwrap_err();
        assert!(matches!(
            err.as_enum_error(),
            Some(EnumError::MixedEnumKinds { .. })
        ));
    }

    #[test]
    fn definition_derives_member_names() {
        let def: EnumDefinition = toml::from_str(
            r#"
name = "azure-native:storage:Kind"
members = [
    { value = "BlobStorage" },
    { value = "block_blob_storage" },
]
"#,
        )
        .unwrap();

        let ty = EnumType::try_from(def).unwrap();
        assert_eq!(ty.members()[0].name.as_str(), "BlobStorage");
        assert_eq!(ty.members()[1].name.as_str(), "BlockBlobStorage");
    }

    #[test]
    fn int_definition_requires_names() {
        let def: EnumDefinition = toml::from_str(
            r#"
name = "compute:Priority"
members = [{ value = 1 }]
"#,
        )
        .unwrap();

        let err = EnumType::try_from(def).unwrap_err();
        assert_eq!(err.error_code().to_string(), "KEN4002");
    }
}
