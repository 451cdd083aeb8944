//! Enum type registry.
//!
//! Populated once from schema documents, read-only afterwards. Lookups never
//! fall back to a default: an unregistered name is `UnknownEnumType`.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use enumgen_errors::{CompilerError, DocumentError, EnumError};

use crate::{EnumDefinition, EnumMember, EnumType, Ident, LiteralValue, utils::extension_of};

/// A schema document: the slice of a provider schema this generator needs.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default, PartialEq)]
pub struct SchemaDocument {
    #[serde(default)]
    pub enums: Vec<EnumDefinition>,
}

impl SchemaDocument {
    pub fn load_data(
        data: &[u8],
        ext: &str,
        document: &str,
    ) -> crate::Result<Self> {
        let parsed = match ext {
            "yaml" | "yml" => serde_yaml::from_slice(data).map_err(crate::Error::from),
            "json" => serde_json::from_slice(data).map_err(crate::Error::from),
            "toml" => {
                std::str::from_utf8(data)
                    .map_err(|e| {
                        crate::Error::from(
                            DocumentError::parse_error(document, e.to_string())
                                .unlocated()
                                .build(),
                        )
                    })
                    .and_then(|text| toml::from_str(text).map_err(crate::Error::from))
            },
            other => {
                return Err(DocumentError::unsupported_format(document, other)
                    .unlocated()
                    .build()
                    .into());
            },
        };

        parsed.map_err(crate::Error::from_with_source_init(document.to_string()))
    }

    pub fn load_from_path(path: &Path) -> crate::Result<Self> {
        let data = std::fs::read(path)
            .map_err(crate::Error::from_with_source_init(path.display().to_string()))?;
        Self::load_data(&data, &extension_of(path), &path.display().to_string())
    }
}

#[derive(Default, Debug, Clone)]
pub struct EnumRegistry {
    enums: BTreeMap<Ident, Arc<EnumType>>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        ty: EnumType,
    ) -> Result<(), CompilerError> {
        if self.enums.contains_key(ty.name()) {
            return Err(EnumError::duplicate_type(ty.name().as_str())
                .unlocated()
                .build());
        }

        tracing::debug!(
            "registering enum {} ({} members, {})",
            ty.name(),
            ty.members().len(),
            ty.kind()
        );

        self.enums
            .insert(ty.name().clone(), Arc::new(ty));
        Ok(())
    }

    pub fn with_definitions(
        &mut self,
        defs: Vec<EnumDefinition>,
    ) -> Result<(), CompilerError> {
        for def in defs {
            self.register(EnumType::try_from(def)?)?;
        }
        Ok(())
    }

    pub fn load_from_source(
        &mut self,
        source: &Path,
    ) -> crate::Result<()> {
        tracing::info!("loading enum schema '{}'", source.display());

        let document = SchemaDocument::load_from_path(source)?;
        self.with_definitions(document.enums)
            .map_err(|err| crate::Error::from(err).with_source(source.display().to_string()))
    }

    pub fn load_from_sources(
        &mut self,
        sources: &[PathBuf],
    ) -> crate::Result<()> {
        for source in sources {
            self.load_from_source(source)?;
        }
        Ok(())
    }

    /// Looks up an enum by qualified name.
    pub fn lookup(
        &self,
        name: &Ident,
    ) -> Result<Arc<EnumType>, CompilerError> {
        self.enums
            .get(name)
            .cloned()
            .ok_or_else(|| {
                EnumError::unknown_type(name.as_str())
                    .unlocated()
                    .build()
            })
    }

    pub fn is_known_member(
        &self,
        ty: &EnumType,
        literal: &LiteralValue,
    ) -> bool {
        self.member_for(ty, literal).is_some()
    }

    pub fn member_for<'t>(
        &self,
        ty: &'t EnumType,
        literal: &LiteralValue,
    ) -> Option<&'t EnumMember> {
        ty.member_for(literal)
    }

    pub fn len(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EnumType>> {
        self.enums.values()
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use enumgen_errors::EnumError;

    use super::*;

    const BLOB_SCHEMA: &str = r#"
[[enums]]
name = "azure-native:storage:BlobType"
description = "The type of blob."
members = [
    { value = "Block" },
    { value = "Page" },
    { value = "Append" },
]

[[enums]]
name = "azure-native:storage:AccessTier"
type = "string"
members = [
    { name = "Hot", value = "Hot" },
    { name = "Cool", value = "Cool" },
]
"#;

    fn registry() -> EnumRegistry {
        let doc = SchemaDocument::load_data(BLOB_SCHEMA.as_bytes(), "toml", "blob.toml").unwrap();
        let mut registry = EnumRegistry::new();
        registry
            .with_definitions(doc.enums)
            .unwrap();
        registry
    }

    #[test]
    fn lookup_registered() {
        let registry = registry();
        assert_eq!(registry.len(), 2);

        let ty = registry
            .lookup(&"azure-native:storage:BlobType".into())
            .unwrap();
        assert_eq!(ty.description(), Some("The type of blob."));
        assert!(registry.is_known_member(&ty, &"Page".into()));
        assert!(!registry.is_known_member(&ty, &"NotARealType".into()));
    }

    #[test]
    fn lookup_unknown_is_an_error() {
        let err = registry()
            .lookup(&"azure-native:storage:BlobKind".into())
            .unwrap_err();

        assert!(matches!(
            err.as_enum_error(),
            Some(EnumError::UnknownEnumType { name, .. }) if name == "azure-native:storage:BlobKind"
        ));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = registry();
        let doc = SchemaDocument::load_data(BLOB_SCHEMA.as_bytes(), "toml", "again.toml").unwrap();

        let err = registry
            .with_definitions(doc.enums)
            .unwrap_err();
        assert_eq!(err.error_code().to_string(), "KEN3001");
    }

    #[test]
    fn loads_yaml_and_json() {
        let yaml = r#"
enums:
  - name: compute:Priority
    members:
      - { name: Low, value: 1 }
      - { name: High, value: 2 }
"#;
        let doc = SchemaDocument::load_data(yaml.as_bytes(), "yaml", "p.yaml").unwrap();
        assert_eq!(doc.enums[0].members[1].value, LiteralValue::Int(2));

        let json = r#"{"enums":[{"name":"compute:Tier","members":[{"value":"Basic"}]}]}"#;
        let doc = SchemaDocument::load_data(json.as_bytes(), "json", "t.json").unwrap();
        assert_eq!(doc.enums[0].name, Ident::new("compute:Tier"));
    }

    #[test]
    fn unsupported_extension() {
        let err = SchemaDocument::load_data(b"", "xml", "schema.xml").unwrap_err();
        let err: CompilerError = err.into();
        assert_eq!(err.error_code().to_string(), "KDC2001");
    }

    #[test]
    fn malformed_document_names_the_source() {
        let err = SchemaDocument::load_data(b"enums = 3", "toml", "broken.toml").unwrap_err();
        let err: CompilerError = err.into();
        assert_eq!(err.error_code().to_string(), "KDC0001");
        assert!(err.message().contains("broken.toml"));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.toml");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(BLOB_SCHEMA.as_bytes())
            .unwrap();

        let mut registry = EnumRegistry::new();
        registry
            .load_from_sources(&[path])
            .unwrap();
        assert_eq!(registry.len(), 2);
    }
}
