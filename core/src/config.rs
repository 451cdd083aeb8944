use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use config::File;
use serde::{Deserialize, de::DeserializeOwned};
use validator::Validate;

use crate::{Error, default, generate::Language};

/// Loads a configuration named [`FromConfigDir::NAME`] (any format the
/// `config` crate understands) from a directory, applies `ENUMGEN_*`
/// environment overrides and validates the result.
pub trait FromConfigDir
where
    Self: Sized + DeserializeOwned + Validate, {
    const NAME: &'static str;

    /// Called with the directory the configuration was read from.
    fn with_root(
        self,
        root: PathBuf,
    ) -> Self;

    fn from_config_dir<P: AsRef<Path>>(dir: Option<P>) -> crate::Result<Self> {
        let root = dir
            .map(|d| d.as_ref().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("./"));
        let file_name = root.join(Self::NAME).display().to_string();

        tracing::debug!("reading configuration '{file_name}'");

        let this: Self = config::Config::builder()
            .add_source(File::with_name(&file_name).required(true))
            .add_source(
                config::Environment::with_prefix("ENUMGEN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(Error::from_with_source_init(file_name.clone()))?
            .try_deserialize()
            .map_err(Error::from_with_source_init(file_name.clone()))?;

        this.validate()
            .map_err(Error::from_with_source_init(file_name))?;

        Ok(this.with_root(root))
    }
}

default!(
    PathBuf: {
        output_dir = "./".into(),
        file_name = "EnumProperties.cs".into(),
    },
);

#[derive(Deserialize, PartialEq, Debug, Clone, Validate)]
#[cfg_attr(test, derive(serde::Serialize))]
pub struct Sources {
    #[validate(length(min = 1))]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Deserialize, PartialEq, Debug, Clone, Validate)]
#[cfg_attr(test, derive(serde::Serialize))]
#[serde(rename_all = "kebab-case")]
pub struct CSharpConfig {
    /// Schema package prefix to C# root namespace, e.g.
    /// `azure-native = "AzureNative"`.
    #[serde(default, alias = "namespace_aliases")]
    pub namespace_aliases: BTreeMap<String, String>,

    #[serde(default = "default_file_name", alias = "file_name")]
    pub file_name: PathBuf,
}

impl Default for CSharpConfig {
    fn default() -> Self {
        Self {
            namespace_aliases: BTreeMap::new(),
            file_name: default_file_name(),
        }
    }
}

#[derive(Deserialize, PartialEq, Debug, Clone, Validate)]
#[cfg_attr(test, derive(serde::Serialize))]
#[serde(rename_all = "kebab-case")]
pub struct GenerationConfig {
    #[validate(nested)]
    pub schemas: Sources,

    /// Program IR document.
    pub program: PathBuf,

    #[serde(default = "default_output_dir", alias = "output_dir")]
    pub output_dir: PathBuf,

    #[serde(default)]
    pub language: Language,

    /// Report `UnsafeEnumConversion` for every runtime conversion.
    #[serde(default, alias = "warn_unsafe")]
    pub warn_unsafe: bool,

    #[serde(default)]
    pub mem: bool,

    #[serde(default)]
    #[validate(nested)]
    pub csharp: CSharpConfig,

    #[serde(skip)]
    pub root: PathBuf,
}

impl FromConfigDir for GenerationConfig {
    const NAME: &'static str = "enumgen";

    fn with_root(
        self,
        root: PathBuf,
    ) -> Self {
        Self { root, ..self }
    }
}

impl GenerationConfig {
    pub fn schema_paths(&self) -> crate::Result<Vec<PathBuf>> {
        Ok(crate::generate::matcher::match_paths(
            &self.root,
            &self.schemas.include,
            &self.schemas.exclude,
        )?)
    }

    pub fn program_path(&self) -> PathBuf {
        self.root.join(&self.program)
    }

    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    pub fn set_mem(
        &mut self,
        mem: bool,
    ) {
        self.mem = mem;
    }
}
