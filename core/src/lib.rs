#![allow(clippy::result_large_err)]

//! Typed enum resolution for SDK program generation.
//!
//! Given schema-declared enum types ([`registry::EnumRegistry`]) and the
//! program IR ([`ir::ValueExpr`]) bound to enum-typed resource properties,
//! decides whether each property is emitted as a named enum member, an eager
//! runtime conversion, or a conversion attached to an upstream output.
//!
//! ```
//! use enumgen_core::{
//!     EnumMember, EnumType,
//!     classify::Classifier,
//!     ir::ValueExpr,
//!     select::{ResolutionStrategy, select},
//! };
//!
//! let blob_type = EnumType::builder()
//!     .name("azure-native:storage:BlobType")
//!     .members(
//!         ["Block", "Page", "Append"]
//!             .into_iter()
//!             .map(|m| EnumMember::builder().name(m).value(m).build())
//!             .collect(),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let value = Classifier.classify(&ValueExpr::literal("Block")).unwrap();
//! let strategy = select(&value, &blob_type).unwrap();
//!
//! assert_eq!(strategy, ResolutionStrategy::Direct { member: "Block".into() });
//! ```

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod generate;
pub mod ir;
pub mod registry;
pub mod runtime;
pub mod select;
pub mod ty;
pub(crate) mod utils;

pub use paste::paste;
pub use ty::*;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("{0}")]
    Validations(#[from] validator::ValidationErrors),

    #[error("[{src}] {error}")]
    SourceFile { error: Box<Self>, src: String },

    #[error("{0}")]
    Compiler(#[from] enumgen_errors::CompilerError),
}

impl Error {
    pub fn with_source(
        self,
        src: String,
    ) -> Self {
        Self::SourceFile {
            error: Box::new(self),
            src,
        }
    }

    pub fn with_source_init(src: String) -> impl FnOnce(Self) -> Self {
        |err| err.with_source(src)
    }

    pub fn from_with_source_init<E: Into<Self>>(src: String) -> impl FnOnce(E) -> Self {
        |err| Self::with_source_init(src)(err.into())
    }

    fn into_compiler_error(
        self,
        document: Option<&str>,
    ) -> enumgen_errors::CompilerError {
        use enumgen_errors::{DocumentError, FilesystemError};

        let document = document.unwrap_or("<unknown>");
        match self {
            Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                FilesystemError::file_not_found(document)
                    .unlocated()
                    .build()
            },
            Error::Io(e) => {
                FilesystemError::io_error(e.to_string())
                    .unlocated()
                    .build()
            },
            Error::TomlDe(e) => {
                DocumentError::parse_error(document, e.to_string())
                    .unlocated()
                    .build()
            },
            Error::Json(e) => {
                DocumentError::parse_error(document, e.to_string())
                    .unlocated()
                    .build()
            },
            Error::Yaml(e) => {
                DocumentError::parse_error(document, e.to_string())
                    .unlocated()
                    .build()
            },
            Error::Config(e) => {
                DocumentError::config_error(e.to_string())
                    .unlocated()
                    .build()
            },
            Error::Validations(e) => {
                DocumentError::invalid_config(e.to_string())
                    .unlocated()
                    .build()
            },
            Error::SourceFile { error, src } => error.into_compiler_error(Some(&src)),
            Error::Compiler(e) => e,
        }
    }
}

impl From<Error> for enumgen_errors::CompilerError {
    fn from(err: Error) -> Self {
        err.into_compiler_error(None)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod test {
    use enumgen_errors::CompilerError;

    use super::Error;

    #[test]
    fn source_file_names_the_document() {
        let parse = toml::from_str::<toml::Table>("= nope").unwrap_err();
        let err: CompilerError = Error::from(parse)
            .with_source("schemas/blob.toml".into())
            .into();

        assert_eq!(err.error_code().to_string(), "KDC0001");
        assert!(err.message().starts_with("failed to parse schemas/blob.toml"));
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CompilerError = Error::from(io)
            .with_source("program.yaml".into())
            .into();

        assert_eq!(err.message(), "file not found: program.yaml");
    }
}
