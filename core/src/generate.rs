pub mod csharp;
pub mod files;
pub mod matcher;
pub mod pass;

use std::{io::Write, path::PathBuf, sync::Arc};

use serde::Deserialize;

use crate::{
    EnumType,
    config::GenerationConfig,
    diagnostics::{Diagnostic, DiagnosticSink},
    generate::{
        csharp::CSharpEmitter,
        files::{MemFlush, OutputFile},
        pass::{Pass, ResourceOutcome},
    },
    ir::Program,
    registry::EnumRegistry,
    select::ResolutionStrategy,
};

#[derive(Deserialize, PartialEq, Eq, Debug, Clone, Copy, Default)]
#[cfg_attr(test, derive(serde::Serialize))]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "c#", alias = "dotnet")]
    CSharp,
}

impl std::fmt::Display for Language {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::CSharp => f.write_str("csharp"),
        }
    }
}

/// Renders resolution strategies into target language syntax.
pub trait EnumEmitter: Send + Sync {
    fn language(&self) -> Language;

    /// Expression producing the enum value of one property.
    fn render(
        &self,
        ty: &EnumType,
        strategy: &ResolutionStrategy,
    ) -> String;

    /// The generated document for every resource of a program.
    fn render_document(
        &self,
        resources: &[ResourceOutcome],
    ) -> String;
}

pub struct Generation {
    pub config: GenerationConfig,
    pub registry: EnumRegistry,
    pub program: Program,
    /// The program source spans point into, attached to reported errors.
    program_source: Option<(PathBuf, Arc<String>)>,
}

impl Generation {
    /// Loads the schemas and program named by `config`.
    pub fn new(config: GenerationConfig) -> crate::Result<Self> {
        let mut registry = EnumRegistry::new();
        registry.load_from_sources(&config.schema_paths()?)?;

        let program_path = config.program_path();
        let program = Program::load_from_path(&program_path)?;
        let program_source = program.read_source(&program_path)?;

        tracing::info!(
            "loaded {} enum types and {} resources",
            registry.len(),
            program.resources.len()
        );

        Ok(Self {
            program_source,
            ..Self::from_parts(config, registry, program)
        })
    }

    pub fn from_parts(
        config: GenerationConfig,
        registry: EnumRegistry,
        program: Program,
    ) -> Self {
        Self {
            config,
            registry,
            program,
            program_source: None,
        }
    }

    pub fn emitter(&self) -> Box<dyn EnumEmitter> {
        match self.config.language {
            Language::CSharp => Box::new(CSharpEmitter::new(&self.config.csharp)),
        }
    }

    fn run_pass(
        &self,
        emitter: &dyn EnumEmitter,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<ResourceOutcome> {
        let mut attach = |diagnostic: Diagnostic| {
            match &self.program_source {
                Some((path, text)) => sink.report(diagnostic.in_source(path, text.clone())),
                None => sink.report(diagnostic),
            }
        };

        Pass::new(&self.registry, emitter)
            .warn_unsafe(self.config.warn_unsafe)
            .run(&self.program, &mut attach)
    }

    /// Runs the property pass without writing anything.
    pub fn resolve(
        &self,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<ResourceOutcome> {
        self.run_pass(self.emitter().as_ref(), sink)
    }

    /// Runs the pass and writes the rendered document into the output
    /// directory, or into `mem_flush` when `mem` is set.
    pub fn generate(
        &self,
        sink: &mut dyn DiagnosticSink,
        mem_flush: Option<MemFlush>,
    ) -> crate::Result<Vec<ResourceOutcome>> {
        let emitter = self.emitter();
        let outcomes = self.run_pass(emitter.as_ref(), sink);

        let out_dir = self.config.output_path();
        let path = out_dir.join(&self.config.csharp.file_name);

        let mem = self
            .config
            .mem
            .then(|| mem_flush.unwrap_or_else(|| Arc::new(|_| {})));
        if mem.is_none() {
            std::fs::create_dir_all(&out_dir)
                .map_err(crate::Error::from_with_source_init(out_dir.display().to_string()))?;
        }

        tracing::info!(
            "writing {} output for {} resources to '{}'",
            emitter.language(),
            outcomes.len(),
            path.display()
        );

        let mut file = OutputFile::create(&path, mem)
            .map_err(crate::Error::from_with_source_init(path.display().to_string()))?;
        file.write_all(
            emitter
                .render_document(&outcomes)
                .as_bytes(),
        )?;
        file.flush()?;

        Ok(outcomes)
    }
}
