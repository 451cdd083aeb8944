use std::{io::Write, path::PathBuf};

use enumgen_core::{
    config::{FromConfigDir, GenerationConfig},
    diagnostics::Diagnostics,
    generate::{Generation, pass::ResourceOutcome},
    select::ResolutionStrategy,
};

#[derive(Default, clap::ValueEnum, Clone, Debug)]
pub enum LogLevel {
    Debug,
    Trace,
    #[default]
    Info,
    Error,
    Warn,
}

impl From<LogLevel> for tracing::Level {
    fn from(val: LogLevel) -> Self {
        match val {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
        }
    }
}

#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "enumgen")]
pub struct Cli {
    #[clap(
        long,
        global = true,
        default_value = "error",
        env = "LOG_LEVEL",
        help = "the verbosity level to print logs at."
    )]
    pub log_level: LogLevel,

    #[clap(subcommand)]
    command: Command,
}

impl Cli {
    /// Runs the command, writing its report to `out`. Per-property problems
    /// are returned as diagnostics rather than as an error.
    pub fn run(
        self,
        out: &mut dyn Write,
    ) -> enumgen_core::Result<Diagnostics> {
        let mut diagnostics = Diagnostics::new();

        match self.command {
            Command::Resolve(args) => {
                let mut config = args.config.load()?;
                config.warn_unsafe |= args.warn_unsafe;

                let outcomes = Generation::new(config)?.resolve(&mut diagnostics);
                match args.format {
                    Format::Table => write_table(out, &outcomes)?,
                    Format::Json => {
                        serde_json::to_writer_pretty(&mut *out, &rows(&outcomes))?;
                        writeln!(out)?;
                    },
                }
            },
            Command::Generate(args) => {
                let mut config = args.config.load()?;
                config.warn_unsafe |= args.warn_unsafe;
                if let Some(output_dir) = args.output_dir {
                    config.output_dir = output_dir;
                }

                let outcomes = Generation::new(config)?.generate(&mut diagnostics, None)?;
                writeln!(
                    out,
                    "generated {} properties across {} resources",
                    outcomes
                        .iter()
                        .flat_map(|r| &r.properties)
                        .filter(|p| p.state.code().is_some())
                        .count(),
                    outcomes.len()
                )?;
            },
        }

        Ok(diagnostics)
    }
}

#[derive(clap::Subcommand, Debug, Clone)]
enum Command {
    #[clap(alias = "r")]
    /// prints the strategy chosen for every enum-typed property
    Resolve(ResolveArgs),

    #[clap(alias = "gen", alias = "g")]
    /// renders enum property assignments as defined in `enumgen.toml`
    Generate(GenArgs),
}

#[derive(clap::Args, Debug, Clone)]
struct WithConfig {
    #[clap(short = 'd', long = "config-dir")]
    config_dir: Option<String>,
}

impl WithConfig {
    fn load(&self) -> enumgen_core::Result<GenerationConfig> {
        GenerationConfig::from_config_dir(self.config_dir.as_deref())
    }
}

#[derive(Default, clap::ValueEnum, Clone, Debug)]
enum Format {
    #[default]
    Table,
    Json,
}

#[derive(clap::Args, Debug, Clone)]
struct ResolveArgs {
    #[clap(flatten)]
    config: WithConfig,

    #[clap(long, value_enum, default_value_t, help = "the report format.")]
    format: Format,

    #[clap(long, help = "warn on every runtime enum conversion")]
    warn_unsafe: bool,
}

#[derive(clap::Args, Debug, Clone)]
struct GenArgs {
    #[clap(flatten)]
    config: WithConfig,

    #[clap(short = 'o', long, help = "overrides `output-dir` from the config.")]
    output_dir: Option<PathBuf>,

    #[clap(long, help = "warn on every runtime enum conversion")]
    warn_unsafe: bool,
}

#[derive(serde::Serialize, Debug)]
struct Row<'a> {
    resource: &'a str,
    property: &'a str,
    #[serde(rename = "enum")]
    enum_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<&'a ResolutionStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn rows(outcomes: &[ResourceOutcome]) -> Vec<Row<'_>> {
    outcomes
        .iter()
        .flat_map(|resource| {
            resource.properties.iter().map(|property| {
                Row {
                    resource: resource.name.as_str(),
                    property: property.name.as_str(),
                    enum_type: property.enum_type.as_str(),
                    resolution: property.state.strategy(),
                    code: property.state.code(),
                    error: property
                        .state
                        .error()
                        .map(|e| format!("[{}] {}", e.error_code(), e.message())),
                }
            })
        })
        .collect()
}

fn write_table(
    out: &mut dyn Write,
    outcomes: &[ResourceOutcome],
) -> std::io::Result<()> {
    let lines: Vec<[String; 3]> = rows(outcomes)
        .into_iter()
        .map(|row| {
            let decision = match (row.resolution, row.code, row.error) {
                (Some(strategy), Some(code), _) => format!("{}  {code}", strategy.label()),
                (_, _, Some(error)) => format!("failed  {error}"),
                _ => "unresolved".into(),
            };
            [
                format!("{}.{}", row.resource, row.property),
                row.enum_type.to_string(),
                decision,
            ]
        })
        .collect();

    let width = |col: usize| {
        lines
            .iter()
            .map(|l| l[col].len())
            .max()
            .unwrap_or(0)
    };
    let (w0, w1) = (width(0), width(1));

    for [property, enum_type, decision] in &lines {
        writeln!(out, "{property:w0$}  {enum_type:w1$}  {decision}")?;
    }
    Ok(())
}
