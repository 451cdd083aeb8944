#![allow(clippy::result_large_err)]

use clap::Parser;
use enumgen_cli::cli::Cli;
use human_panic::{Metadata, setup_panic};
use miette::GraphicalReportHandler;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    miette::set_hook(Box::new(|_| {
        Box::new(
            GraphicalReportHandler::new()
                .with_theme(miette::GraphicalTheme::unicode())
                .with_context_lines(3),
        )
    }))
    .ok();

    setup_panic!(
        Metadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            .support(
                "Please open an issue on github. Attach the outputs of the above referenced report file."
            ).authors(env!("CARGO_PKG_AUTHORS"))
    );

    let cli = Cli::parse();

    let log_level: tracing::Level = cli.log_level.clone().into();

    if let Err(err) = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false),
        )
        .with(LevelFilter::from_level(log_level))
        .try_init()
    {
        eprintln!("unable to initialize logging: {err}");
    }

    let mut stdout = std::io::stdout().lock();
    match cli.run(&mut stdout) {
        Ok(diagnostics) => {
            for diagnostic in diagnostics.iter() {
                eprintln!("{:?}", diagnostic.error.to_report());
            }
            if diagnostics.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        },
        Err(e) => {
            let compiler_error: enumgen_errors::CompilerError = e.into();
            eprintln!("{:?}", compiler_error.to_report());
            ExitCode::FAILURE
        },
    }
}
