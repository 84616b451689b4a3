//! Surveyor CLI - build and validate EDR survey specifications

use anyhow::Result;
use clap::Parser;

use surveyor::core::backend::BackendIdParseError;
use surveyor::core::CredentialError;
use surveyor::util::diagnostic::{emit, suggestions, Diagnostic};
use surveyor::SurveyError;

mod cli;
mod commands;
mod logging;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    logging::init(cli.verbose);

    let global = commands::GlobalArgs {
        verbose: cli.verbose,
        definitions_dir: cli.definitions_dir,
    };

    match cli.command {
        Commands::Survey(args) => commands::survey::execute(args, &global),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Backend(args) => commands::backend::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error, using the structured diagnostic when one is available.
fn report(err: &anyhow::Error, color: bool) {
    if let Some(e) = err.downcast_ref::<SurveyError>() {
        emit(&Diagnostic::from_miette(e), color);
    } else if let Some(e) = err.downcast_ref::<CredentialError>() {
        emit(&Diagnostic::from_miette(e), color);
    } else if let Some(e) = err.downcast_ref::<BackendIdParseError>() {
        emit(
            &Diagnostic::error(e.to_string()).with_help(suggestions::UNKNOWN_BACKEND),
            color,
        );
    } else {
        eprintln!("error: {:#}", err);
    }
}
