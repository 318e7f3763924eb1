use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use hashtool::cli::{Cli, Commands};
use hashtool::commands::{self, EXIT_FATAL, EXIT_SUCCESS, EXIT_VERIFY_FAILED};
use hashtool::output::{self, Verbosity};
use hashtool::{HashtoolContext, LOG_ENV};
use std::io;
use std::process;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    init_tracing();
    output::set_verbosity(Verbosity::from_flags(cli.verbose, cli.debug, cli.quiet));

    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::fatal(&format!("{e:#}"));
            EXIT_FATAL
        }
    };
    process::exit(code);
}

/// Diagnostics for developers, silent unless `HASHTOOL_LOG` asks for them.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off")))
        .init();
}

fn run(cli: Cli) -> Result<i32> {
    if let Commands::Completion { shell } = cli.command {
        print_completions(shell, &mut Cli::command());
        return Ok(EXIT_SUCCESS);
    }

    let ctx = HashtoolContext::new()?;
    if !ctx.config.output.color {
        output::set_color(false);
    }

    match cli.command {
        Commands::Generate(args) => {
            commands::generate::execute(&ctx, &args)?;
            Ok(EXIT_SUCCESS)
        }
        Commands::Verify(args) => {
            let report = commands::verify::execute(&ctx, &args)?;
            Ok(if report.is_ok() {
                EXIT_SUCCESS
            } else {
                EXIT_VERIFY_FAILED
            })
        }
        Commands::Unchecked(args) => {
            commands::unchecked::execute(&ctx, &args)?;
            Ok(EXIT_SUCCESS)
        }
        Commands::Completion { .. } => Ok(EXIT_SUCCESS),
    }
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

