//! minimize-codebase CLI entry point

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use minimize_codebase::config::MinimizeConfig;
use minimize_codebase::minimizer::{Minimizer, MinimizerOptions, RunOutcome};
use minimize_codebase::report::{render_json, render_text};
use minimize_codebase::{Cli, OutputFormat};

fn main() -> ExitCode {
    match run() {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

fn run() -> minimize_codebase::Result<String> {
    let cli = Cli::parse_args();

    let mut config = MinimizeConfig::load_from(&cli.config_path())?;
    cli.apply(&mut config);
    config.validate()?;
    init_logging(&config.logging.level);

    let minimizer = Minimizer::new(MinimizerOptions {
        original: cli.original.clone(),
        destination: cli.destination.clone(),
        config,
        harvest: cli.harvest,
        profile_patterns: cli.profile_patterns,
    });
    match minimizer.run() {
        Ok(outcome) => render(cli.format, &outcome),
        Err(e) => {
            // What an aborted run found before stopping is still printed.
            if let Some(partial) = e.outcome() {
                print!("{}", render(cli.format, partial)?);
            }
            Err(e)
        }
    }
}

fn render(format: OutputFormat, outcome: &RunOutcome) -> minimize_codebase::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(outcome)),
        OutputFormat::Json => render_json(outcome).map(|json| json + "\n"),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("minimize_codebase={}", level)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
