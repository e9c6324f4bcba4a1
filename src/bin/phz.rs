use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use phz::cli::args::CliArgs;
use phz::cli::config::load_project_config;
use phz::cli::driver;
use phz::cli::reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;

fn main() -> Result<()> {
    // Supports PHZ_LOG_FORMAT=tree|json|text (see src/tracing_config.rs).
    phz::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = load_project_config(&cwd, args.project.as_deref(), args.php_version)?;
    tracing::debug!(?config, "configuration resolved");

    let output = driver::execute(&config, &args.command)?;
    if args.json {
        let json = serde_json::to_string_pretty(&output).context("failed to serialize output")?;
        println!("{json}");
    } else {
        let color = !args.no_color && std::io::stdout().is_terminal();
        print!("{}", Reporter::new(color).render(&output));
        if !output.is_success() {
            println!();
        }
    }

    if output.is_success() {
        std::process::exit(EXIT_SUCCESS);
    }
    std::process::exit(EXIT_NOT_FOUND);
}
