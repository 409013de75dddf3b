// crates/cli/src/main.rs
use anyhow::Context;
use clap::Parser;
use echidna_coverage_cli::args::Args;
use echidna_coverage_cli::config::Config;
use echidna_coverage_cli::presentation;
use std::process::ExitCode;

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn try_main(args: Args) -> anyhow::Result<ExitCode> {
    let config = Config::try_from(args).context("invalid arguments")?;
    let result = echidna_coverage_cli::run(&config)?;
    presentation::print_results(&result.reports, result.scope.as_ref(), &config)
        .context("failed to write report")?;

    if result.fails_threshold(&config) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match try_main(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Application Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
