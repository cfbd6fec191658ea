use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::path::Path;
use vocabcast::app::run_batch_command;
use vocabcast::cli::Cli;
use vocabcast::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.quiet, cli.verbose);
    log::info!("vocabcast {}", vocabcast::version_string());

    let config = cli.apply_to(load_config(cli.config.as_deref())?);
    let manifest =
        run_batch_command(&config, &cli.input, &cli.output_dir, cli.quiet).await?;

    if !cli.quiet {
        println!(
            "Done: {} files in {}",
            manifest.len(),
            cli.output_dir.display()
        );
    }
    Ok(())
}

/// Log to stderr; RUST_LOG wins over the verbosity flags.
fn init_logger(quiet: bool, verbosity: u8) {
    let level = match (quiet, verbosity) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, _) => LevelFilter::Debug,
    };

    Builder::from_env(Env::default().default_filter_or(level.to_string()))
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("symphonia", LevelFilter::Warn)
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .init();
}

fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        Config::load_or_default(&Config::default_path())?
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}
