//! Taskdeck - task manager for the command line
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use std::process::ExitCode;
use taskdeck::cli::{commands, Cli, Commands};
use taskdeck::client::TaskClient;
use taskdeck::config::{apply_overrides, Config, ConfigManager};
use taskdeck::error::TaskdeckResult;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> TaskdeckResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = manager.load().await?;
    apply_overrides(&mut config, cli.base_url.as_deref());

    init_logging(cli.verbose, &config);
    debug!("Loaded configuration from {}", manager.path().display());

    // Commands that never touch the API or the stored session
    match cli.command {
        Commands::Config(args) => return commands::config(args, &config, &manager).await,
        Commands::Completions(args) => return commands::completions(args),
        _ => {}
    }

    taskdeck::ui::init_theme();
    let client = TaskClient::connect(&config).await?;
    let result = dispatch(cli.command, &client, &config, &manager).await;

    // State is flushed whether or not the command succeeded
    client.shutdown().await;
    result
}

async fn dispatch(
    command: Commands,
    client: &TaskClient,
    config: &Config,
    manager: &ConfigManager,
) -> TaskdeckResult<()> {
    match command {
        Commands::Signup(args) => commands::signup(args, client).await,
        Commands::Login(args) => commands::login(args, client).await,
        Commands::Logout(args) => commands::logout(args, client).await,
        Commands::ResetPassword(args) => commands::reset_password(args, client).await,
        Commands::Tasks(args) => commands::tasks(args, client).await,
        Commands::Status => commands::status(client, config, manager).await,
        Commands::Cache(args) => commands::cache(args, client).await,
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    }
}

/// 0 = warn, 1 = info, 2+ = debug; `general.verbose` counts as one level
fn init_logging(verbose: u8, config: &Config) {
    let level = verbose.max(u8::from(config.general.verbose));
    let filter = match level {
        0 => EnvFilter::new("taskdeck=warn"),
        1 => EnvFilter::new("taskdeck=info"),
        _ => EnvFilter::new("taskdeck=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
