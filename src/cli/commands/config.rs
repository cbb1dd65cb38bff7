//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{check_root_key, Config, ConfigManager};
use crate::error::{TaskdeckError, TaskdeckResult};
use crate::ui::{self, Level, UiContext};
use std::path::PathBuf;

/// Keys accepted by `config set`
const KEYS: [&str; 7] = [
    "general.verbose",
    "general.log_format",
    "api.base_url",
    "api.timeout_secs",
    "storage.root_key",
    "storage.dir",
    "cache.persist",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> TaskdeckResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => set_value(manager, &key, &value).await?,
    }

    Ok(())
}

fn show_config(config: &Config) -> TaskdeckResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> TaskdeckResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::notify(
            &ctx,
            Level::Warning,
            &format!("Config already exists at {}", path.display()),
        );
        ui::remark(&ctx, "Use --force to overwrite");
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::notify(
        &ctx,
        Level::Success,
        &format!("Configuration initialized ({})", path.display()),
    );
    Ok(())
}

/// Writes to the file as loaded, without command-line overrides
async fn set_value(manager: &ConfigManager, key: &str, value: &str) -> TaskdeckResult<()> {
    let ctx = UiContext::detect();
    let mut config = manager.load().await?;

    if let Err(e) = apply_key(&mut config, key, value) {
        ui::notify(&ctx, Level::Error, &e.to_string());
        ui::remark(&ctx, "Valid keys:");
        for key in KEYS {
            eprintln!("  {}", key);
        }
        return Err(e);
    }

    manager.save(&config).await?;
    ui::notify(&ctx, Level::Success, &format!("Set {} = {}", key, value));
    Ok(())
}

fn apply_key(config: &mut Config, key: &str, value: &str) -> TaskdeckResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => config.general.verbose = parse_bool(value)?,
        ["general", "log_format"] => {
            if !matches!(value, "text" | "json") {
                return Err(TaskdeckError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )));
            }
            config.general.log_format = value.to_string();
        }

        ["api", "base_url"] => config.api.base_url = value.trim().to_string(),
        ["api", "timeout_secs"] => config.api.timeout_secs = parse_optional_u64(value)?,

        ["storage", "root_key"] => {
            let root = value.trim();
            check_root_key(root).map_err(TaskdeckError::User)?;
            config.storage.root_key = root.to_string();
        }
        ["storage", "dir"] => {
            config.storage.dir = (!value.is_empty()).then(|| PathBuf::from(value));
        }

        ["cache", "persist"] => config.cache.persist = parse_bool(value)?,

        _ => return Err(TaskdeckError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_bool(value: &str) -> TaskdeckResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(TaskdeckError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

/// Empty string clears the value
fn parse_optional_u64(value: &str) -> TaskdeckResult<Option<u64>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| TaskdeckError::User(format!("Invalid number: {}", value)))
}
