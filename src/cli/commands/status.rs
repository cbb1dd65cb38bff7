//! Status command - endpoint, storage and session state

use crate::client::TaskClient;
use crate::config::{Config, ConfigManager};
use crate::error::TaskdeckResult;
use crate::ui::{self, UiContext};

/// Execute the status command
pub async fn execute(client: &TaskClient, config: &Config, manager: &ConfigManager) -> TaskdeckResult<()> {
    let ctx = UiContext::detect();
    ui::heading(&ctx, "Taskdeck Status");

    let base_url = client.base_url();
    ui::key_value_status(
        &ctx,
        "API",
        if base_url.is_empty() { "not configured" } else { base_url },
        !base_url.is_empty(),
    );
    ui::key_value(&ctx, "Config", &manager.path().display().to_string());
    ui::key_value(&ctx, "Store", client.store_location());

    let signed_in = client.session().is_authenticated();
    ui::key_value_status(
        &ctx,
        "Session",
        if signed_in { "logged in" } else { "logged out" },
        signed_in,
    );

    let entries = client.cache().entries();
    let stale = entries.iter().filter(|e| e.stale).count();
    let persist = if config.cache.persist { "persisted" } else { "memory only" };
    ui::key_value(
        &ctx,
        "Cache",
        &format!("{} entries, {} stale ({})", entries.len(), stale, persist),
    );

    if base_url.is_empty() {
        ui::remark(&ctx, "Set the API with: taskdeck config set api.base_url <url>");
    } else if !signed_in {
        ui::remark(&ctx, "Sign in with: taskdeck login");
    }

    Ok(())
}
