//! Confirmation prompt with non-interactive fallback

use super::context::UiContext;
use crate::error::{TaskdeckError, TaskdeckResult};

/// Ask a yes/no question
///
/// `--yes` approves without asking; without a terminal the default is used.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> TaskdeckResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    let message = message.to_string();
    tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
    .map_err(|e| TaskdeckError::Internal(format!("Prompt task failed: {}", e)))?
    .map_err(|e| TaskdeckError::User(format!("Prompt failed: {}", e)))
}
