//! Notification lines and key-value output

use super::context::UiContext;
use console::{style, Style};

/// Kind of notification, mirrors a toast's color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
    Info,
    Warning,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Self::Success => "[OK]",
            Self::Error => "[ERROR]",
            Self::Info => "[INFO]",
            Self::Warning => "[WARN]",
        }
    }

    fn style(self) -> Style {
        match self {
            Self::Success => Style::new().green(),
            Self::Error => Style::new().red(),
            Self::Info => Style::new().cyan(),
            Self::Warning => Style::new().yellow(),
        }
    }
}

/// Report an outcome to the user
///
/// Errors go to stderr so scripted output on stdout stays parseable.
pub fn notify(ctx: &UiContext, level: Level, message: &str) {
    if ctx.use_fancy_output() {
        let shown = match level {
            Level::Success => cliclack::log::success(message),
            Level::Error => cliclack::log::error(message),
            Level::Info => cliclack::log::info(message),
            Level::Warning => cliclack::log::warning(message),
        };
        if shown.is_ok() {
            return;
        }
    }

    let line = format!("{} {}", level.style().apply_to(level.tag()), message);
    if level == Level::Error {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

/// Bold section title
pub fn heading(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).bold());
    }
}

/// Dimmed hint line
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::log::remark(message).ok();
    } else {
        println!("  {}", style(message).dim());
    }
}

pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

/// Key-value pair colored by whether the value is the healthy one
pub fn key_value_status(ctx: &UiContext, key: &str, value: &str, ok: bool) {
    let level = if ok { Level::Success } else { Level::Warning };

    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), level.style().apply_to(value));
    } else {
        println!("  {} {}: {}", level.tag(), key, value);
    }
}
