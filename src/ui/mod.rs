//! Terminal output for taskdeck
//!
//! Every user-facing outcome goes through [`notify`] with a [`Level`], the
//! CLI's equivalent of a toast: success, error, info or warning. Spinners
//! and prompts use `cliclack` on a TTY and fall back to plain lines in
//! pipes and CI.
//!
//! ```rust,ignore
//! use taskdeck::ui::{self, Level, TaskSpinner, UiContext};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Deleting task...");
//! // ... request ...
//! spinner.clear();
//!
//! ui::notify(&ctx, Level::Success, "Task deleted successfully!");
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{heading, key_value, key_value_status, notify, remark, Level};
pub use progress::TaskSpinner;
pub use prompts::confirm;
pub use theme::{init_theme, TaskdeckTheme};
