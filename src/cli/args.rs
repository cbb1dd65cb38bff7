//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Taskdeck - task manager for the command line
///
/// Signs in to a task REST API, caches what it reads and keeps the
/// session between runs.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TASKDECK_CONFIG")]
    pub config: Option<PathBuf>,

    /// API base URL (overrides api.base_url)
    #[arg(long, global = true, env = "TASKDECK_BASE_URL")]
    pub base_url: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Signup(SignupArgs),

    /// Sign in and keep the session
    Login(LoginArgs),

    /// Forget the stored session
    Logout(LogoutArgs),

    /// Change the account password (signs out)
    ResetPassword(ResetPasswordArgs),

    /// List, show, add, edit or remove tasks
    Tasks(TasksArgs),

    /// Show endpoint, storage and session state
    Status,

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Inspect or clear the persisted query cache
    Cache(CacheArgs),

    /// Print shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the signup command
#[derive(Parser, Debug)]
pub struct SignupArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Password (at least 8 characters)
    #[arg(short, long)]
    pub password: String,
}

/// Arguments for the login command
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Password
    #[arg(short, long)]
    pub password: String,
}

/// Arguments for the logout command
#[derive(Parser, Debug)]
pub struct LogoutArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the reset-password command
#[derive(Parser, Debug)]
pub struct ResetPasswordArgs {
    /// Current password
    #[arg(long)]
    pub current: String,

    /// New password
    #[arg(long = "new")]
    pub new_password: String,

    /// Repeat the new password
    #[arg(long)]
    pub confirm: Option<String>,
}

/// Arguments for the tasks command
#[derive(Parser, Debug)]
pub struct TasksArgs {
    /// Subcommand for tasks
    #[command(subcommand)]
    pub action: TaskAction,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// List all tasks
    #[command(visible_alias = "ls")]
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,

        /// Fetch from the server even if the cached list is fresh
        #[arg(short, long)]
        refresh: bool,
    },

    /// Show one task
    Show {
        /// Task ID
        id: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Create a task
    Add {
        /// Task title
        #[arg(short, long)]
        title: String,

        /// Task description
        #[arg(short, long)]
        description: String,
    },

    /// Update a task; omitted fields keep their current value
    Edit {
        /// Task ID
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Task ID
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., api.base_url)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for task and cache listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List persisted cache entries
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Drop every cached entry (the session is kept)
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the completions command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_login() {
        let cli = Cli::parse_from(["taskdeck", "login", "-e", "a@b.com", "-p", "12345678"]);
        match cli.command {
            Commands::Login(args) => {
                assert_eq!(args.email, "a@b.com");
                assert_eq!(args.password, "12345678");
            }
            _ => panic!("expected Login command"),
        }
    }

    #[test]
    fn cli_parses_status() {
        let cli = Cli::parse_from(["taskdeck", "status"]);
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn cli_parses_reset_password() {
        let cli = Cli::parse_from([
            "taskdeck",
            "reset-password",
            "--current",
            "old-password",
            "--new",
            "new-password",
        ]);
        match cli.command {
            Commands::ResetPassword(args) => {
                assert_eq!(args.current, "old-password");
                assert_eq!(args.new_password, "new-password");
                assert!(args.confirm.is_none());
            }
            _ => panic!("expected ResetPassword command"),
        }
    }

    #[test]
    fn cli_parses_tasks_list_default_format() {
        let cli = Cli::parse_from(["taskdeck", "tasks", "list"]);
        match cli.command {
            Commands::Tasks(TasksArgs {
                action: TaskAction::List { format, refresh },
            }) => {
                assert_eq!(format, OutputFormat::Table);
                assert!(!refresh);
            }
            _ => panic!("expected tasks list"),
        }
    }

    #[test]
    fn cli_parses_tasks_ls_alias() {
        let cli = Cli::parse_from(["taskdeck", "tasks", "ls", "--format", "json", "--refresh"]);
        match cli.command {
            Commands::Tasks(TasksArgs {
                action: TaskAction::List { format, refresh },
            }) => {
                assert_eq!(format, OutputFormat::Json);
                assert!(refresh);
            }
            _ => panic!("expected tasks list"),
        }
    }

    #[test]
    fn cli_parses_tasks_edit_partial() {
        let cli = Cli::parse_from(["taskdeck", "tasks", "edit", "42", "--title", "New"]);
        match cli.command {
            Commands::Tasks(TasksArgs {
                action: TaskAction::Edit { id, title, description },
            }) => {
                assert_eq!(id, "42");
                assert_eq!(title.as_deref(), Some("New"));
                assert!(description.is_none());
            }
            _ => panic!("expected tasks edit"),
        }
    }

    #[test]
    fn cli_parses_tasks_rm_yes() {
        let cli = Cli::parse_from(["taskdeck", "tasks", "rm", "42", "-y"]);
        match cli.command {
            Commands::Tasks(TasksArgs {
                action: TaskAction::Rm { id, yes },
            }) => {
                assert_eq!(id, "42");
                assert!(yes);
            }
            _ => panic!("expected tasks rm"),
        }
    }

    #[test]
    fn cli_parses_global_base_url() {
        let cli = Cli::parse_from(["taskdeck", "status", "--base-url", "http://localhost:3000"]);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["taskdeck", "config", "set", "api.base_url", "http://x"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: Some(ConfigAction::Set { key, value }),
            }) => {
                assert_eq!(key, "api.base_url");
                assert_eq!(value, "http://x");
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn cli_parses_completions() {
        let cli = Cli::parse_from(["taskdeck", "completions", "bash"]);
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, Shell::Bash),
            _ => panic!("expected Completions command"),
        }
    }

    #[test]
    fn cli_requires_signup_fields() {
        assert!(Cli::try_parse_from(["taskdeck", "signup", "--name", "Ada"]).is_err());
    }

    #[test]
    fn cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
