//! Interactive vs. plain output detection

use std::io::IsTerminal;

/// CI systems that do not set `CI` themselves
const CI_MARKERS: [&str; 5] = ["GITHUB_ACTIONS", "GITLAB_CI", "BUILDKITE", "JENKINS_URL", "TF_BUILD"];

/// How the current invocation may talk to the user
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Both stdin and stdout are terminals and no CI marker is set
    interactive: bool,
    /// `--yes` was given: confirmations are approved without asking
    auto_yes: bool,
}

impl UiContext {
    pub fn detect() -> Self {
        Self {
            interactive: Self::terminal_attached() && !Self::in_ci(),
            auto_yes: false,
        }
    }

    /// Plain output, no prompts
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            auto_yes: false,
        }
    }

    pub fn with_auto_yes(mut self, yes: bool) -> Self {
        self.auto_yes = yes;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn auto_yes(&self) -> bool {
        self.auto_yes
    }

    /// Spinners, clack bars and colors
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    fn terminal_attached() -> bool {
        std::io::stdout().is_terminal() && std::io::stdin().is_terminal()
    }

    fn in_ci() -> bool {
        std::env::var_os("CI").is_some()
            || std::env::var("TERM").is_ok_and(|term| term == "dumb")
            || CI_MARKERS.iter().any(|var| std::env::var_os(var).is_some())
    }
}
