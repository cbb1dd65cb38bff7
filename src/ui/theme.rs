//! cliclack theme

use cliclack::ThemeState;
use console::Style;

/// Green bars, red on error
#[derive(Debug, Clone, Default)]
pub struct TaskdeckTheme;

impl cliclack::Theme for TaskdeckTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().green(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().green().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Active | ThemeState::Submit => Style::new().green(),
        }
    }
}

/// Install the theme for every prompt and spinner
pub fn init_theme() {
    cliclack::set_theme(TaskdeckTheme);
}
