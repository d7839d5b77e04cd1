//! CLI theme and styling.

use console::style;

/// Status-line formatting shared by every command.
pub struct Theme;

impl Theme {
    pub fn header(text: &str) -> String {
        style(text).bold().cyan().to_string()
    }

    pub fn success(text: &str) -> String {
        format!("{} {}", style("✓").green(), text)
    }

    pub fn error(text: &str) -> String {
        format!("{} {}", style("✗").red(), style(text).red())
    }

    pub fn warning(text: &str) -> String {
        format!("{} {}", style("!").yellow(), style(text).yellow())
    }

    pub fn info(text: &str) -> String {
        format!("{} {}", style("i").blue(), text)
    }

    pub fn dimmed(text: &str) -> String {
        style(text).dim().to_string()
    }

    pub fn highlight(text: &str) -> String {
        style(text).bold().to_string()
    }
}
