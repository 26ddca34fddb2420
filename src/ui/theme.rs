//! Visual theme and styling.

use console::Style;

/// Styles used by [`TerminalUI`](super::TerminalUI).
#[derive(Debug, Clone)]
pub struct MonodepsTheme {
    /// Success messages (green).
    pub success: Style,
    /// Warning messages (orange).
    pub warning: Style,
    /// Error messages (red bold).
    pub error: Style,
    /// Dim/secondary text.
    pub dim: Style,
    /// Headers (cyan bold).
    pub header: Style,
    /// Hints pointing at the next command.
    pub hint: Style,
    /// Key labels in key-value displays (bold).
    pub key: Style,
    /// Added lines in diffs.
    pub added: Style,
    /// Removed lines in diffs.
    pub removed: Style,
}

impl Default for MonodepsTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl MonodepsTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().cyan(),
            hint: Style::new().cyan().dim(),
            key: Style::new().bold(),
            added: Style::new().green(),
            removed: Style::new().red(),
        }
    }

    /// A theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            hint: Style::new(),
            key: Style::new(),
            added: Style::new(),
            removed: Style::new(),
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("▸ {}", title)))
    }

    pub fn format_field(&self, key: &str, value: &str) -> String {
        format!("  {} {}", self.key.apply_to(format!("{}:", key)), value)
    }

    /// Color one line of a unified diff.
    pub fn format_diff_line(&self, line: &str) -> String {
        let style = if line.starts_with('+') && !line.starts_with("+++") {
            &self.added
        } else if line.starts_with('-') && !line.starts_with("---") {
            &self.removed
        } else {
            &self.dim
        };
        format!("{}", style.apply_to(line))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors(no_color: bool) -> bool {
    if no_color || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_messages() {
        let theme = MonodepsTheme::plain();
        assert_eq!(theme.format_success("Complete"), "✓ Complete");
        assert_eq!(theme.format_warning("Caution"), "⚠ Caution");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
        assert_eq!(theme.format_header("Install"), "▸ Install");
    }

    #[test]
    fn theme_formats_field() {
        let theme = MonodepsTheme::plain();
        assert_eq!(theme.format_field("State", "installed"), "  State: installed");
    }

    #[test]
    fn plain_diff_lines_are_unchanged() {
        let theme = MonodepsTheme::plain();
        for line in ["+  \"a\": \"1\"", "-  \"b\": \"2\"", "--- expected", " context"] {
            assert_eq!(theme.format_diff_line(line), line);
        }
    }

    #[test]
    fn no_color_flag_disables_colors() {
        assert!(!should_use_colors(true));
    }
}
