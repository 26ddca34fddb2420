//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{should_use_colors, MonodepsTheme, OutputMode, UserInterface};

/// Terminal UI: status on stdout, warnings and errors on stderr.
pub struct TerminalUI {
    term: Term,
    err: Term,
    theme: MonodepsTheme,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode, no_color: bool) -> Self {
        let theme = if should_use_colors(no_color) {
            MonodepsTheme::new()
        } else {
            MonodepsTheme::plain()
        };

        Self {
            term: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", msg).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_header(title)).ok();
        }
    }

    fn show_field(&mut self, key: &str, value: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_field(key, value)).ok();
        }
    }

    fn show_hint(&mut self, hint: &str) {
        writeln!(self.err, "  {}", self.theme.hint.apply_to(hint)).ok();
    }

    fn show_diff(&mut self, diff: &str) {
        for line in diff.lines() {
            writeln!(self.err, "    {}", self.theme.format_diff_line(line)).ok();
        }
    }

    fn output(&mut self, text: &str) {
        writeln!(self.term, "{}", text).ok();
    }
}
