use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};
use theos_setup_core::ErrorCode;
use theos_setup_installer::{Reporter, StatusKind};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn output_style(plain: bool, no_color: bool, stdout_is_terminal: bool) -> OutputStyle {
    if plain || no_color || !stdout_is_terminal {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

pub(crate) struct TerminalRenderer {
    style: OutputStyle,
    spinner: Option<ProgressBar>,
}

impl TerminalRenderer {
    pub(crate) fn new(style: OutputStyle) -> Self {
        Self {
            style,
            spinner: None,
        }
    }

    fn print_line(&self, line: &str) {
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    pub(crate) fn print_failure(&mut self, err: &anyhow::Error, exit_code: i32) {
        self.clear_spinner();
        for line in render_failure_lines(self.style, err, exit_code) {
            eprintln!("{line}");
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Reporter for TerminalRenderer {
    fn section(&mut self, title: &str) {
        if let Some(line) = render_section_header(self.style, title) {
            self.print_line("");
            self.print_line(&colorize(section_style(), &line));
        }
    }

    fn status(&mut self, kind: StatusKind, message: &str) {
        let line = render_status_line(self.style, kind.as_str(), message);
        self.print_line(&line);
    }

    fn begin_activity(&mut self, label: &str) {
        self.clear_spinner();
        if self.style != OutputStyle::Rich {
            return;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg} {elapsed}") {
            spinner.set_style(style.tick_chars("|/-\\ "));
        }
        spinner.set_message(label.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    fn end_activity(&mut self) {
        self.clear_spinner();
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => message.to_string(),
        OutputStyle::Rich => format!("{} {message}", status_badge(status)),
    }
}

fn status_badge(status: &str) -> String {
    match status {
        "ok" => "[OK]".to_string(),
        ".." => "[..]".to_string(),
        "warn" => "[WARN]".to_string(),
        "err" => "[ERR]".to_string(),
        "note" => "[NOTE]".to_string(),
        other => format!("[{}]", other.to_ascii_uppercase()),
    }
}

pub(crate) fn render_failure_lines(
    style: OutputStyle,
    err: &anyhow::Error,
    exit_code: i32,
) -> Vec<String> {
    let category = ErrorCode::ALL
        .into_iter()
        .find(|code| code.exit_code() == exit_code)
        .map(|code| format!(" ({code})"))
        .unwrap_or_default();
    let message = match style {
        OutputStyle::Plain => format!("error: {err:#}"),
        OutputStyle::Rich => render_status_line(style, "err", &format!("{err:#}")),
    };
    vec![message, format!("exit code {exit_code}{category}")]
}

fn render_section_header(style: OutputStyle, title: &str) -> Option<String> {
    match style {
        OutputStyle::Plain => None,
        OutputStyle::Rich => Some(format!("== {title} ==")),
    }
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
