//! Utilities for reporting diagnostics to the terminal.

use std::io::IsTerminal as _;
use std::sync::LazyLock;

use anyhow::Context as _;
use anyhow::anyhow;
use cfn_ast::Diagnostic;
use cfn_ast::Severity;
use clap::ValueEnum;
use codespan_reporting::files::SimpleFile;
use codespan_reporting::term::Config as TermConfig;
use codespan_reporting::term::DisplayStyle;
use codespan_reporting::term::emit_to_write_style;
use codespan_reporting::term::termcolor::ColorChoice;
use codespan_reporting::term::termcolor::StandardStream;
use serde::Deserialize;
use serde::Serialize;

/// Configuration for full display style.
static FULL_CONFIG: LazyLock<TermConfig> = LazyLock::new(|| TermConfig {
    display_style: DisplayStyle::Rich,
    ..Default::default()
});

/// Configuration for one-line display style.
static ONE_LINE_CONFIG: LazyLock<TermConfig> = LazyLock::new(|| TermConfig {
    display_style: DisplayStyle::Short,
    ..Default::default()
});

/// A counter tracking the severities of reported diagnostics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticCounts {
    /// The number of errors encountered.
    pub errors: usize,
    /// The number of warnings encountered.
    pub warnings: usize,
    /// The number of informational diagnostics encountered.
    pub information: usize,
    /// The number of hints encountered.
    pub hints: usize,
}

impl DiagnosticCounts {
    /// Counts the given diagnostics by severity.
    pub fn new<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> Self {
        let mut counts = Self::default();
        for diagnostic in diagnostics {
            match diagnostic.severity() {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Information => counts.information += 1,
                Severity::Hint => counts.hints += 1,
            }
        }

        counts
    }

    /// Returns an error if the `errors` count is 1 or more
    pub fn verify_no_errors(&self) -> Option<anyhow::Error> {
        if self.errors == 0 {
            return None;
        }

        Some(anyhow!(
            "failing due to {errors} error{s}",
            errors = self.errors,
            s = if self.errors == 1 { "" } else { "s" }
        ))
    }

    /// Returns an error if the `warnings` count is 1 or more
    pub fn verify_no_warnings(&self, user_requested: bool) -> Option<anyhow::Error> {
        if self.warnings == 0 {
            return None;
        }

        Some(anyhow!(
            "failing due to {warnings} warning{s}{cli_note}",
            warnings = self.warnings,
            s = if self.warnings == 1 { "" } else { "s" },
            cli_note = if user_requested {
                " (`--deny-warnings` was specified)"
            } else {
                ""
            },
        ))
    }
}

/// The diagnostic mode to use for reporting diagnostics.
#[derive(Clone, Copy, Debug, Default, ValueEnum, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Prints diagnostics as multiple lines.
    #[default]
    Full,

    /// Prints diagnostics as one line.
    OneLine,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Full => write!(f, "full"),
            Mode::OneLine => write!(f, "one-line"),
        }
    }
}

/// Gets the diagnostics display configuration based on the user's preferences.
pub fn get_diagnostics_display_config(
    report_mode: Mode,
    no_color: bool,
) -> (&'static TermConfig, StandardStream) {
    let config = match report_mode {
        Mode::Full => &FULL_CONFIG,
        Mode::OneLine => &ONE_LINE_CONFIG,
    };

    let color_choice = if no_color {
        ColorChoice::Never
    } else if std::io::stderr().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };

    let stream = StandardStream::stderr(color_choice);

    (config, stream)
}

/// Emits the given diagnostics to the terminal.
pub fn emit_diagnostics<'a>(
    path: &str,
    source: &str,
    diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    report_mode: Mode,
    no_color: bool,
) -> anyhow::Result<()> {
    let file = SimpleFile::new(path, source);
    let (config, mut stream) = get_diagnostics_display_config(report_mode, no_color);

    for diagnostic in diagnostics {
        emit_to_write_style(&mut stream, config, &file, &diagnostic.to_codespan(()))
            .context("failed to emit diagnostic")?;
    }

    Ok(())
}
