//! Terminal output: error lines with clickable file links.
//!
//! Everything here is a pure function of an [`EnvSnapshot`] captured once in
//! `main`, so formatting is testable without touching the process environment.

use std::path::{Path, PathBuf};

use colored::Colorize;
use tach_analysis::BoundaryError;
use tach_core::config::TagDependencyRule;

/// The environment variables link formatting depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    pub terminal_emulator: Option<String>,
    pub term_program: Option<String>,
}

impl EnvSnapshot {
    pub fn from_process() -> Self {
        Self {
            terminal_emulator: std::env::var("TERMINAL_EMULATOR").ok(),
            term_program: std::env::var("TERM_PROGRAM").ok(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEnvironment {
    Unknown,
    JetBrains,
    VsCode,
}

impl TerminalEnvironment {
    pub fn detect(env: &EnvSnapshot) -> Self {
        let contains = |value: &Option<String>, needle: &str| {
            value
                .as_deref()
                .is_some_and(|v| v.to_lowercase().contains(needle))
        };
        if contains(&env.terminal_emulator, "jetbrains") {
            Self::JetBrains
        } else if contains(&env.term_program, "vscode") {
            Self::VsCode
        } else {
            Self::Unknown
        }
    }
}

/// Formats report lines for one terminal.
#[derive(Debug, Clone)]
pub struct Reporter {
    terminal: TerminalEnvironment,
    root: PathBuf,
}

impl Reporter {
    /// `root` turns the relative paths in errors into absolute link targets.
    pub fn new(env: &EnvSnapshot, root: &Path) -> Self {
        Self {
            terminal: TerminalEnvironment::detect(env),
            root: root.to_path_buf(),
        }
    }

    /// An OSC-8 hyperlink to `file_path`. The line suffix is shown only where
    /// clicking the link jumps to that line.
    pub fn clickable_link(&self, file_path: &Path, line: Option<u32>) -> String {
        let absolute = self.root.join(file_path);
        let absolute = absolute.display();
        let target = match (self.terminal, line) {
            (TerminalEnvironment::JetBrains, Some(line)) => format!("file://{absolute}:{line}"),
            (TerminalEnvironment::VsCode, Some(line)) => format!("vscode://file/{absolute}:{line}"),
            (TerminalEnvironment::VsCode, None) => format!("vscode://file/{absolute}"),
            _ => format!("file://{absolute}"),
        };
        let display = match line {
            Some(line) if self.terminal != TerminalEnvironment::Unknown => {
                format!("{}[L{line}]", file_path.display())
            }
            _ => file_path.display().to_string(),
        };
        format!("\x1b]8;;{target}\x1b\\{display}\x1b]8;;\x1b\\")
    }

    pub fn error_line(&self, error: &BoundaryError) -> String {
        let location = self.clickable_link(&error.file_path, error.line_number);
        format!("❌ {}: {}", location.red(), error.message().yellow())
    }

    pub fn print_errors(&self, errors: &[BoundaryError]) {
        for error in errors {
            eprintln!("{}", self.error_line(error));
        }
    }
}

pub fn extra_constraints_message(constraints: &[TagDependencyRule]) -> String {
    let lines: Vec<String> = constraints
        .iter()
        .map(|rule| {
            let deps: Vec<&str> = rule.depends_on.iter().map(String::as_str).collect();
            format!("\t{}", format!("{} does not depend on: {deps:?}", rule.tag).yellow())
        })
        .collect();
    format!("❌ {}\n{}", "Found unused dependencies:".red(), lines.join("\n"))
}
