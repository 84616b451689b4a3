//! Operator-facing error rendering.
//!
//! Errors from the library derive [`miette::Diagnostic`] so they carry a
//! stable code and a help line. The CLI turns them into a [`Diagnostic`]
//! and prints it rustc-style:
//!
//! ```text
//! error[surveyor::survey::time_window]: --days and --minutes are mutually exclusive
//!   = note: ...
//!   = help: ...
//! ```

use std::fmt::{self, Write};

use miette::Diagnostic as MietteDiagnostic;

/// Help lines shared between commands.
pub mod suggestions {
    pub const UNKNOWN_BACKEND: &str = "run `surveyor backend list` to see supported EDRs";

    pub const CHECK_CREDENTIALS: &str =
        "run `surveyor check <EDR>` with your credential flags to see what is missing";
}

/// An error ready to be printed.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    /// e.g. `surveyor::survey::time_window`
    pub code: Option<String>,
    /// Underlying causes, outermost first
    pub notes: Vec<String>,
    pub help: Vec<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            code: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Build a diagnostic from an error carrying miette metadata.
    ///
    /// The source chain becomes notes and the error's help becomes a help
    /// line.
    pub fn from_miette(err: &dyn MietteDiagnostic) -> Self {
        let mut diag = Diagnostic::error(err.to_string());
        diag.code = err.code().map(|code| code.to_string());

        let mut source = err.source();
        while let Some(cause) = source {
            diag = diag.with_note(cause.to_string());
            source = cause.source();
        }

        if let Some(help) = err.help() {
            diag = diag.with_help(help.to_string());
        }

        diag
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// Render for the terminal, with ANSI colors when `color` is set.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();

        if color {
            out.push_str("\x1b[1;31merror\x1b[0m");
        } else {
            out.push_str("error");
        }
        if let Some(code) = &self.code {
            write!(out, "[{}]", code).unwrap();
        }
        writeln!(out, ": {}", self.message).unwrap();

        for note in &self.notes {
            writeln!(out, "  = note: {}", note).unwrap();
        }
        for help in &self.help {
            writeln!(out, "  = help: {}", help).unwrap();
        }

        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.render(color));
}
