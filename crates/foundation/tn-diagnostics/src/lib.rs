//! Diagnostics sink shared by the analysis passes
//!
//! Passes append errors and warnings as they find them and never abort on
//! their own account. Whether a compilation should continue is decided by the
//! caller after the pass returns, by looking at [`Diagnostics::error_count`]
//! and [`Diagnostics::warning_count`].
//!
//! Typed pass errors implement [`miette::Diagnostic`]; [`Diagnostics::report`]
//! flattens them into a [`Diagnostic`] record, keeping the code, severity and
//! help text. Records can be converted to `codespan-reporting` diagnostics for
//! rustc-style terminal output.

pub use codespan_reporting;

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use std::{fmt, slice};
use tn_span::FileSpan;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Counts against the compilation
    Error,
    /// Informational, never blocks later phases
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("error"),
            Self::Warning => f.write_str("warning"),
        }
    }
}

impl From<miette::Severity> for Severity {
    fn from(severity: miette::Severity) -> Self {
        match severity {
            miette::Severity::Error => Self::Error,
            miette::Severity::Warning | miette::Severity::Advice => Self::Warning,
        }
    }
}

/// A single recorded problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Error or warning
    pub severity: Severity,
    /// Stable code such as `resolve::conflict`
    pub code: Option<String>,
    /// Primary message
    pub message: String,
    /// Where the problem was found, if it has a source location
    pub span: Option<FileSpan>,
    /// Additional help lines
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    /// Attach a stable diagnostic code
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach a source location
    #[must_use]
    pub fn with_span(mut self, span: Option<FileSpan>) -> Self {
        self.span = span;
        self
    }

    /// Append a help line
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Flatten a typed error into a record
    ///
    /// A report without an explicit severity is treated as an error.
    pub fn from_report(report: &dyn miette::Diagnostic, span: Option<FileSpan>) -> Self {
        let severity = report.severity().map_or(Severity::Error, Severity::from);
        let mut diagnostic = Self::new(severity, report.to_string()).with_span(span);
        if let Some(code) = report.code() {
            diagnostic.code = Some(code.to_string());
        }
        if let Some(help) = report.help() {
            diagnostic.notes.push(help.to_string());
        }
        diagnostic
    }

    /// Convert to codespan diagnostic for rustc-style output
    ///
    /// The codespan file id is the numeric value of the span's `FileId`.
    pub fn to_codespan_diagnostic(&self) -> CodespanDiagnostic<usize> {
        let mut diag = match self.severity {
            Severity::Error => CodespanDiagnostic::error(),
            Severity::Warning => CodespanDiagnostic::warning(),
        }
        .with_message(self.message.clone());

        if let Some(code) = &self.code {
            diag = diag.with_code(code.clone());
        }
        if let Some(span) = self.span {
            diag = diag.with_labels(vec![Label::primary(span.file.0 as usize, span.range())]);
        }
        if !self.notes.is_empty() {
            diag = diag.with_notes(self.notes.clone());
        }
        diag
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = &self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

/// Append-only log of diagnostics for one compilation run
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    error_count: usize,
    warning_count: usize,
}

impl Diagnostics {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
        }
        self.entries.push(diagnostic);
    }

    /// Record a typed pass error or warning
    pub fn report(&mut self, report: &dyn miette::Diagnostic, span: Option<FileSpan>) {
        self.push(Diagnostic::from_report(report, span));
    }

    /// Number of errors recorded so far
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Number of warnings recorded so far
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Whether any error was recorded
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Total number of diagnostics
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All diagnostics in the order they were recorded
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Errors only, in recording order
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Error)
    }

    /// Warnings only, in recording order
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries
            .iter()
            .filter(|diagnostic| diagnostic.severity == Severity::Warning)
    }

    /// Convert every record for rendering with `codespan-reporting`
    pub fn to_codespan_diagnostics(&self) -> Vec<CodespanDiagnostic<usize>> {
        self.entries
            .iter()
            .map(Diagnostic::to_codespan_diagnostic)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
