//! Diagnostic reporting for binding errors
//!
//! Binding errors are collected in the order they are discovered, which
//! depends on queue order. Reports sort them by source position.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, LabelStyle, Severity};
use codespan_reporting::files::{Files, SimpleFiles};
use codespan_reporting::term;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::error::BindError;
use crate::span::Span;

/// A diagnostic message with source code context
#[derive(Debug, Clone)]
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Add a primary label (main error location)
    pub fn with_primary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::primary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    /// Add a secondary label (related location)
    pub fn with_secondary_label(mut self, file_id: usize, span: Span, message: impl Into<String>) -> Self {
        let label = Label::secondary(file_id, span.start..span.end).with_message(message);
        self.inner.labels.push(label);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    /// Create diagnostic from a BindError
    pub fn from_bind_error(error: &BindError, file_id: usize) -> Self {
        use BindError::*;

        let diag = Diagnostic::error(error.to_string());
        let span = error.span();

        match error {
            UndefinedIdentifier { .. } => diag.with_primary_label(file_id, span, "not found in this scope"),
            TypeMismatch { expected, actual, .. } => {
                diag.with_primary_label(file_id, span, format!("expected '{}', found '{}'", expected, actual))
            }
            ArityMismatch { .. } => diag.with_primary_label(file_id, span, "incorrect number of arguments"),
            BindingDeadlock { stuck, .. } => {
                let mut diag = diag.with_primary_label(file_id, span, "binding cannot make progress");
                for item in stuck {
                    diag = diag.with_note(format!("waiting on {}", item));
                }
                diag
            }
            InstantiationLimit { .. } => diag
                .with_primary_label(file_id, span, "limit crossed here")
                .with_note("raise the limit in the [bind] table of rune.toml"),
            NotCallable { .. } => diag.with_primary_label(file_id, span, "cannot be called"),
            MemberNotFound { .. } => diag.with_primary_label(file_id, span, "member not found"),
            InvalidOperator { .. } => diag.with_primary_label(file_id, span, "invalid operation"),
            NotIndexable { .. } => diag.with_primary_label(file_id, span, "invalid index"),
            ConstraintViolation { .. } => diag.with_primary_label(file_id, span, "constraint not satisfied"),
            ReturnOutsideFunction { .. } => diag.with_primary_label(file_id, span, "not inside a function"),
            NonConstantDefault { .. } => diag.with_primary_label(file_id, span, "default needed here"),
            MalformedAst { .. } => diag.with_primary_label(file_id, span, "malformed node"),
        }
    }

    /// Emit the diagnostic to stderr with colors
    pub fn emit(&self, files: &SimpleFiles<String, String>) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(ColorChoice::Auto);
        self.emit_to(&mut writer, files)
    }

    /// Emit the diagnostic to any color-capable writer
    pub fn emit_to(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// Get the underlying codespan diagnostic (for testing/custom rendering)
    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Convert to JSON representation for IDE integration
    pub fn to_json(&self, files: &SimpleFiles<String, String>) -> Result<String, serde_json::Error> {
        let json_diag = JsonDiagnostic::from_diagnostic(self, files);
        serde_json::to_string_pretty(&json_diag)
    }
}

/// JSON representation of a diagnostic for IDE integration
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    /// Severity level
    pub severity: String,
    /// Main error message
    pub message: String,
    /// Source locations with labels
    pub labels: Vec<JsonLabel>,
    /// Additional notes
    pub notes: Vec<String>,
}

/// JSON representation of a diagnostic label
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLabel {
    /// File path
    pub file: String,
    /// Start line (1-indexed)
    pub start_line: usize,
    /// Start column (1-indexed)
    pub start_column: usize,
    /// End line (1-indexed)
    pub end_line: usize,
    /// End column (1-indexed)
    pub end_column: usize,
    /// Label message
    pub message: Option<String>,
    /// Label style (primary or secondary)
    pub style: String,
}

impl JsonDiagnostic {
    pub fn from_diagnostic(diag: &Diagnostic, files: &SimpleFiles<String, String>) -> Self {
        let severity = match diag.inner.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
            Severity::Bug => "bug",
        };

        let labels = diag
            .inner
            .labels
            .iter()
            .filter_map(|label| {
                let file = files.get(label.file_id).ok()?;
                let start = file.location((), label.range.start).ok()?;
                let end = file.location((), label.range.end).ok()?;

                Some(JsonLabel {
                    file: file.name().to_string(),
                    start_line: start.line_number,
                    start_column: start.column_number,
                    end_line: end.line_number,
                    end_column: end.column_number,
                    message: Some(label.message.clone()),
                    style: match label.style {
                        LabelStyle::Primary => "primary",
                        LabelStyle::Secondary => "secondary",
                    }
                    .to_string(),
                })
            })
            .collect();

        JsonDiagnostic {
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            labels,
            notes: diag.inner.notes.clone(),
        }
    }
}

/// Errors of one binding pass, in discovery order
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<BindError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: BindError) {
        self.errors.push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &BindError> {
        self.errors.iter()
    }

    /// Errors ordered by line, column and offset; ties keep discovery order
    pub fn sorted(&self) -> Vec<&BindError> {
        let mut sorted: Vec<&BindError> = self.errors.iter().collect();
        sorted.sort_by_key(|e| e.span().position());
        sorted
    }

    /// Render every error, in source order
    pub fn to_diagnostics(&self, file_id: usize) -> Vec<Diagnostic> {
        self.sorted()
            .into_iter()
            .map(|e| Diagnostic::from_bind_error(e, file_id))
            .collect()
    }

    /// Write every error to a color-capable writer, in source order
    pub fn emit_all(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
        file_id: usize,
    ) -> Result<(), codespan_reporting::files::Error> {
        for diag in self.to_diagnostics(file_id) {
            diag.emit_to(writer, files)?;
        }
        Ok(())
    }
}

/// Helper to create a SimpleFiles instance from source code
pub fn create_files(path: impl Into<PathBuf>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(path.into().display().to_string(), source.into());
    files
}
