//! Structured diagnostics collected during a pipeline run.
//!
//! Every recoverable failure in the core (an object that matched no model, a
//! value with the wrong shape, a field declaration naming an unknown model)
//! becomes a [`Diagnostic`] record in a per-run [`Diagnostics`] sink. The sink
//! is passed explicitly through the call chain so the core stays a pure
//! function of its inputs; records are additionally mirrored to `tracing` so
//! they show up in normal log output.

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The object or field could not be processed and passed through unchanged.
    Error,
    /// Something looks wrong but processing continued normally.
    Warn,
    /// Informational, e.g. match traces in verbose mode.
    Info,
}

/// Which part of the contract a diagnostic violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// No model, or more than one model, matched an object.
    Match,
    /// A value did not have the shape its field declaration requires.
    Shape,
    /// A field declaration references a missing or ambiguous model.
    Schema,
    /// A source file could not be read or parsed.
    Parse,
}

/// One recoverable failure, with enough location context to act on it.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
    /// Relative path of the source file the object came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    /// Rendered location within the content tree, e.g. `sections[2].title`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,
    /// Rendered location within the schema, e.g. `loam.yaml:models.page.fields.sections`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_path: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        let mut sep = " (";
        if let Some(file) = &self.file_path {
            write!(f, "{sep}file: {file}")?;
            sep = ", ";
        }
        if let Some(data) = &self.data_path {
            write!(f, "{sep}at: {data}")?;
            sep = ", ";
        }
        if let Some(schema) = &self.schema_path {
            write!(f, "{sep}model: {schema}")?;
            sep = ", ";
        }
        if sep == ", " {
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Per-run sink for diagnostic records.
///
/// Created fresh for every pipeline invocation; no state survives across runs.
#[derive(Debug, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and mirrors it to the log.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error | Severity::Warn => warn!("{diagnostic}"),
            Severity::Info => debug!("{diagnostic}"),
        }
        self.records.push(diagnostic);
    }

    #[must_use]
    pub fn records(&self) -> &[Diagnostic] {
        &self.records
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Diagnostic> {
        self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location_context() {
        let diagnostic = Diagnostic {
            severity: Severity::Error,
            kind: DiagnosticKind::Schema,
            message: "unknown model 'hero'".into(),
            file_path: Some("content/index.md".into()),
            data_path: Some("sections[0]".into()),
            schema_path: Some("loam.yaml:models.page.fields.sections.items".into()),
        };

        let rendered = diagnostic.to_string();
        assert!(rendered.starts_with("unknown model 'hero'"));
        assert!(rendered.contains("file: content/index.md"));
        assert!(rendered.contains("at: sections[0]"));
        assert!(rendered.contains("model: loam.yaml:models.page.fields.sections.items"));
    }

    #[test]
    fn test_display_without_context_has_no_parens() {
        let diagnostic = Diagnostic {
            severity: Severity::Warn,
            kind: DiagnosticKind::Parse,
            message: "bad file".into(),
            file_path: None,
            data_path: None,
            schema_path: None,
        };
        assert_eq!(diagnostic.to_string(), "bad file");
    }
}
