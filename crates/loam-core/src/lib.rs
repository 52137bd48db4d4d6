//! # loam-core
//!
//! Schema-driven annotation of loosely-structured content trees.
//!
//! loam ingests a directory of content files (YAML, JSON, TOML, Markdown with
//! frontmatter), decides for each parsed object which declared model describes
//! its shape, and recursively annotates the object and every nested
//! object-typed value its model declares with model metadata: type, name,
//! label, and a computed site URL path for pages. Data files that match no
//! model can optionally be folded into one merged data object keyed by their
//! file-path segments.
//!
//! ## Architecture
//!
//! - **Schema**: model and field declarations, loaded from a YAML document
//! - **Selection**: per-object model matching by layout/type heuristics
//! - **Annotation**: the recursive field-dispatch walk attaching `__metadata`
//! - **Merging**: the deterministic fold of schema-less data objects
//! - **Source**: filesystem discovery and per-format parsing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use loam_core::{discover, pipeline, Diagnostics, PipelineOptions, SchemaConfig, SourceOptions};
//! use std::path::Path;
//!
//! let schema = SchemaConfig::load(Path::new("loam.yaml"))?;
//! let mut diagnostics = Diagnostics::new();
//! let objects = discover(Path::new("content"), &SourceOptions::default(), &mut diagnostics)?;
//!
//! let outcome = pipeline::run(objects, &schema.models, &PipelineOptions::default());
//! println!("{} of {} files were matched to models", outcome.matched, outcome.total);
//! # Ok::<(), loam_core::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Annotation never fails hard: shape violations, unmatched objects, and bad
//! model references become [`Diagnostic`] records carrying file, data-path and
//! schema-path context, and the offending value passes through unchanged. The
//! [`Error`] type is reserved for the I/O and schema-load boundary.

/// Recursive metadata annotation against a matched model
pub mod annotate;
/// Structured, per-run diagnostic records
pub mod diagnostics;
/// Error types and result alias
pub mod error;
/// Name lookup and page/data partition over the model list
pub mod index;
/// Dotted key-path access into content objects
pub mod keypath;
/// Folding orphan data objects into one merged tree
pub mod merge;
/// The reserved `__metadata` mapping and its keys
pub mod meta;
/// Path segmentation and URL path derivation
pub mod paths;
/// The classify/select/annotate/merge pipeline
pub mod pipeline;
/// Schema document: models, fields, loading
pub mod schema;
/// Per-object model selection
pub mod select;
/// Filesystem content discovery and parsing
pub mod source;

// Re-export commonly used types
pub use annotate::{annotate_with_model, AnnotateContext};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{Error, Result};
pub use index::SchemaIndex;
pub use merge::merge_data_objects;
pub use paths::{derive_url_path, path_segments, IndexBasename};
pub use pipeline::{Outcome, PipelineOptions};
pub use schema::{Field, FieldKind, Model, ModelType, SchemaConfig};
pub use select::{select_data_model, select_page_model, SelectError, SelectorKeys};
pub use source::{discover, SourceOptions};
