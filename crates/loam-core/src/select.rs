//! Model selection: deciding which declared model describes an object.
//!
//! Pages and data files match differently. A page object declares a `layout`
//! (or falls back to its file basename) compared against each page model's
//! match key; a data object declares a `type` compared against each data
//! model's name. In both cases an absent key is accepted when exactly one
//! candidate exists. Selection failure is non-fatal to the pipeline: the
//! caller records a diagnostic and passes the object through unchanged.

use crate::index::SchemaIndex;
use crate::keypath::str_at;
use crate::paths::{path_segments, IndexBasename};
use crate::schema::Model;
use serde_json::Value;
use thiserror::Error;

/// Key paths used to read match-relevant values off an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorKeys {
    /// Where to find the object's relative source file path.
    pub file_path: String,
    /// Where to find a page object's declared layout.
    pub layout: String,
    /// Where to find a data object's declared type; also used as the
    /// discriminator key for polymorphic model fields.
    pub type_field: String,
}

impl Default for SelectorKeys {
    fn default() -> Self {
        Self {
            file_path: "__metadata.relSourcePath".to_string(),
            layout: "layout".to_string(),
            type_field: "type".to_string(),
        }
    }
}

/// Why no model could be selected for an object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// The candidate partition is empty.
    #[error("no {kind} models are defined")]
    NoCandidates {
        /// `page` or `data`.
        kind: &'static str,
    },
    /// A match key was found but no candidate carries it.
    #[error("no model matched '{key}'")]
    NoMatch { key: String },
    /// More than one candidate carries the match key.
    #[error("models {models:?} all match '{key}'")]
    Ambiguous { key: String, models: Vec<String> },
    /// The object declares no match key and several candidates exist.
    #[error("object declares no match key and {count} models are candidates")]
    MissingKey { count: usize },
}

impl SelectError {
    /// Whether the failure means there was simply nothing to match against.
    #[must_use]
    pub const fn is_no_candidates(&self) -> bool {
        matches!(self, Self::NoCandidates { .. })
    }
}

/// Selects the page model describing `object`.
///
/// Match key fallback chain: the explicit layout field, then (when only one
/// page model exists) that model outright, then the file basename with its
/// extension stripped. A page model's match key is its `layout` attribute,
/// defaulting to the model name.
pub fn select_page_model<'a>(
    object: &Value,
    index: &SchemaIndex<'a>,
    keys: &SelectorKeys,
) -> Result<&'a Model, SelectError> {
    let candidates = index.page_models();
    if candidates.is_empty() {
        return Err(SelectError::NoCandidates { kind: "page" });
    }

    if let Some(layout) = str_at(object, &keys.layout) {
        return match_by_layout(candidates, layout);
    }
    if candidates.len() == 1 {
        return Ok(candidates[0]);
    }

    let Some(file_path) = str_at(object, &keys.file_path) else {
        return Err(SelectError::MissingKey {
            count: candidates.len(),
        });
    };
    match path_segments(file_path, IndexBasename::Keep).pop() {
        Some(basename) => match_by_layout(candidates, &basename),
        None => Err(SelectError::MissingKey {
            count: candidates.len(),
        }),
    }
}

/// Selects the data model describing `object` by its declared type.
///
/// A declared type that matches no data model is always a [`SelectError::NoMatch`],
/// even when no data models exist at all; [`SelectError::NoCandidates`] is
/// reserved for objects that declare no type when there is nothing to match
/// against.
pub fn select_data_model<'a>(
    object: &Value,
    index: &SchemaIndex<'a>,
    keys: &SelectorKeys,
) -> Result<&'a Model, SelectError> {
    let candidates = index.data_models();

    match str_at(object, &keys.type_field) {
        Some(declared) => {
            resolve_hits(
                candidates.iter().filter(|m| m.name == declared).copied(),
                declared,
            )
        },
        None if candidates.is_empty() => Err(SelectError::NoCandidates { kind: "data" }),
        None if candidates.len() == 1 => Ok(candidates[0]),
        None => Err(SelectError::MissingKey {
            count: candidates.len(),
        }),
    }
}

fn match_by_layout<'a>(
    candidates: &[&'a Model],
    key: &str,
) -> Result<&'a Model, SelectError> {
    resolve_hits(
        candidates
            .iter()
            .filter(|m| m.layout.as_deref().unwrap_or(&m.name) == key)
            .copied(),
        key,
    )
}

fn resolve_hits<'a>(
    hits: impl Iterator<Item = &'a Model>,
    key: &str,
) -> Result<&'a Model, SelectError> {
    let hits: Vec<&Model> = hits.collect();
    match hits.as_slice() {
        [] => Err(SelectError::NoMatch {
            key: key.to_string(),
        }),
        [only] => Ok(only),
        many => Err(SelectError::Ambiguous {
            key: key.to_string(),
            models: many.iter().map(|m| m.name.clone()).collect(),
        }),
    }
}
