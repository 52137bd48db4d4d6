//! The reserved `__metadata` mapping carried by every content object.
//!
//! The content loader seeds it with identity and provenance keys; the
//! annotator extends it with model-derived keys. It is only ever extended,
//! never replaced, so keys written by an earlier stage survive later ones.

use serde_json::{Map, Value};

/// Reserved key holding per-object metadata.
pub const METADATA_KEY: &str = "__metadata";

/// Globally unique object id, seeded by the loader.
pub const ID_KEY: &str = "id";
/// Name of the source that produced the object, e.g. `filesystem`.
pub const SOURCE_KEY: &str = "source";
/// Caller-chosen instance name for the source.
pub const SOURCE_NAME_KEY: &str = "sourceName";
/// Absolute path of the source file.
pub const SOURCE_PATH_KEY: &str = "sourcePath";
/// Path of the source file relative to the content directory.
pub const REL_SOURCE_PATH_KEY: &str = "relSourcePath";
/// Path of the source file relative to the project root.
pub const REL_PROJECT_PATH_KEY: &str = "relProjectPath";

/// Type of the matched model: `page`, `data` or `object`.
pub const MODEL_TYPE_KEY: &str = "modelType";
/// Name of the matched model.
pub const MODEL_NAME_KEY: &str = "modelName";
/// Display label of the matched model, omitted when the model has none.
pub const MODEL_LABEL_KEY: &str = "modelLabel";
/// Canonical site URL path, set on page-typed objects only.
pub const URL_PATH_KEY: &str = "urlPath";

/// Returns the object's `__metadata` mapping, if present and map-shaped.
#[must_use]
pub fn metadata(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object()?.get(METADATA_KEY)?.as_object()
}

/// Returns a string-valued metadata entry.
#[must_use]
pub fn metadata_str<'v>(value: &'v Value, key: &str) -> Option<&'v str> {
    metadata(value)?.get(key)?.as_str()
}
