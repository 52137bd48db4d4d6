//! Schema document: models, fields, and loading.
//!
//! A schema document is a YAML file declaring named models, each describing
//! the shape of one kind of content object:
//!
//! ```yaml
//! pagesDir: content/pages
//! dataDir: content/data
//! models:
//!   page:
//!     type: page
//!     label: Page
//!     layout: page
//!     fields:
//!       - name: title
//!         type: string
//!       - name: sections
//!         type: list
//!         items:
//!           type: model
//!           models: [hero, cta]
//! ```
//!
//! Field declarations are parsed into the closed [`FieldKind`] variant so the
//! annotator can dispatch exhaustively instead of probing for attributes.
//! Unknown field types are carried opaquely as [`FieldKind::Scalar`] and pass
//! values through unchanged.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The three kinds of model a schema can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    /// Matches one source file that renders as a site page.
    Page,
    /// Matches one structured data file.
    Data,
    /// A nested shape, only reachable through fields of other models.
    Object,
}

impl ModelType {
    /// The lowercase wire name written into `__metadata.modelType`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Data => "data",
            Self::Object => "object",
        }
    }
}

/// One named content shape declared by the schema.
///
/// Immutable once loaded; a schema reload produces a fresh model list.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub model_type: ModelType,
    /// Optional display name, surfaced as `__metadata.modelLabel`.
    pub label: Option<String>,
    /// Match key for page models. Defaults to the model name when absent.
    pub layout: Option<String>,
    pub fields: Vec<Field>,
}

/// One named, typed attribute declaration within a model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawField")]
pub struct Field {
    pub name: String,
    pub label: Option<String>,
    pub kind: FieldKind,
}

/// Closed set of field types the annotator dispatches over.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Any scalar type (`string`, `number`, `markdown`, ...); passed through
    /// opaquely, the original type name retained for introspection.
    Scalar(String),
    /// An inline nested shape with its own field declarations.
    Object { fields: Vec<Field> },
    /// A polymorphic union over the named models, discriminated at runtime
    /// by the value's `type` property when more than one model is allowed.
    Model { models: Vec<String> },
    /// A reference to another object. Normally resolved elsewhere in the
    /// pipeline; inline expanded data is annotated for backward compatibility.
    Reference { models: Vec<String> },
    /// A sequence whose items share one declaration.
    List { items: Box<FieldKind> },
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(rename = "type")]
    field_type: String,
    label: Option<String>,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    models: Vec<String>,
    items: Option<RawItems>,
}

#[derive(Debug, Deserialize)]
struct RawItems {
    #[serde(rename = "type")]
    field_type: Option<String>,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    models: Vec<String>,
}

impl From<RawField> for Field {
    fn from(raw: RawField) -> Self {
        Self {
            name: raw.name,
            label: raw.label,
            kind: field_kind(&raw.field_type, raw.fields, raw.models, raw.items),
        }
    }
}

fn field_kind(
    field_type: &str,
    fields: Vec<Field>,
    models: Vec<String>,
    items: Option<RawItems>,
) -> FieldKind {
    match field_type {
        "object" => FieldKind::Object { fields },
        "model" => FieldKind::Model { models },
        "reference" => FieldKind::Reference { models },
        "list" => {
            // Item declaration defaults to a plain string scalar.
            let items = items.map_or(FieldKind::Scalar("string".to_string()), |raw| {
                field_kind(
                    raw.field_type.as_deref().unwrap_or("string"),
                    raw.fields,
                    raw.models,
                    None,
                )
            });
            FieldKind::List {
                items: Box::new(items),
            }
        },
        other => FieldKind::Scalar(other.to_string()),
    }
}

/// The loaded schema document: the model list plus content-layout hints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaConfig {
    pub models: Vec<Model>,
    /// Directory whose files are classified as pages.
    pub pages_dir: Option<String>,
    /// Directory whose files are classified as data.
    pub data_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(default)]
    models: BTreeMap<String, RawModel>,
    #[serde(rename = "pagesDir")]
    pages_dir: Option<String>,
    #[serde(rename = "dataDir")]
    data_dir: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    #[serde(rename = "type")]
    model_type: ModelType,
    label: Option<String>,
    layout: Option<String>,
    #[serde(default)]
    fields: Vec<Field>,
}

impl SchemaConfig {
    /// Loads the schema document from `path`.
    ///
    /// A missing file is not an error: it yields an empty schema and the
    /// pipeline runs in pass-through mode. A present but malformed file is
    /// rejected with [`Error::Schema`].
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::from_yaml(&text)
            .map_err(|e| Error::Schema(format!("{}: {e}", path.display())))
    }

    /// Parses a schema document from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let raw: RawSchema =
            serde_yaml::from_str(text).map_err(|e| Error::Schema(e.to_string()))?;
        let models = raw
            .models
            .into_iter()
            .map(|(name, spec)| Model {
                name,
                model_type: spec.model_type,
                label: spec.label,
                layout: spec.layout,
                fields: spec.fields,
            })
            .collect();
        Ok(Self {
            models,
            pages_dir: raw.pages_dir,
            data_dir: raw.data_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r"
pagesDir: content/pages
models:
  page:
    type: page
    label: Page
    layout: page
    fields:
      - name: title
        type: string
      - name: hero
        type: model
        models: [hero]
      - name: sections
        type: list
        items:
          type: model
          models: [hero, cta]
      - name: tags
        type: list
  hero:
    type: object
    label: Hero
    fields:
      - name: heading
        type: string
      - name: body
        type: markdown
";

    #[test]
    fn test_models_are_loaded_with_names() {
        let schema = SchemaConfig::from_yaml(SCHEMA).expect("schema should parse");
        assert_eq!(schema.models.len(), 2);
        assert_eq!(schema.pages_dir.as_deref(), Some("content/pages"));

        let hero = schema.models.iter().find(|m| m.name == "hero").unwrap();
        assert_eq!(hero.model_type, ModelType::Object);
        assert_eq!(hero.label.as_deref(), Some("Hero"));
    }

    #[test]
    fn test_field_kinds_are_tagged() {
        let schema = SchemaConfig::from_yaml(SCHEMA).expect("schema should parse");
        let page = schema.models.iter().find(|m| m.name == "page").unwrap();

        assert_eq!(page.fields[0].kind, FieldKind::Scalar("string".into()));
        assert_eq!(
            page.fields[1].kind,
            FieldKind::Model {
                models: vec!["hero".into()]
            }
        );
        match &page.fields[2].kind {
            FieldKind::List { items } => match items.as_ref() {
                FieldKind::Model { models } => {
                    assert_eq!(models, &["hero".to_string(), "cta".to_string()]);
                },
                other => panic!("expected model items, got {other:?}"),
            },
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_list_items_default_to_string_scalar() {
        let schema = SchemaConfig::from_yaml(SCHEMA).expect("schema should parse");
        let page = schema.models.iter().find(|m| m.name == "page").unwrap();
        assert_eq!(
            page.fields[3].kind,
            FieldKind::List {
                items: Box::new(FieldKind::Scalar("string".into()))
            }
        );
    }

    #[test]
    fn test_unknown_scalar_types_are_opaque() {
        let schema = SchemaConfig::from_yaml(SCHEMA).expect("schema should parse");
        let hero = schema.models.iter().find(|m| m.name == "hero").unwrap();
        assert_eq!(hero.fields[1].kind, FieldKind::Scalar("markdown".into()));
    }

    #[test]
    fn test_empty_document_yields_no_models() {
        let schema = SchemaConfig::from_yaml("{}").expect("empty schema should parse");
        assert!(schema.models.is_empty());
    }

    #[test]
    fn test_malformed_document_is_a_schema_error() {
        let result = SchemaConfig::from_yaml("models: [not, a, mapping]");
        assert!(matches!(result, Err(Error::Schema(_))));
    }

    #[test]
    fn test_missing_file_loads_as_empty() {
        let schema = SchemaConfig::load(Path::new("/nonexistent/loam.yaml"))
            .expect("missing file should not error");
        assert!(schema.models.is_empty());
    }
}
