//! Recursive metadata annotation of content objects against a model.
//!
//! Given an object and its matched model, annotation walks the object's
//! fields per the model's declarations and produces an annotated copy:
//! every object-typed node (the object itself, nested `object` shapes,
//! resolved polymorphic `model` members, inline-expanded `reference`s, and
//! any of those inside `list`s) gets a `__metadata` mapping describing the
//! shape that matched it. Fields present on the object but undeclared on the
//! model pass through untouched; the schema is permissive, not closed.
//!
//! Nothing here aborts: shape and schema violations become diagnostics and
//! the offending value is returned unmodified at the point of failure.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
use crate::index::SchemaIndex;
use crate::meta::{
    METADATA_KEY, MODEL_LABEL_KEY, MODEL_NAME_KEY, MODEL_TYPE_KEY, URL_PATH_KEY,
};
use crate::paths::derive_url_path;
use crate::schema::{Field, FieldKind, Model, ModelType};
use serde_json::{Map, Value};
use std::fmt::Write as _;

/// One step in the data-path used for diagnostics.
#[derive(Debug, Clone)]
enum PathSegment {
    Key(String),
    Index(usize),
}

/// Call context threaded through one object's annotation.
///
/// Tracks the current location in both the content tree (keys and indices)
/// and the schema (model and field names) so every diagnostic can say exactly
/// where it happened, plus the schema index for resolving polymorphic fields.
pub struct AnnotateContext<'a> {
    index: &'a SchemaIndex<'a>,
    /// Display label of the schema document, e.g. `loam.yaml`.
    schema_label: &'a str,
    /// Discriminator key for polymorphic model values, usually `type`.
    type_key: &'a str,
    /// Relative source path of the object being annotated, when known.
    file_path: Option<String>,
    data_path: Vec<PathSegment>,
    schema_path: Vec<String>,
}

impl<'a> AnnotateContext<'a> {
    #[must_use]
    pub fn new(
        index: &'a SchemaIndex<'a>,
        schema_label: &'a str,
        type_key: &'a str,
        file_path: Option<String>,
    ) -> Self {
        Self {
            index,
            schema_label,
            type_key,
            file_path,
            data_path: Vec::new(),
            schema_path: Vec::new(),
        }
    }

    fn render_data_path(&self) -> Option<String> {
        if self.data_path.is_empty() {
            return None;
        }
        let mut rendered = String::new();
        for segment in &self.data_path {
            match segment {
                PathSegment::Key(key) => {
                    if !rendered.is_empty() {
                        rendered.push('.');
                    }
                    rendered.push_str(key);
                },
                PathSegment::Index(i) => {
                    let _ = write!(rendered, "[{i}]");
                },
            }
        }
        Some(rendered)
    }

    fn render_schema_path(&self) -> Option<String> {
        if self.schema_path.is_empty() {
            return None;
        }
        Some(format!("{}:{}", self.schema_label, self.schema_path.join(".")))
    }

    fn diagnostic(&self, kind: DiagnosticKind, message: String) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            kind,
            message,
            file_path: self.file_path.clone(),
            data_path: self.render_data_path(),
            schema_path: self.render_schema_path(),
        }
    }
}

/// The shape metadata is attached from: either a full model or an inline
/// `object` field declaration.
struct Shape<'s> {
    model_type: ModelType,
    name: &'s str,
    label: Option<&'s str>,
    fields: &'s [Field],
}

impl<'s> Shape<'s> {
    fn from_model(model: &'s Model) -> Self {
        Self {
            model_type: model.model_type,
            name: &model.name,
            label: model.label.as_deref(),
            fields: &model.fields,
        }
    }
}

/// Annotates `value` against `model`, returning the annotated copy.
///
/// The schema-path restarts at the model's own name, so diagnostics read
/// `models.<name>.fields...`. Annotation is idempotent: re-running with the
/// same model yields an identical result.
pub fn annotate_with_model(
    value: &Value,
    model: &Model,
    ctx: &mut AnnotateContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Value {
    let saved = std::mem::replace(
        &mut ctx.schema_path,
        vec![format!("models.{}", model.name)],
    );
    let annotated = annotate_shape(value, &Shape::from_model(model), ctx, diagnostics);
    ctx.schema_path = saved;
    annotated
}

fn annotate_shape(
    value: &Value,
    shape: &Shape<'_>,
    ctx: &mut AnnotateContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Value {
    let Some(map) = value.as_object() else {
        diagnostics.push(ctx.diagnostic(
            DiagnosticKind::Shape,
            "value must be an object".to_string(),
        ));
        return value.clone();
    };

    let mut annotated = Map::with_capacity(map.len() + 1);
    for (key, entry) in map {
        let declared = shape.fields.iter().find(|f| f.name == *key);
        let Some(field) = declared else {
            // Undeclared keys (including __metadata) pass through as-is.
            annotated.insert(key.clone(), entry.clone());
            continue;
        };

        ctx.data_path.push(PathSegment::Key(key.clone()));
        ctx.schema_path.push(format!("fields.{}", field.name));
        let processed = apply_field_kind(
            entry,
            &field.kind,
            &field.name,
            field.label.as_deref(),
            ctx,
            diagnostics,
        );
        ctx.schema_path.pop();
        ctx.data_path.pop();

        annotated.insert(key.clone(), processed);
    }

    attach_metadata(&mut annotated, shape, ctx);
    Value::Object(annotated)
}

/// Exhaustive dispatch over the closed field-kind set.
fn apply_field_kind(
    value: &Value,
    kind: &FieldKind,
    field_name: &str,
    field_label: Option<&str>,
    ctx: &mut AnnotateContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Value {
    match kind {
        FieldKind::Scalar(_) => value.clone(),
        FieldKind::Object { fields } => {
            let shape = Shape {
                model_type: ModelType::Object,
                name: field_name,
                label: field_label,
                fields,
            };
            annotate_shape(value, &shape, ctx, diagnostics)
        },
        FieldKind::Model { models } => {
            annotate_model_union(value, models, ctx, diagnostics)
        },
        FieldKind::Reference { .. } => {
            // A reference normally resolves elsewhere in the pipeline. Inline
            // expanded data carrying a known type is annotated in place for
            // backward compatibility; everything else passes through.
            let inline = value
                .get(ctx.type_key)
                .and_then(Value::as_str)
                .and_then(|name| ctx.index.get(name));
            match inline {
                Some(model) => annotate_with_model(value, model, ctx, diagnostics),
                None => value.clone(),
            }
        },
        FieldKind::List { items } => {
            let Some(elements) = value.as_array() else {
                diagnostics.push(ctx.diagnostic(
                    DiagnosticKind::Shape,
                    "value of a list field must be an array".to_string(),
                ));
                return value.clone();
            };
            let annotated: Vec<Value> = elements
                .iter()
                .enumerate()
                .map(|(i, element)| {
                    ctx.data_path.push(PathSegment::Index(i));
                    ctx.schema_path.push("items".to_string());
                    let processed = apply_field_kind(
                        element,
                        items,
                        field_name,
                        field_label,
                        ctx,
                        diagnostics,
                    );
                    ctx.schema_path.pop();
                    ctx.data_path.pop();
                    processed
                })
                .collect();
            Value::Array(annotated)
        },
    }
}

/// Resolves a polymorphic `model` field value to one of its allowed models
/// and annotates with it.
fn annotate_model_union(
    value: &Value,
    models: &[String],
    ctx: &mut AnnotateContext<'_>,
    diagnostics: &mut Diagnostics,
) -> Value {
    match models {
        [] => {
            diagnostics.push(ctx.diagnostic(
                DiagnosticKind::Schema,
                "model field declares no allowed models".to_string(),
            ));
            value.clone()
        },
        [single] => match ctx.index.get(single) {
            Some(model) => annotate_with_model(value, model, ctx, diagnostics),
            None => {
                diagnostics.push(ctx.diagnostic(
                    DiagnosticKind::Schema,
                    format!("unknown model '{single}'"),
                ));
                value.clone()
            },
        },
        allowed => {
            let Some(declared) = value.get(ctx.type_key).and_then(Value::as_str) else {
                diagnostics.push(ctx.diagnostic(
                    DiagnosticKind::Schema,
                    format!(
                        "object must declare a '{}' property to pick one of the models {allowed:?}",
                        ctx.type_key
                    ),
                ));
                return value.clone();
            };
            if !allowed.iter().any(|name| name == declared) {
                diagnostics.push(ctx.diagnostic(
                    DiagnosticKind::Schema,
                    format!("'{declared}' is not one of the allowed models {allowed:?}"),
                ));
                return value.clone();
            }
            match ctx.index.get(declared) {
                Some(model) => annotate_with_model(value, model, ctx, diagnostics),
                None => {
                    diagnostics.push(ctx.diagnostic(
                        DiagnosticKind::Schema,
                        format!("unknown model '{declared}'"),
                    ));
                    value.clone()
                },
            }
        },
    }
}

/// Merges the computed metadata keys into the object's `__metadata` mapping.
///
/// Existing entries are preserved; only the keys computed here are written,
/// and keys whose computed value would be absent are omitted rather than set
/// to null. `urlPath` is derived from the source file path and only attached
/// to page-typed shapes.
fn attach_metadata(
    annotated: &mut Map<String, Value>,
    shape: &Shape<'_>,
    ctx: &AnnotateContext<'_>,
) {
    let mut metadata = annotated
        .get(METADATA_KEY)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    metadata.insert(
        MODEL_TYPE_KEY.to_string(),
        Value::String(shape.model_type.as_str().to_string()),
    );
    metadata.insert(
        MODEL_NAME_KEY.to_string(),
        Value::String(shape.name.to_string()),
    );
    if let Some(label) = shape.label {
        metadata.insert(
            MODEL_LABEL_KEY.to_string(),
            Value::String(label.to_string()),
        );
    }
    if shape.model_type == ModelType::Page {
        if let Some(file_path) = &ctx.file_path {
            metadata.insert(
                URL_PATH_KEY.to_string(),
                Value::String(derive_url_path(file_path)),
            );
        }
    }

    annotated.insert(METADATA_KEY.to_string(), Value::Object(metadata));
}
