//! The annotation pipeline: classify, select, annotate, merge.
//!
//! `run` is a pure function of the object list, the model list, and the
//! options. It holds no state across invocations, so a caller reloading
//! content can simply run it again on the fresh object list; identical inputs
//! yield identical outputs.

use crate::annotate::{annotate_with_model, AnnotateContext};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
use crate::index::SchemaIndex;
use crate::keypath::str_at;
use crate::merge::merge_data_objects;
use crate::meta::{metadata_str, METADATA_KEY, MODEL_TYPE_KEY, SOURCE_KEY};
use crate::schema::Model;
use crate::select::{select_data_model, select_page_model, SelectorKeys};
use serde_json::Value;
use tracing::{debug, info};

/// Classifies an object as a page (true) or data (false).
pub type PagePredicate = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// Caller-supplied configuration for one pipeline run.
pub struct PipelineOptions {
    /// Distinguishes page objects from data objects. The default treats
    /// markdown files as pages and everything else as data.
    pub page_predicate: PagePredicate,
    /// Key paths for reading match-relevant values off objects.
    pub keys: SelectorKeys,
    /// Fold schema-less data objects into one merged data object.
    pub merge_data: bool,
    /// Log one line per matched object plus the match summary.
    pub verbose_matching: bool,
    /// Display label of the schema document used in diagnostics.
    pub schema_label: String,
    /// Source id seeded into the merged data object's metadata. Defaults to
    /// the first orphan's `__metadata.source`.
    pub merged_source: Option<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        let keys = SelectorKeys::default();
        Self {
            page_predicate: markdown_page_predicate(&keys.file_path),
            keys,
            merge_data: false,
            verbose_matching: false,
            schema_label: "loam.yaml".to_string(),
            merged_source: None,
        }
    }
}

impl PipelineOptions {
    /// Replaces the page predicate with a prefix test on the file path:
    /// objects under `pages_dir` are pages, everything else is data.
    #[must_use]
    pub fn with_pages_dir(mut self, pages_dir: &str) -> Self {
        let key = self.keys.file_path.clone();
        let prefix = format!("{}/", pages_dir.trim_matches('/'));
        self.page_predicate = Box::new(move |object| {
            str_at(object, &key).is_some_and(|path| path.starts_with(&prefix))
        });
        self
    }
}

/// The default classification: markdown files are pages.
#[must_use]
pub fn markdown_page_predicate(file_path_key: &str) -> PagePredicate {
    let key = file_path_key.to_string();
    Box::new(move |object| {
        str_at(object, &key).is_some_and(|path| {
            std::path::Path::new(path)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        })
    })
}

/// Everything one pipeline run produces.
#[derive(Debug)]
pub struct Outcome {
    /// The full object list, annotated where a model matched.
    pub objects: Vec<Value>,
    /// The merged data object, when merging was requested and orphan data
    /// objects existed.
    pub merged_data: Option<Value>,
    /// Every diagnostic recorded during the run.
    pub diagnostics: Vec<Diagnostic>,
    /// How many objects matched a model.
    pub matched: usize,
    /// How many objects were processed.
    pub total: usize,
}

/// Runs the full annotation pipeline over one object list.
///
/// With an empty model list the pipeline is in pass-through mode: objects
/// come back untouched, nothing is merged, no diagnostics are recorded.
/// Otherwise each object is classified, matched, and annotated; match
/// failures are recorded and the object passes through unchanged. When
/// merging is enabled, data-classified objects that matched no model are
/// folded into one merged data object appended to the outcome.
#[must_use]
pub fn run(objects: Vec<Value>, models: &[Model], options: &PipelineOptions) -> Outcome {
    let total = objects.len();
    let mut diagnostics = Diagnostics::new();

    if models.is_empty() {
        return Outcome {
            objects,
            merged_data: None,
            diagnostics: diagnostics.into_records(),
            matched: 0,
            total,
        };
    }

    let index = SchemaIndex::new(models, &mut diagnostics);
    let mut annotated = Vec::with_capacity(total);
    let mut orphans: Vec<usize> = Vec::new();
    let mut matched = 0;

    for object in objects {
        let file_path = str_at(&object, &options.keys.file_path).map(str::to_owned);
        let is_page = (options.page_predicate)(&object);
        let selected = if is_page {
            select_page_model(&object, &index, &options.keys)
        } else {
            select_data_model(&object, &index, &options.keys)
        };

        match selected {
            Ok(model) => {
                if options.verbose_matching {
                    debug!(
                        "matched {} to model '{}'",
                        file_path.as_deref().unwrap_or("<unknown>"),
                        model.name
                    );
                }
                let mut ctx = AnnotateContext::new(
                    &index,
                    &options.schema_label,
                    &options.keys.type_field,
                    file_path,
                );
                annotated.push(annotate_with_model(
                    &object,
                    model,
                    &mut ctx,
                    &mut diagnostics,
                ));
                matched += 1;
            },
            Err(err) => {
                // A data file with nothing to match against is the normal
                // schema-less case, not a reportable failure.
                if is_page || !err.is_no_candidates() {
                    diagnostics.push(Diagnostic {
                        severity: Severity::Error,
                        kind: DiagnosticKind::Match,
                        message: err.to_string(),
                        file_path,
                        data_path: None,
                        schema_path: None,
                    });
                }
                if !is_page {
                    orphans.push(annotated.len());
                }
                annotated.push(object);
            },
        }
    }

    let merged_data = if options.merge_data && !orphans.is_empty() {
        let source = options
            .merged_source
            .clone()
            .or_else(|| {
                orphans.first().and_then(|&i| {
                    metadata_str(&annotated[i], SOURCE_KEY).map(str::to_owned)
                })
            })
            .unwrap_or_else(|| "data".to_string());
        let tagged: Vec<Value> = orphans
            .iter()
            .map(|&i| tag_as_data(&annotated[i]))
            .collect();
        Some(merge_data_objects(&tagged, &options.keys.file_path, &source))
    } else {
        None
    };

    if options.verbose_matching {
        info!("{matched} of {total} files were matched to models");
    }

    Outcome {
        objects: annotated,
        merged_data,
        diagnostics: diagnostics.into_records(),
        matched,
        total,
    }
}

/// Returns a copy of the object tagged `modelType: data`, satisfying the
/// merger's precondition without touching the pass-through original.
fn tag_as_data(object: &Value) -> Value {
    let mut tagged = object.clone();
    if let Some(map) = tagged.as_object_mut() {
        let metadata = map
            .entry(METADATA_KEY.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));
        if let Some(metadata) = metadata.as_object_mut() {
            metadata.insert(
                MODEL_TYPE_KEY.to_string(),
                Value::String("data".to_string()),
            );
        }
    }
    tagged
}
