//! Per-run lookup of models by name, partitioned into page and data models.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
use crate::schema::{Model, ModelType};
use std::collections::HashMap;

/// Name lookup and page/data partition over one loaded model list.
///
/// Built fresh for every pipeline invocation; holds only borrows into the
/// caller's model list.
#[derive(Debug)]
pub struct SchemaIndex<'a> {
    by_name: HashMap<&'a str, &'a Model>,
    page_models: Vec<&'a Model>,
    data_models: Vec<&'a Model>,
}

impl<'a> SchemaIndex<'a> {
    /// Indexes the model list.
    ///
    /// Model names are assumed unique. If two models share a name the first
    /// definition wins and a warning diagnostic is recorded; the duplicate is
    /// excluded from the partitions as well as the name table.
    #[must_use]
    pub fn new(models: &'a [Model], diagnostics: &mut Diagnostics) -> Self {
        let mut by_name = HashMap::with_capacity(models.len());
        let mut page_models = Vec::new();
        let mut data_models = Vec::new();

        for model in models {
            if by_name.contains_key(model.name.as_str()) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warn,
                    kind: DiagnosticKind::Schema,
                    message: format!(
                        "duplicate model name '{}'; keeping the first definition",
                        model.name
                    ),
                    file_path: None,
                    data_path: None,
                    schema_path: None,
                });
                continue;
            }
            by_name.insert(model.name.as_str(), model);
            match model.model_type {
                ModelType::Page => page_models.push(model),
                ModelType::Data => data_models.push(model),
                ModelType::Object => {},
            }
        }

        Self {
            by_name,
            page_models,
            data_models,
        }
    }

    /// Looks a model up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a Model> {
        self.by_name.get(name).copied()
    }

    /// Models with `type: page`, in declaration order.
    #[must_use]
    pub fn page_models(&self) -> &[&'a Model] {
        &self.page_models
    }

    /// Models with `type: data`, in declaration order.
    #[must_use]
    pub fn data_models(&self) -> &[&'a Model] {
        &self.data_models
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, model_type: ModelType) -> Model {
        Model {
            name: name.to_string(),
            model_type,
            label: None,
            layout: None,
            fields: vec![],
        }
    }

    #[test]
    fn test_partition_by_model_type() {
        let models = vec![
            model("page", ModelType::Page),
            model("post", ModelType::Page),
            model("author", ModelType::Data),
            model("hero", ModelType::Object),
        ];
        let mut diagnostics = Diagnostics::new();
        let index = SchemaIndex::new(&models, &mut diagnostics);

        assert_eq!(index.page_models().len(), 2);
        assert_eq!(index.data_models().len(), 1);
        assert!(index.get("hero").is_some());
        assert!(index.get("missing").is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_duplicate_name_keeps_first_and_warns() {
        let mut first = model("author", ModelType::Data);
        first.label = Some("Author".to_string());
        let models = vec![first, model("author", ModelType::Page)];

        let mut diagnostics = Diagnostics::new();
        let index = SchemaIndex::new(&models, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.records()[0].severity, Severity::Warn);
        let kept = index.get("author").unwrap();
        assert_eq!(kept.label.as_deref(), Some("Author"));
        assert!(index.page_models().is_empty());
    }
}
