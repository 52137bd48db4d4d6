//! Filesystem content source: directory walk, parsing, metadata seeding.
//!
//! Walks a content directory, parses every eligible file (YAML, JSON, TOML,
//! and Markdown with YAML frontmatter) into a content object, and seeds the
//! reserved `__metadata` mapping with identity and provenance keys. Files
//! that cannot be read or parsed produce a warning diagnostic and are
//! skipped; only failing to read the directory tree itself is fatal.
//!
//! All path-like metadata values use `/` as the separator regardless of
//! platform.

use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
use crate::meta::{
    ID_KEY, METADATA_KEY, REL_PROJECT_PATH_KEY, REL_SOURCE_PATH_KEY, SOURCE_KEY,
    SOURCE_NAME_KEY, SOURCE_PATH_KEY,
};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Source id written into `__metadata.source`.
pub const SOURCE_ID: &str = "filesystem";

/// File extensions the loader parses. Everything else is ignored.
pub const CONTENT_EXTENSIONS: &[&str] = &["yml", "yaml", "json", "toml", "md"];

/// Key the markdown body is stored under, next to the frontmatter fields.
pub const MARKDOWN_CONTENT_KEY: &str = "markdown_content";

/// Caller configuration for the filesystem source.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Instance name written into `__metadata.sourceName`.
    pub source_name: String,
    /// Project root for `relProjectPath`; defaults to the content directory.
    pub project_root: Option<PathBuf>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            source_name: "content".to_string(),
            project_root: None,
        }
    }
}

/// Discovers and parses every eligible file under `content_dir`.
///
/// Files come back sorted by path, each an object with seeded `__metadata`.
/// Hidden files and directories (leading `.`) are skipped. Per-file read and
/// parse failures become warning diagnostics; an unreadable directory is an
/// [`Error::Io`].
pub fn discover(
    content_dir: &Path,
    options: &SourceOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<Value>> {
    let mut files = Vec::new();
    walk(content_dir, &mut files)?;

    let mut objects = Vec::with_capacity(files.len());
    for file in files {
        let rel_source = normalize(file.strip_prefix(content_dir).unwrap_or(&file));
        let rel_project = match &options.project_root {
            Some(root) => normalize(file.strip_prefix(root).unwrap_or(&file)),
            None => rel_source.clone(),
        };

        let text = match fs::read_to_string(&file) {
            Ok(text) => text,
            Err(e) => {
                diagnostics.push(parse_diagnostic(&rel_source, format!("cannot read file: {e}")));
                continue;
            },
        };
        let parsed = match parse_content(&file, &text) {
            Ok(parsed) => parsed,
            Err(e) => {
                diagnostics.push(parse_diagnostic(&rel_source, e.to_string()));
                continue;
            },
        };
        let Value::Object(mut object) = parsed else {
            diagnostics.push(parse_diagnostic(
                &rel_source,
                "top-level value must be a mapping".to_string(),
            ));
            continue;
        };

        object.insert(
            METADATA_KEY.to_string(),
            seed_metadata(&file, &rel_source, &rel_project, options),
        );
        objects.push(Value::Object(object));
    }

    debug!("discovered {} content objects under {}", objects.len(), content_dir.display());
    Ok(objects)
}

fn seed_metadata(
    file: &Path,
    rel_source: &str,
    rel_project: &str,
    options: &SourceOptions,
) -> Value {
    let mut metadata = Map::new();
    metadata.insert(ID_KEY.to_string(), Value::String(rel_project.to_string()));
    metadata.insert(SOURCE_KEY.to_string(), Value::String(SOURCE_ID.to_string()));
    metadata.insert(
        SOURCE_NAME_KEY.to_string(),
        Value::String(options.source_name.clone()),
    );
    metadata.insert(SOURCE_PATH_KEY.to_string(), Value::String(normalize(file)));
    metadata.insert(
        REL_SOURCE_PATH_KEY.to_string(),
        Value::String(rel_source.to_string()),
    );
    metadata.insert(
        REL_PROJECT_PATH_KEY.to_string(),
        Value::String(rel_project.to_string()),
    );
    Value::Object(metadata)
}

fn parse_diagnostic(rel_source: &str, message: String) -> Diagnostic {
    Diagnostic {
        severity: Severity::Warn,
        kind: DiagnosticKind::Parse,
        message,
        file_path: Some(rel_source.to_string()),
        data_path: None,
        schema_path: None,
    }
}

/// Depth-first walk collecting eligible files, sorted for determinism.
fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    entries.sort();

    for path in entries {
        if is_hidden(&path) {
            continue;
        }
        if path.is_dir() {
            walk(&path, files)?;
        } else if has_content_extension(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

fn has_content_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            CONTENT_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn normalize(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn parse_content(file: &Path, text: &str) -> Result<Value> {
    let extension = file
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "yml" | "yaml" => {
            serde_yaml::from_str(text).map_err(|e| Error::Parse(format!("invalid YAML: {e}")))
        },
        "json" => {
            serde_json::from_str(text).map_err(|e| Error::Parse(format!("invalid JSON: {e}")))
        },
        "toml" => {
            toml::from_str(text).map_err(|e| Error::Parse(format!("invalid TOML: {e}")))
        },
        "md" => parse_markdown(text),
        other => Err(Error::Parse(format!("unsupported extension '{other}'"))),
    }
}

/// Parses markdown with optional YAML frontmatter.
///
/// Frontmatter fields become the object's top-level keys; the body is stored
/// under [`MARKDOWN_CONTENT_KEY`]. A document without a frontmatter fence is
/// all body.
fn parse_markdown(text: &str) -> Result<Value> {
    let (frontmatter, body) = match split_frontmatter(text) {
        Some((frontmatter, body)) => (frontmatter, body),
        None => ("", text),
    };

    let mut object = if frontmatter.trim().is_empty() {
        Map::new()
    } else {
        let parsed: Value = serde_yaml::from_str(frontmatter)
            .map_err(|e| Error::Parse(format!("invalid frontmatter: {e}")))?;
        match parsed {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => {
                return Err(Error::Parse(
                    "frontmatter must be a mapping".to_string(),
                ));
            },
        }
    };

    object.insert(
        MARKDOWN_CONTENT_KEY.to_string(),
        Value::String(body.trim_start_matches(['\r', '\n']).to_string()),
    );
    Ok(Value::Object(object))
}

/// Splits `---`-fenced YAML frontmatter from the body.
///
/// The opening fence must be the very first line; the closing fence must sit
/// alone on its own line. Returns `None` when either fence is missing.
fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let after_open = text.strip_prefix("---")?;
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&after_open[..offset], &after_open[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
