//! End-to-end test: discover a content tree, load a schema, run the
//! pipeline, and check the annotated output and merged data object.

use loam_core::keypath::str_at;
use loam_core::{discover, pipeline, Diagnostics, PipelineOptions, SchemaConfig, SourceOptions};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA: &str = r"
pagesDir: pages
models:
  page:
    type: page
    label: Page
    layout: page
    fields:
      - name: title
        type: string
      - name: sections
        type: list
        items:
          type: model
          models: [hero, cta]
  post:
    type: page
    label: Post
    layout: post
    fields:
      - name: title
        type: string
  hero:
    type: object
    label: Hero
    fields:
      - name: heading
        type: string
  cta:
    type: object
    label: Call to action
    fields:
      - name: text
        type: string
";

fn write(dir: &Path, rel: &str, contents: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn object_at<'a>(objects: &'a [Value], rel_path: &str) -> &'a Value {
    objects
        .iter()
        .find(|o| str_at(o, "__metadata.relSourcePath") == Some(rel_path))
        .unwrap_or_else(|| panic!("no object for {rel_path}"))
}

#[test]
fn test_full_run_annotates_pages_and_merges_data() {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "pages/index.md",
        "---\nlayout: page\ntitle: Home\nsections:\n  - type: hero\n    heading: Welcome\n  - type: cta\n    text: Go\n---\nBody.\n",
    );
    write(
        tmp.path(),
        "pages/blog/first.md",
        "---\nlayout: post\ntitle: First\n---\nHello.\n",
    );
    write(tmp.path(), "data/team/alice.yaml", "name: Alice\n");
    write(tmp.path(), "data/settings.toml", "site_title = \"Loam\"\n");

    let schema = SchemaConfig::from_yaml(SCHEMA).unwrap();
    let mut diagnostics = Diagnostics::new();
    let objects = discover(tmp.path(), &SourceOptions::default(), &mut diagnostics).unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(objects.len(), 4);

    let options = PipelineOptions {
        merge_data: true,
        verbose_matching: true,
        ..PipelineOptions::default()
    }
    .with_pages_dir(schema.pages_dir.as_deref().unwrap());

    let outcome = pipeline::run(objects, &schema.models, &options);

    assert_eq!(outcome.matched, 2);
    assert_eq!(outcome.total, 4);
    assert!(outcome.diagnostics.is_empty());

    // Page annotation, including nested union members.
    let home = object_at(&outcome.objects, "pages/index.md");
    assert_eq!(
        str_at(home, "__metadata.modelName"),
        Some("page")
    );
    assert_eq!(
        str_at(home, "__metadata.urlPath"),
        Some("/pages")
    );
    assert_eq!(
        home["sections"][0]["__metadata"]["modelName"],
        json!("hero")
    );
    assert_eq!(
        home["sections"][1]["__metadata"]["modelLabel"],
        json!("Call to action")
    );

    let post = object_at(&outcome.objects, "pages/blog/first.md");
    assert_eq!(
        str_at(post, "__metadata.urlPath"),
        Some("/pages/blog/first")
    );

    // Schema-less data files are folded into the merged object.
    let merged = outcome.merged_data.expect("merged data object");
    assert_eq!(merged["data"]["team"]["alice"]["name"], json!("Alice"));
    assert_eq!(merged["data"]["settings"]["site_title"], json!("Loam"));
    assert_eq!(merged["__metadata"]["id"], json!("filesystem:data"));
}

#[test]
fn test_run_without_schema_is_pass_through() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "about.md", "---\ntitle: About\n---\nHi.\n");

    let mut diagnostics = Diagnostics::new();
    let objects = discover(tmp.path(), &SourceOptions::default(), &mut diagnostics).unwrap();

    let outcome = pipeline::run(objects.clone(), &[], &PipelineOptions::default());
    assert_eq!(outcome.objects, objects);
    assert!(outcome.diagnostics.is_empty());
    assert!(outcome.merged_data.is_none());
}
