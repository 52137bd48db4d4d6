//! Folding orphan data objects into one merged data object.
//!
//! Data files that matched no named data model are still useful: they are
//! folded into a single synthesized object, keyed by their file-path segments
//! (`team/alice.yaml` lands at `team.alice`). The fold is deterministic:
//! inputs are sorted ascending by file path and a later-sorted object at the
//! same key path overwrites an earlier one. Unlike URL derivation, an `index`
//! basename is kept as a literal segment here so `nav/index.yaml` and
//! `nav.yaml` stay distinguishable.

use crate::keypath::str_at;
use crate::meta::{ID_KEY, METADATA_KEY, SOURCE_KEY};
use crate::paths::{path_segments, IndexBasename};
use serde_json::{Map, Value};
use tracing::debug;

/// Merges the given data objects into one keyed tree.
///
/// Callers pass objects already tagged `modelType: data`; the merger itself
/// only sorts and folds. `file_path_key` is the dotted key path to each
/// object's relative file path; objects missing it cannot be placed and are
/// skipped. The result always carries at least the seeded `__metadata` with
/// `id = "<source_id>:data"`.
#[must_use]
pub fn merge_data_objects(
    objects: &[Value],
    file_path_key: &str,
    source_id: &str,
) -> Value {
    let mut placeable: Vec<(&str, &Value)> = objects
        .iter()
        .filter_map(|object| match str_at(object, file_path_key) {
            Some(path) => Some((path, object)),
            None => {
                debug!("skipping data object without a '{file_path_key}' value");
                None
            },
        })
        .collect();
    // Sort order is the conflict-resolution rule: later paths win.
    placeable.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut root = Map::new();
    root.insert(
        METADATA_KEY.to_string(),
        Value::Object(Map::from_iter([
            (ID_KEY.to_string(), Value::String(format!("{source_id}:data"))),
            (SOURCE_KEY.to_string(), Value::String(source_id.to_string())),
        ])),
    );

    for (path, object) in placeable {
        let segments = path_segments(path, IndexBasename::Keep);
        if segments.is_empty() {
            continue;
        }
        set_at_path(&mut root, &segments, object.clone());
    }

    Value::Object(root)
}

/// Sets `value` at the nested key path, creating intermediate objects and
/// overwriting whatever was there before.
fn set_at_path(root: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((last, dirs)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for dir in dirs {
        let slot = current
            .entry(dir.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            // A leaf placed earlier collides with this directory; the
            // later-sorted object wins.
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        current = map;
    }
    current.insert(last.clone(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn data_object(path: &str, body: Value) -> Value {
        let mut object = body.as_object().cloned().unwrap_or_default();
        object.insert(
            METADATA_KEY.to_string(),
            json!({"relSourcePath": path, "modelType": "data"}),
        );
        Value::Object(object)
    }

    const FILE_PATH_KEY: &str = "__metadata.relSourcePath";

    #[test]
    fn test_objects_are_keyed_by_path_segments() {
        let objects = vec![
            data_object("team/alice.yaml", json!({"name": "Alice"})),
            data_object("settings.yaml", json!({"title": "Loam"})),
        ];
        let merged = merge_data_objects(&objects, FILE_PATH_KEY, "filesystem");

        assert_eq!(merged["team"]["alice"]["name"], json!("Alice"));
        assert_eq!(merged["settings"]["title"], json!("Loam"));
    }

    #[test]
    fn test_metadata_is_seeded() {
        let merged = merge_data_objects(&[], FILE_PATH_KEY, "filesystem");
        assert_eq!(
            merged[METADATA_KEY],
            json!({"id": "filesystem:data", "source": "filesystem"})
        );
    }

    #[test]
    fn test_later_sorted_path_overwrites_earlier() {
        // Input order is reversed on purpose: sort order decides, not input
        // order. "team/alice.yaml" sorts after "team/alice.md" and must win.
        let objects = vec![
            data_object("team/alice.yaml", json!({"name": "from yaml"})),
            data_object("team/alice.md", json!({"name": "from md"})),
        ];
        let merged = merge_data_objects(&objects, FILE_PATH_KEY, "filesystem");

        assert_eq!(merged["team"]["alice"]["name"], json!("from yaml"));
    }

    #[test]
    fn test_index_basename_is_kept_as_segment() {
        let objects = vec![data_object("nav/index.yaml", json!({"links": []}))];
        let merged = merge_data_objects(&objects, FILE_PATH_KEY, "filesystem");

        assert_eq!(merged["nav"]["index"]["links"], json!([]));
    }

    #[test]
    fn test_object_without_path_is_skipped() {
        let objects = vec![json!({"name": "stray"})];
        let merged = merge_data_objects(&objects, FILE_PATH_KEY, "filesystem");

        let map = merged.as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(METADATA_KEY));
    }

    #[test]
    fn test_leaf_directory_collision_resolves_by_sort_order() {
        let objects = vec![
            data_object("team.yaml", json!({"size": 2})),
            data_object("team/alice.yaml", json!({"name": "Alice"})),
        ];
        let merged = merge_data_objects(&objects, FILE_PATH_KEY, "filesystem");

        // "team.yaml" sorts before "team/alice.yaml"; the directory wins.
        assert_eq!(merged["team"]["alice"]["name"], json!("Alice"));
        assert_eq!(merged["team"].get("size"), None);
    }
}
