//! Dotted key-path access into content object trees.
//!
//! Selector configuration refers to values inside objects by dotted paths
//! such as `__metadata.relSourcePath`. Lookup is read-only and never fails
//! loudly; a missing segment simply yields `None`.

use serde_json::Value;

/// Resolves a dotted key path against a value tree.
///
/// Each `.`-separated segment must name a key in a JSON object; lookup stops
/// with `None` as soon as a segment is missing or the current value is not an
/// object.
#[must_use]
pub fn value_at<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Like [`value_at`] but only for string-valued leaves.
#[must_use]
pub fn str_at<'v>(value: &'v Value, path: &str) -> Option<&'v str> {
    value_at(value, path)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_at_nested_lookup() {
        let object = json!({"__metadata": {"relSourcePath": "blog/post.md"}});
        assert_eq!(
            str_at(&object, "__metadata.relSourcePath"),
            Some("blog/post.md")
        );
    }

    #[test]
    fn test_value_at_top_level() {
        let object = json!({"layout": "post"});
        assert_eq!(str_at(&object, "layout"), Some("post"));
    }

    #[test]
    fn test_value_at_missing_segment() {
        let object = json!({"__metadata": {}});
        assert_eq!(value_at(&object, "__metadata.relSourcePath"), None);
    }

    #[test]
    fn test_value_at_non_object_intermediate() {
        let object = json!({"layout": "post"});
        assert_eq!(value_at(&object, "layout.name"), None);
    }

    #[test]
    fn test_str_at_rejects_non_string() {
        let object = json!({"count": 3});
        assert_eq!(str_at(&object, "count"), None);
    }
}
