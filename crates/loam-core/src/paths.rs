//! File-path segmentation and URL path derivation.
//!
//! Both the URL path attached to page objects and the key path used when
//! folding orphan data objects into the merged data tree are derived from a
//! relative file path. They share one segmentation primitive and differ only
//! in how an `index` basename is treated: URL derivation collapses it into the
//! parent directory, merge-key derivation keeps it as a literal segment.

/// How to treat a basename equal to `index` during segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexBasename {
    /// Collapse `index` into its directory (URL derivation).
    Drop,
    /// Keep `index` as a path segment (merge-key derivation).
    Keep,
}

/// Splits a relative file path into its directory segments plus the basename
/// with the extension stripped.
///
/// Separators are normalized so Windows-style paths segment identically.
/// Empty segments and `.` segments are discarded.
#[must_use]
pub fn path_segments(rel_path: &str, index: IndexBasename) -> Vec<String> {
    let normalized = rel_path.replace('\\', "/");
    let mut segments: Vec<String> = normalized
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(String::from)
        .collect();

    if let Some(basename) = segments.pop() {
        let stem = match basename.rfind('.') {
            // pos > 0 keeps dotfiles like `.gitignore` intact
            Some(pos) if pos > 0 => &basename[..pos],
            _ => basename.as_str(),
        };
        if !(index == IndexBasename::Drop && stem == "index") {
            segments.push(stem.to_string());
        }
    }

    segments
}

/// Maps a relative file path to its canonical site URL path.
///
/// The result is lower-cased, always starts with `/`, and an `index` basename
/// collapses into its directory, so `blog/post-1/index.md` becomes
/// `/blog/post-1` and a bare `index.md` becomes `/`. Pure and total: every
/// input yields a URL path.
#[must_use]
pub fn derive_url_path(rel_path: &str) -> String {
    let segments = path_segments(rel_path, IndexBasename::Drop);
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/")).to_lowercase()
    }
}
