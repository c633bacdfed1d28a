// src/output/json.rs
// =============================================================================
// Writes harvested results to a JSON file.
//
// serde_json writes UTF-8 and leaves non-ASCII text as-is (no \u escapes),
// so alt text in any language stays readable in the file.
// =============================================================================

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

/// Saves `items` as a pretty-printed JSON array at `path`
///
/// Missing parent directories are created. Returns the number of entries written.
pub fn save_json<T: Serialize>(items: &[T], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(items).context("Failed to serialize results")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), entries = items.len(), "saved results");
    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ResourceKind, ResourceRecord};

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/links.json");
        let links = vec!["https://example.com/a".to_string()];

        assert_eq!(save_json(&links, &path).unwrap(), 1);

        let written: Vec<String> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, links);
    }

    #[test]
    fn test_non_ascii_written_literally() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images.json");
        let records = vec![ResourceRecord::new(
            "https://example.com/a.png".to_string(),
            "無描述",
            ResourceKind::Standard,
        )];

        save_json(&records, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("無描述"));
        assert!(text.contains(r#""kind": "standard""#));
    }
}
