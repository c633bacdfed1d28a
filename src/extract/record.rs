// src/extract/record.rs
// =============================================================================
// The data harvested from a page in image mode.
//
// One <img> element can produce several records: one for each populated
// source attribute (src, data-src, data-original) and one per srcset entry.
// Background images found in inline styles are records too.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Where a record's URL came from
///
/// Serialized in kebab-case: "standard", "lazy-loaded", "data-original",
/// "srcset-variant", "background-image"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// Plain src attribute
    Standard,
    /// data-src placeholder filled in by a lazy-loading script
    LazyLoaded,
    /// data-original attribute (another lazy-loading convention)
    DataOriginal,
    /// One candidate from a srcset attribute
    SrcsetVariant,
    /// url(...) in an inline background-image style
    BackgroundImage,
}

impl ResourceKind {
    /// The kebab-case name, as written to JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Standard => "standard",
            ResourceKind::LazyLoaded => "lazy-loaded",
            ResourceKind::DataOriginal => "data-original",
            ResourceKind::SrcsetVariant => "srcset-variant",
            ResourceKind::BackgroundImage => "background-image",
        }
    }
}

/// One discovered media reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Absolute URL (or the raw value when it could not be resolved)
    pub url: String,
    /// Alt text, or a generated label for background images
    pub description: String,
    pub kind: ResourceKind,
    /// Enclosing container, e.g. "in-div-section"; absent for page-level matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// Width/density descriptor of a srcset entry ("480w", "2x")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_hint: Option<String>,
}

impl ResourceRecord {
    pub fn new(url: String, description: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            url,
            description: description.into(),
            kind,
            container: None,
            size_hint: None,
        }
    }

    pub fn in_container(mut self, container: Option<&str>) -> Self {
        self.container = container.map(str::to_string);
        self
    }

    pub fn with_size_hint(mut self, size_hint: Option<&str>) -> Self {
        self.size_hint = size_hint.map(str::to_string);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape_omits_absent_fields() {
        let record = ResourceRecord::new(
            "https://example.com/a.png".to_string(),
            "logo",
            ResourceKind::LazyLoaded,
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "lazy-loaded");
        assert!(json.get("container").is_none());
        assert!(json.get("size_hint").is_none());
    }

    #[test]
    fn test_json_shape_with_container_and_size() {
        let record = ResourceRecord::new(
            "https://example.com/a.png".to_string(),
            "校園風景",
            ResourceKind::SrcsetVariant,
        )
        .in_container(Some("in-div-div"))
        .with_size_hint(Some("2x"));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], ResourceKind::SrcsetVariant.as_str());
        assert_eq!(json["container"], "in-div-div");
        assert_eq!(json["size_hint"], "2x");
        assert_eq!(json["description"], "校園風景");
    }
}
