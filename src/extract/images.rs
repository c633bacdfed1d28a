// src/extract/images.rs
// =============================================================================
// Harvests image references from a parsed page.
//
// Three strategies run in a fixed order and their results are concatenated:
// 1. Every <img> in the document, through the per-element rules below
// 2. Inline background-image styles on container elements
// 3. <img> elements nested inside those containers, tagged "in-div-<tag>"
//
// Extraction is attribute-driven: each populated source attribute of an
// <img> yields its own record. A malformed style or srcset entry only costs
// that one record; the rest of the page is still harvested.
// =============================================================================

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use super::record::{ResourceKind, ResourceRecord};
use super::style::background_image_url;
use super::{resolve_url, PageExtractor};
use crate::error::ParseError;

/// Description used when an <img> has no alt attribute
pub const NO_DESCRIPTION: &str = "no description";

/// Description used for a background image on an element without id/class
pub const BACKGROUND_DESCRIPTION: &str = "background image";

const MEDIA_SELECTOR: &str = "img";
const CONTAINER_SELECTOR: &str = "div, section, header, footer, a";

/// A rule that turns one source attribute into at most one record
#[derive(Debug, Clone, Copy)]
pub struct AttributeRule {
    pub attribute: &'static str,
    pub kind: ResourceKind,
}

/// Single-URL source attributes, checked in this order on every <img>
pub const ATTRIBUTE_RULES: [AttributeRule; 3] = [
    AttributeRule {
        attribute: "src",
        kind: ResourceKind::Standard,
    },
    AttributeRule {
        attribute: "data-src",
        kind: ResourceKind::LazyLoaded,
    },
    AttributeRule {
        attribute: "data-original",
        kind: ResourceKind::DataOriginal,
    },
];

impl AttributeRule {
    /// Builds a record if the element carries a non-empty value for this attribute
    pub fn apply(&self, element: ElementRef<'_>, base: &Url) -> Option<ResourceRecord> {
        let value = element.value().attr(self.attribute)?.trim();
        if value.is_empty() {
            return None;
        }
        Some(ResourceRecord::new(
            resolve_url(base, value),
            alt_text(element),
            self.kind,
        ))
    }
}

/// Image mode: a page's contribution is every image reference on it
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageExtractor;

impl PageExtractor for ImageExtractor {
    type Item = ResourceRecord;

    fn extract(&self, document: &Html, base: &Url) -> Vec<ResourceRecord> {
        extract_images(document, base)
    }

    fn ready_selector(&self) -> &'static str {
        MEDIA_SELECTOR
    }
}

/// Runs all three strategies over a document
pub fn extract_images(document: &Html, base: &Url) -> Vec<ResourceRecord> {
    // Both selectors are constants and known to be valid
    let media = Selector::parse(MEDIA_SELECTOR).unwrap();
    let containers = Selector::parse(CONTAINER_SELECTOR).unwrap();

    let mut records = Vec::new();

    // 1. Direct media elements
    for img in document.select(&media) {
        records.extend(media_records(img, base));
    }

    // 2. Container background images
    for container in document.select(&containers) {
        match background_record(container, base) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => warn!(
                element = container.value().name(),
                error = %e,
                "skipping background image"
            ),
        }
    }

    // 3. Media nested in containers
    // An <img> inside <div><a>..</a></div> is seen once per container
    for container in document.select(&containers) {
        let tag = format!("in-div-{}", container.value().name());
        for img in container.select(&media) {
            records.extend(
                media_records(img, base)
                    .into_iter()
                    .map(|record| record.in_container(Some(tag.as_str()))),
            );
        }
    }

    debug!(base = %base, count = records.len(), "extracted image records");
    records
}

/// Applies every per-element rule to one <img>, in order
///
/// An element with src, data-src and a two-entry srcset yields four records,
/// all sharing the element's alt text.
pub fn media_records(element: ElementRef<'_>, base: &Url) -> Vec<ResourceRecord> {
    let mut records: Vec<ResourceRecord> = ATTRIBUTE_RULES
        .iter()
        .filter_map(|rule| rule.apply(element, base))
        .collect();

    if let Some(srcset) = element.value().attr("srcset") {
        // Every variant shares the element's alt text
        let description = alt_text(element);
        // "a.jpg 1x, b.jpg 2x" -> ["a.jpg 1x", " b.jpg 2x"]
        for entry in srcset.split(',') {
            match srcset_record(entry, base, &description) {
                Ok(record) => records.push(record),
                Err(e) => warn!(error = %e, "skipping srcset entry"),
            }
        }
    }

    records
}

/// Parses one comma-separated srcset candidate ("img/a.jpg 2x")
pub fn srcset_record(
    entry: &str,
    base: &Url,
    description: &str,
) -> Result<ResourceRecord, ParseError> {
    // First token is the URL, the optional second one the descriptor
    let mut tokens = entry.split_whitespace();
    let url = tokens.next().ok_or_else(|| ParseError::MalformedSrcset {
        entry: entry.to_string(),
    })?;

    Ok(
        ResourceRecord::new(resolve_url(base, url), description, ResourceKind::SrcsetVariant)
            .with_size_hint(tokens.next()),
    )
}

/// Builds the record for a container's inline background image, if it has one
pub fn background_record(
    element: ElementRef<'_>,
    base: &Url,
) -> Result<Option<ResourceRecord>, ParseError> {
    // No inline style at all is the common case, not an error
    let Some(style) = element.value().attr("style") else {
        return Ok(None);
    };

    // `?` hands a malformed declaration back to the caller, which skips it
    let Some(raw) = background_image_url(style)? else {
        return Ok(None);
    };

    Ok(Some(ResourceRecord::new(
        resolve_url(base, &raw),
        container_label(element),
        ResourceKind::BackgroundImage,
    )))
}

// "<id> <class1> <class2>", falling back to a generic label
fn container_label(element: ElementRef<'_>) -> String {
    let id = element.value().id().unwrap_or("");
    let classes = element.value().classes().collect::<Vec<_>>().join(" ");
    // trim() drops the space left over when either part is missing
    let label = format!("{} {}", id, classes).trim().to_string();

    if label.is_empty() {
        BACKGROUND_DESCRIPTION.to_string()
    } else {
        label
    }
}

fn alt_text(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("alt")
        .unwrap_or(NO_DESCRIPTION)
        .to_string()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is ElementRef?
//    - A borrowed handle to one element inside a parsed Html document
//    - .value() gives the element itself, .attr("src") one of its attributes
//    - .select(&selector) searches only below that element, which is how
//      step 3 finds images nested in a container
//
// 2. Why a table of AttributeRule values?
//    - src, data-src and data-original all work the same way: read one
//      attribute, resolve it, tag it with a kind
//    - A const array keeps them in a fixed order and makes adding a new
//      lazy-load attribute a one-line change
//
// 3. What does `let ... else` do?
//    - let Some(style) = ... else { return Ok(None); };
//    - Binds the value if the pattern matches, otherwise runs the else
//      block, which must leave the function (return, break, continue)
//
// 4. Why Result<Option<ResourceRecord>, ParseError>?
//    - Ok(Some(record)) = found a background image
//    - Ok(None) = nothing there (no style, no background, or "none")
//    - Err(e) = something was there but we could not read it
//    - The caller logs the error and moves on to the next container
//
// 5. What are debug! and warn!?
//    - Logging macros from the tracing crate
//    - warn! shows up with the default filter, debug! only with -v
//    - key = value pairs become structured fields in the log line
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/gallery/";

    fn extract(html: &str) -> Vec<ResourceRecord> {
        let document = Html::parse_document(html);
        extract_images(&document, &Url::parse(BASE).unwrap())
    }

    #[test]
    fn test_src_and_data_src_yield_two_records() {
        let records = extract(r#"<img src="a.png" data-src="b.png" alt="cat">"#);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://example.com/gallery/a.png");
        assert_eq!(records[0].kind, ResourceKind::Standard);
        assert_eq!(records[1].url, "https://example.com/gallery/b.png");
        assert_eq!(records[1].kind, ResourceKind::LazyLoaded);
        assert_eq!(records[0].description, records[1].description);
        assert_eq!(records[0].description, "cat");
    }

    #[test]
    fn test_srcset_variants_carry_size_hints() {
        let records = extract(r#"<img srcset="x.jpg 1x, y.jpg 2x">"#);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.kind == ResourceKind::SrcsetVariant));
        assert_eq!(records[0].size_hint.as_deref(), Some("1x"));
        assert_eq!(records[1].size_hint.as_deref(), Some("2x"));
        assert_eq!(records[1].url, "https://example.com/gallery/y.jpg");
    }

    #[test]
    fn test_srcset_without_descriptor_and_trailing_comma() {
        let records = extract(r#"<img srcset="only.jpg, ">"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size_hint, None);
    }

    #[test]
    fn test_missing_alt_uses_default() {
        let records = extract(r#"<img src="a.png">"#);
        assert_eq!(records[0].description, NO_DESCRIPTION);
    }

    #[test]
    fn test_data_original_and_empty_attributes() {
        let records = extract(r#"<img src="" data-original="/full/o.png">"#);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ResourceKind::DataOriginal);
        assert_eq!(records[0].url, "https://example.com/full/o.png");
    }

    #[test]
    fn test_url_resolution_forms() {
        let records = extract(
            r#"<img src="//cdn.example.net/a.png" data-src="https://other.org/b.png" data-original="../c.png">"#,
        );
        let urls: Vec<_> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn.example.net/a.png",
                "https://other.org/b.png",
                "https://example.com/c.png",
            ]
        );
    }

    #[test]
    fn test_background_image_description() {
        let records = extract(
            r#"<section id="hero" class="banner  wide" style="background-image: url('/bg.jpg');"></section>"#,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, ResourceKind::BackgroundImage);
        assert_eq!(records[0].url, "https://example.com/bg.jpg");
        assert_eq!(records[0].description, "hero banner wide");
        assert_eq!(records[0].container, None);
    }

    #[test]
    fn test_background_without_id_or_class() {
        let records = extract(r#"<header style="background-image:url(h.png)"></header>"#);
        assert_eq!(records[0].description, BACKGROUND_DESCRIPTION);
    }

    #[test]
    fn test_malformed_style_does_not_stop_extraction() {
        let records = extract(
            r#"
            <div style="background-image: rgba("></div>
            <footer style="background-image: url(f.png)"></footer>
            <img src="a.png">
            "#,
        );
        let kinds: Vec<_> = records.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![ResourceKind::Standard, ResourceKind::BackgroundImage]);
    }

    #[test]
    fn test_nested_media_tagged_with_container() {
        let records = extract(r#"<section><img src="n.png" alt="nested"></section>"#);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].container, None);
        assert_eq!(records[1].container.as_deref(), Some("in-div-section"));
        assert_eq!(records[1].url, records[0].url);
    }

    #[test]
    fn test_each_enclosing_container_reports_nested_media() {
        let records = extract(r#"<div><a href="/x"><img src="n.png"></a></div>"#);
        let containers: Vec<_> = records.iter().map(|r| r.container.as_deref()).collect();
        assert_eq!(containers, vec![None, Some("in-div-div"), Some("in-div-a")]);
    }

    #[test]
    fn test_single_page_scenario_yields_seven_records() {
        let records = extract(
            r#"
            <img src="one.png">
            <img src="two.png" data-src="two-lazy.png">
            <img srcset="three-1x.png 1x, three-2x.png 2x">
            <p style="background-image: url(ignored.png)"></p>
            <div class="hero" style="background-image: url(bg1.png)"></div>
            <footer id="foot" style="background-image: url(bg2.png)"></footer>
            "#,
        );
        assert_eq!(records.len(), 7);
        assert_eq!(
            records
                .iter()
                .filter(|r| r.kind == ResourceKind::BackgroundImage)
                .count(),
            2
        );
    }

    #[test]
    fn test_images_ready_when_img_present() {
        assert_eq!(ImageExtractor.ready_selector(), "img");
        assert_eq!(ImageExtractor.links_from(&extract(r#"<img src="a.png">"#)), None);
    }

    #[test]
    fn test_srcset_record_rejects_blank_entry() {
        let base = Url::parse(BASE).unwrap();
        assert!(matches!(
            srcset_record("   ", &base, "d"),
            Err(ParseError::MalformedSrcset { .. })
        ));
    }
}
