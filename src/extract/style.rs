// src/extract/style.rs
// =============================================================================
// Pulls the image URL out of an inline `background-image` declaration.
//
// We look at the declaration value only (text between the colon and the next
// semicolon) and require a well-formed url(...) token in it. Anything else
// that mentions background-image is reported as malformed instead of being
// guessed at, so we never emit a URL like "rgba(".
// =============================================================================

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ParseError;

// Matches url(...) with a double-quoted, single-quoted or bare argument
fn url_token() -> &'static Regex {
    static URL_TOKEN: OnceLock<Regex> = OnceLock::new();
    URL_TOKEN.get_or_init(|| {
        // Constant pattern, known to be valid
        Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'"()\s]*))\s*\)"#).unwrap()
    })
}

// CSS keywords that mean "no image" rather than a broken declaration
const NO_IMAGE_VALUES: [&str; 5] = ["none", "initial", "inherit", "unset", "revert"];

/// Returns the raw (unresolved) URL of the first background-image declaration
///
/// Ok(None): the style has no background-image, or it is set to a keyword
/// like `none`. Err: a background-image is mentioned but holds no usable url().
pub fn background_image_url(style: &str) -> Result<Option<String>, ParseError> {
    if !style.to_ascii_lowercase().contains("background-image") {
        return Ok(None);
    }

    let malformed = || ParseError::MalformedStyle {
        style: style.to_string(),
    };

    let value = declaration_value(style, "background-image").ok_or_else(malformed)?;

    if NO_IMAGE_VALUES.iter().any(|kw| value.eq_ignore_ascii_case(kw)) {
        return Ok(None);
    }

    let captures = url_token().captures(value).ok_or_else(malformed)?;
    let raw = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))
        .map(|m| m.as_str().trim())
        .unwrap_or("");

    if raw.is_empty() {
        return Err(malformed());
    }

    Ok(Some(raw.to_string()))
}

// Value of the first `property: value` declaration in an inline style
fn declaration_value<'a>(style: &'a str, property: &str) -> Option<&'a str> {
    style
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case(property))
        .map(|(_, value)| value.trim())
}
