// src/output/mod.rs
// =============================================================================
// What happens to a crawl's result once it is collected: saved as JSON,
// and in image mode optionally downloaded to disk.
// =============================================================================

mod download;
mod json;

pub use download::download_assets;
pub use json::save_json;
