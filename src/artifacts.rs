//! Loading of per-folder artifacts: images, text files, the citation table.
//!
//! Tolerance for missing files differs by dashboard. The overview treats its
//! lead artifacts as a pipeline contract and fails that render pass hard;
//! the review dashboard substitutes placeholders. Both behaviors are
//! expressed here as strict and lenient loader variants.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::literal;
use crate::models::CitationRecord;

/// Placeholder returned for missing text artifacts.
pub const MISSING_TEXT: &str = "File not found";

/// Common display height for the lead image pair, in pixels.
pub const LEAD_IMAGE_HEIGHT: u32 = 400;

/// A probed image artifact. The raw bytes are served by the file route;
/// layout only needs the pixel dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

impl ImageArtifact {
    /// Width after scaling to `target_height`, preserving aspect ratio.
    pub fn display_width(&self, target_height: u32) -> u32 {
        if self.height == 0 {
            return 0;
        }
        (self.width as f64 * target_height as f64 / self.height as f64).round() as u32
    }
}

/// Probe an image artifact, failing on a missing or undecodable file.
pub fn image_artifact(dir: &Path, name: &str) -> Result<ImageArtifact> {
    let path = dir.join(name);
    let (width, height) = image::image_dimensions(&path)
        .with_context(|| format!("cannot read image {}", path.display()))?;
    Ok(ImageArtifact {
        name: name.to_string(),
        width,
        height,
    })
}

/// Probe an image artifact, yielding `None` on any failure.
pub fn try_image_artifact(dir: &Path, name: &str) -> Option<ImageArtifact> {
    image_artifact(dir, name).ok()
}

/// Read a text artifact, substituting the placeholder when the file is
/// absent or unreadable.
pub fn load_text(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => MISSING_TEXT.to_string(),
        Err(err) => {
            warn!("failed reading {}: {}", path.display(), err);
            MISSING_TEXT.to_string()
        }
    }
}

/// Raw CSV row; the list-valued columns arrive as literal-sequence text.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    question: String,
    #[serde(default)]
    accepted_answer: String,
    #[serde(default)]
    response: String,
    #[serde(default)]
    citations: String,
    #[serde(default)]
    citation_matches: String,
}

/// Parse a folder's citation table.
///
/// An absent or empty table yields no records. A row whose sequence cells
/// fail to parse keeps its scalar fields and gets empty sequences, so the
/// citation view degrades to empty instead of taking the page down.
pub fn load_citation_table(path: &Path) -> Vec<CitationRecord> {
    let mut reader = match csv::Reader::from_path(path) {
        Ok(reader) => reader,
        Err(err) => {
            if path.exists() {
                warn!("cannot open {}: {}", path.display(), err);
            } else {
                debug!("no citation table at {}", path.display());
            }
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for row in reader.deserialize::<RawRecord>() {
        match row {
            Ok(raw) => records.push(into_record(raw, path)),
            Err(err) => warn!("skipping malformed row in {}: {}", path.display(), err),
        }
    }
    records
}

fn into_record(raw: RawRecord, path: &Path) -> CitationRecord {
    let citations = parse_cell(&raw.citations, literal::parse_string_list, "citations", path);
    let citation_matches = parse_cell(
        &raw.citation_matches,
        literal::parse_match_list,
        "citation_matches",
        path,
    );

    if citations.len() != citation_matches.len()
        && !citations.is_empty()
        && !citation_matches.is_empty()
    {
        warn!(
            "{}: {} citations but {} matches; pairing up to the shorter",
            path.display(),
            citations.len(),
            citation_matches.len()
        );
    }

    CitationRecord {
        question: raw.question,
        accepted_answer: raw.accepted_answer,
        response: raw.response,
        citations,
        citation_matches,
    }
}

/// An empty cell is an empty sequence; anything else must parse.
fn parse_cell<T>(
    cell: &str,
    parse: impl Fn(&str) -> Result<Vec<T>, literal::LiteralError>,
    column: &str,
    path: &Path,
) -> Vec<T> {
    if cell.trim().is_empty() {
        return Vec::new();
    }
    match parse(cell) {
        Ok(items) => items,
        Err(err) => {
            warn!(
                "{}: unparseable {} cell ({}); treating as empty",
                path.display(),
                column,
                err
            );
            Vec::new()
        }
    }
}
