//! Domain types for output folders and their citation tables.

use chrono::{DateTime, Utc};

/// Image artifacts every folder is expected to carry, in pipeline emission
/// order. The first two form the overview dashboard's lead comparison pair.
pub const IMAGE_ARTIFACTS: &[&str] = &[
    "input.png",
    "debug_sections.png",
    "highlighted.png",
    "merged_highlighted.png",
    "removed.png",
    "merged_removed.png",
    "line_numbers.png",
    "detected_vertical_lines.png",
    "detected_horizontal_lines.png",
    "citation_highlighted.png",
];

/// Text artifacts, unprocessed first.
pub const TEXT_ARTIFACTS: &[&str] = &[
    "unprocessed_text.txt",
    "processed_text.txt",
    "processed_text_tabs.txt",
    "processed_text_ascii.txt",
];

/// Per-folder citation table written by the extraction stage.
pub const CITATIONS_FILE: &str = "citations.csv";

/// Response value the pipeline writes when LLM inference failed for a folder.
pub const INFERENCE_ERROR_SENTINEL: &str = "Error infering LLM";

/// Whether a filename is one the pipeline is known to emit. Doubles as the
/// whitelist for the artifact file route.
pub fn is_known_artifact(name: &str) -> bool {
    IMAGE_ARTIFACTS.contains(&name) || TEXT_ARTIFACTS.contains(&name) || name == CITATIONS_FILE
}

/// Classification of a folder's citation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderValidity {
    /// Table present with a real model response.
    Succeeded,
    /// Table present but its first row carries the inference-error sentinel.
    Failed,
    /// Table absent or empty.
    NoTable,
}

impl FolderValidity {
    pub fn label(&self) -> &'static str {
        match self {
            FolderValidity::Succeeded => "ok",
            FolderValidity::Failed => "inference failed",
            FolderValidity::NoTable => "no citation table",
        }
    }
}

/// One pipeline run's output directory, keyed by document id.
///
/// The id is the directory name, treated as opaque. File lifecycle belongs
/// entirely to the external pipeline.
#[derive(Debug, Clone)]
pub struct OutputFolder {
    pub id: String,
    pub validity: FolderValidity,
    pub modified: Option<DateTime<Utc>>,
}

/// Best-matching source span located for a citation.
#[derive(Debug, Clone, PartialEq)]
pub struct CitationMatch {
    pub match_text: String,
    pub similarity: f64,
}

/// One row of a folder's citation table.
///
/// `citations` and `citation_matches` are positionally aligned; the upstream
/// contract says they have equal length.
#[derive(Debug, Clone, Default)]
pub struct CitationRecord {
    pub question: String,
    pub accepted_answer: String,
    pub response: String,
    pub citations: Vec<String>,
    pub citation_matches: Vec<CitationMatch>,
}

impl CitationRecord {
    /// Citations paired positionally with their best matches. Sequences of
    /// unequal length pair up to the shorter one.
    pub fn paired(&self) -> impl Iterator<Item = (&str, &CitationMatch)> {
        self.citations
            .iter()
            .map(String::as_str)
            .zip(self.citation_matches.iter())
    }
}
