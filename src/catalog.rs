//! Output catalog: scans the pipeline's outputs root and classifies folders.
//!
//! The catalog is a snapshot. It is computed once at startup, cached by the
//! server, and re-derived only on an explicit rescan; individual requests
//! never touch the directory listing.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::artifacts;
use crate::models::{FolderValidity, OutputFolder, CITATIONS_FILE, INFERENCE_ERROR_SENTINEL};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    root: PathBuf,
    folders: Vec<OutputFolder>,
}

impl Catalog {
    /// Scan `root` for per-document output folders, sorted by id.
    ///
    /// A missing or unreadable root yields an empty catalog rather than an
    /// error; the pipeline may simply not have produced anything yet.
    pub fn scan(root: &Path) -> Self {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("outputs root {} not readable: {}", root.display(), err);
                return Self {
                    root: root.to_path_buf(),
                    folders: Vec::new(),
                };
            }
        };

        let mut folders = Vec::new();
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let id = match path.file_name() {
                Some(name) => name.to_string_lossy().to_string(),
                None => continue,
            };
            let modified = entry
                .metadata()
                .ok()
                .and_then(|meta| meta.modified().ok())
                .map(DateTime::<Utc>::from);
            folders.push(OutputFolder {
                validity: classify(&path),
                id,
                modified,
            });
        }

        folders.sort_by(|a, b| a.id.cmp(&b.id));
        debug!("catalog: {} folders under {}", folders.len(), root.display());
        Self {
            root: root.to_path_buf(),
            folders,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every folder, for the overview dashboard.
    pub fn folders(&self) -> &[OutputFolder] {
        &self.folders
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Folders navigable on the review dashboard: citation table present
    /// and inference succeeded.
    pub fn valid_folders(&self) -> Vec<&OutputFolder> {
        self.folders
            .iter()
            .filter(|f| f.validity == FolderValidity::Succeeded)
            .collect()
    }

    /// Folders whose citation table carries the inference-error sentinel.
    /// Folders with no table are excluded from navigation without being
    /// counted as failures.
    pub fn failed_count(&self) -> usize {
        self.folders
            .iter()
            .filter(|f| f.validity == FolderValidity::Failed)
            .count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.folders.iter().any(|f| f.id == id)
    }

    pub fn folder_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }
}

/// Classify a folder by its citation table's first row.
fn classify(dir: &Path) -> FolderValidity {
    let records = artifacts::load_citation_table(&dir.join(CITATIONS_FILE));
    match records.first() {
        Some(row) if row.response == INFERENCE_ERROR_SENTINEL => FolderValidity::Failed,
        Some(_) => FolderValidity::Succeeded,
        None => FolderValidity::NoTable,
    }
}
