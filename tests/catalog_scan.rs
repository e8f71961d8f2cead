//! Tests for catalog scanning and validity classification.
//!
//! Verifies folder ordering, the missing-root fallback, and the sentinel
//! based succeeded/failed/no-table split used by the review dashboard.

use std::fs;
use std::path::Path;

use citeview::catalog::Catalog;
use citeview::models::{FolderValidity, CITATIONS_FILE, INFERENCE_ERROR_SENTINEL};
use citeview::nav::NavigationState;

const CSV_HEADER: &str = "question,accepted_answer,response,citations,citation_matches\n";

/// Write a one-row citation table with the given response value.
fn write_table(dir: &Path, response: &str) {
    let data = format!(
        "{}q,a,{},\"['c1']\",\"[{{'match_text': 'm1', 'similarity': 0.9}}]\"\n",
        CSV_HEADER, response
    );
    fs::write(dir.join(CITATIONS_FILE), data).unwrap();
}

fn make_folder(root: &Path, name: &str) -> std::path::PathBuf {
    let dir = root.join(name);
    fs::create_dir(&dir).unwrap();
    dir
}

// ============================================================================
// scanning
// ============================================================================

#[test]
fn scans_and_sorts_folders_by_id() {
    let root = tempfile::tempdir().unwrap();
    make_folder(root.path(), "C");
    make_folder(root.path(), "A");
    make_folder(root.path(), "B");
    // stray files are not folders
    fs::write(root.path().join("README.txt"), "not a folder").unwrap();

    let catalog = Catalog::scan(root.path());
    let ids: Vec<&str> = catalog.folders().iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(catalog.len(), 3);

    // default selection over a fresh catalog starts at the first folder
    assert_eq!(NavigationState::clamped(0, catalog.len()).index(), 0);
}

#[test]
fn missing_root_yields_empty_catalog() {
    let root = tempfile::tempdir().unwrap();
    let catalog = Catalog::scan(&root.path().join("does-not-exist"));
    assert!(catalog.is_empty());
    assert_eq!(catalog.failed_count(), 0);
}

#[test]
fn folder_dir_joins_root_and_id() {
    let root = tempfile::tempdir().unwrap();
    make_folder(root.path(), "42");

    let catalog = Catalog::scan(root.path());
    assert!(catalog.contains("42"));
    assert!(!catalog.contains("43"));
    assert_eq!(catalog.folder_dir("42"), root.path().join("42"));
}

// ============================================================================
// validity classification
// ============================================================================

#[test]
fn classifies_folders_by_first_row_response() {
    let root = tempfile::tempdir().unwrap();
    write_table(&make_folder(root.path(), "good"), "A real model response");
    write_table(&make_folder(root.path(), "bad"), INFERENCE_ERROR_SENTINEL);
    make_folder(root.path(), "no-table");

    let catalog = Catalog::scan(root.path());
    let validity_of = |id: &str| {
        catalog
            .folders()
            .iter()
            .find(|f| f.id == id)
            .unwrap()
            .validity
    };
    assert_eq!(validity_of("good"), FolderValidity::Succeeded);
    assert_eq!(validity_of("bad"), FolderValidity::Failed);
    assert_eq!(validity_of("no-table"), FolderValidity::NoTable);
}

#[test]
fn review_list_excludes_failed_and_tableless_folders() {
    let root = tempfile::tempdir().unwrap();
    write_table(&make_folder(root.path(), "ok-1"), "answer one");
    write_table(&make_folder(root.path(), "ok-2"), "answer two");
    write_table(&make_folder(root.path(), "failed"), INFERENCE_ERROR_SENTINEL);
    make_folder(root.path(), "no-table");

    let catalog = Catalog::scan(root.path());
    let valid: Vec<&str> = catalog
        .valid_folders()
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(valid, vec!["ok-1", "ok-2"]);

    // only the sentinel counts as a failure; a missing table does not
    assert_eq!(catalog.failed_count(), 1);
    assert_eq!(catalog.len(), 4);
}

#[test]
fn header_only_table_counts_as_no_table() {
    let root = tempfile::tempdir().unwrap();
    let dir = make_folder(root.path(), "empty-table");
    fs::write(dir.join(CITATIONS_FILE), CSV_HEADER).unwrap();

    let catalog = Catalog::scan(root.path());
    assert_eq!(catalog.folders()[0].validity, FolderValidity::NoTable);
    assert_eq!(catalog.failed_count(), 0);
    assert!(catalog.valid_folders().is_empty());
}
