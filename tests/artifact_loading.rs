//! Tests for artifact loading: placeholder text, strict versus lenient
//! image probing, and citation-table parsing.

use std::fs;
use std::path::Path;

use citeview::artifacts::{self, LEAD_IMAGE_HEIGHT, MISSING_TEXT};
use citeview::models::CITATIONS_FILE;

const CSV_HEADER: &str = "question,accepted_answer,response,citations,citation_matches\n";

fn write_csv(path: &Path, rows: &[&str]) {
    let mut data = String::from(CSV_HEADER);
    for row in rows {
        data.push_str(row);
        data.push('\n');
    }
    fs::write(path, data).unwrap();
}

// ============================================================================
// text artifacts
// ============================================================================

#[test]
fn missing_text_file_returns_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        artifacts::load_text(dir.path(), "unprocessed_text.txt"),
        MISSING_TEXT
    );
    assert_eq!(MISSING_TEXT, "File not found");
}

#[test]
fn existing_text_file_returns_contents() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("processed_text.txt"), "line one\nline two").unwrap();
    assert_eq!(
        artifacts::load_text(dir.path(), "processed_text.txt"),
        "line one\nline two"
    );
}

// ============================================================================
// image artifacts
// ============================================================================

#[test]
fn strict_probe_fails_on_missing_image() {
    let dir = tempfile::tempdir().unwrap();
    assert!(artifacts::image_artifact(dir.path(), "input.png").is_err());
}

#[test]
fn lenient_probe_returns_none_on_missing_or_corrupt_image() {
    let dir = tempfile::tempdir().unwrap();
    assert!(artifacts::try_image_artifact(dir.path(), "input.png").is_none());

    fs::write(dir.path().join("input.png"), b"definitely not a png").unwrap();
    assert!(artifacts::try_image_artifact(dir.path(), "input.png").is_none());
    assert!(artifacts::image_artifact(dir.path(), "input.png").is_err());
}

#[test]
fn probe_reads_dimensions_and_scales_display_width() {
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::new(8, 4)
        .save(dir.path().join("input.png"))
        .unwrap();

    let img = artifacts::image_artifact(dir.path(), "input.png").unwrap();
    assert_eq!((img.width, img.height), (8, 4));
    // aspect ratio preserved at the fixed comparison height
    assert_eq!(img.display_width(LEAD_IMAGE_HEIGHT), 2 * LEAD_IMAGE_HEIGHT);
}

// ============================================================================
// citation tables
// ============================================================================

#[test]
fn absent_table_yields_no_records() {
    let dir = tempfile::tempdir().unwrap();
    assert!(artifacts::load_citation_table(&dir.path().join(CITATIONS_FILE)).is_empty());
}

#[test]
fn empty_table_yields_no_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CITATIONS_FILE);
    fs::write(&path, CSV_HEADER).unwrap();
    assert!(artifacts::load_citation_table(&path).is_empty());
}

#[test]
fn parses_citations_and_matches_positionally() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CITATIONS_FILE);
    write_csv(
        &path,
        &[concat!(
            "What is cited?,The accepted answer,The model response,",
            "\"['first span', 'second span']\",",
            "\"[{'match_text': 'located one', 'similarity': 0.91}, ",
            "{'match_text': 'located two', 'similarity': 0.82}]\"",
        )],
    );

    let records = artifacts::load_citation_table(&path);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.question, "What is cited?");
    assert_eq!(record.response, "The model response");
    assert_eq!(record.citations.len(), 2);
    assert_eq!(record.citation_matches.len(), 2);

    let pairs: Vec<_> = record.paired().collect();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].0, "first span");
    assert_eq!(pairs[0].1.match_text, "located one");
    assert!((pairs[1].1.similarity - 0.82).abs() < 1e-9);
}

#[test]
fn malformed_sequence_cells_degrade_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CITATIONS_FILE);
    write_csv(
        &path,
        &["q,a,resp,not a list at all,\"[{'match_text': 'm', 'similarity': 0.5}]\""],
    );

    let records = artifacts::load_citation_table(&path);
    assert_eq!(records.len(), 1);
    // scalar fields survive; the unparseable cell becomes empty
    assert_eq!(records[0].response, "resp");
    assert!(records[0].citations.is_empty());
    assert_eq!(records[0].citation_matches.len(), 1);
    // nothing to pair against
    assert_eq!(records[0].paired().count(), 0);
}

#[test]
fn unequal_sequences_pair_up_to_the_shorter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CITATIONS_FILE);
    write_csv(
        &path,
        &[concat!(
            "q,a,resp,",
            "\"['one', 'two', 'three']\",",
            "\"[{'match_text': 'm1', 'similarity': 1.0}, ",
            "{'match_text': 'm2', 'similarity': 0.5}]\"",
        )],
    );

    let records = artifacts::load_citation_table(&path);
    assert_eq!(records[0].citations.len(), 3);
    assert_eq!(records[0].paired().count(), 2);
}

#[test]
fn empty_cells_are_empty_sequences() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CITATIONS_FILE);
    write_csv(&path, &["q,a,Error infering LLM,,"]);

    let records = artifacts::load_citation_table(&path);
    assert_eq!(records.len(), 1);
    assert!(records[0].citations.is_empty());
    assert!(records[0].citation_matches.is_empty());
}
