//! Request handlers for the two dashboards.
//!
//! Navigation is stateless: every request rebuilds a `NavigationState` from
//! its query parameters, applies at most one selection action (dropdown
//! beats search beats raw index), and renders. The catalog cache is the
//! only shared state and is only rewritten on an explicit rescan.

use std::path::Path;

use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::artifacts::{self, ImageArtifact};
use crate::models::{is_known_artifact, CitationRecord, CITATIONS_FILE, IMAGE_ARTIFACTS, TEXT_ARTIFACTS};
use crate::nav::{NavigationState, SearchOutcome};

use super::templates::{self, OverviewBody, OverviewPage, ReviewPage};
use super::AppState;

/// Grid column bounds for the overview's trailing image grid.
const MIN_GRID_COLS: u8 = 1;
const MAX_GRID_COLS: u8 = 5;
const DEFAULT_GRID_COLS: u8 = 2;

#[derive(Debug, Deserialize)]
pub struct OverviewParams {
    idx: Option<usize>,
    search: Option<String>,
    folder: Option<String>,
    cols: Option<u8>,
    text: Option<String>,
    rescan: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewParams {
    idx: Option<usize>,
    search: Option<String>,
    folder: Option<String>,
    rescan: Option<u8>,
}

/// Overview dashboard: every folder, lead artifact comparison plus the
/// remaining images in a configurable grid.
pub async fn overview(
    State(state): State<AppState>,
    Query(params): Query<OverviewParams>,
) -> Html<String> {
    if params.rescan.is_some() {
        state.rescan().await;
    }
    let catalog = state.catalog.read().await;
    let ids: Vec<&str> = catalog.folders().iter().map(|f| f.id.as_str()).collect();
    let cols = params
        .cols
        .unwrap_or(DEFAULT_GRID_COLS)
        .clamp(MIN_GRID_COLS, MAX_GRID_COLS);

    if ids.is_empty() {
        return Html(templates::empty_catalog_page(catalog.root()));
    }

    let (nav, notice) = resolve_selection(
        &ids,
        params.idx,
        params.folder.as_deref(),
        params.search.as_deref(),
    );

    let folder = &catalog.folders()[nav.index()];
    let dir = catalog.folder_dir(&folder.id);
    let body = load_overview_body(&dir, params.text.as_deref());

    Html(templates::overview_page(&OverviewPage {
        folder_id: &folder.id,
        modified: folder.modified,
        nav,
        ids: &ids,
        notice: notice.as_deref(),
        cols,
        body,
    }))
}

/// Review dashboard: folders with a successful inference only, plus the
/// citation comparison table and QA panels.
pub async fn review(
    State(state): State<AppState>,
    Query(params): Query<ReviewParams>,
) -> Html<String> {
    if params.rescan.is_some() {
        state.rescan().await;
    }
    let catalog = state.catalog.read().await;
    let valid = catalog.valid_folders();
    let ids: Vec<&str> = valid.iter().map(|f| f.id.as_str()).collect();
    let failed_count = catalog.failed_count();

    if ids.is_empty() {
        return Html(templates::empty_review_page(catalog.root(), failed_count));
    }

    let (nav, notice) = resolve_selection(
        &ids,
        params.idx,
        params.folder.as_deref(),
        params.search.as_deref(),
    );

    let folder = valid[nav.index()];
    let dir = catalog.folder_dir(&folder.id);

    let record: CitationRecord = artifacts::load_citation_table(&dir.join(CITATIONS_FILE))
        .into_iter()
        .next()
        .unwrap_or_default();

    // input / citation_highlighted, then debug_sections / merged_highlighted
    let lead = [
        artifacts::try_image_artifact(&dir, "input.png"),
        artifacts::try_image_artifact(&dir, "citation_highlighted.png"),
    ];
    let debug_pair = [
        artifacts::try_image_artifact(&dir, "debug_sections.png"),
        artifacts::try_image_artifact(&dir, "merged_highlighted.png"),
    ];

    let unprocessed = artifacts::load_text(&dir, TEXT_ARTIFACTS[0]);
    let processed = artifacts::load_text(&dir, TEXT_ARTIFACTS[1]);

    Html(templates::review_page(&ReviewPage {
        folder_id: &folder.id,
        modified: folder.modified,
        nav,
        ids: &ids,
        notice: notice.as_deref(),
        failed_count,
        record,
        lead,
        debug_pair,
        unprocessed,
        processed,
    }))
}

/// Serve raw artifact bytes for the currently browsable folders.
///
/// The folder must exist in the catalog and the filename must be one of the
/// fixed artifact names; the whitelist doubles as traversal protection.
pub async fn artifact_file(
    State(state): State<AppState>,
    UrlPath((folder, file)): UrlPath<(String, String)>,
) -> Response {
    let catalog = state.catalog.read().await;
    if !catalog.contains(&folder) || !is_known_artifact(&file) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = catalog.folder_dir(&folder).join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.to_string())], bytes).into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Apply at most one selection action on top of the clamped index.
fn resolve_selection(
    ids: &[&str],
    idx: Option<usize>,
    exact: Option<&str>,
    search: Option<&str>,
) -> (NavigationState, Option<String>) {
    let mut nav = NavigationState::clamped(idx.unwrap_or(0), ids.len());
    let mut notice = None;

    if let Some(name) = exact {
        nav.select_by_exact(ids, name);
    } else if let Some(query) = search.map(str::trim).filter(|q| !q.is_empty()) {
        if nav.select_by_name(ids, query) == SearchOutcome::NotFound {
            notice = Some(format!("No folder id matching \"{}\"", query));
        }
    }
    (nav, notice)
}

/// Load the overview's artifacts. The lead image pair is a pipeline
/// contract: a missing or unreadable one fails this render pass, and the
/// page shows the failure instead of a patched layout. Trailing grid images
/// are skipped when absent.
fn load_overview_body(
    dir: &Path,
    selected_text: Option<&str>,
) -> Result<OverviewBody, String> {
    let first = artifacts::image_artifact(dir, IMAGE_ARTIFACTS[0]);
    let second = artifacts::image_artifact(dir, IMAGE_ARTIFACTS[1]);
    let (first, second) = match (first, second) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(err), _) | (_, Err(err)) => return Err(format!("{:#}", err)),
    };

    let secondary_options: Vec<&'static str> = TEXT_ARTIFACTS[1..].to_vec();
    let secondary_name = match selected_text {
        Some(name) => secondary_options
            .iter()
            .copied()
            .find(|opt| *opt == name)
            .unwrap_or(secondary_options[0]),
        None => secondary_options[0],
    };

    let grid: Vec<ImageArtifact> = IMAGE_ARTIFACTS[2..]
        .iter()
        .filter_map(|name| artifacts::try_image_artifact(dir, name))
        .collect();

    Ok(OverviewBody {
        lead: [first, second],
        primary_name: TEXT_ARTIFACTS[0],
        primary_text: artifacts::load_text(dir, TEXT_ARTIFACTS[0]),
        secondary_name,
        secondary_text: artifacts::load_text(dir, secondary_name),
        secondary_options,
        grid,
    })
}
