//! HTML templates for the dashboard pages.
//!
//! Hand-rolled `format!` templates over a shared base layout. These are
//! pure functions from loaded artifacts to markup; navigation changes only
//! happen through the links and forms they emit.

use chrono::{DateTime, Utc};

use crate::artifacts::{ImageArtifact, LEAD_IMAGE_HEIGHT};
use crate::models::CitationRecord;
use crate::nav::NavigationState;

/// Overview page artifacts, loaded by the handler. `Err` carries the lead
/// artifact failure for that render pass.
pub struct OverviewBody {
    pub lead: [ImageArtifact; 2],
    pub primary_name: &'static str,
    pub primary_text: String,
    pub secondary_name: &'static str,
    pub secondary_text: String,
    pub secondary_options: Vec<&'static str>,
    pub grid: Vec<ImageArtifact>,
}

pub struct OverviewPage<'a> {
    pub folder_id: &'a str,
    pub modified: Option<DateTime<Utc>>,
    pub nav: NavigationState,
    pub ids: &'a [&'a str],
    pub notice: Option<&'a str>,
    pub cols: u8,
    pub body: Result<OverviewBody, String>,
}

pub struct ReviewPage<'a> {
    pub folder_id: &'a str,
    pub modified: Option<DateTime<Utc>>,
    pub nav: NavigationState,
    pub ids: &'a [&'a str],
    pub notice: Option<&'a str>,
    pub failed_count: usize,
    pub record: CitationRecord,
    /// input / citation_highlighted
    pub lead: [Option<ImageArtifact>; 2],
    /// debug_sections / merged_highlighted
    pub debug_pair: [Option<ImageArtifact>; 2],
    pub unprocessed: String,
    pub processed: String,
}

/// Base HTML layout shared by both dashboards.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - citeview</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">citeview</a>
            <a href="/">overview</a>
            <a href="/review">review</a>
        </nav>
    </header>
    <main>
        <h1>{}</h1>
        {}
    </main>
</body>
</html>"#,
        html_escape(title),
        html_escape(title),
        content
    )
}

/// Render the overview dashboard.
pub fn overview_page(page: &OverviewPage) -> String {
    let preserved = [
        ("cols", page.cols.to_string()),
        ("text", secondary_or_default(page)),
    ];
    let mut content = controls_row(
        "/",
        page.nav,
        page.ids,
        page.folder_id,
        &preserved,
        Some(page.cols),
    );
    content.push_str(&folder_meta(page.modified));
    if let Some(notice) = page.notice {
        content.push_str(&notice_html(notice));
    }

    match &page.body {
        Ok(body) => {
            content.push_str(&lead_image_row(page.folder_id, &body.lead));
            content.push_str(&text_compare_row(page, body));
            content.push_str(&image_grid(page.folder_id, &body.grid, page.cols));
        }
        Err(message) => content.push_str(&render_error(message)),
    }

    base_template(&format!("Folder: {}", page.folder_id), &content)
}

/// Render the review dashboard.
pub fn review_page(page: &ReviewPage) -> String {
    let mut content = format!(
        r#"<p class="failed-count">Number of images that failed LLM inference: {}</p>"#,
        page.failed_count
    );
    content.push_str(&controls_row(
        "/review",
        page.nav,
        page.ids,
        page.folder_id,
        &[],
        None,
    ));
    content.push_str(&folder_meta(page.modified));
    if let Some(notice) = page.notice {
        content.push_str(&notice_html(notice));
    }

    content.push_str(&lenient_image_row(page.folder_id, &page.lead));

    content.push_str(&format!(
        r#"
    <h3>Question and Answer</h3>
    <section class="compare-row">
        <div class="text-cell">
            <h3>Question</h3>
            <pre class="text-panel short">{}</pre>
        </div>
        <div class="text-cell">
            <h3>Accepted Answer</h3>
            <pre class="text-panel short">{}</pre>
        </div>
    </section>
    <div class="text-cell">
        <h3>Response</h3>
        <pre class="text-panel short">{}</pre>
    </div>
    "#,
        html_escape(&page.record.question),
        html_escape(&page.record.accepted_answer),
        html_escape(&page.record.response),
    ));

    content.push_str("<h3>Citations and Matches</h3>");
    content.push_str(&citation_table(&page.record));

    content.push_str("<hr>");
    content.push_str(&lenient_image_row(page.folder_id, &page.debug_pair));

    content.push_str(&format!(
        r#"
    <section class="compare-row">
        <div class="text-cell">
            <h3>Unprocessed Text</h3>
            <pre class="text-panel">{}</pre>
        </div>
        <div class="text-cell">
            <h3>Processed Text</h3>
            <pre class="text-panel">{}</pre>
        </div>
    </section>
    "#,
        html_escape(&page.unprocessed),
        html_escape(&page.processed),
    ));

    base_template(&format!("Folder: {}", page.folder_id), &content)
}

/// Citation comparison table: one row per citation, paired positionally
/// with its best match and similarity score.
pub fn citation_table(record: &CitationRecord) -> String {
    let mut rows = String::new();
    for (citation, best) in record.paired() {
        rows.push_str(&format!(
            r#"
        <tr class="citation-row">
            <td>{}</td>
            <td>{}</td>
            <td class="similarity">{:.3}</td>
        </tr>
        "#,
            html_escape(citation),
            html_escape(&best.match_text),
            best.similarity
        ));
    }

    if rows.is_empty() {
        return "<p>No citations or matches available</p>".to_string();
    }

    format!(
        r#"
    <table class="citation-table">
        <thead>
            <tr>
                <th>Citation</th>
                <th>Match Text</th>
                <th>Similarity</th>
            </tr>
        </thead>
        <tbody>
            {}
        </tbody>
    </table>
    "#,
        rows
    )
}

/// Overview shown when the outputs root has no folders at all.
pub fn empty_catalog_page(root: &std::path::Path) -> String {
    base_template(
        "No output folders",
        &format!(
            "<p>No output folders found under <code>{}</code>. \
             <a href=\"/?rescan=1\">Rescan</a></p>",
            html_escape(&root.display().to_string())
        ),
    )
}

/// Review shown when no folder passed the validity filter.
pub fn empty_review_page(root: &std::path::Path, failed_count: usize) -> String {
    base_template(
        "No reviewable folders",
        &format!(
            r#"<p class="failed-count">Number of images that failed LLM inference: {}</p>
            <p>No folder under <code>{}</code> has a successful citation table.
            <a href="/review?rescan=1">Rescan</a></p>"#,
            failed_count,
            html_escape(&root.display().to_string())
        ),
    )
}

// ---------------------------------------------------------------------------
// building blocks

/// Controls row: previous/next with position, search box, folder dropdown,
/// optional images-per-row slider. `preserved` query pairs keep display
/// state (grid columns, selected text file) across navigation.
fn controls_row(
    action: &str,
    nav: NavigationState,
    ids: &[&str],
    selected: &str,
    preserved: &[(&str, String)],
    slider: Option<u8>,
) -> String {
    let carry: String = preserved
        .iter()
        .map(|(key, value)| format!("&{}={}", key, urlencoding::encode(value)))
        .collect();

    let hidden: String = preserved
        .iter()
        .map(|(key, value)| {
            format!(
                r#"<input type="hidden" name="{}" value="{}">"#,
                key,
                html_escape(value)
            )
        })
        .collect();

    let mut options = String::new();
    for id in ids {
        let flag = if *id == selected { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            html_escape(id),
            flag,
            html_escape(id)
        ));
    }

    let slider_html = match slider {
        Some(cols) => {
            // the slider resubmits cols itself; carry everything else
            let hidden_rest: String = preserved
                .iter()
                .filter(|(key, _)| *key != "cols")
                .map(|(key, value)| {
                    format!(
                        r#"<input type="hidden" name="{}" value="{}">"#,
                        key,
                        html_escape(value)
                    )
                })
                .collect();
            format!(
                r#"
        <form method="get" action="{action}" class="slider-form">
            <input type="hidden" name="idx" value="{idx}">
            {hidden_rest}
            <label>Images per row
                <input type="range" name="cols" min="1" max="5" value="{cols}"
                       onchange="this.form.submit()">
                <span class="cols-value">{cols}</span>
            </label>
        </form>
        "#,
                action = action,
                idx = nav.index(),
                hidden_rest = hidden_rest,
                cols = cols,
            )
        }
        None => String::new(),
    };

    format!(
        r#"
    <div class="controls">
        <nav class="doc-navigation">
            <a href="{action}?idx={prev}{carry}" class="doc-nav-link prev">&larr; Previous</a>
            <span class="doc-position">{position} of {total}</span>
            <a href="{action}?idx={next}{carry}" class="doc-nav-link next">Next &rarr;</a>
        </nav>
        <form method="get" action="{action}" class="search-form">
            <input type="hidden" name="idx" value="{position_idx}">
            {hidden}
            <input type="text" name="search" placeholder="Search ID" autocomplete="off">
        </form>
        <select class="folder-select"
                onchange="window.location='{action}?folder=' + encodeURIComponent(this.value) + '{carry}'">
            {options}
        </select>
        {slider}
    </div>
    "#,
        action = action,
        prev = nav.previous().index(),
        next = nav.next().index(),
        position = nav.index() + 1,
        position_idx = nav.index(),
        total = nav.len(),
        carry = carry,
        hidden = hidden,
        options = options,
        slider = slider_html,
    )
}

fn folder_meta(modified: Option<DateTime<Utc>>) -> String {
    match modified {
        Some(dt) => format!(
            r#"<p class="folder-meta">modified {}</p>"#,
            dt.format("%Y-%m-%d %H:%M")
        ),
        None => String::new(),
    }
}

fn notice_html(notice: &str) -> String {
    format!(r#"<p class="notice">{}</p>"#, html_escape(notice))
}

fn render_error(message: &str) -> String {
    format!(
        r#"
    <section class="render-error">
        <h3>Folder failed to render</h3>
        <p>{}</p>
    </section>
    "#,
        html_escape(message)
    )
}

/// The strict lead pair: both images at a common height, width scaled to
/// preserve aspect ratio.
fn lead_image_row(folder_id: &str, lead: &[ImageArtifact; 2]) -> String {
    let cells: String = lead
        .iter()
        .map(|img| {
            format!(
                r#"
        <figure class="compare-cell">
            <figcaption>{}</figcaption>
            <img src="{}" width="{}" height="{}" alt="{}">
        </figure>
        "#,
                html_escape(&format_artifact_name(&img.name)),
                artifact_url(folder_id, &img.name),
                img.display_width(LEAD_IMAGE_HEIGHT),
                LEAD_IMAGE_HEIGHT,
                html_escape(&img.name)
            )
        })
        .collect();

    format!(r#"<section class="compare-row">{}</section>"#, cells)
}

/// A lenient image pair: placeholders for whatever failed to load.
fn lenient_image_row(folder_id: &str, pair: &[Option<ImageArtifact>; 2]) -> String {
    let cells: String = pair
        .iter()
        .map(|slot| match slot {
            Some(img) => format!(
                r#"
        <figure class="compare-cell">
            <figcaption>{}</figcaption>
            <img src="{}" class="fluid" alt="{}">
        </figure>
        "#,
                html_escape(&format_artifact_name(&img.name)),
                artifact_url(folder_id, &img.name),
                html_escape(&img.name)
            ),
            None => r#"
        <figure class="compare-cell">
            <div class="no-image">No image available</div>
        </figure>
        "#
            .to_string(),
        })
        .collect();

    format!(r#"<section class="compare-row">{}</section>"#, cells)
}

/// First text file beside the user-selected secondary text file.
fn text_compare_row(page: &OverviewPage, body: &OverviewBody) -> String {
    let mut options = String::new();
    for name in &body.secondary_options {
        let flag = if *name == body.secondary_name {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            r#"<option value="{name}"{flag}>{name}</option>"#,
            name = name,
            flag = flag
        ));
    }

    format!(
        r#"
    <section class="compare-row">
        <div class="text-cell">
            <h3>{primary_title}</h3>
            <pre class="text-panel">{primary}</pre>
        </div>
        <div class="text-cell">
            <form method="get" action="/" class="text-select-form">
                <input type="hidden" name="idx" value="{idx}">
                <input type="hidden" name="cols" value="{cols}">
                <label>Text file
                    <select name="text" onchange="this.form.submit()">{options}</select>
                </label>
            </form>
            <h3>{secondary_title}</h3>
            <pre class="text-panel">{secondary}</pre>
        </div>
    </section>
    "#,
        primary_title = html_escape(&format_artifact_name(body.primary_name)),
        primary = html_escape(&body.primary_text),
        idx = page.nav.index(),
        cols = page.cols,
        options = options,
        secondary_title = html_escape(&format_artifact_name(body.secondary_name)),
        secondary = html_escape(&body.secondary_text),
    )
}

/// Trailing images tiled into a user-configurable column grid.
fn image_grid(folder_id: &str, grid: &[ImageArtifact], cols: u8) -> String {
    if grid.is_empty() {
        return String::new();
    }

    let cells: String = grid
        .iter()
        .map(|img| {
            format!(
                r#"
        <figure class="grid-cell">
            <figcaption>{}</figcaption>
            <img src="{}" class="fluid" alt="{}">
        </figure>
        "#,
                html_escape(&format_artifact_name(&img.name)),
                artifact_url(folder_id, &img.name),
                html_escape(&img.name)
            )
        })
        .collect();

    format!(
        r#"<section class="image-grid" style="grid-template-columns: repeat({}, 1fr);">{}</section>"#,
        cols, cells
    )
}

fn artifact_url(folder_id: &str, file: &str) -> String {
    format!(
        "/artifacts/{}/{}",
        urlencoding::encode(folder_id),
        urlencoding::encode(file)
    )
}

fn secondary_or_default(page: &OverviewPage) -> String {
    match &page.body {
        Ok(body) => body.secondary_name.to_string(),
        Err(_) => crate::models::TEXT_ARTIFACTS[1].to_string(),
    }
}

/// "merged_highlighted.png" -> "Merged highlighted".
pub fn format_artifact_name(file_name: &str) -> String {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    let spaced = stem.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => spaced,
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// CSS styles for the dashboards - minimal text-based design.
pub const CSS: &str = r#"
:root {
    --bg: #fff;
    --text: #222;
    --text-muted: #666;
    --link: #0066cc;
    --link-hover: #004499;
    --border: #ccc;
    --panel-bg: #f5f5f5;
    --highlight: #fffbcc;
    --warn: #8a6d00;
    --error: #cc3333;
}

@media (prefers-color-scheme: dark) {
    :root {
        --bg: #1a1a1a;
        --text: #e0e0e0;
        --text-muted: #888;
        --link: #6ab0ff;
        --link-hover: #8dc4ff;
        --border: #444;
        --panel-bg: #252525;
        --highlight: #3a3520;
        --warn: #e0c366;
        --error: #ff6b6b;
    }
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: 'Lucida Console', 'Courier New', monospace;
    font-size: 14px;
    background: var(--bg);
    color: var(--text);
    line-height: 1.5;
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }

#main-header {
    border-bottom: 1px solid var(--border);
    padding: 0.5rem 1rem;
    font-size: 13px;
}

#main-header nav {
    display: flex;
    gap: 1.5rem;
    align-items: center;
}

#main-header .logo {
    font-weight: bold;
    letter-spacing: 1px;
}

main {
    max-width: 1400px;
    margin: 0 auto;
    padding: 1rem;
}

h1 {
    font-size: 16px;
    font-weight: bold;
    margin-bottom: 1rem;
    border-bottom: 1px solid var(--border);
    padding-bottom: 0.5rem;
}

h3 {
    font-size: 14px;
    margin: 1rem 0 0.5rem;
}

hr {
    border: none;
    border-top: 1px solid var(--border);
    margin: 1.5rem 0;
}

code {
    font-family: inherit;
    background: var(--panel-bg);
    padding: 1px 4px;
}

/* Controls row */
.controls {
    display: flex;
    flex-wrap: wrap;
    gap: 1rem;
    align-items: center;
    padding: 0.75rem;
    background: var(--panel-bg);
    border: 1px solid var(--border);
    margin-bottom: 0.75rem;
}

.doc-navigation {
    display: flex;
    gap: 0.75rem;
    align-items: center;
}

.doc-nav-link {
    padding: 0.25rem 0.5rem;
    border: 1px solid var(--border);
}

.doc-nav-link:hover { background: var(--highlight); text-decoration: none; }

.doc-position {
    font-size: 12px;
    color: var(--text-muted);
}

.search-form input[type="text"] {
    padding: 0.35rem 0.5rem;
    font-size: 12px;
    font-family: inherit;
    border: 1px solid var(--border);
    background: var(--bg);
    color: var(--text);
    min-width: 160px;
}

.search-form input[type="text"]:focus {
    outline: none;
    border-color: var(--link);
}

.folder-select,
.text-select-form select {
    padding: 0.35rem 0.5rem;
    font-size: 12px;
    font-family: inherit;
    border: 1px solid var(--border);
    background: var(--bg);
    color: var(--text);
    min-width: 150px;
    cursor: pointer;
}

.slider-form label {
    display: flex;
    gap: 0.5rem;
    align-items: center;
    font-size: 12px;
    color: var(--text-muted);
}

.slider-form input[type="range"] {
    width: 120px;
    height: 4px;
    -webkit-appearance: none;
    background: var(--border);
    border-radius: 2px;
}

.slider-form input[type="range"]::-webkit-slider-thumb {
    -webkit-appearance: none;
    width: 12px;
    height: 12px;
    background: var(--link);
    border-radius: 50%;
    cursor: pointer;
}

.folder-meta {
    font-size: 12px;
    color: var(--text-muted);
    margin-bottom: 0.75rem;
}

.notice {
    padding: 0.5rem 0.75rem;
    border: 1px solid var(--warn);
    color: var(--warn);
    background: var(--highlight);
    font-size: 13px;
    margin-bottom: 0.75rem;
}

.failed-count {
    font-size: 13px;
    color: var(--text-muted);
    margin-bottom: 0.75rem;
}

/* Side-by-side comparison */
.compare-row {
    display: grid;
    grid-template-columns: 1fr 1fr;
    gap: 1rem;
    margin: 1rem 0;
}

.compare-cell {
    min-width: 0;
    overflow-x: auto;
}

.compare-cell figcaption {
    font-size: 13px;
    font-weight: bold;
    margin-bottom: 0.25rem;
}

.compare-cell img { border: 1px solid var(--border); }

img.fluid { max-width: 100%; height: auto; }

.no-image {
    display: flex;
    align-items: center;
    justify-content: center;
    min-height: 120px;
    border: 1px dashed var(--border);
    color: var(--text-muted);
    font-size: 12px;
}

.text-cell { min-width: 0; }

.text-panel {
    background: var(--panel-bg);
    padding: 0.75rem;
    font-size: 12px;
    overflow-x: auto;
    white-space: pre-wrap;
    word-wrap: break-word;
    height: 400px;
    overflow-y: auto;
    border: 1px solid var(--border);
}

.text-panel.short { height: 200px; }

.text-select-form { margin-bottom: 0.5rem; font-size: 12px; }

/* Trailing image grid */
.image-grid {
    display: grid;
    gap: 1rem;
    margin: 1rem 0;
}

.grid-cell { min-width: 0; }

.grid-cell figcaption {
    font-size: 13px;
    font-weight: bold;
    margin-bottom: 0.25rem;
}

.grid-cell img { border: 1px solid var(--border); }

/* Citation comparison table */
.citation-table {
    width: 100%;
    border-collapse: collapse;
    font-size: 13px;
    margin: 0.5rem 0 1rem;
}

.citation-table th,
.citation-table td {
    padding: 0.4rem 0.75rem;
    text-align: left;
    border-bottom: 1px solid var(--border);
    vertical-align: top;
}

.citation-table th {
    font-weight: bold;
    color: var(--text-muted);
    font-size: 11px;
    text-transform: uppercase;
    letter-spacing: 0.5px;
}

.citation-table tr:hover { background: var(--highlight); }

.citation-table .similarity { white-space: nowrap; }

/* Overview contract failure */
.render-error {
    padding: 0.75rem;
    border: 1px solid var(--error);
    color: var(--error);
    font-size: 13px;
    margin: 1rem 0;
}

.render-error h3 { margin-top: 0; }
"#;
