//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every post is shown by its semantic identity (positional index and title)
//! with the slug, date, and source file as indented context lines. The output
//! reads as a content inventory while still tracing each entry back to its file.
//!
//! # Output Format
//!
//! ## List / Check
//!
//! ```text
//! Posts
//! 001 Hello World
//!     Slug: hello-world
//!     Date: 2024.03.01
//!     Tags: rust, notes
//!     Source: posts/hello-world.mdx
//!
//! 1 post
//! ```
//!
//! ## Build
//!
//! ```text
//! Folio → index.html
//! About → about/index.html
//! ...
//! Posts
//! 001 Hello World → blog/hello-world/index.html
//!
//! Generated 5 pages, 1 post, 1 asset
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::collection::Store;
use crate::generate::BuildReport;
use crate::types::{Document, display_date};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte, _)) => format!("{}...", &text[..byte]),
        None => text.to_string(),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Context lines shared by `list`, `check` and `show`.
fn document_context(document: &Document, store: &Store, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let metadata = &document.metadata;
    let mut lines = vec![
        format!("{pad}Slug: {}", document.slug),
        format!("{pad}Date: {}", display_date(&metadata.date)),
    ];
    if !metadata.tags.is_empty() {
        lines.push(format!("{pad}Tags: {}", metadata.tags.join(", ")));
    }
    if let Some(desc) = &metadata.description {
        lines.push(format!("{pad}Description: {}", truncate_desc(desc, 60)));
    }
    if metadata.draft == Some(true) {
        lines.push(format!("{pad}Draft"));
    }
    lines.push(format!(
        "{pad}Source: {}",
        store
            .root()
            .join(format!("{}.{}", document.slug, store.extension()))
            .display()
    ));
    lines
}

// ============================================================================
// list
// ============================================================================

/// Format the collection in listing order.
pub fn format_list_output(documents: &[Document], store: &Store) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];
    for (i, document) in documents.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), document.metadata.title));
        lines.extend(document_context(document, store, 1));
    }
    if documents.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    lines.push(String::new());
    lines.push(plural(documents.len(), "post"));
    lines
}

pub fn print_list_output(documents: &[Document], store: &Store) {
    for line in format_list_output(documents, store) {
        println!("{}", line);
    }
}

// ============================================================================
// show
// ============================================================================

/// Format a single document: header, context, then the raw body.
pub fn format_show_output(document: &Document, store: &Store) -> Vec<String> {
    let mut lines = vec![document.metadata.title.clone()];
    lines.extend(document_context(document, store, 1));
    if !document.metadata.extra.is_empty() {
        let keys: Vec<&str> = document.metadata.extra.keys().map(String::as_str).collect();
        lines.push(format!("{}Extra fields: {}", indent(1), keys.join(", ")));
    }
    lines.push(String::new());
    lines.extend(document.body.lines().map(str::to_string));
    lines
}

pub fn print_show_output(document: &Document, store: &Store) {
    for line in format_show_output(document, store) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format generated pages, with output paths relative to the output directory.
pub fn format_generate_output(report: &BuildReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .map(|page| format!("{} → {}", page.title, page.path))
        .collect();

    if !report.posts.is_empty() {
        lines.push(String::new());
        lines.push("Posts".to_string());
        for (i, post) in report.posts.iter().enumerate() {
            lines.push(format!("{} {} → {}", format_index(i + 1), post.title, post.path));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}",
        plural(report.pages.len(), "page"),
        plural(report.posts.len(), "post"),
        plural(report.assets_copied, "asset"),
    ));
    lines
}

pub fn print_generate_output(report: &BuildReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}
