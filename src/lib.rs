//! # Simple Folio
//!
//! A minimal static generator for a personal blog and portfolio. A flat
//! directory of post files is the data source: the file name is the slug, a
//! YAML header carries the metadata, and the rest is markdown.
//!
//! # Architecture: Content Pipeline
//!
//! ```text
//! 1. Scan        posts/          →  candidates    (file name → slug)
//! 2. Parse       candidate file  →  header + body (YAML frontmatter split)
//! 3. Assemble    documents       →  collection    (validated, newest first)
//! 4. Generate    collection      →  dist/         (final HTML site)
//! ```
//!
//! Stages 1–3 sit behind [`collection::Store`], which offers two operations:
//! `list()` for the whole collection and `get(slug)` for a single post. Both
//! read the store fresh on every call; there is no cache to invalidate.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Enumerates content files in the store directory |
//! | [`frontmatter`] | Splits a `---`-delimited YAML header from the body |
//! | [`collection`] | Validates metadata, assembles and orders the collection |
//! | [`render`] | Markdown body rendering: embeds, annotated code, essay styling |
//! | [`generate`] | Renders the final HTML site using Maud |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | `Document` and `Metadata`, date parsing and display |
//! | [`naming`] | Slug ↔ file name mapping |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fail-Fast Listing
//!
//! One malformed post fails the whole listing, naming the offending file.
//! A build that silently drops a post is worse than a build that stops.
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed templates are build errors and all interpolation is
//! auto-escaped, so frontmatter values can never inject markup.
//!
//! ## Slugs Are File Names
//!
//! A slug maps to exactly one file, `<slug>.<extension>`, in the store
//! directory. Lookups never walk outside the store: a slug containing a path
//! separator or starting with a dot simply does not exist.

pub mod collection;
pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod naming;
pub mod output;
pub mod render;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
