//! The document collection: scanning and parsing combined.
//!
//! [`Store`] is a stateless repository over a store directory. Every call
//! re-reads the filesystem; nothing is cached between calls, so two calls
//! with no filesystem change in between return equal results.
//!
//! ## Ordering
//!
//! [`Store::list`] returns documents newest first. Documents published at the
//! same instant are ordered by slug, ascending, so the order is fully
//! determined by the store contents.
//!
//! ## Failure policy
//!
//! Listing is fail-fast: one malformed document aborts the whole listing and
//! its error (naming the file) is returned. A document is malformed when its
//! frontmatter does not parse, when `title` or `date` is missing, when `date`
//! is not a recognizable calendar date, or when a known field has the wrong
//! shape (e.g. `tags: 3`). No partial collection is ever returned.
//!
//! A missing store directory and a lookup of an unknown slug are not
//! failures: they yield an empty list and `None` respectively.
//!
//! ## Lookup
//!
//! [`Store::get`] only finds what [`Store::list`] would list: the slug must
//! be the exact name of a store entry minus its extension. The slug of a
//! returned document is always that entry name, even where the filesystem
//! itself would resolve `HELLO.mdx` to `hello.mdx`.

use crate::config::SiteConfig;
use crate::frontmatter::{self, FrontmatterError};
use crate::naming;
use crate::scan::{self, ScanError};
use crate::types::{Document, KNOWN_FIELDS, Metadata, key_text};
use serde_yaml_ng::{Mapping, Value};
use std::cmp::Reverse;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error};

/// Extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "mdx";

const REQUIRED_FIELDS: [&str; 2] = ["title", "date"];

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },
    #[error("{path}: missing required frontmatter field `{field}`")]
    MissingField { path: PathBuf, field: &'static str },
    #[error("{path}: `date` is not a calendar date: {value:?}")]
    InvalidDate { path: PathBuf, value: String },
    #[error("{path}: invalid frontmatter field: {source}")]
    InvalidField {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

impl CollectionError {
    /// The document that caused the error, if the error is about one file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            CollectionError::Scan(_) => None,
            CollectionError::Io { path, .. }
            | CollectionError::Parse { path, .. }
            | CollectionError::MissingField { path, .. }
            | CollectionError::InvalidDate { path, .. }
            | CollectionError::InvalidField { path, .. } => Some(path),
        }
    }
}

/// A directory of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    root: PathBuf,
    extension: String,
}

impl Store {
    /// A store of `.mdx` documents in `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Use a different content extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// The store configured by `[blog]` under a content root.
    pub fn from_config(content_root: &Path, config: &SiteConfig) -> Self {
        Self::new(content_root.join(&config.blog.posts_dir)).with_extension(&config.blog.extension)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Every document in the store, newest first.
    pub fn list(&self) -> Result<Vec<Document>, CollectionError> {
        let candidates = scan::scan_store(&self.root, &self.extension)?;
        let mut documents = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let document = load_document(&candidate.path, &candidate.slug).inspect_err(|e| {
                error!(path = %candidate.path.display(), error = %e, "malformed document, aborting listing");
            })?;
            documents.push(document);
        }
        sort_collection(&mut documents);
        debug!(store = %self.root.display(), count = documents.len(), "listed collection");
        Ok(documents)
    }

    /// The document stored under `slug`, or `None` if there is none.
    pub fn get(&self, slug: &str) -> Result<Option<Document>, CollectionError> {
        let Some(file_name) = naming::file_name_for_slug(slug, &self.extension) else {
            debug!(slug, "not a plain slug");
            return Ok(None);
        };
        // Compare real entry names; the filesystem may fold case.
        let candidates = scan::scan_store(&self.root, &self.extension)?;
        let Some(candidate) = candidates.into_iter().find(|c| c.file_name() == file_name) else {
            debug!(slug, store = %self.root.display(), "no such document");
            return Ok(None);
        };
        match load_document(&candidate.path, &candidate.slug) {
            Ok(document) => Ok(Some(document)),
            // Removed between the check and the read.
            Err(CollectionError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Read and parse one document file.
pub fn load_document(path: &Path, slug: &str) -> Result<Document, CollectionError> {
    let content = fs::read_to_string(path).map_err(|source| CollectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = frontmatter::parse(&content).map_err(|source| CollectionError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata = typed_metadata(parsed.metadata, path)?;
    Ok(Document {
        slug: slug.to_string(),
        metadata,
        body: parsed.body,
    })
}

/// Convert a raw frontmatter mapping into [`Metadata`].
///
/// A required field that is present but null (`title:`) counts as missing.
/// Only the typed fields are checked for shape; every other entry goes into
/// [`Metadata::extra`] untouched, whatever YAML made of its key.
pub fn typed_metadata(mut mapping: Mapping, path: &Path) -> Result<Metadata, CollectionError> {
    for field in REQUIRED_FIELDS {
        if mapping.get(field).is_none_or(Value::is_null) {
            return Err(CollectionError::MissingField {
                path: path.to_path_buf(),
                field,
            });
        }
    }

    let mut known = Mapping::new();
    for field in KNOWN_FIELDS {
        if let Some(value) = mapping.remove(field) {
            known.insert(Value::from(field), value);
        }
    }
    let mut metadata: Metadata = serde_yaml_ng::from_value(Value::Mapping(known)).map_err(|source| {
        CollectionError::InvalidField {
            path: path.to_path_buf(),
            source,
        }
    })?;
    metadata.extra = mapping
        .into_iter()
        .map(|(key, value)| (key_text(&key), value))
        .collect();

    if metadata.published().is_none() {
        return Err(CollectionError::InvalidDate {
            path: path.to_path_buf(),
            value: metadata.date,
        });
    }
    Ok(metadata)
}

/// Sort newest first, ties by slug ascending.
pub fn sort_collection(documents: &mut [Document]) {
    documents.sort_by_cached_key(|d| (Reverse(d.metadata.published()), d.slug.clone()));
}
