//! Document store scanning.
//!
//! Lists the content files in the store directory. The store is flat:
//!
//! ```text
//! content/posts/
//! ├── hello-world.mdx      # slug "hello-world"
//! ├── on-craft.mdx         # slug "on-craft"
//! ├── notes.md             # ignored (wrong extension)
//! ├── .draft.mdx           # ignored (hidden)
//! └── drafts/              # ignored (no recursion)
//!     └── later.mdx
//! ```
//!
//! ## Rules
//!
//! - A missing store directory is an empty store, not an error. It models
//!   "nothing published yet".
//! - Only regular files whose name ends in `.<extension>` qualify. The match
//!   is exact, so `a.mdx` and `a.MDX` can never collapse into one slug.
//! - Symbolic links are followed: a link to a regular file qualifies, a link
//!   to a directory or a dangling link does not.
//! - Hidden entries and non-UTF-8 filenames are skipped.
//! - Results are sorted by slug so every later stage sees a stable order.

use crate::naming;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read store directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file in the store that qualifies as a document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Candidate {
    pub slug: String,
    pub path: PathBuf,
}

impl Candidate {
    /// Filename relative to the store root, for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// List the documents in `root`, sorted by slug.
pub fn scan_store(root: &Path, extension: &str) -> Result<Vec<Candidate>, ScanError> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(store = %root.display(), "store directory absent, treating as empty");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(ScanError::Io {
                path: root.to_path_buf(),
                source,
            });
        }
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ScanError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            warn!(path = %path.display(), "skipping non UTF-8 filename");
            continue;
        };
        let Some(slug) = naming::slug_from_file_name(file_name, extension) else {
            continue;
        };
        // `is_file` follows symlinks.
        if !path.is_file() {
            continue;
        }
        debug!(slug, path = %path.display(), "found document");
        candidates.push(Candidate {
            slug: slug.to_string(),
            path,
        });
    }

    candidates.sort();
    Ok(candidates)
}
