//! Shared test utilities for the simple-folio test suite.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_post(tmp.path(), "hello", "2024-01-01", "Body");
//! let documents = Store::new(tmp.path()).list().unwrap();
//! assert_eq!(slugs(&documents), vec!["hello"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::Document;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `<slug>.mdx` with a minimal valid header.
pub fn write_post(dir: &Path, slug: &str, date: &str, body: &str) {
    let content = format!("---\ntitle: \"Post {slug}\"\ndate: \"{date}\"\n---\n{body}");
    write_raw(dir, &format!("{slug}.mdx"), &content);
}

/// Write a file verbatim.
pub fn write_raw(dir: &Path, file_name: &str, content: &str) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(dir.join(file_name), content).unwrap();
}

/// Create an empty file.
pub fn touch(dir: &Path, file_name: &str) {
    write_raw(dir, file_name, "");
}

// =========================================================================
// Lookups and extractors
// =========================================================================

/// All slugs in collection order.
pub fn slugs(documents: &[Document]) -> Vec<&str> {
    documents.iter().map(|d| d.slug.as_str()).collect()
}

/// Find a document by slug. Panics if not found.
pub fn find_document<'a>(documents: &'a [Document], slug: &str) -> &'a Document {
    documents
        .iter()
        .find(|d| d.slug == slug)
        .unwrap_or_else(|| panic!("document '{slug}' not found. Available: {:?}", slugs(documents)))
}
