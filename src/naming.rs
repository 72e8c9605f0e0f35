//! Slug derivation for store filenames.
//!
//! A document's slug is its filename with the content extension removed.
//! Nothing else is transformed: no lowercasing, no dash/space conversion, no
//! percent-encoding. Because filenames are unique within a directory and the
//! extension match is exact, two files can never collapse into one slug.
//!
//! - `hello-world.mdx` → `hello-world`
//! - `2024-recap.mdx`  → `2024-recap`
//! - `notes.md`        → not a document (wrong extension)
//! - `.mdx`            → not a document (empty stem)
//!
//! The reverse direction, [`file_name_for_slug`], is what lookups by slug use.
//! It refuses anything that could escape the store directory or that the
//! scanner would never have produced, so a lookup can only ever find a file
//! that a listing would also have found.

/// Derive the slug from a filename, if the filename carries the extension.
pub fn slug_from_file_name<'a>(file_name: &'a str, extension: &str) -> Option<&'a str> {
    let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;
    is_plain_slug(stem).then_some(stem)
}

/// Build the filename a slug would be stored under.
///
/// Returns `None` for slugs that are not plain file stems.
pub fn file_name_for_slug(slug: &str, extension: &str) -> Option<String> {
    is_plain_slug(slug).then(|| format!("{slug}.{extension}"))
}

/// A slug names a single visible file in the store directory.
pub fn is_plain_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\', '\0'])
}
