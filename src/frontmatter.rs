//! Frontmatter splitting and parsing.
//!
//! A document may open with a YAML header fenced by lines that consist solely
//! of `---`:
//!
//! ```text
//! ---
//! title: "Hello"
//! date: 2024-01-01
//! tags:
//!   - rust
//!   - notes
//! ---
//! Body starts here.
//! ```
//!
//! The header is only recognized when the very first line is the delimiter
//! (a leading UTF-8 BOM and trailing whitespace on delimiter lines are
//! tolerated). Anything else is a document without frontmatter: the metadata
//! is empty and the body is the whole input.
//!
//! The body is everything after the closing delimiter line. That line's
//! terminator is consumed and nothing else is trimmed, so a blank line the
//! author left after the header is still there.
//!
//! This module knows nothing about files. [`crate::collection`] attaches the
//! path to any [`FrontmatterError`].

use serde_yaml_ng::{Mapping, Value};
use thiserror::Error;

/// The fence line that opens and closes a header.
pub const DELIMITER: &str = "---";

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("frontmatter opened with `---` but never closed")]
    Unterminated,
    #[error("invalid frontmatter YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    #[error("frontmatter must be a mapping of keys to values")]
    NotAMapping,
}

/// A document split into its raw metadata mapping and body.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub metadata: Mapping,
    pub body: String,
}

/// Split content into `(header, body)` without interpreting the header.
///
/// `header` is `None` when the content does not open with a delimiter line.
pub fn split(content: &str) -> Result<(Option<&str>, &str), FrontmatterError> {
    let unmarked = content.strip_prefix('\u{feff}').unwrap_or(content);
    let (first, rest) = next_line(unmarked);
    if first.trim_end() != DELIMITER {
        return Ok((None, content));
    }

    let mut offset = 0;
    while offset < rest.len() {
        let (line, after) = next_line(&rest[offset..]);
        if line.trim_end() == DELIMITER {
            return Ok((Some(&rest[..offset]), after));
        }
        offset = rest.len() - after.len();
    }
    Err(FrontmatterError::Unterminated)
}

/// Split and parse content into a metadata mapping and body.
pub fn parse(content: &str) -> Result<Parsed, FrontmatterError> {
    let (header, body) = split(content)?;
    let metadata = match header {
        Some(header) => parse_header(header)?,
        None => Mapping::new(),
    };
    Ok(Parsed {
        metadata,
        body: body.to_string(),
    })
}

fn parse_header(header: &str) -> Result<Mapping, FrontmatterError> {
    if header.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yaml_ng::from_str::<Value>(header)? {
        Value::Mapping(mapping) => Ok(mapping),
        // Only comments
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Returns the first line without its terminator, and the text after it.
fn next_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => {
            let line = &s[..i];
            (line.strip_suffix('\r').unwrap_or(line), &s[i + 1..])
        }
        None => (s, ""),
    }
}
