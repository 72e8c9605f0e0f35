//! Document types shared by the collection, the renderer, and the site
//! generator.
//!
//! These are also what `list --json` and `show --json` print, so field names
//! match the frontmatter keys authors write.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml_ng::Value;
use std::collections::BTreeMap;

/// One document from the store: a slug, its typed frontmatter, and the raw
/// body handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Filename with the content extension removed. Public URL is `/blog/{slug}/`.
    pub slug: String,
    pub metadata: Metadata,
    /// Everything after the closing frontmatter delimiter.
    pub body: String,
}

/// Frontmatter fields.
///
/// `title` and `date` are required; the collection rejects documents
/// without them before this type is ever constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(deserialize_with = "scalar_text")]
    pub title: String,
    /// Publication date as written, e.g. `2024-01-01` or an RFC 3339 timestamp.
    #[serde(deserialize_with = "scalar_text")]
    pub date: String,
    #[serde(default, deserialize_with = "optional_scalar_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display order matters: the first tag is the post's primary tag.
    #[serde(default, deserialize_with = "scalar_text_list", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Cover illustration path or URL.
    #[serde(default, deserialize_with = "optional_scalar_text", skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Only emitted as `<meta name="keywords">`.
    #[serde(default, deserialize_with = "scalar_text_list", skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Parsed and carried along. Nothing filters on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    /// Unrecognized keys, preserved as written. Keys that YAML reads as
    /// numbers or booleans (`2024: retro`) are kept under their text form.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Header keys with a typed field on [`Metadata`].
pub const KNOWN_FIELDS: [&str; 7] = [
    "title",
    "date",
    "description",
    "tags",
    "image",
    "keywords",
    "draft",
];

impl Metadata {
    /// The publication instant used for ordering. Date-only values sort as
    /// midnight; timestamps with an offset are normalized to UTC.
    pub fn published(&self) -> Option<NaiveDateTime> {
        parse_date(&self.date)
    }

    pub fn primary_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Text for `<meta name="description">`: the description, or the title.
    pub fn summary(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.title)
    }
}

/// Text of a scalar header value. `title: 1984` is the string `"1984"`.
fn scalar_to_text<E: de::Error>(value: Value) -> Result<String, E> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Err(E::invalid_type(Unexpected::Unit, &"a string")),
        Value::Sequence(_) => Err(E::invalid_type(Unexpected::Seq, &"a string")),
        Value::Mapping(_) => Err(E::invalid_type(Unexpected::Map, &"a string")),
        Value::Tagged(_) => Err(E::invalid_type(Unexpected::Other("tagged value"), &"a string")),
    }
}

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_to_text(Value::deserialize(deserializer)?)
}

fn optional_scalar_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => scalar_to_text(value).map(Some),
    }
}

fn scalar_text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items.into_iter().map(scalar_to_text).collect(),
        other => Err(de::Error::invalid_type(
            match other {
                Value::Mapping(_) => Unexpected::Map,
                _ => Unexpected::Other("scalar"),
            },
            &"a list of strings",
        )),
    }
}

/// Text form of a header key that is not a typed field.
pub fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml_ng::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Parse the calendar-date formats accepted in frontmatter.
///
/// - `2024-01-01`
/// - `2024/01/01`
/// - `2024-01-01 08:30:00` / `2024-01-01T08:30:00`
/// - RFC 3339, e.g. `2024-01-01T08:30:00+08:00`
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    ["%Y-%m-%d", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a frontmatter date for display as `YYYY.MM.DD`.
///
/// Unparseable values are shown as written.
pub fn display_date(value: &str) -> String {
    match parse_date(value) {
        Some(dt) => dt.format("%Y.%m.%d").to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(title: &str, date: &str) -> Metadata {
        Metadata {
            title: title.to_string(),
            date: date.to_string(),
            description: None,
            tags: vec![],
            image: None,
            keywords: vec![],
            draft: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn parse_plain_date() {
        let dt = parse_date("2024-01-01").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-01 00:00");
    }

    #[test]
    fn parse_slash_date() {
        assert_eq!(parse_date("2024/03/09"), parse_date("2024-03-09"));
    }

    #[test]
    fn parse_rfc3339_normalizes_to_utc() {
        let dt = parse_date("2024-01-01T08:30:00+08:00").unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-01 00:30");
    }

    #[test]
    fn parse_local_datetime() {
        assert!(parse_date("2024-01-01 08:30:00").is_some());
        assert!(parse_date("2024-01-01T08:30:00").is_some());
        assert!(parse_date("2024-01-01 08:30").is_some());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn display_date_uses_dots() {
        assert_eq!(display_date("2024-01-05"), "2024.01.05");
        assert_eq!(display_date("not a date"), "not a date");
    }

    #[test]
    fn summary_falls_back_to_title() {
        let mut meta = metadata("Hello", "2024-01-01");
        assert_eq!(meta.summary(), "Hello");
        meta.description = Some("A greeting".to_string());
        assert_eq!(meta.summary(), "A greeting");
    }

    #[test]
    fn primary_tag_is_first() {
        let mut meta = metadata("Hello", "2024-01-01");
        assert_eq!(meta.primary_tag(), None);
        meta.tags = vec!["rust".to_string(), "notes".to_string()];
        assert_eq!(meta.primary_tag(), Some("rust"));
        assert!(meta.has_tag("notes"));
        assert!(!meta.has_tag("essay"));
    }

    #[test]
    fn scalar_fields_read_as_text() {
        let meta: Metadata = serde_yaml_ng::from_str(
            "title: 1984\ndate: 2024-01-01\ndescription: true\nimage: 42\ntags: [2024, rust, false]\nkeywords: [1.5]\n",
        )
        .unwrap();
        assert_eq!(meta.title, "1984");
        assert_eq!(meta.description.as_deref(), Some("true"));
        assert_eq!(meta.image.as_deref(), Some("42"));
        assert_eq!(meta.tags, vec!["2024", "rust", "false"]);
        assert_eq!(meta.keywords, vec!["1.5"]);
    }

    #[test]
    fn structured_values_in_text_fields_are_rejected() {
        for header in [
            "title: [a, b]\ndate: 2024-01-01\n",
            "title: x\ndate: 2024-01-01\ndescription: {a: 1}\n",
            "title: x\ndate: 2024-01-01\ntags: rust\n",
            "title: x\ndate: 2024-01-01\ntags: [[nested]]\n",
        ] {
            assert!(serde_yaml_ng::from_str::<Metadata>(header).is_err(), "{header}");
        }
    }

    #[test]
    fn null_optional_fields_are_empty() {
        let meta: Metadata =
            serde_yaml_ng::from_str("title: x\ndate: 2024-01-01\ndescription:\ntags:\n").unwrap();
        assert_eq!(meta.description, None);
        assert!(meta.tags.is_empty());
    }

    #[test]
    fn key_text_forms() {
        assert_eq!(key_text(&Value::from("series")), "series");
        assert_eq!(key_text(&Value::from(2024)), "2024");
        assert_eq!(key_text(&Value::Bool(true)), "true");
        assert_eq!(key_text(&Value::Null), "null");
    }
}
