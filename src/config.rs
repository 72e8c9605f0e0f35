//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; the user's `config.toml` in the content root is merged on
//! top, so a config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Folio"
//! tagline = "Notes and sketches"
//! description = "A personal blog and portfolio"
//! lang = "en"
//! assets_dir = "assets"       # Copied verbatim to the output root
//!
//! [blog]
//! posts_dir = "posts"         # Store directory, relative to the content root
//! extension = "mdx"           # Content file extension (no leading dot)
//! title = "Blog"
//! description = "Writing on whatever I am learning"
//! empty_message = "No posts yet."
//!
//! [render]
//! essay_tag = "essay"         # Posts tagged with this get essay styling
//! fallback_image = "/images/placeholder.svg"
//! stylesheets = []            # Extra <link rel="stylesheet"> URLs
//! scripts = []                # Extra <script defer> URLs
//!
//! [about]
//! interests = []
//! # body = "Markdown shown under the interests list"
//!
//! [contact]
//! # email = "me@example.com"
//! # email_label = "Say hello"
//! # github = "example"
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1f2328"
//! text_muted = "#6b7280"
//! border = "#e5e7eb"
//! link = "#374151"
//! link_hover = "#111827"
//! code_background = "#1a1b26"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! text = "#e5e7eb"
//! text_muted = "#9ca3af"
//! border = "#374151"
//! link = "#d1d5db"
//! link_hover = "#f9fafb"
//! code_background = "#1a1b26"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site identity and the assets directory.
    pub site: SiteSection,
    /// Where posts live and how the blog index is labelled.
    pub blog: BlogConfig,
    /// Renderer extension points and extra page assets.
    pub render: RenderConfig,
    /// About page content.
    pub about: AboutConfig,
    /// Contact page content.
    pub contact: ContactConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ext = &self.blog.extension;
        if ext.is_empty() || ext.starts_with('.') || ext.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "blog.extension must be a bare extension like \"mdx\"".into(),
            ));
        }
        if !is_relative_subdir(&self.blog.posts_dir) {
            return Err(ConfigError::Validation(
                "blog.posts_dir must be a relative path inside the content root".into(),
            ));
        }
        if !is_relative_subdir(&self.site.assets_dir) {
            return Err(ConfigError::Validation(
                "site.assets_dir must be a relative path inside the content root".into(),
            ));
        }
        if self.render.essay_tag.trim().is_empty() {
            return Err(ConfigError::Validation(
                "render.essay_tag must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn is_relative_subdir(path: &str) -> bool {
    let path = Path::new(path);
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Site identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// Site title, shown on the home page and in every `<title>`.
    pub title: String,
    /// Short line under the home page title.
    pub tagline: String,
    /// Default `<meta name="description">` for non-post pages.
    pub description: String,
    /// `<html lang>` attribute.
    pub lang: String,
    /// Directory under the content root copied verbatim to the output root.
    pub assets_dir: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            tagline: "Notes and sketches".to_string(),
            description: "A personal blog and portfolio".to_string(),
            lang: "en".to_string(),
            assets_dir: "assets".to_string(),
        }
    }
}

/// Blog store location and index labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Store directory, relative to the content root.
    pub posts_dir: String,
    /// Content file extension, without the dot.
    pub extension: String,
    /// Heading of the blog index.
    pub title: String,
    /// `<meta name="description">` of the blog index.
    pub description: String,
    /// Shown on the index when the store has no posts.
    pub empty_message: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            posts_dir: "posts".to_string(),
            extension: "mdx".to_string(),
            title: "Blog".to_string(),
            description: "Writing on whatever I am learning".to_string(),
            empty_message: "No posts yet.".to_string(),
        }
    }
}

/// Renderer extension points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Posts carrying this tag render with essay styling.
    pub essay_tag: String,
    /// Swapped in when a cover image fails to load.
    pub fallback_image: String,
    /// Extra stylesheet URLs, e.g. a highlight.js theme or KaTeX.
    pub stylesheets: Vec<String>,
    /// Extra deferred script URLs.
    pub scripts: Vec<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            essay_tag: "essay".to_string(),
            fallback_image: "/images/placeholder.svg".to_string(),
            stylesheets: Vec::new(),
            scripts: Vec::new(),
        }
    }
}

/// About page content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AboutConfig {
    pub interests: Vec<String>,
    /// Optional markdown shown below the interests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Contact page content. Every channel is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContactConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Link text for the email address; the address itself when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_label: Option<String>,
    /// GitHub username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Dates, tags, back links.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
    /// Background of fenced code blocks.
    pub code_background: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1f2328".to_string(),
            text_muted: "#6b7280".to_string(),
            border: "#e5e7eb".to_string(),
            link: "#374151".to_string(),
            link_hover: "#111827".to_string(),
            code_background: "#1a1b26".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#e5e7eb".to_string(),
            text_muted: "#9ca3af".to_string(),
            border: "#374151".to_string(),
            link: "#d1d5db".to_string(),
            link_hover: "#f9fafb".to_string(),
            code_background: "#1a1b26".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root, on top of stock defaults.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Folio Configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "Folio"
tagline = "Notes and sketches"
description = "A personal blog and portfolio"
lang = "en"

# Directory under the content root copied verbatim to the output root.
# Put the cover fallback image and favicons here.
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Blog
# ---------------------------------------------------------------------------
[blog]
# Directory holding one file per post, relative to the content root.
# A missing directory simply means no posts yet.
posts_dir = "posts"

# Content file extension, without the leading dot. Matched exactly.
extension = "mdx"

title = "Blog"
description = "Writing on whatever I am learning"
empty_message = "No posts yet."

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[render]
# Posts whose tags include this value get serif, indented-paragraph styling.
essay_tag = "essay"

# Shown in place of a post's cover image when it fails to load.
fallback_image = "/images/placeholder.svg"

# Extra assets added to every page head, e.g. a highlight.js theme,
# KaTeX stylesheet and auto-render script.
stylesheets = []
scripts = []

# ---------------------------------------------------------------------------
# About page
# ---------------------------------------------------------------------------
[about]
interests = []
# body = "Markdown shown under the interests list."

# ---------------------------------------------------------------------------
# Contact page
# ---------------------------------------------------------------------------
[contact]
# email = "me@example.com"
# email_label = "Say hello"
# github = "example"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1f2328"
text_muted = "#6b7280"    # Dates, tags, back links
border = "#e5e7eb"
link = "#374151"
link_hover = "#111827"
code_background = "#1a1b26"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#e5e7eb"
text_muted = "#9ca3af"
border = "#374151"
link = "#d1d5db"
link_hover = "#f9fafb"
code_background = "#1a1b26"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        ":root {{\n{}}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{}    }}\n}}",
        color_variables(&colors.light, 1),
        color_variables(&colors.dark, 2),
    )
}

fn color_variables(scheme: &ColorScheme, depth: usize) -> String {
    let pad = "    ".repeat(depth);
    [
        ("bg", &scheme.background),
        ("text", &scheme.text),
        ("text-muted", &scheme.text_muted),
        ("border", &scheme.border),
        ("link", &scheme.link),
        ("link-hover", &scheme.link_hover),
        ("code-bg", &scheme.code_background),
    ]
    .iter()
    .map(|(name, value)| format!("{pad}--color-{name}: {value};\n"))
    .collect()
}
