//! Post body rendering.
//!
//! Markdown is rendered by `pulldown-cmark` with tables, footnotes,
//! strikethrough, task lists, heading attributes, and math enabled. Math is
//! left in `math-inline` / `math-display` spans for KaTeX to typeset in the
//! browser; syntax colors come from a highlight.js theme. Both are wired in
//! through `[render] stylesheets` / `scripts`.
//!
//! The renderer adds three things on top of the stock event stream:
//!
//! - **Embed widget**: a `<BiliBili url="…" />` tag, on its own line or
//!   inline, becomes a video `<iframe>` with autoplay disabled.
//! - **Annotated code blocks**: a fence info string like ```` ```rust {2,4-5} ````
//!   renders each line as its own `<span class="line">`, adding
//!   `highlighted` to the listed lines.
//! - **Article style**: [`ArticleStyle::for_metadata`] picks essay styling
//!   when the post carries the configured essay tag.

use crate::config::RenderConfig;
use crate::types::Metadata;
use maud::{Markup, html};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use std::ops::RangeInclusive;

/// Tag name of the video embed widget.
pub const EMBED_TAG: &str = "BiliBili";

/// Parser options used for every post body.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
        | Options::ENABLE_MATH
}

/// Render a markdown body to HTML.
pub fn render_body(body: &str) -> String {
    let parser = Parser::new_ext(body, markdown_options());
    let events = apply_extensions(parser);
    let mut out = String::with_capacity(body.len() * 3 / 2);
    md_html::push_html(&mut out, events.into_iter());
    out
}

/// Render plain markdown (no widgets, no annotations), e.g. the about page body.
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, markdown_options());
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    out
}

fn apply_extensions<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut code: Option<(String, String)> = None;

    for event in events {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) => info.into_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some((info, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((info, text)) = code.take() {
                    out.push(Event::Html(render_code_block(&info, &text).into()));
                }
            }
            Event::Text(text) if code.is_some() => {
                if let Some((_, buf)) = code.as_mut() {
                    buf.push_str(&text);
                }
            }
            Event::Html(raw) => out.push(Event::Html(expand_embed(raw))),
            Event::InlineHtml(raw) => out.push(Event::InlineHtml(expand_embed(raw))),
            other => out.push(other),
        }
    }
    out
}

fn expand_embed(raw: CowStr<'_>) -> CowStr<'_> {
    let Some(url) = parse_embed(&raw) else {
        return raw;
    };
    let mut frame = embed_frame(url).into_string();
    if raw.ends_with('\n') {
        frame.push('\n');
    }
    frame.into()
}

/// Extract the `url` attribute from an embed widget tag.
///
/// Accepts `<BiliBili url="…" />` and `<BiliBili url='…'>`, with surrounding
/// whitespace. Returns `None` for any other HTML.
pub fn parse_embed(html: &str) -> Option<&str> {
    let rest = html.trim().strip_prefix('<')?.strip_prefix(EMBED_TAG)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let attrs = rest.strip_suffix('>')?.trim_end();
    let attrs = attrs.strip_suffix('/').unwrap_or(attrs);
    attribute_value(attrs, "url").filter(|url| !url.trim().is_empty())
}

fn attribute_value<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=");
    for (idx, _) in attrs.match_indices(&needle) {
        let standalone = attrs[..idx].ends_with(char::is_whitespace) || idx == 0;
        if !standalone {
            continue;
        }
        let value = &attrs[idx + needle.len()..];
        let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let value = &value[1..];
        let end = value.find(quote)?;
        return Some(&value[..end]);
    }
    None
}

/// The video frame the embed widget expands to.
pub fn embed_frame(url: &str) -> Markup {
    let src = with_autoplay_disabled(url.trim());
    html! {
        div.embed {
            iframe.embed-video src=(src) allowfullscreen loading="lazy" {}
        }
    }
}

fn with_autoplay_disabled(url: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}autoplay=0")
}

/// Line numbers annotated in a fence info string, kept as ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineRanges(Vec<RangeInclusive<usize>>);

impl LineRanges {
    /// Whether the 1-based `line` falls in any annotated range.
    pub fn contains(&self, line: usize) -> bool {
        self.0.iter().any(|range| range.contains(&line))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn parse(ranges: &str) -> Self {
        let mut parsed = Vec::new();
        for part in ranges.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => {
                    if let (Ok(start), Ok(end)) = (start.trim().parse::<usize>(), end.trim().parse::<usize>()) {
                        parsed.push(start..=end);
                    }
                }
                None => {
                    if let Ok(line) = part.parse::<usize>() {
                        parsed.push(line..=line);
                    }
                }
            }
        }
        LineRanges(parsed)
    }
}

/// Split a fence info string into the language and annotated line numbers.
///
/// - `rust` → (Some("rust"), no lines)
/// - `rust {1,3-4}` → (Some("rust"), lines 1, 3, 4)
/// - `{2}` → (None, line 2)
pub fn parse_code_info(info: &str) -> (Option<&str>, LineRanges) {
    let info = info.trim();
    let (lang_part, annotation) = match info.find('{') {
        Some(open) => {
            let inner = &info[open + 1..];
            (&info[..open], inner.split('}').next())
        }
        None => (info, None),
    };
    let lang = lang_part.split_whitespace().next();
    let lines = annotation.map(LineRanges::parse).unwrap_or_default();
    (lang, lines)
}

fn render_code_block(info: &str, code: &str) -> String {
    let (lang, highlighted) = parse_code_info(info);
    let class = match lang {
        Some(lang) => format!("hljs language-{lang}"),
        None => "hljs".to_string(),
    };
    let code = code.strip_suffix('\n').unwrap_or(code);

    html! {
        pre {
            code class=(class) {
                @for (idx, line) in code.split('\n').enumerate() {
                    span.line.highlighted[highlighted.contains(idx + 1)] { (line) }
                    "\n"
                }
            }
        }
    }
    .into_string()
}

/// Article-level styling selected by tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleStyle {
    Standard,
    /// Serif type, indented paragraphs.
    Essay,
}

impl ArticleStyle {
    pub fn for_metadata(metadata: &Metadata, config: &RenderConfig) -> Self {
        if metadata.has_tag(&config.essay_tag) {
            ArticleStyle::Essay
        } else {
            ArticleStyle::Standard
        }
    }

    /// Classes for the `<article>` element.
    pub fn css_class(self) -> &'static str {
        match self {
            ArticleStyle::Standard => "prose",
            ArticleStyle::Essay => "prose essay",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn metadata_with_tags(tags: &[&str]) -> Metadata {
        Metadata {
            title: "T".to_string(),
            date: "2024-01-01".to_string(),
            description: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image: None,
            keywords: vec![],
            draft: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn renders_basic_markdown() {
        let html = render_body("This is **bold** and *italic*.");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn renders_tables() {
        let html = render_body("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn leaves_math_for_katex() {
        let html = render_body("Euler: $e^{i\\pi} + 1 = 0$\n\n$$\\int_0^1 x\\,dx$$\n");
        assert!(html.contains("math-inline"));
        assert!(html.contains("math-display"));
    }

    #[test]
    fn fenced_code_gets_language_class() {
        let html = render_body("```rust\nfn main() {}\n```\n");
        assert!(html.contains(r#"class="hljs language-rust""#));
        assert!(html.contains(r#"<span class="line">fn main() {}</span>"#));
    }

    #[test]
    fn fenced_code_highlights_annotated_lines() {
        let html = render_body("```rust {2}\nlet a = 1;\nlet b = 2;\nlet c = 3;\n```\n");
        assert!(html.contains(r#"<span class="line">let a = 1;</span>"#));
        assert!(html.contains(r#"<span class="line highlighted">let b = 2;</span>"#));
        assert!(html.contains(r#"<span class="line">let c = 3;</span>"#));
    }

    #[test]
    fn code_is_escaped() {
        let html = render_body("```html\n<script>alert(1)</script>\n```\n");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn indented_code_has_no_language() {
        let html = render_body("    plain code\n");
        assert!(html.contains(r#"<code class="hljs">"#));
        assert!(html.contains("plain code"));
    }

    fn highlighted_lines(info: &str, upto: usize) -> Vec<usize> {
        let (_, ranges) = parse_code_info(info);
        (1..=upto).filter(|line| ranges.contains(*line)).collect()
    }

    #[test]
    fn parse_code_info_variants() {
        assert_eq!(parse_code_info("rust"), (Some("rust"), LineRanges::default()));
        assert_eq!(parse_code_info("rust {1,3-4}").0, Some("rust"));
        assert_eq!(highlighted_lines("rust {1,3-4}", 6), vec![1, 3, 4]);
        assert_eq!(parse_code_info("{2}").0, None);
        assert_eq!(highlighted_lines("{2}", 3), vec![2]);
        assert_eq!(parse_code_info("ts{5}").0, Some("ts"));
        assert_eq!(highlighted_lines("ts{5}", 6), vec![5]);
        assert!(parse_code_info("").1.is_empty());
    }

    #[test]
    fn bad_ranges_are_ignored() {
        assert_eq!(parse_code_info("js {x, 2, 4-y}").0, Some("js"));
        assert_eq!(highlighted_lines("js {x, 2, 4-y}", 6), vec![2]);
        assert!(highlighted_lines("js {5-3}", 6).is_empty());
    }

    #[test]
    fn huge_range_is_not_expanded() {
        let info = format!("rust {{1-{}}}", usize::MAX);
        let (_, ranges) = parse_code_info(&info);
        assert!(ranges.contains(1));
        assert!(ranges.contains(usize::MAX));

        let html = render_body("```rust {1-50000000}\nlet a = 1;\n```\n");
        assert!(html.contains(r#"<span class="line highlighted">let a = 1;</span>"#));
    }

    #[test]
    fn embed_block_becomes_iframe() {
        let body = "Intro\n\n<BiliBili url=\"https://player.bilibili.com/player.html?bvid=BV1xx\" />\n\nOutro\n";
        let html = render_body(body);
        assert!(html.contains("<iframe"));
        assert!(html.contains("bvid=BV1xx&amp;autoplay=0"));
        assert!(html.contains("allowfullscreen"));
        assert!(!html.contains("<BiliBili"));
    }

    #[test]
    fn inline_embed_becomes_iframe() {
        let html = render_body("Watch <BiliBili url='https://example.com/v' /> now\n");
        assert!(html.contains(r#"src="https://example.com/v?autoplay=0""#));
    }

    #[test]
    fn other_html_passes_through() {
        let html = render_body("<div class=\"note\">hi</div>\n");
        assert!(html.contains(r#"<div class="note">hi</div>"#));
    }

    #[test]
    fn parse_embed_variants() {
        assert_eq!(parse_embed(r#"<BiliBili url="https://a/b" />"#), Some("https://a/b"));
        assert_eq!(parse_embed("  <BiliBili url='x'>\n"), Some("x"));
        assert_eq!(parse_embed(r#"<BiliBili data-url="x" url="y"/>"#), Some("y"));
        assert_eq!(parse_embed(r#"<BiliBiliPlayer url="x" />"#), None);
        assert_eq!(parse_embed(r#"<BiliBili src="x" />"#), None);
        assert_eq!(parse_embed(r#"<BiliBili url="" />"#), None);
        assert_eq!(parse_embed(r#"<video url="x" />"#), None);
    }

    #[test]
    fn autoplay_separator() {
        assert_eq!(with_autoplay_disabled("https://a/b"), "https://a/b?autoplay=0");
        assert_eq!(with_autoplay_disabled("https://a/b?x=1"), "https://a/b?x=1&autoplay=0");
    }

    #[test]
    fn embed_url_is_escaped() {
        let html = embed_frame("https://a/\"><script>").into_string();
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn essay_style_only_with_essay_tag() {
        let config = RenderConfig::default();
        let essay = metadata_with_tags(&["notes", "essay"]);
        let plain = metadata_with_tags(&["notes"]);
        assert_eq!(ArticleStyle::for_metadata(&essay, &config), ArticleStyle::Essay);
        assert_eq!(ArticleStyle::for_metadata(&plain, &config), ArticleStyle::Standard);
        assert_eq!(ArticleStyle::Essay.css_class(), "prose essay");
    }

    #[test]
    fn essay_tag_is_configurable() {
        let config = RenderConfig {
            essay_tag: "随笔".to_string(),
            ..RenderConfig::default()
        };
        let meta = metadata_with_tags(&["随笔"]);
        assert_eq!(ArticleStyle::for_metadata(&meta, &config), ArticleStyle::Essay);
        let meta = metadata_with_tags(&["essay"]);
        assert_eq!(ArticleStyle::for_metadata(&meta, &config), ArticleStyle::Standard);
    }
}
