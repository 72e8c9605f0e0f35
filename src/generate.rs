//! HTML site generation.
//!
//! Lists the collection once and writes every page of the site.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): site title, tagline, links to about/blog/contact
//! - **About** (`/about/index.html`): interests and an optional markdown body
//! - **Contact** (`/contact/index.html`): email and GitHub links
//! - **Blog index** (`/blog/index.html`): the newest post featured, the rest listed
//! - **Post pages** (`/blog/{slug}/index.html`): header, cover, rendered body
//! - **Not found** (`/404.html`): served by the host for unknown slugs
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── 404.html
//! ├── style.css
//! ├── about/index.html
//! ├── contact/index.html
//! ├── blog/
//! │   ├── index.html
//! │   └── hello-world/index.html
//! └── images/placeholder.svg       # copied from content/assets/
//! ```
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolated frontmatter is escaped; only the rendered markdown body
//! is inserted pre-escaped.

use crate::collection::{CollectionError, Store};
use crate::config::{self, ConfigError, SiteConfig};
use crate::render::{self, ArticleStyle};
use crate::types::{Document, display_date};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error("failed to copy assets: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a build wrote, for CLI output.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub pages: Vec<GeneratedPage>,
    pub posts: Vec<GeneratedPage>,
    pub assets_copied: usize,
}

/// One written HTML file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    pub title: String,
    /// Path relative to the output directory.
    pub path: String,
}

const CSS_STATIC: &str = include_str!("../static/style.css");

/// Build the whole site from `source` into `output_dir`.
pub fn generate(source: &Path, output_dir: &Path) -> Result<BuildReport, GenerateError> {
    let config = config::load_config(source)?;
    let store = Store::from_config(source, &config);
    let documents = store.list()?;
    info!(posts = documents.len(), store = %store.root().display(), "loaded collection");

    fs::create_dir_all(output_dir)?;
    let css = format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC);
    fs::write(output_dir.join("style.css"), css)?;

    let assets_copied = copy_assets(&source.join(&config.site.assets_dir), output_dir)?;

    let mut pages = Vec::new();
    let site_pages = [
        (config.site.title.clone(), "index.html", render_home(&config)),
        ("About".to_string(), "about/index.html", render_about(&config)),
        ("Contact".to_string(), "contact/index.html", render_contact(&config)),
        (
            config.blog.title.clone(),
            "blog/index.html",
            render_blog_index(&documents, &config),
        ),
        ("Not Found".to_string(), "404.html", render_not_found(&config)),
    ];
    for (title, path, markup) in site_pages {
        write_page(output_dir, path, markup)?;
        pages.push(GeneratedPage {
            title,
            path: path.to_string(),
        });
    }

    let mut posts = Vec::with_capacity(documents.len());
    for document in &documents {
        let path = format!("blog/{}/index.html", document.slug);
        write_page(output_dir, &path, render_post(document, &config)?)?;
        debug!(slug = %document.slug, "generated post");
        posts.push(GeneratedPage {
            title: document.metadata.title.clone(),
            path,
        });
    }

    info!(output = %output_dir.display(), "site generated");
    Ok(BuildReport {
        pages,
        posts,
        assets_copied,
    })
}

fn write_page(output_dir: &Path, rel_path: &str, markup: Markup) -> std::io::Result<()> {
    let path = output_dir.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup.into_string())
}

/// Copy the assets directory into the output root. Missing directory copies nothing.
fn copy_assets(assets_dir: &Path, output_dir: &Path) -> Result<usize, GenerateError> {
    if !assets_dir.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(assets_dir).follow_links(true) {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(assets_dir)
            .map(PathBuf::from)
            .unwrap_or_default();
        let target = output_dir.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Per-page `<head>` metadata.
struct PageMeta<'a> {
    title: String,
    description: &'a str,
    keywords: &'a [String],
}

/// Renders the base HTML document structure.
fn base_document(meta: &PageMeta<'_>, config: &SiteConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.site.lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (meta.title) }
                meta name="description" content=(meta.description);
                @if !meta.keywords.is_empty() {
                    meta name="keywords" content=(meta.keywords.join(", "));
                }
                link rel="stylesheet" href="/style.css";
                @for href in &config.render.stylesheets {
                    link rel="stylesheet" href=(href);
                }
                @for src in &config.render.scripts {
                    script defer src=(src) {}
                }
            }
            body {
                (content)
            }
        }
    }
}

fn site_title(page: &str, config: &SiteConfig) -> String {
    format!("{} | {}", page, config.site.title)
}

/// Link back to the home page shown on every inner page.
fn back_link() -> Markup {
    html! {
        a.back-link href="/" { "← Back" }
    }
}

fn page_header(title: &str) -> Markup {
    html! {
        header.page-header {
            (back_link())
            h1 { (title) }
            div.rule {}
        }
    }
}

/// Date plus primary tag, as shown on index entries.
fn post_meta_line(document: &Document) -> Markup {
    html! {
        div.post-meta {
            time datetime=(document.metadata.date) { (display_date(&document.metadata.date)) }
            @if let Some(tag) = document.metadata.primary_tag() {
                span.tag { (tag) }
            }
        }
    }
}

fn post_url(slug: &str) -> String {
    format!("/blog/{slug}/")
}

/// Cover `<img>` that swaps to the fallback image if it fails to load.
fn cover_image(src: &str, alt: &str, fallback: &str) -> Result<Markup, serde_json::Error> {
    // JSON string literal is a valid JS string literal; maud escapes it for the attribute.
    let onerror = format!("this.onerror=null;this.src={};", serde_json::to_string(fallback)?);
    Ok(html! {
        figure.cover {
            img src=(src) alt=(alt) loading="lazy" onerror=(onerror);
        }
    })
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home(config: &SiteConfig) -> Markup {
    let meta = PageMeta {
        title: config.site.title.clone(),
        description: &config.site.description,
        keywords: &[],
    };
    let content = html! {
        main.home {
            div.home-title {
                h1 { (config.site.title) }
                p.tagline { (config.site.tagline) }
            }
            nav.home-nav {
                a href="/about/" { "About" }
                a href="/blog/" { (config.blog.title) }
                a href="/contact/" { "Contact" }
            }
        }
    };
    base_document(&meta, config, content)
}

fn render_about(config: &SiteConfig) -> Markup {
    let meta = PageMeta {
        title: site_title("About", config),
        description: &config.site.description,
        keywords: &[],
    };
    let body_html = config.about.body.as_deref().map(render::render_markdown);
    let content = html! {
        main.page {
            (page_header("About"))
            @if !config.about.interests.is_empty() {
                section.interests {
                    h2 { "Interests" }
                    ul {
                        @for interest in &config.about.interests {
                            li { (interest) }
                        }
                    }
                }
            }
            @if let Some(body) = body_html {
                section.about-body { (PreEscaped(body)) }
            }
        }
    };
    base_document(&meta, config, content)
}

fn render_contact(config: &SiteConfig) -> Markup {
    let meta = PageMeta {
        title: site_title("Contact", config),
        description: &config.site.description,
        keywords: &[],
    };
    let contact = &config.contact;
    let content = html! {
        main.page {
            (page_header("Contact"))
            section.contact {
                @if let Some(email) = &contact.email {
                    div.channel {
                        h3 { "Email" }
                        a href={ "mailto:" (email) } {
                            (contact.email_label.as_deref().unwrap_or(email))
                        }
                    }
                }
                @if let Some(github) = &contact.github {
                    div.channel {
                        h3 { "GitHub" }
                        a href={ "https://github.com/" (github) } target="_blank" rel="noopener noreferrer" {
                            (github)
                        }
                    }
                }
            }
        }
    };
    base_document(&meta, config, content)
}

/// Renders the blog index: the newest post featured, the rest listed.
pub fn render_blog_index(documents: &[Document], config: &SiteConfig) -> Markup {
    let meta = PageMeta {
        title: site_title(&config.blog.title, config),
        description: &config.blog.description,
        keywords: &[],
    };
    let content = html! {
        main.page.blog-index {
            (page_header(&config.blog.title))
            @match documents.split_first() {
                None => {
                    p.empty { (config.blog.empty_message) }
                }
                Some((featured, rest)) => {
                    article.featured {
                        (post_meta_line(featured))
                        h2 { a href=(post_url(&featured.slug)) { (featured.metadata.title) } }
                        @if let Some(desc) = &featured.metadata.description {
                            p.description { (desc) }
                        }
                        a.read-more href=(post_url(&featured.slug)) { "Read more →" }
                    }
                    @if !rest.is_empty() {
                        div.post-list {
                            @for document in rest {
                                article.post-item {
                                    (post_meta_line(document))
                                    h3 { a href=(post_url(&document.slug)) { (document.metadata.title) } }
                                    @if let Some(desc) = &document.metadata.description {
                                        p.description { (desc) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };
    base_document(&meta, config, content)
}

/// Renders a single post page.
pub fn render_post(document: &Document, config: &SiteConfig) -> Result<Markup, GenerateError> {
    let metadata = &document.metadata;
    let page = PageMeta {
        title: site_title(&metadata.title, config),
        description: metadata.summary(),
        keywords: &metadata.keywords,
    };
    let style = ArticleStyle::for_metadata(metadata, &config.render);
    let cover = match &metadata.image {
        Some(src) => Some(cover_image(src, &metadata.title, &config.render.fallback_image)?),
        None => None,
    };
    let body_html = render::render_body(&document.body);

    let content = html! {
        main.page.post {
            header.post-header {
                a.back-link href="/blog/" { "← " (config.blog.title) }
                h1 { (metadata.title) }
                p.published {
                    "Published: "
                    time datetime=(metadata.date) { (display_date(&metadata.date)) }
                }
                @if let Some(desc) = &metadata.description {
                    p.description { (desc) }
                }
                @if !metadata.tags.is_empty() {
                    ul.tags {
                        @for tag in &metadata.tags {
                            li.tag { (tag) }
                        }
                    }
                }
            }
            @if let Some(cover) = cover {
                (cover)
            }
            article class=(style.css_class()) {
                (PreEscaped(body_html))
            }
        }
    };
    Ok(base_document(&page, config, content))
}

fn render_not_found(config: &SiteConfig) -> Markup {
    let meta = PageMeta {
        title: site_title("Post Not Found", config),
        description: &config.site.description,
        keywords: &[],
    };
    let content = html! {
        main.page.not-found {
            (page_header("Not Found"))
            p { "Nothing lives at this address." }
            a href="/blog/" { "Back to " (config.blog.title) }
        }
    };
    base_document(&meta, config, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::Metadata;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn document(slug: &str, title: &str, date: &str) -> Document {
        Document {
            slug: slug.to_string(),
            metadata: Metadata {
                title: title.to_string(),
                date: date.to_string(),
                description: None,
                tags: vec![],
                image: None,
                keywords: vec![],
                draft: None,
                extra: BTreeMap::new(),
            },
            body: "Hello **world**".to_string(),
        }
    }

    #[test]
    fn blog_index_empty_message() {
        let config = SiteConfig::default();
        let html = render_blog_index(&[], &config).into_string();
        assert!(html.contains("No posts yet."));
        assert!(!html.contains("featured"));
    }

    #[test]
    fn blog_index_features_first_post() {
        let config = SiteConfig::default();
        let mut first = document("newest", "Newest", "2024-02-01");
        first.metadata.tags = vec!["rust".to_string(), "notes".to_string()];
        first.metadata.description = Some("Lead paragraph".to_string());
        let second = document("older", "Older", "2024-01-01");

        let html = render_blog_index(&[first, second], &config).into_string();
        let featured = html.find("featured").unwrap();
        let list = html.find("post-list").unwrap();
        assert!(featured < list);
        assert!(html.contains(r#"href="/blog/newest/""#));
        assert!(html.contains(r#"href="/blog/older/""#));
        assert!(html.contains("2024.02.01"));
        assert!(html.contains(r#"<span class="tag">rust</span>"#));
        assert!(!html.contains(r#"<span class="tag">notes</span>"#));
        assert!(html.contains("Lead paragraph"));
    }

    #[test]
    fn post_page_metadata() {
        let config = SiteConfig::default();
        let mut doc = document("hello", "Hello", "2024-01-01");
        doc.metadata.keywords = vec!["rust".to_string(), "ssg".to_string()];

        let html = render_post(&doc, &config).unwrap().into_string();
        assert!(html.contains("<title>Hello | Folio</title>"));
        // Description falls back to the title
        assert!(html.contains(r#"<meta name="description" content="Hello">"#));
        assert!(html.contains(r#"<meta name="keywords" content="rust, ssg">"#));
        assert!(html.contains("<strong>world</strong>"));
    }

    #[test]
    fn post_page_uses_description() {
        let config = SiteConfig::default();
        let mut doc = document("hello", "Hello", "2024-01-01");
        doc.metadata.description = Some("About greetings".to_string());
        let html = render_post(&doc, &config).unwrap().into_string();
        assert!(html.contains(r#"<meta name="description" content="About greetings">"#));
    }

    #[test]
    fn post_page_cover_with_fallback() {
        let config = SiteConfig::default();
        let mut doc = document("hello", "Hello", "2024-01-01");
        let without = render_post(&doc, &config).unwrap().into_string();
        assert!(!without.contains("cover"));

        doc.metadata.image = Some("/images/hello.png".to_string());
        let html = render_post(&doc, &config).unwrap().into_string();
        assert!(html.contains(r#"src="/images/hello.png""#));
        assert!(html.contains("this.src=&quot;/images/placeholder.svg&quot;"));
    }

    #[test]
    fn essay_tag_switches_article_class() {
        let config = SiteConfig::default();
        let mut doc = document("hello", "Hello", "2024-01-01");
        let plain = render_post(&doc, &config).unwrap().into_string();
        assert!(plain.contains(r#"<article class="prose">"#));

        doc.metadata.tags = vec!["essay".to_string()];
        let essay = render_post(&doc, &config).unwrap().into_string();
        assert!(essay.contains(r#"<article class="prose essay">"#));
    }

    #[test]
    fn frontmatter_is_escaped() {
        let config = SiteConfig::default();
        let doc = document("x", "<script>alert('xss')</script>", "2024-01-01");
        let html = render_post(&doc, &config).unwrap().into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn extra_assets_in_head() {
        let mut config = SiteConfig::default();
        config.render.stylesheets = vec!["/katex.min.css".to_string()];
        config.render.scripts = vec!["/katex.min.js".to_string()];
        let html = render_home(&config).into_string();
        assert!(html.contains(r#"href="/katex.min.css""#));
        assert!(html.contains(r#"<script defer src="/katex.min.js"></script>"#));
    }

    #[test]
    fn contact_uses_label() {
        let mut config = SiteConfig::default();
        config.contact.email = Some("me@example.com".to_string());
        config.contact.email_label = Some("Say hi".to_string());
        config.contact.github = Some("someone".to_string());
        let html = render_contact(&config).into_string();
        assert!(html.contains(r#"href="mailto:me@example.com""#));
        assert!(html.contains("Say hi"));
        assert!(html.contains(r#"href="https://github.com/someone""#));
    }

    #[test]
    fn about_lists_interests() {
        let mut config = SiteConfig::default();
        config.about.interests = vec!["Game".to_string(), "Sketch".to_string()];
        config.about.body = Some("I *draw*.".to_string());
        let html = render_about(&config).into_string();
        assert!(html.contains("<li>Game</li>"));
        assert!(html.contains("<em>draw</em>"));
    }

    // =========================================================================
    // Full build tests
    // =========================================================================

    #[test]
    fn generate_fixture_site() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let report = generate(tmp.path(), out.path()).unwrap();

        for file in [
            "index.html",
            "404.html",
            "style.css",
            "about/index.html",
            "contact/index.html",
            "blog/index.html",
            "images/placeholder.svg",
        ] {
            assert!(out.path().join(file).is_file(), "missing {file}");
        }
        assert_eq!(report.pages.len(), 5);
        assert_eq!(report.assets_copied, 1);
        for post in &report.posts {
            assert!(out.path().join(&post.path).is_file());
        }
    }

    #[test]
    fn generate_without_posts_dir() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let report = generate(src.path(), out.path()).unwrap();
        assert!(report.posts.is_empty());
        let index = fs::read_to_string(out.path().join("blog/index.html")).unwrap();
        assert!(index.contains("No posts yet."));
    }

    #[test]
    fn generate_fails_on_malformed_post() {
        let src = TempDir::new().unwrap();
        write_raw(&src.path().join("posts"), "bad.mdx", "---\ntitle: x\n");
        let out = TempDir::new().unwrap();
        let result = generate(src.path(), out.path());
        assert!(matches!(result, Err(GenerateError::Collection(_))));
    }

    #[test]
    fn css_includes_colors() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        generate(src.path(), out.path()).unwrap();
        let css = fs::read_to_string(out.path().join("style.css")).unwrap();
        assert!(css.contains("--color-bg: #ffffff;"));
        assert!(css.contains(".essay"));
    }
}
