//! HTML views for the site
//!
//! Uses maud for compile-time HTML templating with automatic XSS escaping.
//! The same views back the static generator and the dev server.

use maud::{html, Markup, PreEscaped, DOCTYPE};
use rand::RngExt;

use crate::config::SiteConfig;
use crate::content::{Post, TagEntry, TagIndex};
use crate::helpers::{strip_html, truncate};

const CSS_STATIC: &str = include_str!("../../static/style.css");

// ============================================================================
// Layout
// ============================================================================

/// Renders the base HTML document with navbar and footer around the content
pub fn base_document(
    config: &SiteConfig,
    page_title: Option<&str>,
    description: Option<&str>,
    has_math: bool,
    content: Markup,
) -> Markup {
    let title = match page_title {
        Some(t) => format!("{} | {}", t, config.title),
        None => config.title.clone(),
    };

    html! {
        (DOCTYPE)
        html lang=(config.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(desc) = description {
                    meta name="description" content=(desc);
                }
                link rel="alternate" href="/atom.xml" title=(config.title) type="application/atom+xml";
                style { (PreEscaped(CSS_STATIC)) }
                @if has_math {
                    link rel="stylesheet" href={ (config.katex_cdn) "/katex.min.css" };
                    script defer src={ (config.katex_cdn) "/katex.min.js" } {}
                    script defer src={ (config.katex_cdn) "/contrib/auto-render.min.js" }
                        onload="renderMathInElement(document.body);" {}
                }
            }
            body {
                (navbar(config))
                main { (content) }
                (footer(config))
            }
        }
    }
}

/// Renders the navbar with the brand, a random tagline, and social links
fn navbar(config: &SiteConfig) -> Markup {
    html! {
        nav.navbar {
            div.navbar-inner {
                a.brand href="/" {
                    span.brand-title { (config.title) }
                    @if let Some(tagline) = pick_tagline(config) {
                        span.brand-tagline { (tagline) }
                    }
                }
                div.social-links {
                    @if !config.social.github.is_empty() {
                        a href=(config.social.github) target="_blank" rel="noopener noreferrer" aria-label="GitHub" {
                            (icon_github())
                        }
                    }
                    @if !config.social.twitter.is_empty() {
                        a href=(config.social.twitter) target="_blank" rel="noopener noreferrer" aria-label="Twitter" {
                            (icon_twitter())
                        }
                    }
                    @if !config.social.linkedin.is_empty() {
                        a href=(config.social.linkedin) target="_blank" rel="noopener noreferrer" aria-label="LinkedIn" {
                            (icon_linkedin())
                        }
                    }
                    @if !config.social.email.is_empty() {
                        a href={ "mailto:" (config.social.email) } aria-label="Email" {
                            (icon_email())
                        }
                    }
                }
            }
        }
    }
}

/// Renders the site footer
fn footer(config: &SiteConfig) -> Markup {
    let year = chrono::Local::now().format("%Y").to_string();
    html! {
        footer.site-footer {
            p {
                "© " (year) " " (config.title) " | Powered by "
                a href="https://github.com/steve-cse/bytecron" target="_blank" rel="noopener noreferrer" {
                    "bytecron"
                }
            }
        }
    }
}

fn pick_tagline(config: &SiteConfig) -> Option<&str> {
    if config.taglines.is_empty() {
        return None;
    }
    let idx = rand::rng().random_range(0..config.taglines.len());
    config.taglines.get(idx).map(|s| s.as_str())
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the index page listing published posts, newest first
pub fn render_index(config: &SiteConfig, posts: &[Post]) -> Markup {
    let content = html! {
        div.container.post-list {
            @for post in posts {
                (post_card(config, post))
            }
        }
    };

    let description = (!config.description.is_empty()).then_some(config.description.as_str());
    base_document(config, None, description, false, content)
}

/// Renders a single post page with header, body, and comments
pub fn render_post(config: &SiteConfig, post: &Post) -> Markup {
    let description = match &post.excerpt {
        Some(excerpt) => excerpt.clone(),
        None => truncate(&strip_html(&post.content), 160, None),
    };

    let content = html! {
        article.container.post-page {
            header.post-header {
                h1 { (post.title) }
                div.post-meta {
                    @if let Some(date) = display_date(config, post) {
                        span { (date) }
                    }
                    @if let Some(author) = &post.author {
                        span.sep { "•" }
                        span { (author) }
                    }
                }
                (tag_chips(&post.tags))
            }
            div.post-body {
                (PreEscaped(post.content.clone()))
            }
            @if config.comments.enable && !config.comments.repo.is_empty() {
                (comments_section(config))
            }
        }
    };

    base_document(
        config,
        Some(&post.title),
        Some(&description),
        post.has_math,
        content,
    )
}

/// Renders the tag listing page with usage counts
pub fn render_tags(config: &SiteConfig, index: &TagIndex) -> Markup {
    let content = html! {
        div.container.tags-page {
            h1 { "All Tags" }
            div.tag-cloud {
                @for entry in index.entries() {
                    a.tag-chip href=(entry.path()) {
                        (entry.name) " " span.tag-count { "(" (entry.count) ")" }
                    }
                }
            }
        }
    };

    base_document(config, Some("All Tags"), None, false, content)
}

/// Renders the listing of posts carrying one tag
pub fn render_tag(config: &SiteConfig, entry: &TagEntry, posts: &[&Post]) -> Markup {
    let content = html! {
        div.container.tag-page {
            div.tag-header {
                a.back-link href="/tags" { "← All Tags" }
                h1 { "Posts tagged with \"" (entry.name) "\"" }
                p.post-count {
                    @if posts.len() == 1 { "1 post" } @else { (posts.len()) " posts" }
                }
            }
            div.post-list {
                @for post in posts {
                    (post_card(config, post))
                }
            }
        }
    };

    base_document(config, Some(&entry.name), None, false, content)
}

/// Renders the not-found page
pub fn render_not_found(config: &SiteConfig) -> Markup {
    let content = html! {
        div.container.not-found {
            h1 { "404" }
            p { "This page could not be found." }
            a href="/" { "Back to home" }
        }
    };

    base_document(config, Some("Not Found"), None, false, content)
}

// ============================================================================
// Components
// ============================================================================

/// Renders one post entry in a listing
fn post_card(config: &SiteConfig, post: &Post) -> Markup {
    html! {
        article.post-card {
            a.post-link href=(post.path()) {
                h2 { (post.title) }
            }
            div.post-meta {
                @if let Some(date) = display_date(config, post) {
                    span { (date) }
                }
                @if let Some(author) = &post.author {
                    span { (author) }
                }
            }
            @if let Some(excerpt) = &post.excerpt {
                p.post-excerpt { (excerpt) }
            }
            (tag_chips(&post.tags))
        }
    }
}

/// Renders tag chips linking to tag pages
fn tag_chips(tags: &[String]) -> Markup {
    html! {
        @if !tags.is_empty() {
            div.tag-list {
                @for tag in tags {
                    a.tag-chip href={ "/tags/" (slug::slugify(tag)) } { (tag) }
                }
            }
        }
    }
}

/// Renders the giscus comments widget
fn comments_section(config: &SiteConfig) -> Markup {
    let c = &config.comments;
    html! {
        section.comments {
            script src="https://giscus.app/client.js"
                data-repo=(c.repo)
                data-repo-id=(c.repo_id)
                data-category=(c.category)
                data-category-id=(c.category_id)
                data-mapping=(c.mapping)
                data-term=[(!c.term.is_empty()).then_some(c.term.as_str())]
                data-reactions-enabled="1"
                data-emit-metadata="0"
                data-input-position="top"
                data-theme=(c.theme)
                data-lang="en"
                data-loading="lazy"
                crossorigin="anonymous"
                async {}
        }
    }
}

/// Date shown in listings and post headers. Parsed dates use the configured
/// format, unparseable ones fall back to the raw front-matter string.
fn display_date(config: &SiteConfig, post: &Post) -> Option<String> {
    if let Some(date) = post.date {
        Some(date.format(&config.date_format).to_string())
    } else if !post.date_raw.is_empty() {
        Some(post.date_raw.clone())
    } else {
        None
    }
}

fn icon_github() -> Markup {
    html! {
        svg.icon viewBox="0 0 24 24" width="20" height="20" fill="currentColor" aria-hidden="true" {
            path d="M12 .297c-6.63 0-12 5.373-12 12 0 5.303 3.438 9.8 8.205 11.385.6.113.82-.258.82-.577 0-.285-.01-1.04-.015-2.04-3.338.724-4.042-1.61-4.042-1.61C4.422 18.07 3.633 17.7 3.633 17.7c-1.087-.744.084-.729.084-.729 1.205.084 1.838 1.236 1.838 1.236 1.07 1.835 2.809 1.305 3.495.998.108-.776.417-1.305.76-1.605-2.665-.3-5.466-1.332-5.466-5.93 0-1.31.465-2.38 1.235-3.22-.135-.303-.54-1.523.105-3.176 0 0 1.005-.322 3.3 1.23.96-.267 1.98-.399 3-.405 1.02.006 2.04.138 3 .405 2.28-1.552 3.285-1.23 3.285-1.23.645 1.653.24 2.873.12 3.176.765.84 1.23 1.91 1.23 3.22 0 4.61-2.805 5.625-5.475 5.92.42.36.81 1.096.81 2.22 0 1.606-.015 2.896-.015 3.286 0 .315.21.69.825.57C20.565 22.092 24 17.592 24 12.297c0-6.627-5.373-12-12-12" {}
        }
    }
}

fn icon_twitter() -> Markup {
    html! {
        svg.icon viewBox="0 0 24 24" width="20" height="20" fill="currentColor" aria-hidden="true" {
            path d="M23.953 4.57a10 10 0 01-2.825.775 4.958 4.958 0 002.163-2.723c-.951.555-2.005.959-3.127 1.184a4.92 4.92 0 00-8.384 4.482C7.69 8.095 4.067 6.13 1.64 3.162a4.822 4.822 0 00-.666 2.475c0 1.71.87 3.213 2.188 4.096a4.904 4.904 0 01-2.228-.616v.06a4.923 4.923 0 003.946 4.827 4.996 4.996 0 01-2.212.085 4.936 4.936 0 004.604 3.417 9.867 9.867 0 01-6.102 2.105c-.39 0-.779-.023-1.17-.067a13.995 13.995 0 007.557 2.209c9.053 0 13.998-7.496 13.998-13.985 0-.21 0-.42-.015-.63A9.935 9.935 0 0024 4.59z" {}
        }
    }
}

fn icon_linkedin() -> Markup {
    html! {
        svg.icon viewBox="0 0 24 24" width="20" height="20" fill="currentColor" aria-hidden="true" {
            path d="M20.447 20.452h-3.554v-5.569c0-1.328-.027-3.037-1.852-3.037-1.853 0-2.136 1.445-2.136 2.939v5.667H9.351V9h3.414v1.561h.046c.477-.9 1.637-1.85 3.37-1.85 3.601 0 4.267 2.37 4.267 5.455v6.286zM5.337 7.433c-1.144 0-2.063-.926-2.063-2.065 0-1.138.92-2.063 2.063-2.063 1.14 0 2.064.925 2.064 2.063 0 1.139-.925 2.065-2.064 2.065zm1.782 13.019H3.555V9h3.564v11.452zM22.225 0H1.771C.792 0 0 .774 0 1.729v20.542C0 23.227.792 24 1.771 24h20.451C23.2 24 24 23.227 24 22.271V1.729C24 .774 23.2 0 22.225 0z" {}
        }
    }
}

fn icon_email() -> Markup {
    html! {
        svg.icon viewBox="0 0 24 24" width="20" height="20" fill="none" stroke="currentColor" stroke-width="2" aria-hidden="true" {
            rect x="2" y="4" width="20" height="16" rx="2" {}
            path d="M2 7l10 7 10-7" {}
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_post(id: &str, title: &str) -> Post {
        let mut post = Post::new(id.to_string(), title.to_string(), format!("{}.md", id));
        post.date = chrono::Local.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).single();
        post.date_raw = "2024-01-15".to_string();
        post.published = true;
        post
    }

    #[test]
    fn test_base_document_structure() {
        let config = SiteConfig::default();
        let doc = base_document(&config, None, None, false, html! { p { "hi" } }).into_string();

        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Bytecron Labs</title>"));
        assert!(doc.contains("atom.xml"));
        assert!(doc.contains("<style>"));
    }

    #[test]
    fn test_page_title_includes_site_title() {
        let config = SiteConfig::default();
        let doc =
            base_document(&config, Some("Hello"), None, false, html! {}).into_string();
        assert!(doc.contains("<title>Hello | Bytecron Labs</title>"));
    }

    #[test]
    fn test_math_assets_only_when_needed() {
        let config = SiteConfig::default();

        let plain = base_document(&config, None, None, false, html! {}).into_string();
        assert!(!plain.contains("katex.min.js"));

        let math = base_document(&config, None, None, true, html! {}).into_string();
        assert!(math.contains("katex.min.css"));
        assert!(math.contains("auto-render.min.js"));
        assert!(math.contains("renderMathInElement"));
    }

    #[test]
    fn test_navbar_brand_and_social_links() {
        let config = SiteConfig::default();
        let doc = base_document(&config, None, None, false, html! {}).into_string();

        assert!(doc.contains("Bytecron Labs"));
        assert!(doc.contains(r#"aria-label="GitHub""#));
        assert!(doc.contains(r#"aria-label="Email""#));
        assert!(doc.contains("mailto:"));
    }

    #[test]
    fn test_navbar_tagline_comes_from_config() {
        let mut config = SiteConfig::default();
        config.taglines = vec!["Only one".to_string()];
        let doc = base_document(&config, None, None, false, html! {}).into_string();
        assert!(doc.contains("Only one"));
    }

    #[test]
    fn test_footer_powered_by() {
        let config = SiteConfig::default();
        let doc = base_document(&config, None, None, false, html! {}).into_string();
        assert!(doc.contains("Powered by"));
        assert!(doc.contains("bytecron"));
    }

    #[test]
    fn test_index_lists_posts() {
        let config = SiteConfig::default();
        let mut post = test_post("first", "First Post");
        post.excerpt = Some("A short intro".to_string());
        post.tags = vec!["rust".to_string()];

        let doc = render_index(&config, &[post]).into_string();

        assert!(doc.contains("First Post"));
        assert!(doc.contains(r#"href="/post/first""#));
        assert!(doc.contains("A short intro"));
        assert!(doc.contains(r#"href="/tags/rust""#));
    }

    #[test]
    fn test_index_escapes_html_in_titles() {
        let config = SiteConfig::default();
        let post = test_post("evil", "<script>alert('xss')</script>");

        let doc = render_index(&config, &[post]).into_string();

        assert!(!doc.contains("<script>alert"));
        assert!(doc.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_post_page_header() {
        let config = SiteConfig::default();
        let mut post = test_post("hello", "Hello World");
        post.author = Some("Steve".to_string());
        post.content = "<p>Body text</p>".to_string();

        let doc = render_post(&config, &post).into_string();

        assert!(doc.contains("<h1>Hello World</h1>"));
        assert!(doc.contains("January 15, 2024"));
        assert!(doc.contains("Steve"));
        assert!(doc.contains("•"));
        assert!(doc.contains("<p>Body text</p>"));
    }

    #[test]
    fn test_post_page_comments_widget() {
        let config = SiteConfig::default();
        let post = test_post("hello", "Hello");

        let doc = render_post(&config, &post).into_string();
        assert!(doc.contains("giscus.app/client.js"));
        assert!(doc.contains(r#"data-repo="techbysteve/bytecron-labs-next""#));
        assert!(doc.contains(r#"data-mapping="title""#));

        let mut disabled = SiteConfig::default();
        disabled.comments.enable = false;
        let doc = render_post(&disabled, &post).into_string();
        assert!(!doc.contains("giscus.app"));
    }

    #[test]
    fn test_post_page_description_falls_back_to_body() {
        let config = SiteConfig::default();
        let mut post = test_post("hello", "Hello");
        post.content = "<p>Some body text for the meta description.</p>".to_string();

        let doc = render_post(&config, &post).into_string();
        assert!(doc.contains(r#"meta name="description""#));
        assert!(doc.contains("Some body text"));
    }

    #[test]
    fn test_tags_page_lists_counts() {
        let config = SiteConfig::default();
        let mut a = test_post("a", "A");
        a.tags = vec!["rust".to_string(), "cli".to_string()];
        let mut b = test_post("b", "B");
        b.tags = vec!["rust".to_string()];

        let index = TagIndex::from_posts(&[a, b]);
        let doc = render_tags(&config, &index).into_string();

        assert!(doc.contains("All Tags"));
        assert!(doc.contains("rust"));
        assert!(doc.contains("(2)"));
        assert!(doc.contains(r#"href="/tags/rust""#));
    }

    #[test]
    fn test_tag_page_header_and_count() {
        let config = SiteConfig::default();
        let mut post = test_post("a", "A");
        post.tags = vec!["rust".to_string()];
        let posts = [post];
        let index = TagIndex::from_posts(&posts);
        let entry = index.find("rust").unwrap();

        let doc = render_tag(&config, entry, &[&posts[0]]).into_string();

        assert!(doc.contains("Posts tagged with &quot;rust&quot;"));
        assert!(doc.contains("1 post"));
        assert!(doc.contains("All Tags"));
        assert!(doc.contains(r#"href="/tags""#));
    }

    #[test]
    fn test_not_found_page() {
        let config = SiteConfig::default();
        let doc = render_not_found(&config).into_string();
        assert!(doc.contains("404"));
        assert!(doc.contains("This page could not be found."));
    }
}
