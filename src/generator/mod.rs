//! Generator module - writes the static site to the output directory

use anyhow::Result;
use std::fs;
use walkdir::WalkDir;

use crate::content::{posts_with_tag, ContentLoader, Post, TagIndex};
use crate::pages;
use crate::Site;

/// Static site generator
pub struct Generator {
    site: Site,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Self {
        Self { site: site.clone() }
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<()> {
        if !self.site.content_dir.exists() {
            anyhow::bail!(
                "content directory {:?} does not exist",
                self.site.content_dir
            );
        }

        fs::create_dir_all(&self.site.output_dir)?;

        let loader = ContentLoader::new(&self.site);
        let posts = loader.load_posts()?;
        let published: Vec<Post> = posts.iter().filter(|p| p.published).cloned().collect();

        self.generate_index(&published)?;
        self.generate_post_pages(&posts)?;
        self.generate_tag_pages(&published)?;
        self.generate_not_found()?;
        self.generate_atom_feed(&published)?;
        self.copy_assets()?;

        tracing::info!(
            "Generated {} posts ({} published) into {:?}",
            posts.len(),
            published.len(),
            self.site.output_dir
        );

        Ok(())
    }

    /// Generate the index page listing published posts
    fn generate_index(&self, published: &[Post]) -> Result<()> {
        let html = pages::render_index(&self.site.config, published).into_string();
        fs::write(self.site.output_dir.join("index.html"), html)?;
        tracing::debug!("Generated index.html");
        Ok(())
    }

    /// Generate individual post pages. Pages are written for every document,
    /// published or not, so drafts stay reachable at their direct URL without
    /// being linked from any listing.
    fn generate_post_pages(&self, posts: &[Post]) -> Result<()> {
        for post in posts {
            let html = pages::render_post(&self.site.config, post).into_string();

            let output_path = self
                .site
                .output_dir
                .join("post")
                .join(&post.id)
                .join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate the tag listing and one page per tag
    fn generate_tag_pages(&self, published: &[Post]) -> Result<()> {
        let index = TagIndex::from_posts(published);

        let html = pages::render_tags(&self.site.config, &index).into_string();
        let tags_path = self.site.output_dir.join("tags").join("index.html");
        if let Some(parent) = tags_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tags_path, html)?;

        for entry in index.entries() {
            let tagged = posts_with_tag(published, &entry.name);
            let html = pages::render_tag(&self.site.config, entry, &tagged).into_string();

            let output_path = self
                .site
                .output_dir
                .join("tags")
                .join(&entry.slug)
                .join("index.html");
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&output_path, html)?;
        }

        tracing::info!("Generated {} tag pages", index.len());
        Ok(())
    }

    /// Generate the fallback 404 page
    fn generate_not_found(&self) -> Result<()> {
        let html = pages::render_not_found(&self.site.config).into_string();
        fs::write(self.site.output_dir.join("404.html"), html)?;
        Ok(())
    }

    /// Generate the Atom feed
    fn generate_atom_feed(&self, published: &[Post]) -> Result<()> {
        let feed = atom_feed(&self.site.config, published);
        let output_path = self.site.output_dir.join("atom.xml");
        fs::write(&output_path, feed)?;
        tracing::info!("Generated atom.xml");
        Ok(())
    }

    /// Copy non-markdown assets from the content directory
    fn copy_assets(&self) -> Result<()> {
        let content_dir = &self.site.content_dir;

        for entry in WalkDir::new(content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str());

                // Markdown files are processed separately
                if matches!(ext, Some("md") | Some("markdown") | Some("mdx")) {
                    continue;
                }

                let relative = path.strip_prefix(content_dir)?;
                let dest = self.site.output_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

/// Build the Atom feed document for the most recent published posts
pub fn atom_feed(config: &crate::config::SiteConfig, published: &[Post]) -> String {
    let base_url = config.url.trim_end_matches('/');

    let mut feed = String::new();
    feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
    feed.push('\n');
    feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
    feed.push('\n');
    feed.push_str(&format!("  <title>{}</title>\n", escape_xml(&config.title)));
    feed.push_str(&format!(
        "  <link href=\"{}/atom.xml\" rel=\"self\"/>\n",
        base_url
    ));
    feed.push_str(&format!("  <link href=\"{}/\"/>\n", base_url));
    feed.push_str(&format!(
        "  <updated>{}</updated>\n",
        chrono::Utc::now().to_rfc3339()
    ));
    feed.push_str(&format!("  <id>{}/</id>\n", base_url));
    feed.push_str(&format!(
        "  <author><name>{}</name></author>\n",
        escape_xml(&config.author)
    ));

    // Include recent posts (limit to 20)
    for post in published.iter().take(20) {
        let link = format!("{}{}", base_url, post.path());

        feed.push_str("  <entry>\n");
        feed.push_str(&format!("    <title>{}</title>\n", escape_xml(&post.title)));
        feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
        feed.push_str(&format!("    <id>{}</id>\n", link));
        if let Some(date) = post.date {
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                date.to_rfc3339()
            ));
            feed.push_str(&format!("    <updated>{}</updated>\n", date.to_rfc3339()));
        } else {
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                chrono::Utc::now().to_rfc3339()
            ));
        }
        // Convert relative URLs in content to absolute URLs
        let content_with_full_urls = convert_relative_urls_to_absolute(&post.content, base_url);
        // Strip invalid XML control characters
        let clean_content = strip_invalid_xml_chars(&content_with_full_urls);
        feed.push_str(&format!(
            "    <content type=\"html\"><![CDATA[{}]]></content>\n",
            clean_content
        ));
        feed.push_str("  </entry>\n");
    }

    feed.push_str("</feed>\n");
    feed
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Convert relative URLs in HTML content to absolute URLs
/// Handles href="/...", src="/...", and similar patterns
fn convert_relative_urls_to_absolute(content: &str, base_url: &str) -> String {
    content
        .replace("href=\"/", &format!("href=\"{}/", base_url))
        .replace("src=\"/", &format!("src=\"{}/", base_url))
        .replace("href='/", &format!("href='{}/", base_url))
        .replace("src='/", &format!("src='{}/", base_url))
}

/// Strip invalid XML control characters (except tab, newline, carriage return)
/// XML 1.0 only allows: #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            c == '\t'
                || c == '\n'
                || c == '\r'
                || ('\u{0020}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || ('\u{10000}'..='\u{10FFFF}').contains(&c)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_site() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(&content).unwrap();

        fs::write(
            content.join("alpha.md"),
            "---\ntitle: Alpha\ndate: 2024-01-01\ntags: [rust]\npublished: true\n---\nAlpha body.",
        )
        .unwrap();
        fs::write(
            content.join("beta.md"),
            "---\ntitle: Beta\ndate: 2024-02-01\ntags: [rust, secret]\n---\nDraft body.",
        )
        .unwrap();
        fs::write(
            content.join("gamma.md"),
            "---\ntitle: Gamma\ndate: 2024-03-01\ntags: [go]\npublished: true\n---\nGamma body.",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_generate_site_structure() {
        let (dir, site) = setup_site();
        Generator::new(&site).generate().unwrap();

        let public = dir.path().join("public");
        assert!(public.join("index.html").exists());
        assert!(public.join("post/alpha/index.html").exists());
        assert!(public.join("post/beta/index.html").exists());
        assert!(public.join("post/gamma/index.html").exists());
        assert!(public.join("tags/index.html").exists());
        assert!(public.join("tags/rust/index.html").exists());
        assert!(public.join("tags/go/index.html").exists());
        assert!(public.join("404.html").exists());
        assert!(public.join("atom.xml").exists());
    }

    #[test]
    fn test_index_lists_only_published_newest_first() {
        let (dir, site) = setup_site();
        Generator::new(&site).generate().unwrap();

        let index = fs::read_to_string(dir.path().join("public/index.html")).unwrap();
        assert!(index.contains("Alpha"));
        assert!(index.contains("Gamma"));
        assert!(!index.contains("Beta"));

        let gamma_pos = index.find("Gamma").unwrap();
        let alpha_pos = index.find("Alpha").unwrap();
        assert!(gamma_pos < alpha_pos);
    }

    #[test]
    fn test_tag_pages_skip_drafts() {
        let (dir, site) = setup_site();
        Generator::new(&site).generate().unwrap();

        let public = dir.path().join("public");

        // The draft-only tag gets no page at all
        assert!(!public.join("tags/secret").exists());

        let rust_page = fs::read_to_string(public.join("tags/rust/index.html")).unwrap();
        assert!(rust_page.contains("Alpha"));
        assert!(!rust_page.contains("Beta"));
        assert!(rust_page.contains("1 post"));

        let tags_page = fs::read_to_string(public.join("tags/index.html")).unwrap();
        assert!(!tags_page.contains("secret"));
    }

    #[test]
    fn test_atom_feed_contains_published_posts() {
        let (dir, site) = setup_site();
        Generator::new(&site).generate().unwrap();

        let feed = fs::read_to_string(dir.path().join("public/atom.xml")).unwrap();
        assert!(feed.contains(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#));
        assert!(feed.contains("<title>Gamma</title>"));
        assert!(feed.contains("/post/gamma"));
        assert!(!feed.contains("<title>Beta</title>"));
    }

    #[test]
    fn test_assets_copied() {
        let (dir, site) = setup_site();
        fs::create_dir_all(site.content_dir.join("images")).unwrap();
        fs::write(site.content_dir.join("images/pic.png"), b"not a real png").unwrap();

        Generator::new(&site).generate().unwrap();

        let public = dir.path().join("public");
        assert!(public.join("images/pic.png").exists());
        assert!(!public.join("alpha.md").exists());
    }

    #[test]
    fn test_generate_fails_without_content_dir() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert!(Generator::new(&site).generate().is_err());
    }

    #[test]
    fn test_strip_invalid_xml_chars() {
        assert_eq!(strip_invalid_xml_chars("ok\u{0008}text"), "oktext");
        assert_eq!(strip_invalid_xml_chars("tab\tand\nnewline"), "tab\tand\nnewline");
    }

    #[test]
    fn test_convert_relative_urls() {
        let html = r#"<a href="/post/x">x</a> <img src="/images/y.png">"#;
        let out = convert_relative_urls_to_absolute(html, "https://example.com");
        assert!(out.contains(r#"href="https://example.com/post/x""#));
        assert!(out.contains(r#"src="https://example.com/images/y.png""#));
    }
}
