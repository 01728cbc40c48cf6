//! Content loader - loads posts from the content directory

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, Post};
use crate::Site;

/// Extensions treated as markdown content
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdx"];

/// Loads content from the content directory
pub struct ContentLoader {
    site: Site,
    renderer: MarkdownRenderer,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(site: &Site) -> Self {
        let renderer = MarkdownRenderer::with_options(
            &site.config.highlight.theme,
            site.config.highlight.line_number,
        );
        Self {
            site: site.clone(),
            renderer,
        }
    }

    /// Load every document from the content directory, newest first.
    /// Unpublished documents are included; views filter on `published`.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let content_dir = &self.site.content_dir;
        if !content_dir.exists() {
            return Ok(Vec::new());
        }

        // Visit files in path order so documents with equal dates keep a
        // stable ordering between runs
        let mut files: Vec<PathBuf> = WalkDir::new(content_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && is_markdown_file(e.path()))
            .map(|e| e.into_path())
            .collect();
        files.sort();

        let mut posts = Vec::new();
        for path in &files {
            match self.load_file(path) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        // Sort by date descending (newest first); stable sort keeps the
        // path order for ties, undated documents go last
        posts.sort_by(Post::cmp_by_date);

        Ok(posts)
    }

    /// Load only published documents, newest first
    pub fn load_published(&self) -> Result<Vec<Post>> {
        let posts = self.load_posts()?;
        Ok(posts.into_iter().filter(|p| p.published).collect())
    }

    /// Look up a single document by identifier. Returns `Ok(None)` when no
    /// file with that stem exists.
    pub fn load_post(&self, id: &str) -> Result<Option<Post>> {
        // Identifiers are file stems, never paths
        if id.is_empty() || id.contains('/') || id.contains('\\') || id.contains("..") {
            return Ok(None);
        }

        for ext in MARKDOWN_EXTENSIONS {
            let path = self.site.content_dir.join(format!("{}.{}", id, ext));
            if path.is_file() {
                return self.load_file(&path).map(Some);
            }
        }

        // Posts can live in subdirectories; fall back to a walk
        if self.site.content_dir.exists() {
            let mut matches: Vec<PathBuf> = WalkDir::new(&self.site.content_dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file() && is_markdown_file(e.path()))
                .map(|e| e.into_path())
                .filter(|p| p.file_stem().and_then(|s| s.to_str()) == Some(id))
                .collect();
            matches.sort();

            if let Some(path) = matches.first() {
                return self.load_file(path).map(Some);
            }
        }

        Ok(None)
    }

    /// Load a single document from a file
    fn load_file(&self, path: &Path) -> Result<Post> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content);

        // The identifier comes from the filename, not the title
        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        // Title falls back to the identifier when the front-matter omits it
        let title = fm.title.clone().unwrap_or_else(|| id.clone());

        let date = fm.parse_date();
        let date_raw = fm.date.clone().unwrap_or_default();

        let source = path
            .strip_prefix(&self.site.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let rendered = self.renderer.render(body)?;

        let mut post = Post::new(id, title, source);
        post.date = date;
        post.date_raw = date_raw;
        post.excerpt = fm.summary().map(|s| s.to_string());
        post.tags = fm.tags;
        post.author = fm.author;
        post.published = fm.published;
        post.raw = body.to_string();
        post.content = rendered.html;
        post.has_math = rendered.has_math;
        post.full_source = path.to_path_buf();
        post.extra = fm.extra;

        Ok(post)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| MARKDOWN_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site_with_content(files: &[(&str, &str)]) -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let content_dir = dir.path().join("content");
        fs::create_dir_all(&content_dir).unwrap();
        for (name, body) in files {
            fs::write(content_dir.join(name), body).unwrap();
        }
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_load_posts_sorted_newest_first() {
        let (_dir, site) = site_with_content(&[
            (
                "older.md",
                "---\ntitle: Older\ndate: 2024-01-01\npublished: true\n---\nOld.",
            ),
            (
                "newer.md",
                "---\ntitle: Newer\ndate: 2024-03-01\npublished: true\n---\nNew.",
            ),
        ]);

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].id, "newer");
        assert_eq!(posts[1].id, "older");
    }

    #[test]
    fn test_load_posts_includes_unpublished() {
        let (_dir, site) = site_with_content(&[
            ("draft.md", "---\ntitle: Draft\ndate: 2024-02-01\n---\nWip."),
            (
                "live.md",
                "---\ntitle: Live\ndate: 2024-01-01\npublished: true\n---\nUp.",
            ),
        ]);

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts.len(), 2);

        let published = loader.load_published().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].id, "live");
    }

    #[test]
    fn test_equal_dates_keep_file_order() {
        let (_dir, site) = site_with_content(&[
            (
                "b-second.md",
                "---\ntitle: B\ndate: 2024-01-01\npublished: true\n---\nB.",
            ),
            (
                "a-first.md",
                "---\ntitle: A\ndate: 2024-01-01\npublished: true\n---\nA.",
            ),
        ]);

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts[0].id, "a-first");
        assert_eq!(posts[1].id, "b-second");
    }

    #[test]
    fn test_undated_posts_sort_last() {
        let (_dir, site) = site_with_content(&[
            ("undated.md", "---\ntitle: Undated\npublished: true\n---\nNo date."),
            (
                "dated.md",
                "---\ntitle: Dated\ndate: 2020-01-01\npublished: true\n---\nDated.",
            ),
        ]);

        let loader = ContentLoader::new(&site);
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts[0].id, "dated");
        assert_eq!(posts[1].id, "undated");
        assert!(posts[1].date.is_none());
    }

    #[test]
    fn test_load_post_by_id() {
        let (_dir, site) = site_with_content(&[(
            "hello-world.md",
            "---\ntitle: Hello World\ndate: 2024-01-01\ntags: [intro]\npublished: true\n---\nFirst post.",
        )]);

        let loader = ContentLoader::new(&site);
        let post = loader.load_post("hello-world").unwrap().unwrap();

        assert_eq!(post.id, "hello-world");
        assert_eq!(post.title, "Hello World");
        assert_eq!(post.tags, vec!["intro"]);
        assert!(post.content.contains("First post."));
    }

    #[test]
    fn test_load_post_unknown_id() {
        let (_dir, site) = site_with_content(&[]);
        let loader = ContentLoader::new(&site);
        assert!(loader.load_post("no-such-post").unwrap().is_none());
    }

    #[test]
    fn test_load_post_rejects_path_traversal() {
        let (_dir, site) = site_with_content(&[]);
        let loader = ContentLoader::new(&site);
        assert!(loader.load_post("../_config").unwrap().is_none());
        assert!(loader.load_post("a/b").unwrap().is_none());
    }

    #[test]
    fn test_load_post_in_subdirectory() {
        let (dir, site) = site_with_content(&[]);
        let nested = dir.path().join("content/2024");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            nested.join("deep.md"),
            "---\ntitle: Deep\ndate: 2024-01-01\npublished: true\n---\nNested.",
        )
        .unwrap();

        let loader = ContentLoader::new(&site);
        let post = loader.load_post("deep").unwrap().unwrap();
        assert_eq!(post.title, "Deep");
    }

    #[test]
    fn test_load_post_mdx_extension() {
        let (_dir, site) = site_with_content(&[(
            "from-next.mdx",
            "---\ntitle: Ported\ndate: 2024-01-01\npublished: true\n---\nBody.",
        )]);

        let loader = ContentLoader::new(&site);
        let post = loader.load_post("from-next").unwrap().unwrap();
        assert_eq!(post.title, "Ported");
    }

    #[test]
    fn test_missing_content_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let loader = ContentLoader::new(&site);
        assert!(loader.load_posts().unwrap().is_empty());
    }

    #[test]
    fn test_title_falls_back_to_id() {
        let (_dir, site) = site_with_content(&[("no-title.md", "Just a body.")]);
        let loader = ContentLoader::new(&site);
        let post = loader.load_post("no-title").unwrap().unwrap();
        assert_eq!(post.title, "no-title");
        assert!(!post.published);
    }
}
