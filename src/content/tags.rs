//! Tag index built from loaded posts

use indexmap::IndexMap;

use super::Post;

/// A single tag with its usage count
#[derive(Debug, Clone)]
pub struct TagEntry {
    /// Tag name as written in front-matter
    pub name: String,
    /// URL-safe form of the name
    pub slug: String,
    /// Number of posts carrying the tag
    pub count: usize,
}

impl TagEntry {
    /// Path of the tag listing page
    pub fn path(&self) -> String {
        format!("/tags/{}", self.slug)
    }
}

/// Tags collected across a set of posts, ordered by count descending
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    entries: Vec<TagEntry>,
}

impl TagIndex {
    /// Build the index from posts. Callers pass the published subset so
    /// draft-only tags never show up.
    pub fn from_posts(posts: &[Post]) -> Self {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for post in posts {
            for tag in &post.tags {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<TagEntry> = counts
            .into_iter()
            .map(|(name, count)| {
                let slug = slug::slugify(&name);
                TagEntry { name, slug, count }
            })
            .collect();

        // Most used first, name as the tie-break
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        Self { entries }
    }

    /// All tags, count descending
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Look up a tag by its name or slug
    pub fn find(&self, tag: &str) -> Option<&TagEntry> {
        self.entries
            .iter()
            .find(|e| e.name == tag || e.slug == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Posts carrying the given tag, keeping the input order
pub fn posts_with_tag<'a>(posts: &'a [Post], tag: &str) -> Vec<&'a Post> {
    posts.iter().filter(|p| p.has_tag(tag)).collect()
}
