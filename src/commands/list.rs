//! List site content

use anyhow::Result;

use crate::content::{ContentLoader, TagIndex};
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(site);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                let date = post
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "no date".to_string());
                let marker = if post.published { "" } else { " (draft)" };
                println!("  {} - {}{} [{}]", date, post.title, marker, post.source);
            }
        }
        "tag" | "tags" => {
            let posts = loader.load_published()?;
            let index = TagIndex::from_posts(&posts);
            println!("Tags ({}):", index.len());
            for entry in index.entries() {
                println!("  {} ({})", entry.name, entry.count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: posts, tags", content_type);
        }
    }

    Ok(())
}
