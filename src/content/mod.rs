//! Content module - handles posts, front-matter, and markdown rendering

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
mod tags;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::{MarkdownRenderer, RenderedBody};
pub use post::Post;
pub use tags::{posts_with_tag, TagEntry, TagIndex};
