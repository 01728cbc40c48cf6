//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,

    // Directory
    pub content_dir: String,
    pub output_dir: String,

    // Writing
    pub new_post_name: String,
    pub date_format: String,

    // Rendering
    #[serde(default)]
    pub highlight: HighlightConfig,
    pub katex_cdn: String,

    // Navbar taglines, one picked at random per page
    #[serde(default)]
    pub taglines: Vec<String>,

    // Social links in the navbar
    #[serde(default)]
    pub social: SocialConfig,

    // Giscus comments widget
    #[serde(default)]
    pub comments: CommentsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Bytecron Labs".to_string(),
            subtitle: String::new(),
            description: "Writing about software, systems, and whatever else sticks".to_string(),
            author: "Steve Boby George".to_string(),
            language: "en".to_string(),

            url: "https://bytecronlabs.vercel.app".to_string(),

            content_dir: "content".to_string(),
            output_dir: "public".to_string(),

            new_post_name: ":title.md".to_string(),
            date_format: "%B %-d, %Y".to_string(),

            highlight: HighlightConfig::default(),
            katex_cdn: "https://cdn.jsdelivr.net/npm/katex@0.16.11/dist".to_string(),

            taglines: vec![
                "Bits, bytes, and occasional insights".to_string(),
                "Notes from the terminal".to_string(),
                "Shipping curiosity since 2024".to_string(),
                "Compiling thoughts into posts".to_string(),
            ],

            social: SocialConfig::default(),
            comments: CommentsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Social links shown in the navbar
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub github: String,
    pub twitter: String,
    pub linkedin: String,
    pub email: String,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            github: "https://github.com/steve-cse".to_string(),
            twitter: "https://twitter.com/bytesbysteve".to_string(),
            linkedin: "https://linkedin.com/in/steve-cse".to_string(),
            email: "stevebobygeorge@proton.me".to_string(),
        }
    }
}

/// Giscus comments widget configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentsConfig {
    pub enable: bool,
    pub repo: String,
    pub repo_id: String,
    pub category: String,
    pub category_id: String,
    pub mapping: String,
    pub term: String,
    pub theme: String,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            repo: "techbysteve/bytecron-labs-next".to_string(),
            repo_id: "R_kgDOP8JXTA".to_string(),
            category: "Announcements".to_string(),
            category_id: "DIC_kwDOP8JXTM4C0hAH".to_string(),
            mapping: "title".to_string(),
            term: "Welcome to bytecron labs!".to_string(),
            theme: "dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Bytecron Labs");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.output_dir, "public");
        assert_eq!(config.highlight.theme, "base16-ocean.dark");
        assert!(config.comments.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
content_dir: posts
comments:
  enable: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.content_dir, "posts");
        assert!(!config.comments.enable);
        // Unspecified sections keep their defaults
        assert_eq!(config.output_dir, "public");
        assert_eq!(config.social.github, "https://github.com/steve-cse");
    }

    #[test]
    fn test_partial_comments_config() {
        let yaml = r#"
comments:
  repo: someone/some-repo
  repo_id: R_abc123
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.comments.repo, "someone/some-repo");
        assert_eq!(config.comments.mapping, "title");
    }
}
