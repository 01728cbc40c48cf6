//! Create a new post

use anyhow::Result;
use std::fs;

use crate::Site;

/// Create a new draft post in the content directory
pub fn create_post(site: &Site, title: &str) -> Result<()> {
    let now = chrono::Local::now();

    // Generate filename from the configured pattern
    let slug = slug::slugify(title);
    let filename = site
        .config
        .new_post_name
        .replace(":title", &slug)
        .replace(":year", &now.format("%Y").to_string())
        .replace(":month", &now.format("%m").to_string())
        .replace(":day", &now.format("%d").to_string())
        .replace(":i_month", &now.format("%-m").to_string())
        .replace(":i_day", &now.format("%-d").to_string());

    let file_path = site.content_dir.join(&filename);

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    // New posts stay off the index until published is flipped
    let content = format!(
        r#"---
title: {}
date: {}
excerpt: ''
tags: []
published: false
---

"#,
        title,
        now.format("%Y-%m-%d")
    );

    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_site(dir: &TempDir) -> Site {
        fs::create_dir_all(dir.path().join("content")).unwrap();
        Site::new(dir.path()).unwrap()
    }

    #[test]
    fn test_create_post() {
        let dir = TempDir::new().unwrap();
        let site = test_site(&dir);

        create_post(&site, "My First Post").unwrap();

        let path = dir.path().join("content/my-first-post.md");
        assert!(path.is_file());

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("title: My First Post"));
        assert!(content.contains("published: false"));
    }

    #[test]
    fn test_create_post_twice_fails() {
        let dir = TempDir::new().unwrap();
        let site = test_site(&dir);

        create_post(&site, "Duplicate").unwrap();
        assert!(create_post(&site, "Duplicate").is_err());
    }

    #[test]
    fn test_new_post_name_pattern() {
        let dir = TempDir::new().unwrap();
        let mut site = test_site(&dir);
        site.config.new_post_name = ":year-:month-:title.md".to_string();

        create_post(&site, "Pattern Post").unwrap();

        let now = chrono::Local::now();
        let expected = format!("{}-{}-pattern-post.md", now.format("%Y"), now.format("%m"));
        assert!(dir.path().join("content").join(expected).is_file());
    }
}
