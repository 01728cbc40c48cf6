//! Initialize a new blog site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::Site;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    // Create directory structure
    fs::create_dir_all(target_dir)?;
    fs::create_dir_all(target_dir.join("content"))?;

    // Create default _config.yml
    let config_content = r#"# bytecron configuration

# Site
title: Bytecron Labs
subtitle: ''
description: Writing about software, systems, and whatever else sticks
author: Steve Boby George
language: en

# URL
url: https://bytecronlabs.vercel.app

# Directory
content_dir: content
output_dir: public

# Writing
new_post_name: :title.md
date_format: '%B %-d, %Y'

# Code highlighting
highlight:
  theme: base16-ocean.dark
  line_number: false

# Math (assets load only on pages that contain math)
katex_cdn: https://cdn.jsdelivr.net/npm/katex@0.16.11/dist

# Navbar taglines, one picked at random per page
taglines:
  - Bits, bytes, and occasional insights
  - Notes from the terminal
  - Shipping curiosity since 2024
  - Compiling thoughts into posts

# Social links in the navbar (empty values are hidden)
social:
  github: https://github.com/steve-cse
  twitter: https://twitter.com/bytesbysteve
  linkedin: https://linkedin.com/in/steve-cse
  email: stevebobygeorge@proton.me

# Giscus comments (https://giscus.app)
comments:
  enable: true
  repo: techbysteve/bytecron-labs-next
  repo_id: R_kgDOP8JXTA
  category: Announcements
  category_id: DIC_kwDOP8JXTM4C0hAH
  mapping: title
  term: Welcome to bytecron labs!
  theme: dark
"#;

    fs::write(target_dir.join("_config.yml"), config_content)?;

    // Create a sample post
    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
title: Hello World
date: {}
excerpt: A quick tour of what this blog can do.
tags:
  - meta
published: true
---

Welcome to your new blog. This is your first post. Edit it, delete it, or
write another one with `bytecron new "My Post Title"`.

Posts start out as drafts. Set `published: true` in the front-matter when a
post is ready to appear on the index, the tag pages, and the feed.

## Code

Fenced code blocks are highlighted at build time:

```rust
fn main() {{
    println!("Hello, world!");
}}
```

## Math

Inline math like $e^{{i\pi}} + 1 = 0$ and display math both render with KaTeX:

$$
\int_{{-\infty}}^{{\infty}} e^{{-x^2}} \, dx = \sqrt{{\pi}}
$$

## Images

Drop images next to your markdown files and reference them with a relative
path. Give the image a title to show a caption:

![A diagram](diagram.png "Figure 1: a diagram")
"#,
        now.format("%Y-%m-%d")
    );

    fs::write(target_dir.join("content/hello-world.md"), sample_post)?;

    Ok(())
}

/// Run the init command with an existing Site instance
pub fn run(site: &Site) -> Result<()> {
    init_site(&site.base_dir)
}
