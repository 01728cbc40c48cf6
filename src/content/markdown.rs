//! Markdown rendering with syntax highlighting and math support

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::html_escape;

/// Result of rendering a post body
#[derive(Debug, Clone)]
pub struct RenderedBody {
    /// Rendered HTML content
    pub html: String,
    /// Whether the body contains math notation (to pull in the KaTeX assets)
    pub has_math: bool,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "base16-ocean.dark".to_string(),
            line_numbers: false,
        }
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<RenderedBody> {
        // Front-matter is stripped before rendering, so YAML metadata blocks
        // stay disabled here
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_MATH
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();
        // (src, title, accumulated alt text) while inside an image
        let mut image: Option<(String, String, String)> = None;
        let mut has_math = false;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted = self.highlight_code(&code_content, code_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_lang = None;
                }
                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some((dest_url.to_string(), title.to_string(), String::new()));
                }
                Event::End(TagEnd::Image) => {
                    if let Some((src, title, alt)) = image.take() {
                        events.push(Event::Html(CowStr::from(render_figure(
                            &src, &title, &alt,
                        ))));
                    }
                }
                Event::Text(text) => {
                    if in_code_block {
                        code_content.push_str(&text);
                    } else if let Some((_, _, alt)) = image.as_mut() {
                        alt.push_str(&text);
                    } else {
                        events.push(Event::Text(text));
                    }
                }
                Event::Code(code) => {
                    if let Some((_, _, alt)) = image.as_mut() {
                        alt.push_str(&code);
                    } else {
                        events.push(Event::Code(code));
                    }
                }
                Event::InlineMath(tex) => {
                    has_math = true;
                    events.push(Event::Html(CowStr::from(format!(
                        r#"<span class="math inline">\({}\)</span>"#,
                        html_escape(&tex)
                    ))));
                }
                Event::DisplayMath(tex) => {
                    has_math = true;
                    events.push(Event::Html(CowStr::from(format!(
                        r#"<div class="math display">\[{}\]</div>"#,
                        html_escape(&tex)
                    ))));
                }
                _ => {
                    if !in_code_block && image.is_none() {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(RenderedBody {
            html: html_output,
            has_math,
        })
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = match self.theme_set.themes.get(&self.theme_name) {
            Some(theme) => theme,
            None => match self.theme_set.themes.values().next() {
                Some(theme) => theme,
                None => return plain_code_block(code, lang),
            },
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => {
                if self.line_numbers {
                    add_line_numbers(&highlighted, lang)
                } else {
                    format!(
                        r#"<div class="highlight language-{}">{}</div>"#,
                        lang, highlighted
                    )
                }
            }
            Err(_) => plain_code_block(code, lang),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fallback code block without highlighting
fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        lang,
        html_escape(code)
    )
}

/// Add line numbers to highlighted code
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let line_count = lines.len();

    let mut gutter = String::new();
    let mut code_lines = String::new();

    for (i, line) in lines.iter().enumerate() {
        gutter.push_str(&format!(r#"<span class="line-number">{}</span>"#, i + 1));
        if i < line_count - 1 {
            gutter.push('\n');
        }

        code_lines.push_str(line);
        if i < line_count - 1 {
            code_lines.push('\n');
        }
    }

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        lang, gutter, code_lines
    )
}

/// Wrap an image in a figure with lazy loading
fn render_figure(src: &str, title: &str, alt: &str) -> String {
    let caption = if !title.is_empty() { title } else { alt };
    let mut fig = format!(
        r#"<figure><img src="{}" alt="{}" loading="lazy">"#,
        html_escape(src),
        html_escape(alt)
    );
    if !caption.is_empty() {
        fig.push_str(&format!("<figcaption>{}</figcaption>", html_escape(caption)));
    }
    fig.push_str("</figure>");
    fig
}
