//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use pulldown_cmark_escape::escape_html;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

const DEFAULT_THEME: &str = "InspiredGitHub";

/// Markdown renderer with syntax highlighting
///
/// Highlighting is emitted as inline styles so the HTML stays readable in
/// feed readers that drop site stylesheets.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }

    /// Create with a named syntect theme, falling back to the default theme
    pub fn with_theme(theme: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let theme = match themes.remove(theme) {
            Some(theme) => theme,
            None => {
                tracing::warn!("Unknown highlight theme {:?}, using {}", theme, DEFAULT_THEME);
                themes.remove(DEFAULT_THEME).unwrap_or_default()
            }
        };
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is stripped before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (language, collected source) of the fenced block being read
        let mut code_block: Option<(String, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().unwrap_or("").to_string()
                        }
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let highlighted = self.highlight_code(&code, &lang);
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        if lang.is_empty() {
            return format!("<pre><code>{}</code></pre>\n", html_escape(code));
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let body = match highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme)
        {
            Ok(highlighted) => highlighted,
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                format!("<pre><code>{}</code></pre>\n", html_escape(code))
            }
        };

        format!(
            "<div class=\"language-{}\">{}</div>\n",
            html_escape(lang),
            body
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for HTML bodies and quoted attributes
fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    // Writing into a String cannot fail
    let _ = escape_html(&mut escaped, s);
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.");
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_highlighted_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains(r#"<div class="language-rust">"#));
        assert!(html.contains("<pre"));
        assert!(html.contains("main"));
        // Colours are inline, not theme classes
        assert!(html.contains(r#"<span style=""#));
        assert!(!html.contains(r#"<span class=""#));
    }

    #[test]
    fn test_untagged_code_block_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```\n<div>&</div>\n```");
        assert!(html.contains("<pre><code>&lt;div&gt;&amp;&lt;/div&gt;"));
    }

    #[test]
    fn test_language_tag_is_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```a\"<b>\nx\n```");
        assert!(html.contains(r#"<div class="language-a&quot;&lt;b&gt;">"#));
        assert_eq!(
            html_escape("<a href=\"x\">&</a>"),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let renderer = MarkdownRenderer::with_theme("no-such-theme");
        let html = renderer.render("```klingon\nqapla'\n```");
        assert!(html.contains(r#"<div class="language-klingon">"#));
        assert!(html.contains("qapla"));
    }

    #[test]
    fn test_render_cjk_and_table() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("第一条内容\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("第一条内容"));
        assert!(html.contains("<table>"));
    }
}
