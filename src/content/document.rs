//! Content document model

use serde::Serialize;

use super::FrontMatter;

/// One markdown file as seen by the post listing and the feed
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    /// Path relative to the source directory
    pub source: String,

    /// Site URL (without hostname)
    pub url: String,

    /// Parsed front-matter
    pub frontmatter: FrontMatter,

    /// Markdown body after the front-matter, when requested
    pub src: Option<String>,

    /// Rendered HTML body, when requested
    pub html: Option<String>,
}

impl Document {
    /// Create a document with only front-matter and URL
    pub fn new(url: impl Into<String>, frontmatter: FrontMatter) -> Self {
        let url = url.into();
        Self {
            source: url.trim_start_matches('/').to_string(),
            url,
            frontmatter,
            ..Default::default()
        }
    }

    pub fn with_src(mut self, src: impl Into<String>) -> Self {
        self.src = Some(src.into());
        self
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}
