//! Content loader - loads markdown documents from the source directory

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

use super::{Document, FrontMatter, MarkdownRenderer};
use crate::helpers::page_url;
use crate::Blog;

/// What to keep from each document besides its front-matter and URL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keep the markdown body in [`Document::src`]
    pub include_src: bool,
    /// Render the body into [`Document::html`]
    pub render: bool,
}

/// Loads content from the source directory
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    pattern: Pattern,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let pattern = Pattern::new(&blog.config.posts)
            .with_context(|| format!("Invalid posts pattern {:?}", blog.config.posts))?;
        Ok(Self {
            blog,
            pattern,
            renderer: MarkdownRenderer::new(),
        })
    }

    /// Load every document matching the posts pattern, ordered by path
    pub fn load(&self, options: LoadOptions) -> Result<Vec<Document>> {
        let source_dir = &self.blog.source_dir;
        if !source_dir.exists() {
            tracing::warn!("Source directory {:?} does not exist", source_dir);
            return Ok(Vec::new());
        }

        let match_options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::new()
        };

        let mut documents = Vec::new();

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(source_dir).unwrap_or(path);
            if !self.pattern.matches_path_with(relative, match_options) {
                continue;
            }

            match self.load_document(path, relative, options) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {}", path, e);
                }
            }
        }

        tracing::debug!("Loaded {} documents from {:?}", documents.len(), source_dir);
        Ok(documents)
    }

    /// Load a single document from a file
    fn load_document(&self, path: &Path, relative: &Path, options: LoadOptions) -> Result<Document> {
        let content = fs::read_to_string(path)?;
        let (frontmatter, body) = FrontMatter::parse(&content)?;

        let source = relative.to_string_lossy().replace('\\', "/");
        let url = page_url(&source, self.blog.config.clean_urls);

        let src = options.include_src.then(|| body.to_string());
        let html = options.render.then(|| self.renderer.render(body));

        Ok(Document {
            source,
            url,
            frontmatter,
            src,
            html,
        })
    }
}

/// Dot-directories such as `.vitepress` hold site tooling, not content
fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site(files: &[(&str, &str)], config: &str) -> (TempDir, Blog) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_config.yml"), config).unwrap();
        for (name, content) in files {
            let path = dir.path().join("doc").join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    #[test]
    fn test_load_top_level_markdown() {
        let (_dir, blog) = site(
            &[
                ("b-post.md", "---\ntitle: B\ndate: 2025-01-02\n---\nHello **world**"),
                ("a-post.md", "---\ntitle: A\n---\nNo date"),
                ("index.md", "---\nlayout: home\n---\n"),
                ("notes/deep.md", "---\ntitle: Deep\n---\n"),
                (".vitepress/theme.md", "---\ntitle: Hidden\n---\n"),
                ("image.png", "not markdown"),
            ],
            "timezone: UTC\n",
        );

        let loader = ContentLoader::new(&blog).unwrap();
        let docs = loader.load(LoadOptions::default()).unwrap();

        let urls: Vec<_> = docs.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(urls, vec!["/a-post.html", "/b-post.html", "/"]);
        assert!(docs.iter().all(|d| d.src.is_none() && d.html.is_none()));
        assert_eq!(docs[1].frontmatter.title.as_deref(), Some("B"));
        assert_eq!(docs[1].source, "b-post.md");
    }

    #[test]
    fn test_load_with_src_and_html() {
        let (_dir, blog) = site(
            &[("post.md", "---\ntitle: Post\ndate: 2025-01-02\n---\nHello **world**")],
            "clean_urls: true\n",
        );

        let loader = ContentLoader::new(&blog).unwrap();
        let docs = loader
            .load(LoadOptions {
                include_src: true,
                render: true,
            })
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].url, "/post");
        assert_eq!(docs[0].src.as_deref(), Some("Hello **world**"));
        assert!(docs[0]
            .html
            .as_deref()
            .unwrap()
            .contains("<strong>world</strong>"));
    }

    #[test]
    fn test_recursive_pattern() {
        let (_dir, blog) = site(
            &[
                ("top.md", "top"),
                ("notes/index.md", "notes"),
                (".vitepress/config.md", "hidden"),
            ],
            "posts: \"**/*.md\"\n",
        );

        let loader = ContentLoader::new(&blog).unwrap();
        let docs = loader.load(LoadOptions::default()).unwrap();
        let urls: Vec<_> = docs.iter().map(|d| d.url.as_str()).collect();
        assert_eq!(urls, vec!["/notes/", "/top.html"]);
    }

    #[test]
    fn test_missing_source_dir() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        let loader = ContentLoader::new(&blog).unwrap();
        assert!(loader.load(LoadOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_pattern() {
        let (_dir, blog) = site(&[], "posts: \"[\"\n");
        assert!(ContentLoader::new(&blog).is_err());
    }
}
