//! Generator module - writes the post data set and the Atom feed

pub mod feed;
pub mod posts;

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use std::cmp::Ordering;
use std::fs;

use crate::content::Document;
use crate::helpers::parse_date;
use crate::Blog;

pub use feed::{FeedError, FeedMeta};
pub use posts::PostRecord;

/// File name of the post data set inside the public directory
pub const POSTS_DATA_FILE: &str = "posts.json";

/// A document that carries a date, with the date already parsed
#[derive(Debug, Clone, Copy)]
pub struct DatedDocument<'a> {
    pub document: &'a Document,
    /// `None` when the front-matter date could not be parsed
    pub date: Option<DateTime<Utc>>,
}

impl DatedDocument<'_> {
    /// The front-matter date as written
    pub fn raw_date(&self) -> &str {
        self.document.frontmatter.date.as_deref().unwrap_or_default()
    }
}

/// Keep documents with a `date` and order them newest first
///
/// The sort is stable, so documents with equal dates keep their input
/// order. Unparseable dates sort after every parseable one.
pub fn dated_documents(documents: &[Document], tz: Tz) -> Vec<DatedDocument<'_>> {
    let mut dated: Vec<DatedDocument> = documents
        .iter()
        .filter(|doc| doc.frontmatter.has_date())
        .map(|document| {
            let raw = document.frontmatter.date.as_deref().unwrap_or_default();
            DatedDocument {
                document,
                date: parse_date(raw, tz),
            }
        })
        .collect();

    dated.sort_by(|a, b| match (a.date, b.date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    dated
}

/// Writes build outputs derived from the loaded documents
pub struct Generator<'a> {
    blog: &'a Blog,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(blog: &'a Blog) -> Self {
        Self { blog }
    }

    /// Write the post data set and, when enabled, the feed
    pub fn generate(&self, documents: &[Document]) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.blog.public_dir))?;

        self.generate_posts_data(documents)?;

        if self.blog.config.feed.enable {
            self.generate_feed(documents)?;
        } else {
            tracing::debug!("Feed disabled, skipping");
        }

        Ok(())
    }

    /// Write `posts.json` for the home page
    fn generate_posts_data(&self, documents: &[Document]) -> Result<()> {
        let records = posts::list_posts(documents, self.blog.tz);
        let output_path = self.blog.public_dir.join(POSTS_DATA_FILE);
        posts::write_posts(&records, &output_path)?;
        tracing::info!("Generated {} ({} posts)", POSTS_DATA_FILE, records.len());
        Ok(())
    }

    /// Write the Atom feed
    fn generate_feed(&self, documents: &[Document]) -> Result<()> {
        let year = Utc::now().with_timezone(&self.blog.tz).year();
        let meta = FeedMeta::from_config(&self.blog.config, year);
        let feed = feed::build_feed(&meta, documents, self.blog.tz, self.blog.config.feed.limit)?;

        let output_path = self.blog.public_dir.join(&self.blog.config.feed.path);
        feed::write_feed(&feed, &output_path)?;
        tracing::info!(
            "Generated {} ({} entries)",
            self.blog.config.feed.path,
            feed.entries().len()
        );
        Ok(())
    }
}
