//! Atom 1.0 feed generation

use atom_syndication::{
    ContentBuilder, Entry, EntryBuilder, Feed, FeedBuilder, FixedDateTime, GeneratorBuilder, Link,
    LinkBuilder, PersonBuilder, Text,
};
use chrono_tz::Tz;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{dated_documents, DatedDocument};
use crate::config::SiteConfig;
use crate::content::Document;
use crate::helpers::absolute_url;

/// Feed generation errors
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("{url}: cannot parse date {value:?}")]
    InvalidDate { url: String, value: String },

    #[error("Failed to write feed to {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Feed-level metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMeta {
    pub title: String,
    pub description: String,
    /// Site URL without trailing slash; also the feed id
    pub hostname: String,
    pub language: String,
    /// Absolute favicon URL
    pub favicon: String,
    pub copyright: String,
    pub author: String,
    /// Absolute URL the feed itself is published at
    pub self_url: String,
}

impl FeedMeta {
    /// Derive feed metadata from the site configuration
    ///
    /// `year` goes into the copyright line.
    pub fn from_config(config: &SiteConfig, year: i32) -> Self {
        let hostname = config.hostname().to_string();
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            favicon: absolute_url(&hostname, &config.favicon),
            copyright: copyright(&config.license, year, &config.author),
            author: config.author.clone(),
            self_url: absolute_url(&hostname, &config.feed.path),
            hostname,
        }
    }
}

/// Copyright line, e.g. `CC BY-NC-SA 4.0 © 2025 Eric`
pub fn copyright(license: &str, year: i32, author: &str) -> String {
    format!("{} © {} {}", license, year, author)
}

/// Build the feed from every dated document, newest first
///
/// The feed's `updated` is the newest entry date, so identical input always
/// yields identical output. A dated document whose date cannot be parsed
/// fails the whole feed.
pub fn build_feed(
    meta: &FeedMeta,
    documents: &[Document],
    tz: Tz,
    limit: Option<usize>,
) -> Result<Feed, FeedError> {
    let dated = dated_documents(documents, tz);
    let limit = limit.unwrap_or(dated.len());

    let entries = dated
        .iter()
        .take(limit)
        .map(|dated| feed_entry(meta, dated))
        .collect::<Result<Vec<Entry>, FeedError>>()?;

    let updated = entries
        .iter()
        .map(|entry| *entry.updated())
        .max()
        .unwrap_or_default();

    let author = PersonBuilder::default()
        .name(meta.author.clone())
        .uri(Some(meta.hostname.clone()))
        .build();

    let alternate_link: Link = LinkBuilder::default()
        .href(meta.hostname.clone())
        .rel("alternate".to_string())
        .build();

    let self_link: Link = LinkBuilder::default()
        .href(meta.self_url.clone())
        .rel("self".to_string())
        .mime_type(Some("application/atom+xml".to_string()))
        .build();

    let feed = FeedBuilder::default()
        .title(Text::plain(meta.title.clone()))
        .id(meta.hostname.clone())
        .updated(updated)
        .authors(vec![author])
        .links(vec![alternate_link, self_link])
        .subtitle(non_empty(&meta.description).map(Text::plain))
        .icon(Some(meta.favicon.clone()))
        .rights(Some(Text::plain(meta.copyright.clone())))
        .generator(Some(
            GeneratorBuilder::default()
                .value(env!("CARGO_PKG_NAME"))
                .version(Some(env!("CARGO_PKG_VERSION").to_string()))
                .build(),
        ))
        .lang(Some(meta.language.clone()))
        .entries(entries)
        .build();

    Ok(feed)
}

fn feed_entry(meta: &FeedMeta, dated: &DatedDocument) -> Result<Entry, FeedError> {
    let doc = dated.document;
    let fm = &doc.frontmatter;

    let date = dated.date.ok_or_else(|| FeedError::InvalidDate {
        url: doc.url.clone(),
        value: dated.raw_date().to_string(),
    })?;
    let updated: FixedDateTime = date.into();

    let link = absolute_url(&meta.hostname, &doc.url);
    let entry_link: Link = LinkBuilder::default()
        .href(link.clone())
        .rel("alternate".to_string())
        .build();

    // Empty description or body are left out rather than written empty
    let summary = fm.description.as_deref().and_then(non_empty).map(Text::plain);
    let content = doc.html.as_deref().and_then(non_empty).map(|html| {
        ContentBuilder::default()
            .value(Some(html.to_string()))
            .content_type(Some("html".to_string()))
            .build()
    });

    Ok(EntryBuilder::default()
        .title(Text::plain(fm.title_or_default()))
        .id(link)
        .updated(updated)
        .links(vec![entry_link])
        .summary(summary)
        .content(content)
        .build())
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// Serialize the feed and write it, creating parent directories
pub fn write_feed(feed: &Feed, path: &Path) -> Result<(), FeedError> {
    let write = |path: &Path| -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, feed.to_string())
    };

    write(path).map_err(|source| FeedError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;
    use chrono_tz::{Asia, UTC};
    use std::collections::HashSet;

    fn make_meta() -> FeedMeta {
        let config = SiteConfig {
            url: "https://example.com/blog/".to_string(),
            ..Default::default()
        };
        FeedMeta::from_config(&config, 2025)
    }

    fn post(url: &str, title: &str, date: Option<&str>) -> Document {
        Document::new(
            url,
            FrontMatter {
                title: Some(title.to_string()),
                date: date.map(str::to_string),
                description: Some(format!("About {}", title)),
                ..Default::default()
            },
        )
        .with_html(format!("<p>{}</p>", title))
    }

    fn sample_posts() -> Vec<Document> {
        vec![
            post("/first.html", "First", Some("2025-01-01")),
            post("/about.html", "About", None),
            post("/latest.html", "Latest & Greatest", Some("2025-10-08")),
            post("/middle.html", "Middle", Some("2025-05-05 09:00")),
        ]
    }

    #[test]
    fn test_feed_meta_from_config() {
        let meta = make_meta();
        assert_eq!(meta.hostname, "https://example.com/blog");
        assert_eq!(meta.favicon, "https://example.com/blog/favicon.ico");
        assert_eq!(meta.self_url, "https://example.com/blog/feed.xml");
        assert_eq!(meta.copyright, "CC BY-NC-SA 4.0 © 2025 Eric");
        assert_eq!(meta.language, "zh-TW");
    }

    #[test]
    fn test_build_feed_entries() {
        let feed = build_feed(&make_meta(), &sample_posts(), Asia::Taipei, None).unwrap();

        let titles: Vec<_> = feed.entries().iter().map(|e| e.title().as_str()).collect();
        assert_eq!(titles, vec!["Latest & Greatest", "Middle", "First"]);

        let latest = &feed.entries()[0];
        assert_eq!(latest.id(), "https://example.com/blog/latest.html");
        assert_eq!(latest.links()[0].href(), "https://example.com/blog/latest.html");
        assert_eq!(
            latest.summary().map(|s| s.as_str()),
            Some("About Latest & Greatest")
        );
        assert_eq!(
            latest.content().and_then(|c| c.value()),
            Some("<p>Latest & Greatest</p>")
        );
        assert!(latest.updated().to_rfc3339().starts_with("2025-10-08T00:00:00"));

        assert_eq!(feed.id(), "https://example.com/blog");
        assert_eq!(feed.updated(), latest.updated());
        assert_eq!(feed.lang(), Some("zh-TW"));
        assert_eq!(feed.icon(), Some("https://example.com/blog/favicon.ico"));
        assert_eq!(
            feed.rights().map(|r| r.as_str()),
            Some("CC BY-NC-SA 4.0 © 2025 Eric")
        );
    }

    #[test]
    fn test_missing_fields_are_omitted() {
        let doc = Document::new(
            "/bare.html",
            FrontMatter {
                date: Some("2025-02-02".to_string()),
                ..Default::default()
            },
        );
        let feed = build_feed(&make_meta(), &[doc], UTC, None).unwrap();
        let entry = &feed.entries()[0];
        assert_eq!(entry.title().as_str(), "");
        assert!(entry.summary().is_none());
        assert!(entry.content().is_none());
    }

    #[test]
    fn test_serialized_feed_round_trip() {
        let docs = sample_posts();
        let xml = build_feed(&make_meta(), &docs, UTC, None)
            .unwrap()
            .to_string();
        let parsed: Feed = xml.parse().unwrap();

        let links: Vec<_> = parsed
            .entries()
            .iter()
            .map(|e| e.links()[0].href().to_string())
            .collect();
        let unique: HashSet<_> = links.iter().collect();
        assert_eq!(links.len(), 3);
        assert_eq!(unique.len(), 3);
        assert!(!xml.contains("about.html"));

        for doc in docs.iter().filter(|d| d.frontmatter.has_date()) {
            let expected = absolute_url("https://example.com/blog", &doc.url);
            let matching: Vec<_> = parsed
                .entries()
                .iter()
                .filter(|e| e.links()[0].href() == expected)
                .collect();
            assert_eq!(matching.len(), 1);
            assert_eq!(
                matching[0].title().as_str(),
                doc.frontmatter.title_or_default()
            );
        }
    }

    #[test]
    fn test_feed_is_deterministic() {
        let docs = sample_posts();
        let a = build_feed(&make_meta(), &docs, UTC, None).unwrap().to_string();
        let b = build_feed(&make_meta(), &docs, UTC, None).unwrap().to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_feed_uses_epoch() {
        let feed = build_feed(&make_meta(), &[], UTC, None).unwrap();
        assert!(feed.entries().is_empty());
        assert_eq!(feed.updated().timestamp(), 0);
    }

    #[test]
    fn test_limit() {
        let feed = build_feed(&make_meta(), &sample_posts(), UTC, Some(2)).unwrap();
        let titles: Vec<_> = feed.entries().iter().map(|e| e.title().as_str()).collect();
        assert_eq!(titles, vec!["Latest & Greatest", "Middle"]);
    }

    #[test]
    fn test_unparseable_date_fails() {
        let docs = vec![post("/bad.html", "Bad", Some("next tuesday"))];
        match build_feed(&make_meta(), &docs, UTC, None) {
            Err(FeedError::InvalidDate { url, value }) => {
                assert_eq!(url, "/bad.html");
                assert_eq!(value, "next tuesday");
            }
            other => panic!("expected InvalidDate, got {:?}", other.map(|f| f.to_string())),
        }
    }

    #[test]
    fn test_write_feed() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dist").join("feed.xml");
        let feed = build_feed(&make_meta(), &sample_posts(), UTC, None).unwrap();
        write_feed(&feed, &path).unwrap();

        let xml = fs::read_to_string(&path).unwrap();
        assert!(xml.contains("<feed"));
        assert!(xml.contains("http://www.w3.org/2005/Atom"));
        assert!(xml.contains("Latest &amp; Greatest"));
    }

    #[test]
    fn test_write_feed_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let feed = build_feed(&make_meta(), &[], UTC, None).unwrap();
        let err = write_feed(&feed, &blocker.join("feed.xml")).unwrap_err();
        assert!(matches!(err, FeedError::Write { .. }));
    }
}
