//! Site configuration (_config.yml)

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
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
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,
    pub license: String,
    pub favicon: String,

    // URL
    pub url: String,
    pub clean_urls: bool,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Content
    /// Glob, relative to `source_dir`, selecting the post files
    pub posts: String,
    /// Load post sources so reading time can be estimated
    pub reading_time: bool,

    // Feed
    #[serde(default)]
    pub feed: FeedConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Eric".to_string(),
            description: "記錄技術探索與人生成長的點滴旅程".to_string(),
            author: "Eric".to_string(),
            language: "zh-TW".to_string(),
            timezone: "Asia/Taipei".to_string(),
            license: "CC BY-NC-SA 4.0".to_string(),
            favicon: "favicon.ico".to_string(),

            url: "https://ericcai0814.github.io/blog".to_string(),
            clean_urls: false,

            source_dir: "doc".to_string(),
            public_dir: "doc/.vitepress/dist".to_string(),

            posts: "*.md".to_string(),
            reading_time: true,

            feed: FeedConfig::default(),
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

    /// Resolve the configured IANA timezone name
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone {:?}: {}", self.timezone, e))
    }

    /// Site URL without a trailing slash, used as the feed hostname
    pub fn hostname(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Feed output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub enable: bool,
    pub path: String,
    /// Maximum number of entries; all dated posts when unset
    pub limit: Option<usize>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enable: true,
            path: "feed.xml".to_string(),
            limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.language, "zh-TW");
        assert_eq!(config.feed.path, "feed.xml");
        assert_eq!(config.posts, "*.md");
        assert!(config.feed.enable);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
author: Test User
url: https://example.com/
timezone: UTC
feed:
  path: atom.xml
  limit: 20
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.hostname(), "https://example.com");
        assert_eq!(config.feed.path, "atom.xml");
        assert_eq!(config.feed.limit, Some(20));
        // Untouched keys keep their defaults
        assert!(config.feed.enable);
        assert_eq!(config.license, "CC BY-NC-SA 4.0");
        assert_eq!(config.timezone().unwrap(), chrono_tz::UTC);
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let yaml = "nav:\n  - text: Home\n    link: /\n";
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.extra.contains_key("nav"));
    }

    #[test]
    fn test_invalid_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(config.timezone().is_err());
    }
}
