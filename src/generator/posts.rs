//! Post listing consumed by the home page

use anyhow::Result;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::dated_documents;
use crate::content::Document;
use crate::helpers::{estimate_reading_time, format_date};

/// Display record for one dated post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub title: String,
    pub url: String,
    /// Front-matter date as written
    pub date: String,
    /// Month and day, e.g. `10 月 8 日`
    pub date_formatted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Build the newest-first listing of dated posts
///
/// `duration` comes from the front-matter when set, otherwise it is
/// estimated from the markdown source if the document was loaded with it.
pub fn list_posts(documents: &[Document], tz: Tz) -> Vec<PostRecord> {
    dated_documents(documents, tz)
        .into_iter()
        .map(|dated| {
            let doc = dated.document;
            let fm = &doc.frontmatter;
            let date = dated.raw_date().to_string();
            let date_formatted = format_date(&date, false, tz);
            let duration = fm
                .duration
                .clone()
                .or_else(|| doc.src.as_deref().map(estimate_reading_time));

            PostRecord {
                title: fm.title_or_default().to_string(),
                url: doc.url.clone(),
                date,
                date_formatted,
                duration,
            }
        })
        .collect()
}

/// Serialize the listing as pretty JSON
pub fn write_posts(records: &[PostRecord], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    Ok(())
}
