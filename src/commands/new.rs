//! Create a new post

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Blog;

/// Create a new post in the source directory and return its path
///
/// The file is named after `path` when given, otherwise after the slugified
/// title. Existing files are never overwritten.
pub fn create_post(blog: &Blog, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let today = Utc::now()
        .with_timezone(&blog.tz)
        .format("%Y-%m-%d")
        .to_string();

    let name = match path {
        Some(p) => p.trim_end_matches(".md").to_string(),
        None => {
            let slug = slug::slugify(title);
            if slug.is_empty() {
                today.clone()
            } else {
                slug
            }
        }
    };

    let file_path = blog.source_dir.join(format!("{}.md", name));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, scaffold(title, &today)?)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Front-matter block for a fresh post
fn scaffold(title: &str, date: &str) -> Result<String> {
    let fm = FrontMatter {
        title: Some(title.to_string()),
        date: Some(date.to_string()),
        description: Some(String::new()),
        ..Default::default()
    };
    let yaml = serde_yaml::to_string(&fm)?;
    Ok(format!("---\n{}---\n\n", yaml))
}
