//! List posts

use anyhow::Result;

use crate::content::{ContentLoader, LoadOptions};
use crate::generator::posts::{list_posts, PostRecord};
use crate::Blog;

/// Print the post listing, newest first
pub fn run(blog: &Blog) -> Result<()> {
    let loader = ContentLoader::new(blog)?;
    let documents = loader.load(LoadOptions {
        include_src: blog.config.reading_time,
        render: false,
    })?;

    let posts = list_posts(&documents, blog.tz);
    println!("Posts ({}):", posts.len());
    for line in format_listing(&posts) {
        println!("  {}", line);
    }

    let undated = documents.len() - posts.len();
    if undated > 0 {
        tracing::debug!("{} documents without a date were skipped", undated);
    }

    Ok(())
}

/// One line per post: formatted date, title, url, and reading time
fn format_listing(posts: &[PostRecord]) -> Vec<String> {
    posts
        .iter()
        .map(|post| {
            let title = if post.title.is_empty() {
                "(untitled)"
            } else {
                post.title.as_str()
            };
            match &post.duration {
                Some(duration) => format!(
                    "{} - {} [{}] ({})",
                    post.date_formatted, title, post.url, duration
                ),
                None => format!("{} - {} [{}]", post.date_formatted, title, post.url),
            }
        })
        .collect()
}
