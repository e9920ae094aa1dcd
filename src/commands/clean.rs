//! Remove generated files

use anyhow::Result;
use std::fs;

use crate::generator::POSTS_DATA_FILE;
use crate::Blog;

/// Delete the post data set and the feed from the public directory
///
/// The rest of the public directory belongs to the site renderer and is left
/// alone.
pub fn run(blog: &Blog) -> Result<()> {
    let outputs = [
        blog.public_dir.join(POSTS_DATA_FILE),
        blog.public_dir.join(&blog.config.feed.path),
    ];

    for path in outputs {
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!("Deleted: {:?}", path);
        }
    }

    Ok(())
}
