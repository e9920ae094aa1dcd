//! Generate the post data set and the feed

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::new_debouncer;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::{ContentLoader, LoadOptions};
use crate::generator::Generator;
use crate::Blog;

/// Load every document with its rendered body and write the build outputs
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let loader = ContentLoader::new(blog)?;
    let documents = loader.load(LoadOptions {
        include_src: blog.config.reading_time,
        render: true,
    })?;

    tracing::info!("Loaded {} documents", documents.len());

    Generator::new(blog).generate(&documents)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
///
/// Changes are debounced, so a burst of writes (an editor saving through a
/// temp file, several saves in a row) triggers one rebuild after it settles.
pub async fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    debouncer
        .watcher()
        .watch(&blog.source_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", blog.source_dir);

    let config_path = blog.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", blog.source_dir);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed = relevant_paths(blog, events.iter().map(|e| e.path.as_path()));
                if changed.is_empty() {
                    continue;
                }

                for path in &changed {
                    tracing::info!("File changed: {}", path.display());
                }

                // Reload so edits to _config.yml are picked up too
                let result = Blog::new(&blog.base_dir).and_then(|fresh| run(&fresh));
                if let Err(e) = result {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(_) => break,
        }
    }

    Ok(())
}

/// Changed paths that should trigger a rebuild
///
/// Our own outputs may live under the source directory, and editor or VCS
/// droppings are not content.
fn relevant_paths<'p>(blog: &Blog, paths: impl Iterator<Item = &'p Path>) -> Vec<PathBuf> {
    paths
        .filter(|path| !path.starts_with(&blog.public_dir))
        .filter(|path| !path.components().any(|c| c.as_os_str() == ".git"))
        .filter(|path| {
            let path_str = path.to_string_lossy();
            !path_str.ends_with(".DS_Store") && !path_str.ends_with('~')
        })
        .map(Path::to_path_buf)
        .collect()
}
