//! Content module - loads markdown documents and their front-matter

mod document;
mod frontmatter;
pub mod loader;
mod markdown;

pub use document::Document;
pub use frontmatter::FrontMatter;
pub use loader::{ContentLoader, LoadOptions};
pub use markdown::MarkdownRenderer;
