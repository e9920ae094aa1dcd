//! Helper functions shared by the post listing and the feed
//!
//! Dates, reading-time estimation, and URL construction. All of these are
//! pure functions over strings.

mod date;
mod reading_time;
mod url;

pub use date::*;
pub use reading_time::*;
pub use url::*;
