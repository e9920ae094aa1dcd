//! Reading-time estimation

use lazy_static::lazy_static;
use regex::Regex;

/// CJK characters read per minute
const CJK_WPM: f64 = 350.0;

/// Latin words read per minute
const EN_WPM: f64 = 200.0;

lazy_static! {
    /// CJK Unified Ideographs and Extension A
    static ref CJK_CHAR: Regex = Regex::new(r"[\x{4E00}-\x{9FFF}\x{3400}-\x{4DBF}]").unwrap();
    static ref LATIN_WORD: Regex = Regex::new(r"[a-zA-Z]+").unwrap();
}

/// Estimate how long a text takes to read, e.g. `"3 min"`
///
/// CJK characters and Latin words are counted separately and weighted by
/// their own reading speed. The result is rounded and never below one
/// minute.
pub fn estimate_reading_time(text: &str) -> String {
    format!("{} min", reading_minutes(text))
}

/// Whole minutes behind [`estimate_reading_time`]
pub fn reading_minutes(text: &str) -> u64 {
    let cjk = CJK_CHAR.find_iter(text).count() as f64;
    let en = LATIN_WORD.find_iter(text).count() as f64;
    let minutes = (cjk / CJK_WPM + en / EN_WPM).round() as u64;
    minutes.max(1)
}
