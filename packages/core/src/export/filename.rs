//! Download filenames for exported maps

use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Stem used when a title has no usable characters
pub const DEFAULT_FILENAME_STEM: &str = "mind-map";

/// Runs of anything that is not a lowercase ASCII letter or digit
static NON_SLUG_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Lowercased, hyphenated form of `title`
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    NON_SLUG_CHARS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// `{slug}-{YYYY-MM-DD}.md`
///
/// # Examples
///
/// ```rust
/// use chrono::NaiveDate;
/// use mindmap_core::export::export_filename;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(export_filename("My Big Idea!", date), "my-big-idea-2024-03-09.md");
/// ```
pub fn export_filename(title: &str, date: NaiveDate) -> String {
    let slug = slugify(title);
    let stem = if slug.is_empty() {
        DEFAULT_FILENAME_STEM
    } else {
        slug.as_str()
    };
    format!("{}-{}.md", stem, date.format("%Y-%m-%d"))
}

/// [`export_filename`] stamped with today's UTC date
pub fn export_filename_today(title: &str) -> String {
    export_filename(title, Utc::now().date_naive())
}
