//! Title normalization for filesystem-safe identifiers.

use std::path::{Component, Path};
use std::sync::LazyLock;

use regex::Regex;

/// Runs of whitespace or non-word characters.
#[allow(clippy::expect_used)]
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\W]+").expect("slug regex is valid")); // Static pattern, safe to panic

/// Converts a display string into a lowercase slug.
///
/// The text is lowercased first, then every maximal run of whitespace or
/// non-word characters collapses to a single `_`. Word characters are
/// Unicode-aware, so accented letters survive.
///
/// No input is rejected: `""` stays empty and a string made only of symbols
/// becomes `"_"`.
///
/// # Examples
///
/// ```
/// use harvester_core::record::slug;
///
/// assert_eq!(slug("Letters Received, 1861-1865"), "letters_received_1861_1865");
/// ```
#[must_use]
pub fn slug(text: &str) -> String {
    let lowered = text.to_lowercase();
    SEPARATOR_RUN.replace_all(&lowered, "_").into_owned()
}

/// True when `name` is exactly one normal path component.
///
/// Rejects empty strings, separators of either platform, `.` and `..`.
#[must_use]
pub fn is_plain_component(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
