//! Slug Normalizer - filesystem-safe file stems from display names

use regex::Regex;
use std::sync::LazyLock;

/// Returned when a name has no ASCII alphanumerics left after normalization.
pub const FALLBACK_SLUG: &str = "conta";

static NON_SLUG_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-]+").expect("valid slug regex"));
static HYPHEN_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("valid hyphen regex"));

/// Convert a display name into a stable file stem.
///
/// `João Silva` becomes `joao-silva`. Transliteration is lossy, so unrelated
/// names can share a slug; no disambiguation happens here.
pub fn slugify(name: &str) -> String {
    let ascii = deunicode::deunicode(name).to_lowercase();
    let replaced = NON_SLUG_RUN.replace_all(ascii.trim(), "-");
    let collapsed = HYPHEN_RUN.replace_all(replaced.trim_matches('-'), "-");

    if collapsed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        collapsed.into_owned()
    }
}
