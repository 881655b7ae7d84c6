use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Runs of whitespace collapse to a single hyphen during slug derivation
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Derive a slug from a display name: lowercase, whitespace runs become a
/// single hyphen. No further normalization; explicit slugs are stored as given.
pub fn derive_slug(name: &str) -> String {
    WHITESPACE_RUN
        .replace_all(name.to_lowercase().trim(), "-")
        .into_owned()
}

/// The candidate slug for a create/update: the explicit one when supplied
/// (non-empty), otherwise derived from the name.
pub fn slug_or_derive(slug: Option<&str>, name: &str) -> String {
    match slug {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => derive_slug(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_slug_lowercases() {
        assert_eq!(derive_slug("Tech"), "tech");
        assert_eq!(derive_slug("AI"), "ai");
    }

    #[test]
    fn test_derive_slug_collapses_whitespace() {
        assert_eq!(derive_slug("Getting Started"), "getting-started");
        assert_eq!(derive_slug("Deep   Learning\tBasics"), "deep-learning-basics");
    }

    #[test]
    fn test_derive_slug_trims() {
        assert_eq!(derive_slug("  Edge  Cases  "), "edge-cases");
    }

    #[test]
    fn test_derive_slug_keeps_existing_hyphens() {
        assert_eq!(derive_slug("already-slugged"), "already-slugged");
    }

    #[test]
    fn test_slug_or_derive_prefers_explicit() {
        assert_eq!(slug_or_derive(Some("custom"), "Some Name"), "custom");
        assert_eq!(slug_or_derive(None, "Some Name"), "some-name");
        assert_eq!(slug_or_derive(Some(""), "Some Name"), "some-name");
    }
}
