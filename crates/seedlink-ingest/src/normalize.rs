//! Role name normalization
//!
//! Template roles and SEED roles are curated independently, so the same
//! function is often spelled differently ("ATP synthase (EC 3.6.3.14)",
//! "ATP-synthase"). [`normalize`] reduces a label to a comparison key:
//!
//! 1. trim surrounding whitespace
//! 2. drop parenthesized EC annotations such as `(EC 1.1.1.1)`, in any case
//! 3. lowercase
//! 4. keep only letters and digits
//!
//! The key has no characters any step would remove, so normalizing a key
//! returns it unchanged. An empty key is valid but must never be looked up.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static EC_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(\s*ec[\s:]+[0-9n\-][^)]*\)").expect("literal EC pattern compiles")
});

/// Canonicalize a free-text label into a comparison key
pub fn normalize(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let without_ec = EC_ANNOTATION.replace_all(trimmed, "");

    without_ec
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_case_and_punctuation_insensitive() {
        assert_eq!(normalize("ATP Synthase (EC 3.6.3.14)"), normalize("atp-synthase"));
        assert_eq!(normalize("atp-synthase"), "atpsynthase");
    }

    #[test]
    fn test_ec_suffix_and_prefix_removed() {
        assert_eq!(normalize("Foo (EC 1.1.1.1)"), normalize("Foo"));
        assert_eq!(normalize("(EC 2.7.1.-) Hexokinase"), "hexokinase");
        assert_eq!(
            normalize("Bifunctional enzyme (EC 1.1.1.1) (EC 1.2.1.3)"),
            "bifunctionalenzyme"
        );
    }

    #[test]
    fn test_parenthesized_words_starting_with_ec_are_kept() {
        // "(Ecto...)" is part of the name, not an EC number
        assert_eq!(normalize("Synthase (Ectoine)"), "synthaseectoine");
    }

    #[test]
    fn test_underscores_and_whitespace_removed() {
        assert_eq!(normalize("  phospho_transferase \t system "), "phosphotransferasesystem");
    }

    #[test]
    fn test_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("-- / ()"), "");
    }

    #[test]
    fn test_unicode_letters_kept() {
        assert_eq!(normalize("β-Galactosidase"), "βgalactosidase");
    }

    #[test]
    fn test_ec_annotation_case_insensitive() {
        assert_eq!(normalize("Foo (ec 1.1.1.1)"), normalize("Foo"));
        assert_eq!(normalize("Foo (Ec: 1.1.1.1)"), normalize("Foo (EC 1.1.1.1)"));
        assert_eq!(normalize("Glucokinase (eC 2.7.1.2)"), "glucokinase");
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in "[ -~]{0,64}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn prop_key_is_lowercase_alphanumeric(s in "[ -~]{0,64}") {
            let key = normalize(&s);
            prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }
}
