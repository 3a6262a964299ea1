//! Locale-sensitive canonical keys
//!
//! Every character-keyed set and map in the models uses a [`CanonicalKey`]
//! as its identity instead of the raw attribute text, so strings that the
//! locale considers equal at the configured [`Strength`] collide even when
//! their code points differ.

use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// How much of a difference makes two strings distinct
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    /// Only base letters count: case and diacritics are ignored
    Primary,
    /// Diacritics count, case is ignored
    Secondary,
    /// Case and diacritics count; compatibility variants (ligatures,
    /// width forms) collide with their plain forms
    #[default]
    Tertiary,
    /// Every difference counts except canonically equivalent encodings
    Identical,
}

/// Comparable identity of a user character or character sequence
///
/// Equality, ordering and hashing consider only the canonical form. The
/// source text the key was built from is kept for display and for writing
/// documents back.
#[derive(Debug, Clone)]
pub struct CanonicalKey {
    source: String,
    key: String,
}

impl CanonicalKey {
    /// Text the key was built from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Canonical form used for comparison
    pub fn as_key(&self) -> &str {
        &self.key
    }

    pub(crate) fn from_parts(source: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            key: key.into(),
        }
    }
}

impl PartialEq for CanonicalKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CanonicalKey {}

impl Hash for CanonicalKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for CanonicalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CanonicalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Strategy that turns text into canonical keys
///
/// An instance is bound to one locale and strength for the lifetime of a
/// document parse.
pub trait Canonicalizer: Send + Sync {
    /// Canonical key for `text`
    fn canonicalize(&self, text: &str) -> CanonicalKey;

    /// Strength this canonicalizer compares at
    fn strength(&self) -> Strength;
}

/// Production canonicalizer built on Unicode normalization
#[derive(Debug, Clone)]
pub struct LocaleCanonicalizer {
    locale: Locale,
    strength: Strength,
}

impl LocaleCanonicalizer {
    /// Canonicalizer for `locale` at `strength`
    pub fn new(locale: Locale, strength: Strength) -> Self {
        Self { locale, strength }
    }

    /// Locale the keys are computed for
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    fn fold_case(&self, text: &str) -> String {
        // Turkic dotted and dotless i must be mapped before decomposition
        let turkic = matches!(self.locale.language(), "tr" | "az");
        let mapped: String = text
            .chars()
            .map(|c| match c {
                'I' if turkic => 'ı',
                'İ' if turkic => 'i',
                other => other,
            })
            .collect();
        mapped.nfkd().flat_map(char::to_lowercase).collect()
    }
}

impl Canonicalizer for LocaleCanonicalizer {
    fn canonicalize(&self, text: &str) -> CanonicalKey {
        let key: String = match self.strength {
            Strength::Identical => text.nfd().collect(),
            Strength::Tertiary => text.nfkd().collect(),
            Strength::Secondary => self.fold_case(text),
            Strength::Primary => self
                .fold_case(text)
                .chars()
                .filter(|c| !is_combining_mark(*c))
                .collect(),
        };
        CanonicalKey::from_parts(text, key)
    }

    fn strength(&self) -> Strength {
        self.strength
    }
}

/// Code-point equality, for tests and tooling that need raw comparison
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactCanonicalizer;

impl Canonicalizer for ExactCanonicalizer {
    fn canonicalize(&self, text: &str) -> CanonicalKey {
        CanonicalKey::from_parts(text, text)
    }

    fn strength(&self) -> Strength {
        Strength::Identical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon(strength: Strength) -> LocaleCanonicalizer {
        LocaleCanonicalizer::new(Locale::new("es", None), strength)
    }

    #[test]
    fn test_identical_merges_only_canonical_equivalents() {
        let c = canon(Strength::Identical);
        assert_eq!(c.canonicalize("é"), c.canonicalize("e\u{301}"));
        assert_ne!(c.canonicalize("é"), c.canonicalize("e"));
        assert_ne!(c.canonicalize("a"), c.canonicalize("A"));
        assert_ne!(c.canonicalize("ﬁ"), c.canonicalize("fi"));
    }

    #[test]
    fn test_tertiary_merges_compatibility_variants() {
        let c = canon(Strength::Tertiary);
        assert_eq!(c.canonicalize("ﬁ"), c.canonicalize("fi"));
        assert_eq!(c.canonicalize("Ａ"), c.canonicalize("A"));
        assert_ne!(c.canonicalize("a"), c.canonicalize("A"));
        assert_ne!(c.canonicalize("ñ"), c.canonicalize("n"));
    }

    #[test]
    fn test_secondary_ignores_case() {
        let c = canon(Strength::Secondary);
        assert_eq!(c.canonicalize("Ñ"), c.canonicalize("ñ"));
        assert_ne!(c.canonicalize("ñ"), c.canonicalize("n"));
    }

    #[test]
    fn test_primary_ignores_case_and_diacritics() {
        let c = canon(Strength::Primary);
        assert_eq!(c.canonicalize("Á"), c.canonicalize("a"));
        assert_eq!(c.canonicalize("ü"), c.canonicalize("U"));
        assert_ne!(c.canonicalize("a"), c.canonicalize("b"));
    }

    #[test]
    fn test_turkish_dotless_i() {
        let turkish = LocaleCanonicalizer::new(Locale::new("tr", None), Strength::Secondary);
        assert_eq!(turkish.canonicalize("I"), turkish.canonicalize("ı"));
        assert_eq!(turkish.canonicalize("İ"), turkish.canonicalize("i"));
        assert_ne!(turkish.canonicalize("I"), turkish.canonicalize("i"));

        let spanish = canon(Strength::Secondary);
        assert_eq!(spanish.canonicalize("I"), spanish.canonicalize("i"));
    }

    #[test]
    fn test_key_keeps_source_text() {
        let key = canon(Strength::Identical).canonicalize("e\u{301}");
        assert_eq!(key.source(), "e\u{301}");
        assert_eq!(key.as_key(), "e\u{301}");
        assert_eq!(key.to_string(), "e\u{301}");
    }

    #[test]
    fn test_exact_canonicalizer() {
        let c = ExactCanonicalizer;
        assert_ne!(c.canonicalize("é"), c.canonicalize("e\u{301}"));
        assert_eq!(c.canonicalize("x"), c.canonicalize("x"));
        assert_eq!(c.strength(), Strength::Identical);
    }

    #[test]
    fn test_strength_order() {
        assert!(Strength::Primary < Strength::Secondary);
        assert!(Strength::Tertiary < Strength::Identical);
        assert_eq!(Strength::default(), Strength::Tertiary);
    }
}
