//! Locale-bound text services
//!
//! A parser asks its [`LocaleServices`] for a classifier and a canonicalizer
//! once the document root declares the locale; both stay bound to that
//! document until the parse ends.

pub mod canonical;
pub mod classifier;

pub use canonical::{CanonicalKey, Canonicalizer, ExactCanonicalizer, LocaleCanonicalizer, Strength};
pub use classifier::{CharacterClassifier, GraphemeClassifier};

use crate::locale::Locale;

/// Factory for the locale-sensitive pieces of a parse
pub trait LocaleServices: Send + Sync {
    /// Character classifier for `locale`
    fn classifier(&self, locale: &Locale) -> Box<dyn CharacterClassifier>;

    /// Canonicalizer for `locale` at `strength`
    fn canonicalizer(&self, locale: &Locale, strength: Strength) -> Box<dyn Canonicalizer>;
}

/// Grapheme segmentation plus normalization-based canonical keys
#[derive(Debug, Clone, Copy)]
pub struct DefaultLocaleServices {
    digraph_tailoring: bool,
}

impl DefaultLocaleServices {
    /// Create services, with or without per-language digraph tailoring
    pub fn new(digraph_tailoring: bool) -> Self {
        Self { digraph_tailoring }
    }
}

impl Default for DefaultLocaleServices {
    fn default() -> Self {
        Self::new(true)
    }
}

impl LocaleServices for DefaultLocaleServices {
    fn classifier(&self, locale: &Locale) -> Box<dyn CharacterClassifier> {
        if self.digraph_tailoring {
            Box::new(GraphemeClassifier::for_locale(locale))
        } else {
            Box::new(GraphemeClassifier::untailored())
        }
    }

    fn canonicalizer(&self, locale: &Locale, strength: Strength) -> Box<dyn Canonicalizer> {
        Box::new(LocaleCanonicalizer::new(locale.clone(), strength))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_services_tailor_by_locale() {
        let services = DefaultLocaleServices::default();
        let welsh = services.classifier(&Locale::new("cy", None));
        assert!(welsh.is_single_character("ll"));

        let plain = DefaultLocaleServices::new(false).classifier(&Locale::new("cy", None));
        assert!(plain.is_bigram("ll"));
    }

    #[test]
    fn test_canonicalizer_uses_requested_strength() {
        let services = DefaultLocaleServices::default();
        let canon = services.canonicalizer(&Locale::new("fr", None), Strength::Primary);
        assert_eq!(canon.strength(), Strength::Primary);
        assert_eq!(canon.canonicalize("É"), canon.canonicalize("e"));
    }
}
