//! Document locales

use serde::{Deserialize, Serialize};
use std::fmt;

/// A language with an optional country, as declared on a document root
///
/// The language is stored lower-case and the country upper-case, so
/// `language="ES" country="mx"` and `language="es" country="MX"` name the
/// same locale. An empty country means "language only".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    country: Option<String>,
}

impl Locale {
    /// Create a locale from its `language` and optional `country` parts
    pub fn new(language: &str, country: Option<&str>) -> Self {
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_uppercase);

        Self {
            language: language.trim().to_lowercase(),
            country,
        }
    }

    /// ISO 639 language code
    pub fn language(&self) -> &str {
        &self.language
    }

    /// ISO 3166 country code, if any
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.country {
            Some(country) => write!(f, "{}_{}", self.language, country),
            None => write!(f, "{}", self.language),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_normalizes_case() {
        assert_eq!(Locale::new("ES", Some("mx")), Locale::new("es", Some("MX")));
        assert_eq!(Locale::new("ES", Some("mx")).to_string(), "es_MX");
    }

    #[test]
    fn test_empty_country_is_language_only() {
        let locale = Locale::new("en", Some(""));
        assert_eq!(locale, Locale::new("en", None));
        assert_eq!(locale.country(), None);
        assert_eq!(locale.to_string(), "en");
    }

    #[test]
    fn test_country_distinguishes_locales() {
        assert_ne!(Locale::new("en", Some("GB")), Locale::new("en", Some("US")));
        assert_ne!(Locale::new("en", Some("GB")), Locale::new("en", None));
    }
}
