//! Validated document models
//!
//! Models are only built by the parsers (or by the frequency builder) and
//! are immutable once handed to the caller.

pub mod frequency;
pub mod rules;
pub mod scenario;

pub use frequency::{
    coincidence_index, FrequencyEntry, FrequencySet, LanguageFrequencyProfile,
    UNDEFINED_COINCIDENCE_INDEX,
};
pub use rules::AlphabetRuleSet;
pub use scenario::{is_injective, CipherFamily, CryptanalysisScenario, SubstitutionAlphabet};

/// The three document families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// `alphabetRules` documents
    AlphabetRules,
    /// `languageFrequencies` documents
    LanguageFrequencies,
    /// `cryptanalysis` documents
    Cryptanalysis,
}

impl DocumentKind {
    /// Local name of the root element
    pub fn root_element(&self) -> &'static str {
        match self {
            DocumentKind::AlphabetRules => "alphabetRules",
            DocumentKind::LanguageFrequencies => "languageFrequencies",
            DocumentKind::Cryptanalysis => "cryptanalysis",
        }
    }

    /// Namespace URI every element of the document belongs to
    pub fn namespace(&self) -> &'static str {
        match self {
            DocumentKind::AlphabetRules => crate::RULES_NAMESPACE,
            DocumentKind::LanguageFrequencies => crate::FREQUENCIES_NAMESPACE,
            DocumentKind::Cryptanalysis => crate::CRYPTANALYSIS_NAMESPACE,
        }
    }
}

/// A validated document of any family
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Parsed alphabet rules
    AlphabetRules(AlphabetRuleSet),
    /// Parsed language frequencies
    LanguageFrequencies(LanguageFrequencyProfile),
    /// Parsed cryptanalysis scenario
    Cryptanalysis(CryptanalysisScenario),
}

impl Document {
    /// Family of this document
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::AlphabetRules(_) => DocumentKind::AlphabetRules,
            Document::LanguageFrequencies(_) => DocumentKind::LanguageFrequencies,
            Document::Cryptanalysis(_) => DocumentKind::Cryptanalysis,
        }
    }
}
