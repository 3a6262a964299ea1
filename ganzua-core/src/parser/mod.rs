//! Streaming document parsers
//!
//! Each parser is a small state machine over an [`XmlEvent`] stream. The
//! currently open element is tracked on a stack of [`Section`] tags so the
//! dispatch is a match over (enclosing section, element name), and nested
//! documents such as an embedded `languageFrequencies` restore their
//! parent's state when they close.
//!
//! The entry points in this module tokenize raw markup with
//! [`EventReader`] and hand the events to the matching parser.

pub mod cryptanalysis;
pub mod frequencies;
pub mod rules;

pub use cryptanalysis::CryptanalysisParser;
pub use frequencies::LanguageFrequencyParser;
pub use rules::AlphabetRulesParser;

use crate::config::ParseOptions;
use crate::error::{DocumentError, Result, ValidationError};
use crate::locale::Locale;
use crate::model::{
    AlphabetRuleSet, CryptanalysisScenario, Document, DocumentKind, LanguageFrequencyProfile,
};
use crate::text::{CanonicalKey, Canonicalizer, CharacterClassifier, LocaleServices, Strength};
use crate::xml::{Attributes, EventReader, QualifiedName};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Element a parser is currently inside of
///
/// Validation errors carry the section they were raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Document root
    Root(DocumentKind),
    /// `includeExclusively` of an alphabet-rules document
    IncludeExclusively,
    /// `include` of an alphabet-rules document
    Include,
    /// `ignore`, either of an alphabet-rules document or of a substitution
    Ignore,
    /// `replace`, either of an alphabet-rules document or of a substitution
    /// alphabet
    Replace,
    /// Character frequencies of a frequency profile
    Alphabet,
    /// Bigram frequencies of a frequency profile
    Bigrams,
    /// Trigram frequencies of a frequency profile
    Trigrams,
    /// Free ciphertext
    Ciphertext,
    /// Cipher alphabet of a scenario
    CipherAlphabet,
    /// Plain alphabet of a scenario
    PlainAlphabet,
    /// Substitution table of a scenario
    Substitution,
    /// One substitution alphabet, numbered from 1 in document order
    SubstitutionAlphabet(usize),
}

impl Section {
    /// Local name of the element that opens this section
    pub fn element_name(&self) -> &'static str {
        match self {
            Section::Root(kind) => kind.root_element(),
            Section::IncludeExclusively => "includeExclusively",
            Section::Include => "include",
            Section::Ignore => "ignore",
            Section::Replace => "replace",
            Section::Alphabet | Section::SubstitutionAlphabet(_) => "alphabet",
            Section::Bigrams => "bigrams",
            Section::Trigrams => "trigrams",
            Section::Ciphertext => "ciphertext",
            Section::CipherAlphabet => "cipherAlphabet",
            Section::PlainAlphabet => "plainAlphabet",
            Section::Substitution => "substitution",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::SubstitutionAlphabet(n) => write!(f, "<alphabet> #{n} of <substitution>"),
            other => write!(f, "<{}>", other.element_name()),
        }
    }
}

/// Locale-bound validation services of one document
pub(crate) struct DocumentContext {
    locale: Locale,
    classifier: Box<dyn CharacterClassifier>,
    canonicalizer: Box<dyn Canonicalizer>,
}

impl DocumentContext {
    pub(crate) fn new(locale: Locale, services: &dyn LocaleServices, strength: Strength) -> Self {
        Self {
            classifier: services.classifier(&locale),
            canonicalizer: services.canonicalizer(&locale, strength),
            locale,
        }
    }

    pub(crate) fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Key for a value that must be exactly one user character
    pub(crate) fn character(
        &self,
        value: &str,
        section: Section,
    ) -> std::result::Result<CanonicalKey, ValidationError> {
        if !self.classifier.is_single_character(value) {
            return Err(ValidationError::InvalidCharacter {
                value: value.to_string(),
                section,
            });
        }
        Ok(self.canonicalizer.canonicalize(value))
    }

    pub(crate) fn bigram(&self, value: &str) -> std::result::Result<CanonicalKey, ValidationError> {
        if !self.classifier.is_bigram(value) {
            return Err(ValidationError::InvalidBigram {
                value: value.to_string(),
            });
        }
        Ok(self.canonicalizer.canonicalize(value))
    }

    pub(crate) fn trigram(&self, value: &str) -> std::result::Result<CanonicalKey, ValidationError> {
        if !self.classifier.is_trigram(value) {
            return Err(ValidationError::InvalidTrigram {
                value: value.to_string(),
            });
        }
        Ok(self.canonicalizer.canonicalize(value))
    }
}

/// Value of a mandatory attribute
pub(crate) fn required<'a>(
    attributes: &'a Attributes,
    element: &QualifiedName,
    attribute: &'static str,
) -> std::result::Result<&'a str, ValidationError> {
    attributes
        .get(attribute)
        .ok_or_else(|| ValidationError::MissingAttribute {
            element: element.local.clone(),
            attribute,
        })
}

/// Non-negative integer frequency
pub(crate) fn parse_frequency(
    value: &str,
    section: Section,
) -> std::result::Result<u64, ValidationError> {
    value
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidFrequency {
            value: value.to_string(),
            section,
        })
}

/// Locale from the `language` and optional `country` attributes
pub(crate) fn locale_from(
    attributes: &Attributes,
    element: &QualifiedName,
) -> std::result::Result<Locale, ValidationError> {
    let language = required(attributes, element, "language")?;
    Ok(Locale::new(language, attributes.get("country")))
}

/// Reject an element outside `expected`
pub(crate) fn expect_namespace(name: &QualifiedName, expected: &'static str) -> Result<()> {
    if name.is_in(expected) {
        return Ok(());
    }
    Err(DocumentError::WrongNamespace {
        element: name.local.clone(),
        expected,
        found: name.namespace.clone().unwrap_or_else(|| "no namespace".to_string()),
    })
}

/// Element not allowed below `parent`
pub(crate) fn unexpected(name: &QualifiedName, parent: Option<&str>) -> ValidationError {
    ValidationError::UnexpectedElement {
        element: name.local.clone(),
        parent: parent.map_or_else(|| "the document".to_string(), str::to_string),
    }
}

pub(crate) fn unexpected_in(name: &QualifiedName, parent: Option<Section>) -> ValidationError {
    let parent = parent.map(|section| section.to_string());
    unexpected(name, parent.as_deref())
}

pub(crate) fn no_root(kind: DocumentKind) -> DocumentError {
    DocumentError::Markup {
        position: 0,
        message: format!("document has no <{}> root element", kind.root_element()),
    }
}

pub(crate) fn unbalanced(open: usize) -> DocumentError {
    DocumentError::Markup {
        position: 0,
        message: format!("event stream ended with {open} open element(s)"),
    }
}

/// Parse an alphabet-rules document from a buffered source
pub fn parse_alphabet_rules<R: BufRead>(
    source: R,
    options: &ParseOptions,
) -> Result<AlphabetRuleSet> {
    AlphabetRulesParser::new(options).parse(EventReader::new(source))
}

/// Parse an alphabet-rules document held in memory
pub fn parse_alphabet_rules_str(xml: &str, options: &ParseOptions) -> Result<AlphabetRuleSet> {
    parse_alphabet_rules(xml.as_bytes(), options)
}

/// Parse an alphabet-rules document from a file
pub fn parse_alphabet_rules_file(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<AlphabetRuleSet> {
    parse_alphabet_rules(BufReader::new(File::open(path)?), options)
}

/// Parse a language-frequencies document from a buffered source
pub fn parse_language_frequencies<R: BufRead>(
    source: R,
    options: &ParseOptions,
) -> Result<LanguageFrequencyProfile> {
    LanguageFrequencyParser::new(options).parse(EventReader::new(source))
}

/// Parse a language-frequencies document held in memory
pub fn parse_language_frequencies_str(
    xml: &str,
    options: &ParseOptions,
) -> Result<LanguageFrequencyProfile> {
    parse_language_frequencies(xml.as_bytes(), options)
}

/// Parse a language-frequencies document from a file
pub fn parse_language_frequencies_file(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<LanguageFrequencyProfile> {
    parse_language_frequencies(BufReader::new(File::open(path)?), options)
}

/// Parse a cryptanalysis document from a buffered source
pub fn parse_cryptanalysis<R: BufRead>(
    source: R,
    options: &ParseOptions,
) -> Result<CryptanalysisScenario> {
    CryptanalysisParser::new(options).parse(EventReader::new(source))
}

/// Parse a cryptanalysis document held in memory
pub fn parse_cryptanalysis_str(
    xml: &str,
    options: &ParseOptions,
) -> Result<CryptanalysisScenario> {
    parse_cryptanalysis(xml.as_bytes(), options)
}

/// Parse a cryptanalysis document from a file
pub fn parse_cryptanalysis_file(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<CryptanalysisScenario> {
    parse_cryptanalysis(BufReader::new(File::open(path)?), options)
}

/// Parse a document of the given family from a buffered source
pub fn parse_document<R: BufRead>(
    kind: DocumentKind,
    source: R,
    options: &ParseOptions,
) -> Result<Document> {
    Ok(match kind {
        DocumentKind::AlphabetRules => Document::AlphabetRules(parse_alphabet_rules(source, options)?),
        DocumentKind::LanguageFrequencies => {
            Document::LanguageFrequencies(parse_language_frequencies(source, options)?)
        }
        DocumentKind::Cryptanalysis => Document::Cryptanalysis(parse_cryptanalysis(source, options)?),
    })
}

/// Parse a document of the given family from a file
pub fn parse_document_file(
    kind: DocumentKind,
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> Result<Document> {
    parse_document(kind, BufReader::new(File::open(path)?), options)
}
