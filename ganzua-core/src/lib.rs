//! Validating ingestion of classical-cryptanalysis documents
//!
//! This crate reads three related markup document families and turns them
//! into strongly validated models:
//!
//! - **alphabet rules**: which characters of a source text make up a working
//!   alphabet, which are ignored and which are replaced
//! - **language frequencies**: per-language character, bigram and trigram
//!   counts plus the index of coincidence
//! - **cryptanalysis scenarios**: a ciphertext, its declared cipher family,
//!   cipher and plain alphabets and a per-alphabet substitution table,
//!   optionally with an embedded frequency profile
//!
//! A "character" is always a user-perceived character of the document's
//! locale, and character identity is a locale-sensitive [`CanonicalKey`]
//! rather than raw string equality.
//!
//! # Example
//!
//! ```rust
//! use ganzua_core::{parse_cryptanalysis_str, CipherFamily, ParseOptions};
//!
//! let xml = r#"<cryptanalysis xmlns="http://ganzua.sourceforge.net/cryptanalysis"
//!                             cipher="Caesar" language="en">
//!   <ciphertext>WKH</ciphertext>
//!   <substitution>
//!     <alphabet><occurrences ofChar="W" byChar="T"/></alphabet>
//!   </substitution>
//! </cryptanalysis>"#;
//!
//! let scenario = parse_cryptanalysis_str(xml, &ParseOptions::default()).unwrap();
//! assert_eq!(scenario.cipher(), CipherFamily::Caesar);
//! assert!(scenario.substitution_is_injective());
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod locale;
pub mod model;
pub mod parser;
pub mod text;
pub mod xml;

/// Namespace of alphabet-rules documents
pub const RULES_NAMESPACE: &str = "http://ganzua.sourceforge.net/rules";

/// Namespace of language-frequencies documents
pub const FREQUENCIES_NAMESPACE: &str = "http://ganzua.sourceforge.net/frequencies";

/// Namespace of cryptanalysis documents
pub const CRYPTANALYSIS_NAMESPACE: &str = "http://ganzua.sourceforge.net/cryptanalysis";

pub use analysis::{decode_source, profile_from_rules_file, FrequencyBuilder};
pub use config::{ParseOptions, ParseOptionsBuilder};
pub use error::{DocumentError, Result, ValidationError};
pub use locale::Locale;
pub use model::{
    AlphabetRuleSet, CipherFamily, CryptanalysisScenario, Document, DocumentKind, FrequencyEntry,
    FrequencySet, LanguageFrequencyProfile, SubstitutionAlphabet, UNDEFINED_COINCIDENCE_INDEX,
};
pub use parser::{
    parse_alphabet_rules, parse_alphabet_rules_file, parse_alphabet_rules_str,
    parse_cryptanalysis, parse_cryptanalysis_file, parse_cryptanalysis_str, parse_document,
    parse_document_file, parse_language_frequencies, parse_language_frequencies_file,
    parse_language_frequencies_str, AlphabetRulesParser, CryptanalysisParser,
    LanguageFrequencyParser, Section,
};
pub use text::{
    CanonicalKey, Canonicalizer, CharacterClassifier, DefaultLocaleServices, LocaleServices,
    Strength,
};
pub use xml::{
    write_alphabet_rules, write_cryptanalysis, write_language_frequencies, EventReader, XmlEvent,
};
