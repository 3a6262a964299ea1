//! Layered error types
//!
//! Structural problems (malformed markup, foreign namespaces, I/O) abort a
//! parse before any validation runs. Validation problems are raised by the
//! document parsers themselves. Both tiers are fatal: a parse that reports an
//! error never yields a partial model.

use crate::locale::Locale;
use crate::model::CipherFamily;
use crate::parser::Section;
use thiserror::Error;

/// Violations of a document's validation rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A value that must be exactly one user character is not
    #[error("\"{value}\" is not a valid character in {section}")]
    InvalidCharacter {
        /// The offending attribute value
        value: String,
        /// Where it was found
        section: Section,
    },

    /// A bigram sequence that is not exactly two user characters
    #[error("\"{value}\" is not a valid bigram")]
    InvalidBigram {
        /// The offending sequence
        value: String,
    },

    /// A trigram sequence that is not exactly three user characters
    #[error("\"{value}\" is not a valid trigram")]
    InvalidTrigram {
        /// The offending sequence
        value: String,
    },

    /// A frequency attribute that is not a non-negative integer
    #[error("\"{value}\" is not a valid frequency in {section}")]
    InvalidFrequency {
        /// The offending attribute value
        value: String,
        /// Where it was found
        section: Section,
    },

    /// A canonical key inserted twice into the same collection
    #[error("duplicated entry \"{value}\" in {section}")]
    DuplicateEntry {
        /// The source text of the repeated entry
        value: String,
        /// The collection that already holds it
        section: Section,
    },

    /// An embedded frequency profile declares a different locale
    #[error("languageFrequencies declares locale {found} but the document locale is {expected}")]
    LocaleMismatch {
        /// Locale of the enclosing document
        expected: Locale,
        /// Locale declared by the embedded profile
        found: Locale,
    },

    /// More substitution alphabets than the cipher family allows
    #[error("too many alphabets for {cipher}: {count} declared")]
    TooManyAlphabets {
        /// The declared cipher family
        cipher: CipherFamily,
        /// Number of substitution alphabets found
        count: usize,
    },

    /// Fewer substitution alphabets than the cipher family requires
    #[error("too few alphabets for {cipher}: {count} declared")]
    TooFewAlphabets {
        /// The declared cipher family
        cipher: CipherFamily,
        /// Number of substitution alphabets found
        count: usize,
    },

    /// The `cipher` attribute names no known cipher family
    #[error("unknown cipher family \"{0}\"")]
    UnknownCipherFamily(String),

    /// A required attribute is absent
    #[error("<{element}> is missing the required attribute \"{attribute}\"")]
    MissingAttribute {
        /// Element that lacks the attribute
        element: String,
        /// Name of the missing attribute
        attribute: &'static str,
    },

    /// An element that the document grammar does not allow at this position
    #[error("unexpected element <{element}> inside {parent}")]
    UnexpectedElement {
        /// Name of the rejected element
        element: String,
        /// Description of the enclosing element
        parent: String,
    },
}

/// Errors reported while ingesting a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The tokenizer rejected the markup, or reported an advisory
    #[error("malformed markup at byte {position}: {message}")]
    Markup {
        /// Byte offset reported by the tokenizer
        position: u64,
        /// Tokenizer message
        message: String,
    },

    /// An element outside the namespace of the document being parsed
    #[error("element <{element}> is not in namespace {expected} (found {found})")]
    WrongNamespace {
        /// Local name of the element
        element: String,
        /// Namespace required at this position
        expected: &'static str,
        /// Namespace the element resolved to
        found: String,
    },

    /// The document violates a validation rule
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Source text uses an encoding label that is not recognised
    #[error("unsupported source encoding \"{0}\"")]
    UnsupportedEncoding(String),

    /// Source text contains byte sequences invalid for its encoding
    #[error("source text is not valid {0}")]
    MalformedSource(String),

    /// A model value holds a character XML 1.0 cannot represent
    #[error("U+{:04X} cannot be written in XML 1.0", u32::from(*.0))]
    Unwritable(char),

    /// Invalid parse options
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::Error> for DocumentError {
    fn from(err: quick_xml::Error) -> Self {
        DocumentError::Markup {
            position: 0,
            message: err.to_string(),
        }
    }
}

impl DocumentError {
    /// Returns the validation error behind this failure, if any
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            DocumentError::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;
