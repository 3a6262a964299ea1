//! Markup plumbing between `quick_xml` and the document parsers

pub mod event;
pub mod reader;
pub mod writer;

pub use event::{drive, Attributes, DocumentHandler, QualifiedName, XmlEvent};
pub use reader::EventReader;
pub use writer::{
    alphabet_rules_to_string, cryptanalysis_to_string, ensure_writable, escape, escape_text,
    language_frequencies_to_string, write_alphabet_rules, write_cryptanalysis,
    write_language_frequencies,
};
