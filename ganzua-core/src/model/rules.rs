//! Alphabet rule sets

use crate::locale::Locale;
use crate::text::CanonicalKey;
use std::collections::{BTreeMap, BTreeSet};

/// Instructions for deriving a working alphabet from a source text
#[derive(Debug, Clone, PartialEq)]
pub struct AlphabetRuleSet {
    pub(crate) locale: Locale,
    pub(crate) source: Option<String>,
    pub(crate) source_encoding: Option<String>,
    pub(crate) include_exclusively: BTreeSet<CanonicalKey>,
    pub(crate) include: BTreeSet<CanonicalKey>,
    pub(crate) ignore: BTreeSet<CanonicalKey>,
    pub(crate) replace: BTreeMap<CanonicalKey, CanonicalKey>,
}

impl AlphabetRuleSet {
    /// Locale of the source text
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Reference to the source text
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Encoding label of the source text
    pub fn source_encoding(&self) -> Option<&str> {
        self.source_encoding.as_deref()
    }

    /// Characters that make up the whole alphabet, when non-empty
    pub fn include_exclusively(&self) -> &BTreeSet<CanonicalKey> {
        &self.include_exclusively
    }

    /// Characters always present in the alphabet
    pub fn include(&self) -> &BTreeSet<CanonicalKey> {
        &self.include
    }

    /// Characters dropped from the source text
    pub fn ignore(&self) -> &BTreeSet<CanonicalKey> {
        &self.ignore
    }

    /// Character replacements, each source replaced at most once
    pub fn replace(&self) -> &BTreeMap<CanonicalKey, CanonicalKey> {
        &self.replace
    }

    /// Replacement for `key`, if any
    pub fn replacement_for(&self, key: &CanonicalKey) -> Option<&CanonicalKey> {
        self.replace.get(key)
    }
}
