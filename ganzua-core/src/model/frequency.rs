//! Language frequency profiles

use crate::locale::Locale;
use crate::text::CanonicalKey;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Value of the coincidence index when it cannot be computed
pub const UNDEFINED_COINCIDENCE_INDEX: f64 = -1.0;

/// A canonical key with its occurrence count
///
/// Identity is the key alone; the count is payload.
#[derive(Debug, Clone)]
pub struct FrequencyEntry {
    key: CanonicalKey,
    count: u64,
}

impl FrequencyEntry {
    /// Create an entry
    pub fn new(key: CanonicalKey, count: u64) -> Self {
        Self { key, count }
    }

    /// The entry's identity
    pub fn key(&self) -> &CanonicalKey {
        &self.key
    }

    /// Number of occurrences
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl PartialEq for FrequencyEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for FrequencyEntry {}

impl Hash for FrequencyEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for FrequencyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrequencyEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Borrow<CanonicalKey> for FrequencyEntry {
    fn borrow(&self) -> &CanonicalKey {
        &self.key
    }
}

/// Set of frequency entries keyed by canonical key, in key order
#[derive(Debug, Clone, Default)]
pub struct FrequencySet {
    entries: BTreeSet<FrequencyEntry>,
}

impl FrequencySet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; returns `false` and leaves the set unchanged if the
    /// key is already present
    pub fn insert(&mut self, key: CanonicalKey, count: u64) -> bool {
        self.entries.insert(FrequencyEntry::new(key, count))
    }

    /// Add one occurrence of `key`, inserting it if absent
    pub fn increment(&mut self, key: CanonicalKey) {
        let count = self.entries.take(&key).map_or(0, |entry| entry.count);
        self.entries
            .insert(FrequencyEntry::new(key, count.saturating_add(1)));
    }

    /// Count recorded for `key`
    pub fn count_of(&self, key: &CanonicalKey) -> Option<u64> {
        self.entries.get(key).map(FrequencyEntry::count)
    }

    /// Whether `key` is present
    pub fn contains(&self, key: &CanonicalKey) -> bool {
        self.entries.contains(key)
    }

    /// Entries in canonical key order
    pub fn iter(&self) -> impl Iterator<Item = &FrequencyEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    ///
    /// Widened to `u128` so that any set of `u64` counts sums exactly.
    pub fn total(&self) -> u128 {
        self.entries
            .iter()
            .map(|entry| u128::from(entry.count))
            .sum()
    }
}

// Counts are compared too: two sets with the same keys but different
// frequencies describe different profiles.
impl PartialEq for FrequencySet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.key() == b.key() && a.count() == b.count())
    }
}

/// Index of coincidence of an alphabet: `Σ f(f−1) / N(N−1)`
///
/// Returns [`UNDEFINED_COINCIDENCE_INDEX`] when the set is empty or the
/// total count is below two.
pub fn coincidence_index(alphabet: &FrequencySet) -> f64 {
    let total = alphabet.total() as f64;
    let denominator = total * (total - 1.0);
    if alphabet.is_empty() || denominator <= 0.0 {
        return UNDEFINED_COINCIDENCE_INDEX;
    }

    alphabet
        .iter()
        .map(|entry| {
            let f = entry.count() as f64;
            f * (f - 1.0) / denominator
        })
        .sum()
}

/// Per-language character, bigram and trigram statistics
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageFrequencyProfile {
    pub(crate) locale: Locale,
    pub(crate) source: Option<String>,
    pub(crate) rules: Option<String>,
    pub(crate) alphabet: FrequencySet,
    pub(crate) bigrams: FrequencySet,
    pub(crate) trigrams: FrequencySet,
    pub(crate) coincidence_index: f64,
}

impl LanguageFrequencyProfile {
    /// Locale the statistics describe
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Reference to the text the statistics were taken from
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Reference to the alphabet-rules document used
    pub fn rules(&self) -> Option<&str> {
        self.rules.as_deref()
    }

    /// Single-character frequencies
    pub fn alphabet(&self) -> &FrequencySet {
        &self.alphabet
    }

    /// Two-character frequencies
    pub fn bigrams(&self) -> &FrequencySet {
        &self.bigrams
    }

    /// Three-character frequencies
    pub fn trigrams(&self) -> &FrequencySet {
        &self.trigrams
    }

    /// Index of coincidence, or [`UNDEFINED_COINCIDENCE_INDEX`]
    pub fn coincidence_index(&self) -> f64 {
        self.coincidence_index
    }
}
