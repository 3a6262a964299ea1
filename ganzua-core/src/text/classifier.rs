//! Counting user-perceived characters

use crate::locale::Locale;
use unicode_segmentation::UnicodeSegmentation;

/// Pure user-character segmentation logic
pub trait CharacterClassifier: Send + Sync {
    /// Split `text` into user-perceived characters
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str>;

    /// Number of user-perceived characters in `text`
    fn count_graphemes(&self, text: &str) -> usize {
        self.segment(text).len()
    }

    /// Check if `text` is exactly one user character
    fn is_single_character(&self, text: &str) -> bool {
        self.count_graphemes(text) == 1
    }

    /// Check if `text` is exactly two user characters
    fn is_bigram(&self, text: &str) -> bool {
        self.count_graphemes(text) == 2
    }

    /// Check if `text` is exactly three user characters
    fn is_trigram(&self, text: &str) -> bool {
        self.count_graphemes(text) == 3
    }
}

/// Digraph letters per language, longest first.
fn digraphs_for(language: &str) -> &'static [&'static str] {
    match language {
        "cs" | "sk" => &["ch"],
        "cy" => &["ch", "dd", "ff", "ng", "ll", "ph", "rh", "th"],
        "hu" => &["dzs", "cs", "dz", "gy", "ly", "ny", "sz", "ty", "zs"],
        "nl" => &["ij"],
        _ => &[],
    }
}

/// Extended grapheme cluster segmentation with per-language digraph tailoring
///
/// Clusters follow UAX #29, so a base letter with combining marks or a
/// multi-code-point emoji sequence is one character. On top of that, the
/// digraph letters of the locale's language (Czech `ch`, Welsh `ll`, ...)
/// are merged into a single character, matched case-insensitively.
#[derive(Debug, Clone)]
pub struct GraphemeClassifier {
    digraphs: &'static [&'static str],
}

impl GraphemeClassifier {
    /// Classifier tailored to `locale`
    pub fn for_locale(locale: &Locale) -> Self {
        Self {
            digraphs: digraphs_for(locale.language()),
        }
    }

    /// Plain UAX #29 segmentation without digraph tailoring
    pub fn untailored() -> Self {
        Self { digraphs: &[] }
    }
}

impl CharacterClassifier for GraphemeClassifier {
    fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if self.digraphs.is_empty() {
            return text.graphemes(true).collect();
        }

        let clusters: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
        let mut characters = Vec::with_capacity(clusters.len());
        let mut i = 0;

        while i < clusters.len() {
            let start = clusters[i].0;
            let mut width = 1;

            for digraph in self.digraphs {
                // digraph letters are ASCII, one cluster per byte
                let len = digraph.len();
                if i + len > clusters.len() {
                    continue;
                }
                let (last_offset, last) = clusters[i + len - 1];
                let candidate = &text[start..last_offset + last.len()];
                if candidate.eq_ignore_ascii_case(digraph) {
                    width = len;
                    break;
                }
            }

            let (last_offset, last) = clusters[i + width - 1];
            characters.push(&text[start..last_offset + last.len()]);
            i += width;
        }

        characters
    }
}
