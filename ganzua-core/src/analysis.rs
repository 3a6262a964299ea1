//! Frequency profiles computed from a source text
//!
//! [`FrequencyBuilder`] applies an [`AlphabetRuleSet`] to a text and counts
//! characters, bigrams and trigrams. Bigrams and trigrams are formed from
//! consecutive *kept* characters, so an ignored character between two
//! letters does not break the sequence.

use crate::config::ParseOptions;
use crate::error::{DocumentError, Result, ValidationError};
use crate::model::{coincidence_index, AlphabetRuleSet, FrequencySet, LanguageFrequencyProfile};
use crate::parser::parse_alphabet_rules_file;
use crate::text::{CanonicalKey, Canonicalizer, CharacterClassifier, LocaleServices};
use encoding_rs::Encoding;
use log::{debug, info};
use std::path::Path;

/// Encoding assumed when a rule set names none
pub const DEFAULT_SOURCE_ENCODING: &str = "UTF-8";

/// Decode source bytes with the encoding named by `label`
///
/// Labels follow the WHATWG Encoding Standard (`UTF-8`, `ISO-8859-1`,
/// `windows-1252`, ...). A byte order mark overrides the label.
pub fn decode_source(bytes: &[u8], label: Option<&str>) -> Result<String> {
    let label = label.unwrap_or(DEFAULT_SOURCE_ENCODING);
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| DocumentError::UnsupportedEncoding(label.to_string()))?;

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(DocumentError::MalformedSource(used.name().to_string()));
    }
    Ok(text.into_owned())
}

/// Accumulates character, bigram and trigram counts for one rule set
pub struct FrequencyBuilder<'r> {
    rules: &'r AlphabetRuleSet,
    classifier: Box<dyn CharacterClassifier>,
    rule_keys: Box<dyn Canonicalizer>,
    profile_keys: Box<dyn Canonicalizer>,
    rules_reference: Option<String>,
    alphabet: FrequencySet,
    bigrams: FrequencySet,
    trigrams: FrequencySet,
    previous: Option<String>,
    last: Option<String>,
}

impl<'r> FrequencyBuilder<'r> {
    /// Builder using the default locale services for `options`
    pub fn from_rules(rules: &'r AlphabetRuleSet, options: &ParseOptions) -> Self {
        Self::with_services(rules, options, &options.services())
    }

    /// Builder using injected locale services
    ///
    /// Rule lookups use `rules_strength`, the counted keys use
    /// `default_strength` so the profile reads back the way any
    /// language-frequencies document does.
    pub fn with_services(
        rules: &'r AlphabetRuleSet,
        options: &ParseOptions,
        services: &dyn LocaleServices,
    ) -> Self {
        let locale = rules.locale();
        let profile_keys = services.canonicalizer(locale, options.default_strength);

        // the declared alphabet always appears, even when unused
        let mut alphabet = FrequencySet::new();
        let seed = if rules.include_exclusively().is_empty() {
            rules.include()
        } else {
            rules.include_exclusively()
        };
        for key in seed {
            alphabet.insert(profile_keys.canonicalize(key.source()), 0);
        }

        Self {
            rules,
            classifier: services.classifier(locale),
            rule_keys: services.canonicalizer(locale, options.rules_strength),
            profile_keys,
            rules_reference: None,
            alphabet,
            bigrams: FrequencySet::new(),
            trigrams: FrequencySet::new(),
            previous: None,
            last: None,
        }
    }

    /// Record where the rule set was loaded from
    pub fn rules_reference(mut self, reference: impl Into<String>) -> Self {
        self.rules_reference = Some(reference.into());
        self
    }

    /// Count the user characters of `text`
    ///
    /// Sequences continue across calls; pass text split on line or
    /// paragraph boundaries so no user character is cut in two.
    pub fn feed(&mut self, text: &str) {
        for character in self.classifier.segment(text) {
            let mut key = self.rule_keys.canonicalize(character);
            if let Some(replacement) = self.rules.replacement_for(&key) {
                key = replacement.clone();
            }
            if self.keeps(&key) {
                self.count(key.source().to_string());
            }
        }
    }

    fn keeps(&self, key: &CanonicalKey) -> bool {
        let exclusive = self.rules.include_exclusively();
        if exclusive.is_empty() {
            !self.rules.ignore().contains(key)
        } else {
            exclusive.contains(key)
        }
    }

    fn count(&mut self, character: String) {
        self.alphabet
            .increment(self.profile_keys.canonicalize(&character));

        if let Some(last) = &self.last {
            if let Some(previous) = &self.previous {
                let trigram = format!("{previous}{last}{character}");
                self.trigrams
                    .increment(self.profile_keys.canonicalize(&trigram));
            }
            let bigram = format!("{last}{character}");
            self.bigrams.increment(self.profile_keys.canonicalize(&bigram));
        }

        self.previous = self.last.take();
        self.last = Some(character);
    }

    /// Feed `text` and build the profile
    pub fn analyze(mut self, text: &str) -> LanguageFrequencyProfile {
        self.feed(text);
        self.finish()
    }

    /// Build the profile from everything fed so far
    pub fn finish(self) -> LanguageFrequencyProfile {
        let index = coincidence_index(&self.alphabet);
        info!(
            "counted {} characters ({} distinct), {} bigrams, {} trigrams",
            self.alphabet.total(),
            self.alphabet.len(),
            self.bigrams.len(),
            self.trigrams.len()
        );

        LanguageFrequencyProfile {
            locale: self.rules.locale().clone(),
            source: self.rules.source().map(str::to_string),
            rules: self.rules_reference,
            alphabet: self.alphabet,
            bigrams: self.bigrams,
            trigrams: self.trigrams,
            coincidence_index: index,
        }
    }
}

/// Parse an alphabet-rules file and profile the source text it names
///
/// A relative `source` is resolved against the directory of the rules file.
pub fn profile_from_rules_file(
    rules_path: &Path,
    options: &ParseOptions,
) -> Result<LanguageFrequencyProfile> {
    let rules = parse_alphabet_rules_file(rules_path, options)?;
    let Some(source) = rules.source() else {
        return Err(ValidationError::MissingAttribute {
            element: "alphabetRules".to_string(),
            attribute: "source",
        }
        .into());
    };

    let source_path = match rules_path.parent() {
        Some(dir) => dir.join(source),
        None => Path::new(source).to_path_buf(),
    };
    debug!(
        "reading source text {} as {}",
        source_path.display(),
        rules.source_encoding().unwrap_or(DEFAULT_SOURCE_ENCODING)
    );

    let bytes = std::fs::read(&source_path)?;
    let text = decode_source(&bytes, rules.source_encoding())?;
    Ok(FrequencyBuilder::from_rules(&rules, options)
        .rules_reference(rules_path.display().to_string())
        .analyze(&text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_alphabet_rules_str;
    use crate::text::ExactCanonicalizer;

    fn rules(body: &str) -> AlphabetRuleSet {
        let xml = format!(
            r#"<alphabetRules xmlns="{}" language="es" source="t.txt">{body}</alphabetRules>"#,
            crate::RULES_NAMESPACE
        );
        parse_alphabet_rules_str(&xml, &ParseOptions::default()).unwrap()
    }

    fn key(s: &str) -> CanonicalKey {
        ExactCanonicalizer.canonicalize(s)
    }

    #[test]
    fn test_counts_with_ignore() {
        let rules = rules(r#"<ignore><character char=" "/></ignore>"#);
        let profile =
            FrequencyBuilder::from_rules(&rules, &ParseOptions::default()).analyze("ab a");

        assert_eq!(profile.alphabet().count_of(&key("a")), Some(2));
        assert_eq!(profile.alphabet().count_of(&key(" ")), None);
        // the ignored space does not break the sequence
        assert_eq!(profile.bigrams().count_of(&key("ba")), Some(1));
        assert_eq!(profile.trigrams().count_of(&key("aba")), Some(1));
        assert_eq!(profile.source(), Some("t.txt"));
    }

    #[test]
    fn test_include_exclusively_filters_and_seeds() {
        let rules = rules(
            r#"<includeExclusively><character char="a"/><character char="z"/></includeExclusively>"#,
        );
        let profile =
            FrequencyBuilder::from_rules(&rules, &ParseOptions::default()).analyze("abca");

        assert_eq!(profile.alphabet().len(), 2);
        assert_eq!(profile.alphabet().count_of(&key("a")), Some(2));
        assert_eq!(profile.alphabet().count_of(&key("z")), Some(0));
        assert_eq!(profile.bigrams().count_of(&key("aa")), Some(1));
    }

    #[test]
    fn test_replacement_applies_before_filtering() {
        let rules = rules(
            r#"<ignore><character char="á"/></ignore>
               <replace><occurrences ofChar="é" byChar="e"/></replace>"#,
        );
        let profile =
            FrequencyBuilder::from_rules(&rules, &ParseOptions::default()).analyze("éeá");
        assert_eq!(profile.alphabet().count_of(&key("e")), Some(2));
        assert_eq!(profile.alphabet().len(), 1);
    }

    #[test]
    fn test_feed_continues_sequences() {
        let rules = rules("");
        let mut builder = FrequencyBuilder::from_rules(&rules, &ParseOptions::default())
            .rules_reference("rules.xml");
        builder.feed("ab");
        builder.feed("c");
        let profile = builder.finish();
        assert_eq!(profile.trigrams().count_of(&key("abc")), Some(1));
        assert_eq!(profile.rules(), Some("rules.xml"));
    }

    #[test]
    fn test_coincidence_index_of_built_profile() {
        let rules = rules("");
        let profile = FrequencyBuilder::from_rules(&rules, &ParseOptions::default()).analyze("aabb");
        assert!((profile.coincidence_index() - 4.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_decode_latin1() {
        let text = decode_source(&[0x61, 0xF1], Some("ISO-8859-1")).unwrap();
        assert_eq!(text, "añ");
    }

    #[test]
    fn test_decode_defaults_to_utf8() {
        assert_eq!(decode_source("ñ".as_bytes(), None).unwrap(), "ñ");
        assert_eq!(decode_source(b"abc", Some(" utf8 ")).unwrap(), "abc");
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_source(b"a", Some("klingon")),
            Err(DocumentError::UnsupportedEncoding(_))
        ));
        assert!(matches!(
            decode_source(&[0x61, 0xC3], None),
            Err(DocumentError::MalformedSource(_))
        ));
    }
}
