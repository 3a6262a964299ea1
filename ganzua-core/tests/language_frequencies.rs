//! Integration tests for language-frequencies documents

use ganzua_core::text::LocaleCanonicalizer;
use ganzua_core::xml::language_frequencies_to_string;
use ganzua_core::{
    parse_language_frequencies, parse_language_frequencies_str, CanonicalKey, Canonicalizer,
    DocumentError, Locale, ParseOptions, Section, Strength, ValidationError,
    UNDEFINED_COINCIDENCE_INDEX,
};

fn frequencies_doc(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<languageFrequencies xmlns="http://ganzua.sourceforge.net/frequencies"
                     language="en" source="/corpora/en.txt" rules="/rules/en.xml">
{body}
</languageFrequencies>"#
    )
}

fn key(text: &str) -> CanonicalKey {
    LocaleCanonicalizer::new(Locale::new("en", None), Strength::Tertiary).canonicalize(text)
}

const ENGLISH: &str = r#"
 <alphabet>
  <character char="e" frequency="12"/>
  <character char="t" frequency="9"/>
  <character char="a" frequency="8"/>
 </alphabet>
 <bigrams>
  <bigram sequence="th" frequency="4"/>
  <bigram sequence="he" frequency="3"/>
 </bigrams>
 <trigrams>
  <trigram sequence="the" frequency="2"/>
 </trigrams>"#;

#[test]
fn test_english_profile() {
    let profile =
        parse_language_frequencies_str(&frequencies_doc(ENGLISH), &ParseOptions::default())
            .unwrap();

    assert_eq!(profile.locale(), &Locale::new("en", None));
    assert_eq!(profile.source(), Some("/corpora/en.txt"));
    assert_eq!(profile.rules(), Some("/rules/en.xml"));
    assert_eq!(profile.alphabet().total(), 29);
    assert_eq!(profile.bigrams().count_of(&key("th")), Some(4));
    assert_eq!(profile.trigrams().count_of(&key("the")), Some(2));

    let expected = (12.0 * 11.0 + 9.0 * 8.0 + 8.0 * 7.0) / (29.0 * 28.0);
    assert!((profile.coincidence_index() - expected).abs() < 1e-12);
}

#[test]
fn test_entries_iterate_in_key_order() {
    let profile =
        parse_language_frequencies_str(&frequencies_doc(ENGLISH), &ParseOptions::default())
            .unwrap();
    let letters: Vec<&str> = profile.alphabet().iter().map(|e| e.key().source()).collect();
    assert_eq!(letters, vec!["a", "e", "t"]);
}

#[test]
fn test_reader_entry_point() {
    let xml = frequencies_doc("<alphabet/>");
    let profile = parse_language_frequencies(xml.as_bytes(), &ParseOptions::default()).unwrap();
    assert!(profile.alphabet().is_empty());
    assert_eq!(profile.coincidence_index(), UNDEFINED_COINCIDENCE_INDEX);
}

#[test]
fn test_single_occurrence_index_is_undefined() {
    let xml = frequencies_doc(r#"<alphabet><character char="q" frequency="1"/></alphabet>"#);
    let profile = parse_language_frequencies_str(&xml, &ParseOptions::default()).unwrap();
    assert_eq!(profile.coincidence_index(), UNDEFINED_COINCIDENCE_INDEX);
}

#[test]
fn test_non_numeric_frequency() {
    let xml = frequencies_doc(r#"<bigrams><bigram sequence="ab" frequency="often"/></bigrams>"#);
    let err = parse_language_frequencies_str(&xml, &ParseOptions::default()).unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::InvalidFrequency {
            value: "often".to_string(),
            section: Section::Bigrams,
        })
    );
}

#[test]
fn test_missing_frequency() {
    let xml = frequencies_doc(r#"<alphabet><character char="a"/></alphabet>"#);
    let err = parse_language_frequencies_str(&xml, &ParseOptions::default()).unwrap_err();
    assert!(matches!(
        err.validation(),
        Some(ValidationError::MissingAttribute { attribute: "frequency", .. })
    ));
}

#[test]
fn test_emoji_sequence_counts_as_one_character() {
    let xml = frequencies_doc(
        r#"<alphabet><character char="👍🏽" frequency="2"/></alphabet>
           <bigrams><bigram sequence="a👍🏽" frequency="1"/></bigrams>"#,
    );
    let profile = parse_language_frequencies_str(&xml, &ParseOptions::default()).unwrap();
    assert_eq!(profile.alphabet().len(), 1);
    assert_eq!(profile.bigrams().len(), 1);
}

#[test]
fn test_duplicate_under_default_strength() {
    // the Kelvin sign decomposes to K
    let xml = frequencies_doc(
        r#"<alphabet>
             <character char="K" frequency="1"/>
             <character char="&#x212A;" frequency="1"/>
           </alphabet>"#,
    );
    let err = parse_language_frequencies_str(&xml, &ParseOptions::default()).unwrap_err();
    assert!(matches!(
        err.validation(),
        Some(ValidationError::DuplicateEntry { section: Section::Alphabet, .. })
    ));

    let exact = ParseOptions::builder()
        .default_strength(Strength::Identical)
        .build();
    let xml = frequencies_doc(
        r#"<alphabet>
             <character char="Ａ" frequency="1"/>
             <character char="A" frequency="1"/>
           </alphabet>"#,
    );
    assert_eq!(
        parse_language_frequencies_str(&xml, &exact)
            .unwrap()
            .alphabet()
            .len(),
        2
    );
}

#[test]
fn test_trigram_with_two_characters() {
    let xml = frequencies_doc(r#"<trigrams><trigram sequence="th" frequency="1"/></trigrams>"#);
    let err = parse_language_frequencies_str(&xml, &ParseOptions::default()).unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::InvalidTrigram {
            value: "th".to_string()
        })
    );
}

#[test]
fn test_counts_summing_past_u64() {
    let body = r#"
 <alphabet>
  <character char="a" frequency="18446744073709551615"/>
  <character char="b" frequency="1"/>
 </alphabet>"#;
    let profile =
        parse_language_frequencies_str(&frequencies_doc(body), &ParseOptions::default()).unwrap();

    assert_eq!(profile.alphabet().count_of(&key("a")), Some(u64::MAX));
    assert_eq!(profile.alphabet().total(), u128::from(u64::MAX) + 1);
    let index = profile.coincidence_index();
    assert!(index.is_finite());
    assert!((0.0..=1.0).contains(&index));
}

#[test]
fn test_element_from_another_namespace() {
    let xml = r#"<languageFrequencies xmlns="http://ganzua.sourceforge.net/frequencies"
                     xmlns:r="http://ganzua.sourceforge.net/rules" language="en">
                   <r:include/>
                 </languageFrequencies>"#;
    match parse_language_frequencies_str(xml, &ParseOptions::default()) {
        Err(DocumentError::WrongNamespace { element, found, .. }) => {
            assert_eq!(element, "include");
            assert_eq!(found, "http://ganzua.sourceforge.net/rules");
        }
        other => panic!("expected a namespace error, got {other:?}"),
    }
}

#[test]
fn test_written_document_parses_back() {
    let options = ParseOptions::default();
    let profile = parse_language_frequencies_str(&frequencies_doc(ENGLISH), &options).unwrap();
    let written = language_frequencies_to_string(&profile).unwrap();

    assert!(written.starts_with("<?xml"));
    assert!(written.contains(r#"<bigram sequence="he" frequency="3"/>"#));
    let reread = parse_language_frequencies_str(&written, &options).unwrap();
    assert_eq!(reread, profile);
}
