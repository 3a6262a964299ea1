//! Property tests: writer output always parses back to the same model

use ganzua_core::xml::{alphabet_rules_to_string, escape, language_frequencies_to_string};
use ganzua_core::{
    parse_alphabet_rules_str, parse_language_frequencies_str, ParseOptions, FREQUENCIES_NAMESPACE,
    RULES_NAMESPACE, UNDEFINED_COINCIDENCE_INDEX,
};
use proptest::prelude::*;
use proptest::sample::select;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;

// characters that need escaping are included on purpose
const POOL: &[char] = &[
    'a', 'b', 'c', 'd', 'e', 'k', 'q', 'x', 'z', 'ñ', 'ü', 'ß', 'Ω', '<', '>', '&', '"', '\'',
];

fn letter() -> impl Strategy<Value = char> {
    select(POOL)
}

fn profile_xml(
    alphabet: &BTreeMap<char, u64>,
    bigrams: &BTreeMap<(char, char), u64>,
    trigrams: &BTreeMap<(char, char, char), u64>,
) -> String {
    let mut xml = format!(r#"<languageFrequencies xmlns="{FREQUENCIES_NAMESPACE}" language="de">"#);
    xml.push_str("<alphabet>");
    for (c, n) in alphabet {
        let _ = write!(xml, r#"<character char="{}" frequency="{n}"/>"#, escape(&c.to_string()));
    }
    xml.push_str("</alphabet><bigrams>");
    for ((a, b), n) in bigrams {
        let _ = write!(xml, r#"<bigram sequence="{}" frequency="{n}"/>"#, escape(&format!("{a}{b}")));
    }
    xml.push_str("</bigrams><trigrams>");
    for ((a, b, c), n) in trigrams {
        let _ = write!(
            xml,
            r#"<trigram sequence="{}" frequency="{n}"/>"#,
            escape(&format!("{a}{b}{c}"))
        );
    }
    xml.push_str("</trigrams></languageFrequencies>");
    xml
}

proptest! {
    #[test]
    fn frequency_profiles_survive_rewriting(
        alphabet in prop::collection::btree_map(letter(), 0u64..100_000, 0..12),
        bigrams in prop::collection::btree_map((letter(), letter()), 0u64..1_000, 0..20),
        trigrams in prop::collection::btree_map((letter(), letter(), letter()), 0u64..100, 0..20),
    ) {
        let options = ParseOptions::default();
        let profile = parse_language_frequencies_str(&profile_xml(&alphabet, &bigrams, &trigrams), &options)
            .unwrap();

        prop_assert_eq!(profile.alphabet().len(), alphabet.len());
        prop_assert_eq!(
            profile.alphabet().total(),
            alphabet.values().map(|&n| u128::from(n)).sum::<u128>()
        );
        prop_assert_eq!(profile.bigrams().len(), bigrams.len());

        let index = profile.coincidence_index();
        prop_assert!(index == UNDEFINED_COINCIDENCE_INDEX || (0.0..=1.0).contains(&index));

        let written = language_frequencies_to_string(&profile).unwrap();
        let reread = parse_language_frequencies_str(&written, &options).unwrap();
        prop_assert_eq!(reread, profile);
    }

    #[test]
    fn rule_sets_survive_rewriting(
        characters in prop::collection::btree_set(letter(), 0..POOL.len()),
        replacements in prop::collection::btree_map(letter(), letter(), 0..6),
    ) {
        // alternate characters between include and ignore so no character has two roles
        let (include, ignore): (Vec<(usize, char)>, Vec<(usize, char)>) =
            characters.iter().copied().enumerate().partition(|(i, _)| i % 2 == 0);

        let mut xml = format!(r#"<alphabetRules xmlns="{RULES_NAMESPACE}" language="de" source="t.txt"><include>"#);
        for (_, c) in &include {
            let _ = write!(xml, r#"<character char="{}"/>"#, escape(&c.to_string()));
        }
        xml.push_str("</include><ignore>");
        for (_, c) in &ignore {
            let _ = write!(xml, r#"<character char="{}"/>"#, escape(&c.to_string()));
        }
        xml.push_str("</ignore><replace>");
        for (of, by) in &replacements {
            let _ = write!(
                xml,
                r#"<occurrences ofChar="{}" byChar="{}"/>"#,
                escape(&of.to_string()),
                escape(&by.to_string())
            );
        }
        xml.push_str("</replace></alphabetRules>");

        let options = ParseOptions::default();
        let rules = parse_alphabet_rules_str(&xml, &options).unwrap();
        let roles: BTreeSet<&str> = rules
            .include()
            .iter()
            .chain(rules.ignore())
            .map(|key| key.source())
            .collect();
        prop_assert_eq!(roles.len(), characters.len());
        prop_assert_eq!(rules.replace().len(), replacements.len());

        let written = alphabet_rules_to_string(&rules).unwrap();
        let reread = parse_alphabet_rules_str(&written, &options).unwrap();
        prop_assert_eq!(reread, rules);
    }
}
