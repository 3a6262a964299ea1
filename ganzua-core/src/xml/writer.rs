//! Serialization of validated models back to markup
//!
//! Writers emit entries in canonical key order using each key's source
//! text, so a document written here parses back into an equal model.

use crate::error::{DocumentError, Result};
use crate::model::{
    AlphabetRuleSet, CryptanalysisScenario, DocumentKind, FrequencySet, LanguageFrequencyProfile,
};
use crate::text::CanonicalKey;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeSet;
use std::io::Write;

/// Escape an attribute value
///
/// Markup characters become entity references. Tab, line feed and
/// carriage return become numeric character references so values survive
/// attribute-value normalization.
pub fn escape(text: &str) -> String {
    escape_with(text, true)
}

/// Escape character data, keeping tabs and line breaks literal
pub fn escape_text(text: &str) -> String {
    escape_with(text, false)
}

fn escape_with(text: &str, whitespace_references: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' if whitespace_references => {
                out.push_str(&format!("&#{};", u32::from(c)))
            }
            c => out.push(c),
        }
    }
    out
}

/// Whether `c` matches the XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Fail on the first character XML 1.0 cannot carry, even as a reference
pub fn ensure_writable(text: &str) -> Result<()> {
    match text.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(DocumentError::Unwritable(c)),
        None => Ok(()),
    }
}

struct MarkupWriter<W: Write> {
    inner: Writer<W>,
}

impl<W: Write> MarkupWriter<W> {
    fn new(sink: W) -> Self {
        Self {
            inner: Writer::new_with_indent(sink, b' ', 1),
        }
    }

    fn declaration(&mut self) -> Result<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn element<'a>(name: &'a str, attributes: &[(&str, &str)]) -> Result<BytesStart<'a>> {
        let mut start = BytesStart::new(name);
        for (key, value) in attributes {
            ensure_writable(value)?;
            let value = escape(value);
            start.push_attribute((key.as_bytes(), value.as_bytes()));
        }
        Ok(start)
    }

    fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.inner
            .write_event(Event::Start(Self::element(name, attributes)?))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        self.inner
            .write_event(Event::Empty(Self::element(name, attributes)?))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        if text.is_empty() {
            return self.empty(name, &[]);
        }
        ensure_writable(text)?;
        let escaped = escape_text(text);
        self.inner
            .write_event(Event::Start(BytesStart::new(name)))?;
        self.inner
            .write_event(Event::Text(BytesText::from_escaped(escaped.as_str())))?;
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn characters(&mut self, section: &str, keys: &BTreeSet<CanonicalKey>) -> Result<()> {
        if keys.is_empty() {
            return self.empty(section, &[]);
        }
        self.open(section, &[])?;
        for key in keys {
            self.empty("character", &[("char", key.source())])?;
        }
        self.close(section)
    }

    fn frequencies(&mut self, section: &str, entry: &str, set: &FrequencySet) -> Result<()> {
        if set.is_empty() {
            return self.empty(section, &[]);
        }
        self.open(section, &[])?;
        for item in set.iter() {
            let count = item.count().to_string();
            self.empty(
                entry,
                &[(entry_attribute(entry), item.key().source()), ("frequency", &count)],
            )?;
        }
        self.close(section)
    }

    fn profile_body(&mut self, profile: &LanguageFrequencyProfile) -> Result<()> {
        self.frequencies("alphabet", "character", profile.alphabet())?;
        self.frequencies("bigrams", "bigram", profile.bigrams())?;
        self.frequencies("trigrams", "trigram", profile.trigrams())
    }

    fn finish(self) -> Result<()> {
        let mut sink = self.inner.into_inner();
        sink.write_all(b"\n")?;
        sink.flush()?;
        Ok(())
    }
}

fn entry_attribute(entry: &str) -> &'static str {
    if entry == "character" {
        "char"
    } else {
        "sequence"
    }
}

fn locale_attributes<'a>(
    language: &'a str,
    country: Option<&'a str>,
) -> Vec<(&'static str, &'a str)> {
    let mut attributes = vec![("language", language)];
    if let Some(country) = country {
        attributes.push(("country", country));
    }
    attributes
}

/// Write an alphabet-rules document
pub fn write_alphabet_rules<W: Write>(rules: &AlphabetRuleSet, sink: W) -> Result<()> {
    let kind = DocumentKind::AlphabetRules;
    let mut out = MarkupWriter::new(sink);
    out.declaration()?;

    let mut root = vec![("xmlns", kind.namespace())];
    root.extend(locale_attributes(rules.locale().language(), rules.locale().country()));
    if let Some(source) = rules.source() {
        root.push(("source", source));
    }
    if let Some(encoding) = rules.source_encoding() {
        root.push(("sourceEncoding", encoding));
    }
    out.open(kind.root_element(), &root)?;

    out.characters("includeExclusively", rules.include_exclusively())?;
    out.characters("include", rules.include())?;
    out.characters("ignore", rules.ignore())?;

    if rules.replace().is_empty() {
        out.empty("replace", &[])?;
    } else {
        out.open("replace", &[])?;
        for (of, by) in rules.replace() {
            out.empty("occurrences", &[("ofChar", of.source()), ("byChar", by.source())])?;
        }
        out.close("replace")?;
    }

    out.close(kind.root_element())?;
    out.finish()
}

fn profile_attributes(profile: &LanguageFrequencyProfile) -> Vec<(&'static str, &str)> {
    let mut attributes = locale_attributes(profile.locale().language(), profile.locale().country());
    if let Some(source) = profile.source() {
        attributes.push(("source", source));
    }
    if let Some(rules) = profile.rules() {
        attributes.push(("rules", rules));
    }
    attributes
}

/// Write a language-frequencies document
pub fn write_language_frequencies<W: Write>(
    profile: &LanguageFrequencyProfile,
    sink: W,
) -> Result<()> {
    let kind = DocumentKind::LanguageFrequencies;
    let mut out = MarkupWriter::new(sink);
    out.declaration()?;

    let mut root = vec![("xmlns", kind.namespace())];
    root.extend(profile_attributes(profile));
    out.open(kind.root_element(), &root)?;
    out.profile_body(profile)?;
    out.close(kind.root_element())?;
    out.finish()
}

/// Write a cryptanalysis document
///
/// An embedded frequency profile is written without its own namespace
/// declaration and so inherits the cryptanalysis namespace.
pub fn write_cryptanalysis<W: Write>(scenario: &CryptanalysisScenario, sink: W) -> Result<()> {
    let kind = DocumentKind::Cryptanalysis;
    let mut out = MarkupWriter::new(sink);
    out.declaration()?;

    let mut root = vec![("xmlns", kind.namespace()), ("cipher", scenario.cipher().tag())];
    root.extend(locale_attributes(
        scenario.locale().language(),
        scenario.locale().country(),
    ));
    out.open(kind.root_element(), &root)?;

    out.text_element("ciphertext", scenario.ciphertext())?;
    out.characters("cipherAlphabet", scenario.cipher_alphabet())?;
    out.characters("plainAlphabet", scenario.plain_alphabet())?;

    out.open("substitution", &[])?;
    if !scenario.ignored().is_empty() {
        out.characters("ignore", scenario.ignored())?;
    }
    for alphabet in scenario.substitution() {
        if alphabet.is_empty() {
            out.empty("alphabet", &[])?;
            continue;
        }
        out.open("alphabet", &[])?;
        out.open("replace", &[])?;
        for (of, by) in alphabet {
            out.empty("occurrences", &[("ofChar", of.source()), ("byChar", by.source())])?;
        }
        out.close("replace")?;
        out.close("alphabet")?;
    }
    out.close("substitution")?;

    if let Some(profile) = scenario.language_frequencies() {
        let nested = DocumentKind::LanguageFrequencies.root_element();
        out.open(nested, &profile_attributes(profile))?;
        out.profile_body(profile)?;
        out.close(nested)?;
    }

    out.close(kind.root_element())?;
    out.finish()
}

fn to_string_with<F>(write: F) -> Result<String>
where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
{
    let mut buf = Vec::new();
    write(&mut buf)?;
    // every byte written comes from &str input
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Alphabet-rules document as a string
pub fn alphabet_rules_to_string(rules: &AlphabetRuleSet) -> Result<String> {
    to_string_with(|buf| write_alphabet_rules(rules, buf))
}

/// Language-frequencies document as a string
pub fn language_frequencies_to_string(profile: &LanguageFrequencyProfile) -> Result<String> {
    to_string_with(|buf| write_language_frequencies(profile, buf))
}

/// Cryptanalysis document as a string
pub fn cryptanalysis_to_string(scenario: &CryptanalysisScenario) -> Result<String> {
    to_string_with(|buf| write_cryptanalysis(scenario, buf))
}
