//! Cryptanalysis-scenario parser
//!
//! A nested `languageFrequencies` element is handed to a
//! [`LanguageFrequencyParser`] for the whole of its subtree; when the
//! subtree closes, the profile is stored and dispatch returns to the
//! scenario's own sections.

use super::frequencies::LanguageFrequencyParser;
use super::{
    expect_namespace, locale_from, no_root, required, unbalanced, unexpected, unexpected_in,
    DocumentContext, Section,
};
use crate::config::ParseOptions;
use crate::error::{DocumentError, Result, ValidationError};
use crate::model::{
    is_injective, CipherFamily, CryptanalysisScenario, DocumentKind, LanguageFrequencyProfile,
    SubstitutionAlphabet,
};
use crate::text::{CanonicalKey, LocaleServices, Strength};
use crate::xml::{drive, Attributes, DocumentHandler, QualifiedName, XmlEvent};
use log::{debug, info, trace};
use std::collections::BTreeSet;
use std::sync::Arc;

const KIND: DocumentKind = DocumentKind::Cryptanalysis;

struct Nested {
    parser: LanguageFrequencyParser,
    depth: usize,
}

/// Builds a [`CryptanalysisScenario`] from a `cryptanalysis` event stream
pub struct CryptanalysisParser {
    services: Arc<dyn LocaleServices>,
    strength: Strength,
    context: Option<DocumentContext>,
    cipher: Option<CipherFamily>,
    stack: Vec<Section>,
    leaf: Option<String>,
    nested: Option<Nested>,
    ciphertext: String,
    cipher_alphabet: BTreeSet<CanonicalKey>,
    plain_alphabet: BTreeSet<CanonicalKey>,
    ignored: BTreeSet<CanonicalKey>,
    substitution: Vec<SubstitutionAlphabet>,
    language_frequencies: Option<LanguageFrequencyProfile>,
}

impl CryptanalysisParser {
    /// Parser with the default locale services for `options`
    pub fn new(options: &ParseOptions) -> Self {
        Self::with_services(options, Arc::new(options.services()))
    }

    /// Parser with injected locale services
    pub fn with_services(options: &ParseOptions, services: Arc<dyn LocaleServices>) -> Self {
        Self {
            services,
            strength: options.default_strength,
            context: None,
            cipher: None,
            stack: Vec::new(),
            leaf: None,
            nested: None,
            ciphertext: String::new(),
            cipher_alphabet: BTreeSet::new(),
            plain_alphabet: BTreeSet::new(),
            ignored: BTreeSet::new(),
            substitution: Vec::new(),
            language_frequencies: None,
        }
    }

    /// Consume an event stream and return the validated scenario
    pub fn parse<I>(self, events: I) -> Result<CryptanalysisScenario>
    where
        I: IntoIterator<Item = Result<XmlEvent>>,
    {
        drive(self, events)
    }

    fn context(&self) -> Result<&DocumentContext> {
        self.context.as_ref().ok_or_else(|| no_root(KIND))
    }

    fn enter_root(&mut self, name: &QualifiedName, attributes: &Attributes) -> Result<()> {
        let cipher: CipherFamily = required(attributes, name, "cipher")?.parse()?;
        let locale = locale_from(attributes, name)?;
        debug!("cryptanalysis root: {cipher} cipher, locale {locale}");

        self.cipher = Some(cipher);
        self.context = Some(DocumentContext::new(locale, self.services.as_ref(), self.strength));
        self.stack.push(Section::Root(KIND));
        Ok(())
    }

    fn enter_frequencies(&mut self, name: &QualifiedName, attributes: &Attributes) -> Result<()> {
        if self.language_frequencies.is_some() {
            return Err(unexpected_in(name, Some(Section::Root(KIND))).into());
        }

        let expected = self.context()?.locale().clone();
        let found = locale_from(attributes, name)?;
        if found != expected {
            return Err(ValidationError::LocaleMismatch { expected, found }.into());
        }

        let mut parser = LanguageFrequencyParser::embedded(self.services.clone(), self.strength);
        parser.start_element(name, attributes)?;
        self.nested = Some(Nested { parser, depth: 1 });
        Ok(())
    }

    fn add_character(
        &mut self,
        section: Section,
        attributes: &Attributes,
        name: &QualifiedName,
    ) -> Result<()> {
        let value = required(attributes, name, "char")?;
        let key = self.context()?.character(value, section)?;

        let set = match section {
            Section::CipherAlphabet => &mut self.cipher_alphabet,
            Section::PlainAlphabet => &mut self.plain_alphabet,
            _ => &mut self.ignored,
        };
        if !set.insert(key) {
            return Err(ValidationError::DuplicateEntry {
                value: value.to_string(),
                section,
            }
            .into());
        }
        trace!("{section}: {value}");
        Ok(())
    }

    fn add_occurrence(&mut self, attributes: &Attributes, name: &QualifiedName) -> Result<()> {
        let index = self.substitution.len();
        let section = Section::SubstitutionAlphabet(index);
        let of = required(attributes, name, "ofChar")?;
        let by = required(attributes, name, "byChar")?;
        let context = self.context()?;
        let of_key = context.character(of, section)?;
        let by_key = context.character(by, section)?;

        let Some(alphabet) = self.substitution.last_mut() else {
            return Err(unexpected_in(name, Some(Section::Substitution)).into());
        };
        if alphabet.contains_key(&of_key) {
            return Err(ValidationError::DuplicateEntry {
                value: of.to_string(),
                section,
            }
            .into());
        }
        trace!("{section}: {of} -> {by}");
        alphabet.insert(of_key, by_key);
        Ok(())
    }

    fn in_substitution_alphabet(&self) -> bool {
        match self.stack.as_slice() {
            [.., Section::SubstitutionAlphabet(_)] => true,
            [.., Section::SubstitutionAlphabet(_), Section::Replace] => true,
            _ => false,
        }
    }

    fn in_ignored(&self) -> bool {
        matches!(
            self.stack.as_slice(),
            [.., Section::Substitution] | [.., Section::Substitution, Section::Ignore]
        )
    }

    fn open(&mut self, section: Section) -> Result<()> {
        self.stack.push(section);
        Ok(())
    }

    fn close_nested(&mut self, nested: Nested) -> Result<()> {
        let profile = nested.parser.end_document()?;
        debug!(
            "embedded languageFrequencies closed with {} characters",
            profile.alphabet().len()
        );
        self.language_frequencies = Some(profile);
        Ok(())
    }
}

impl DocumentHandler for CryptanalysisParser {
    type Output = CryptanalysisScenario;

    fn start_element(&mut self, name: &QualifiedName, attributes: &Attributes) -> Result<()> {
        if let Some(nested) = self.nested.as_mut() {
            nested.depth += 1;
            return nested.parser.start_element(name, attributes);
        }

        expect_namespace(name, KIND.namespace()).or_else(|err| {
            // the embedded profile may keep its own namespace
            let embedded = name.local == "languageFrequencies"
                && name.is_in(crate::FREQUENCIES_NAMESPACE)
                && matches!(self.stack.as_slice(), [Section::Root(_)]);
            if embedded {
                Ok(())
            } else {
                Err(err)
            }
        })?;
        if let Some(leaf) = &self.leaf {
            return Err(unexpected(name, Some(format!("<{leaf}>").as_str())).into());
        }

        let parent = self.stack.last().copied();
        match (parent, name.local.as_str()) {
            (None, "cryptanalysis") if self.context.is_none() => self.enter_root(name, attributes),
            (Some(Section::Root(_)), "ciphertext") => self.open(Section::Ciphertext),
            (Some(Section::Root(_)), "cipherAlphabet") => self.open(Section::CipherAlphabet),
            (Some(Section::Root(_)), "plainAlphabet") => self.open(Section::PlainAlphabet),
            (Some(Section::Root(_)), "substitution") => self.open(Section::Substitution),
            (Some(Section::Root(_)), "languageFrequencies") => {
                self.enter_frequencies(name, attributes)
            }
            (Some(Section::Substitution), "ignore") => self.open(Section::Ignore),
            (Some(Section::Substitution), "alphabet") => {
                self.substitution.push(SubstitutionAlphabet::new());
                self.open(Section::SubstitutionAlphabet(self.substitution.len()))
            }
            (Some(Section::SubstitutionAlphabet(_)), "replace") => self.open(Section::Replace),
            (Some(section @ (Section::CipherAlphabet | Section::PlainAlphabet)), "character") => {
                self.add_character(section, attributes, name)?;
                self.leaf = Some(name.local.clone());
                Ok(())
            }
            (Some(section @ (Section::Substitution | Section::Ignore)), "character")
                if self.in_ignored() =>
            {
                self.add_character(section, attributes, name)?;
                self.leaf = Some(name.local.clone());
                Ok(())
            }
            (_, "occurrences") if self.in_substitution_alphabet() => {
                self.add_occurrence(attributes, name)?;
                self.leaf = Some(name.local.clone());
                Ok(())
            }
            (parent, _) => Err(unexpected_in(name, parent).into()),
        }
    }

    fn characters(&mut self, text: &str) -> Result<()> {
        if let Some(nested) = self.nested.as_mut() {
            return nested.parser.characters(text);
        }
        if self.stack.last() == Some(&Section::Ciphertext) {
            self.ciphertext.push_str(text);
        }
        Ok(())
    }

    fn end_element(&mut self, name: &QualifiedName) -> Result<()> {
        if let Some(mut nested) = self.nested.take() {
            nested.parser.end_element(name)?;
            nested.depth -= 1;
            if nested.depth == 0 {
                return self.close_nested(nested);
            }
            self.nested = Some(nested);
            return Ok(());
        }

        if self.leaf.take().is_none() {
            self.stack.pop();
        }
        Ok(())
    }

    fn end_document(self) -> Result<CryptanalysisScenario> {
        let (Some(context), Some(cipher)) = (self.context, self.cipher) else {
            return Err(no_root(KIND));
        };
        if self.nested.is_some() {
            return Err(DocumentError::Markup {
                position: 0,
                message: "embedded languageFrequencies was not closed".to_string(),
            });
        }
        if !self.stack.is_empty() {
            return Err(unbalanced(self.stack.len()));
        }

        let substitution_is_injective = is_injective(&self.substitution);
        cipher.check_alphabet_count(self.substitution.len())?;

        info!(
            "parsed {cipher} cryptanalysis for {}: {} ciphertext bytes, {} substitution alphabet(s), injective: {}",
            context.locale(),
            self.ciphertext.len(),
            self.substitution.len(),
            substitution_is_injective
        );

        Ok(CryptanalysisScenario {
            cipher,
            locale: context.locale().clone(),
            ciphertext: self.ciphertext,
            cipher_alphabet: self.cipher_alphabet,
            plain_alphabet: self.plain_alphabet,
            ignored: self.ignored,
            substitution: self.substitution,
            substitution_is_injective,
            language_frequencies: self.language_frequencies,
        })
    }
}
