//! Language-frequencies parser

use super::{
    expect_namespace, locale_from, no_root, parse_frequency, required, unbalanced, unexpected,
    unexpected_in, DocumentContext, Section,
};
use crate::config::ParseOptions;
use crate::error::{Result, ValidationError};
use crate::model::{
    coincidence_index, DocumentKind, FrequencySet, LanguageFrequencyProfile,
    UNDEFINED_COINCIDENCE_INDEX,
};
use crate::text::{LocaleServices, Strength};
use crate::xml::{drive, Attributes, DocumentHandler, QualifiedName, XmlEvent};
use log::{debug, info, trace};
use std::sync::Arc;

const KIND: DocumentKind = DocumentKind::LanguageFrequencies;

const STANDALONE: &[&str] = &[crate::FREQUENCIES_NAMESPACE];
const EMBEDDED: &[&str] = &[crate::CRYPTANALYSIS_NAMESPACE, crate::FREQUENCIES_NAMESPACE];

/// Builds a [`LanguageFrequencyProfile`] from a `languageFrequencies` event
/// stream
pub struct LanguageFrequencyParser {
    services: Arc<dyn LocaleServices>,
    strength: Strength,
    namespaces: &'static [&'static str],
    context: Option<DocumentContext>,
    stack: Vec<Section>,
    leaf: Option<String>,
    source: Option<String>,
    rules: Option<String>,
    alphabet: FrequencySet,
    bigrams: FrequencySet,
    trigrams: FrequencySet,
    coincidence_index: f64,
}

impl LanguageFrequencyParser {
    /// Parser with the default locale services for `options`
    pub fn new(options: &ParseOptions) -> Self {
        Self::with_services(options, Arc::new(options.services()))
    }

    /// Parser with injected locale services
    pub fn with_services(options: &ParseOptions, services: Arc<dyn LocaleServices>) -> Self {
        Self::build(services, options.default_strength, STANDALONE)
    }

    /// Parser for a profile nested in a cryptanalysis document, whose
    /// elements may use either namespace
    pub(crate) fn embedded(services: Arc<dyn LocaleServices>, strength: Strength) -> Self {
        Self::build(services, strength, EMBEDDED)
    }

    fn build(
        services: Arc<dyn LocaleServices>,
        strength: Strength,
        namespaces: &'static [&'static str],
    ) -> Self {
        Self {
            services,
            strength,
            namespaces,
            context: None,
            stack: Vec::new(),
            leaf: None,
            source: None,
            rules: None,
            alphabet: FrequencySet::new(),
            bigrams: FrequencySet::new(),
            trigrams: FrequencySet::new(),
            coincidence_index: UNDEFINED_COINCIDENCE_INDEX,
        }
    }

    /// Consume an event stream and return the validated profile
    pub fn parse<I>(self, events: I) -> Result<LanguageFrequencyProfile>
    where
        I: IntoIterator<Item = Result<XmlEvent>>,
    {
        drive(self, events)
    }

    fn check_namespace(&self, name: &QualifiedName) -> Result<()> {
        if self.namespaces.iter().any(|ns| name.is_in(ns)) {
            return Ok(());
        }
        expect_namespace(name, self.namespaces[0])
    }

    fn enter_root(&mut self, name: &QualifiedName, attributes: &Attributes) -> Result<()> {
        let locale = locale_from(attributes, name)?;
        debug!("languageFrequencies root: locale {locale}");

        self.source = attributes.get("source").map(str::to_string);
        self.rules = attributes.get("rules").map(str::to_string);
        self.context = Some(DocumentContext::new(locale, self.services.as_ref(), self.strength));
        self.stack.push(Section::Root(KIND));
        Ok(())
    }

    fn add_entry(
        &mut self,
        section: Section,
        attributes: &Attributes,
        name: &QualifiedName,
    ) -> Result<()> {
        let Some(context) = &self.context else {
            return Err(no_root(KIND));
        };

        let frequency = parse_frequency(required(attributes, name, "frequency")?, section)?;
        let (value, key, set) = match section {
            Section::Alphabet => {
                let value = required(attributes, name, "char")?;
                (value, context.character(value, section)?, &mut self.alphabet)
            }
            Section::Bigrams => {
                let value = required(attributes, name, "sequence")?;
                (value, context.bigram(value)?, &mut self.bigrams)
            }
            _ => {
                let value = required(attributes, name, "sequence")?;
                (value, context.trigram(value)?, &mut self.trigrams)
            }
        };

        if !set.insert(key, frequency) {
            return Err(ValidationError::DuplicateEntry {
                value: value.to_string(),
                section,
            }
            .into());
        }
        trace!("{section}: {value} = {frequency}");
        Ok(())
    }
}

impl DocumentHandler for LanguageFrequencyParser {
    type Output = LanguageFrequencyProfile;

    fn start_element(&mut self, name: &QualifiedName, attributes: &Attributes) -> Result<()> {
        self.check_namespace(name)?;
        if let Some(leaf) = &self.leaf {
            return Err(unexpected(name, Some(format!("<{leaf}>").as_str())).into());
        }

        let parent = self.stack.last().copied();
        let section = match (parent, name.local.as_str()) {
            (None, "languageFrequencies") if self.context.is_none() => {
                return self.enter_root(name, attributes);
            }
            (Some(Section::Root(_)), "alphabet") => Section::Alphabet,
            (Some(Section::Root(_)), "bigrams") => Section::Bigrams,
            (Some(Section::Root(_)), "trigrams") => Section::Trigrams,
            (Some(section @ Section::Alphabet), "character")
            | (Some(section @ Section::Bigrams), "bigram")
            | (Some(section @ Section::Trigrams), "trigram") => {
                self.add_entry(section, attributes, name)?;
                self.leaf = Some(name.local.clone());
                return Ok(());
            }
            (parent, _) => return Err(unexpected_in(name, parent).into()),
        };

        self.stack.push(section);
        Ok(())
    }

    fn end_element(&mut self, _name: &QualifiedName) -> Result<()> {
        if self.leaf.take().is_some() {
            return Ok(());
        }
        if self.stack.pop() == Some(Section::Alphabet) {
            self.coincidence_index = coincidence_index(&self.alphabet);
            debug!(
                "alphabet closed with {} characters, coincidence index {}",
                self.alphabet.len(),
                self.coincidence_index
            );
        }
        Ok(())
    }

    fn end_document(self) -> Result<LanguageFrequencyProfile> {
        let Some(context) = self.context else {
            return Err(no_root(KIND));
        };
        if !self.stack.is_empty() {
            return Err(unbalanced(self.stack.len()));
        }

        info!(
            "parsed languageFrequencies for {}: {} characters, {} bigrams, {} trigrams",
            context.locale(),
            self.alphabet.len(),
            self.bigrams.len(),
            self.trigrams.len()
        );

        Ok(LanguageFrequencyProfile {
            locale: context.locale().clone(),
            source: self.source,
            rules: self.rules,
            alphabet: self.alphabet,
            bigrams: self.bigrams,
            trigrams: self.trigrams,
            coincidence_index: self.coincidence_index,
        })
    }
}
