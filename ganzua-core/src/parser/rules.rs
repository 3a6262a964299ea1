//! Alphabet-rules parser

use super::{
    expect_namespace, locale_from, no_root, required, unbalanced, unexpected, unexpected_in,
    DocumentContext, Section,
};
use crate::config::ParseOptions;
use crate::error::{Result, ValidationError};
use crate::model::{AlphabetRuleSet, DocumentKind};
use crate::text::{CanonicalKey, LocaleServices, Strength};
use crate::xml::{drive, Attributes, DocumentHandler, QualifiedName, XmlEvent};
use log::{debug, info, trace};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

const KIND: DocumentKind = DocumentKind::AlphabetRules;

/// Builds an [`AlphabetRuleSet`] from an `alphabetRules` event stream
pub struct AlphabetRulesParser {
    services: Arc<dyn LocaleServices>,
    strength: Strength,
    context: Option<DocumentContext>,
    stack: Vec<Section>,
    leaf: Option<String>,
    source: Option<String>,
    source_encoding: Option<String>,
    include_exclusively: BTreeSet<CanonicalKey>,
    include: BTreeSet<CanonicalKey>,
    ignore: BTreeSet<CanonicalKey>,
    replace: BTreeMap<CanonicalKey, CanonicalKey>,
}

impl AlphabetRulesParser {
    /// Parser with the default locale services for `options`
    pub fn new(options: &ParseOptions) -> Self {
        Self::with_services(options, Arc::new(options.services()))
    }

    /// Parser with injected locale services
    pub fn with_services(options: &ParseOptions, services: Arc<dyn LocaleServices>) -> Self {
        Self {
            services,
            strength: options.rules_strength,
            context: None,
            stack: Vec::new(),
            leaf: None,
            source: None,
            source_encoding: None,
            include_exclusively: BTreeSet::new(),
            include: BTreeSet::new(),
            ignore: BTreeSet::new(),
            replace: BTreeMap::new(),
        }
    }

    /// Consume an event stream and return the validated rule set
    pub fn parse<I>(self, events: I) -> Result<AlphabetRuleSet>
    where
        I: IntoIterator<Item = Result<XmlEvent>>,
    {
        drive(self, events)
    }

    fn enter_root(&mut self, name: &QualifiedName, attributes: &Attributes) -> Result<()> {
        let locale = locale_from(attributes, name)?;
        debug!("alphabetRules root: locale {locale}, strength {:?}", self.strength);

        self.source = attributes.get("source").map(str::to_string);
        self.source_encoding = attributes.get("sourceEncoding").map(str::to_string);
        self.context = Some(DocumentContext::new(locale, self.services.as_ref(), self.strength));
        self.stack.push(Section::Root(KIND));
        Ok(())
    }

    fn add_character(
        &mut self,
        section: Section,
        attributes: &Attributes,
        name: &QualifiedName,
    ) -> Result<()> {
        let Some(context) = &self.context else {
            return Err(no_root(KIND));
        };
        let value = required(attributes, name, "char")?;
        let key = context.character(value, section)?;

        // a character plays at most one role in the rule set
        let taken = self.include_exclusively.contains(&key)
            || self.include.contains(&key)
            || self.ignore.contains(&key);
        if taken {
            return Err(ValidationError::DuplicateEntry {
                value: value.to_string(),
                section,
            }
            .into());
        }

        trace!("{section}: {value}");
        match section {
            Section::IncludeExclusively => self.include_exclusively.insert(key),
            Section::Include => self.include.insert(key),
            _ => self.ignore.insert(key),
        };
        Ok(())
    }

    fn add_replacement(&mut self, attributes: &Attributes, name: &QualifiedName) -> Result<()> {
        let Some(context) = &self.context else {
            return Err(no_root(KIND));
        };
        let of = required(attributes, name, "ofChar")?;
        let by = required(attributes, name, "byChar")?;
        let of_key = context.character(of, Section::Replace)?;
        let by_key = context.character(by, Section::Replace)?;

        if self.replace.contains_key(&of_key) {
            return Err(ValidationError::DuplicateEntry {
                value: of.to_string(),
                section: Section::Replace,
            }
            .into());
        }
        trace!("<replace>: {of} -> {by}");
        self.replace.insert(of_key, by_key);
        Ok(())
    }
}

impl DocumentHandler for AlphabetRulesParser {
    type Output = AlphabetRuleSet;

    fn start_element(&mut self, name: &QualifiedName, attributes: &Attributes) -> Result<()> {
        expect_namespace(name, KIND.namespace())?;
        if let Some(leaf) = &self.leaf {
            return Err(unexpected(name, Some(format!("<{leaf}>").as_str())).into());
        }

        let parent = self.stack.last().copied();
        match (parent, name.local.as_str()) {
            (None, "alphabetRules") if self.context.is_none() => self.enter_root(name, attributes),
            (Some(Section::Root(_)), "includeExclusively") => {
                self.stack.push(Section::IncludeExclusively);
                Ok(())
            }
            (Some(Section::Root(_)), "include") => {
                self.stack.push(Section::Include);
                Ok(())
            }
            (Some(Section::Root(_)), "ignore") => {
                self.stack.push(Section::Ignore);
                Ok(())
            }
            (Some(Section::Root(_)), "replace") => {
                self.stack.push(Section::Replace);
                Ok(())
            }
            (
                Some(section @ (Section::IncludeExclusively | Section::Include | Section::Ignore)),
                "character",
            ) => {
                self.add_character(section, attributes, name)?;
                self.leaf = Some(name.local.clone());
                Ok(())
            }
            (Some(Section::Replace), "occurrences") => {
                self.add_replacement(attributes, name)?;
                self.leaf = Some(name.local.clone());
                Ok(())
            }
            (parent, _) => Err(unexpected_in(name, parent).into()),
        }
    }

    fn end_element(&mut self, _name: &QualifiedName) -> Result<()> {
        if self.leaf.take().is_none() {
            self.stack.pop();
        }
        Ok(())
    }

    fn end_document(self) -> Result<AlphabetRuleSet> {
        let Some(context) = self.context else {
            return Err(no_root(KIND));
        };
        if !self.stack.is_empty() {
            return Err(unbalanced(self.stack.len()));
        }

        info!(
            "parsed alphabetRules for {}: {} exclusive, {} included, {} ignored, {} replacements",
            context.locale(),
            self.include_exclusively.len(),
            self.include.len(),
            self.ignore.len(),
            self.replace.len()
        );

        Ok(AlphabetRuleSet {
            locale: context.locale().clone(),
            source: self.source,
            source_encoding: self.source_encoding,
            include_exclusively: self.include_exclusively,
            include: self.include,
            ignore: self.ignore,
            replace: self.replace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;
    use crate::locale::Locale;
    use crate::text::{Canonicalizer, CharacterClassifier, ExactCanonicalizer, GraphemeClassifier};

    const NS: &str = crate::RULES_NAMESPACE;

    fn start(local: &str, attrs: &[(&str, &str)]) -> Result<XmlEvent> {
        Ok(XmlEvent::Start {
            name: QualifiedName::new(NS, local),
            attributes: attrs.iter().copied().collect(),
        })
    }

    fn end(local: &str) -> Result<XmlEvent> {
        Ok(XmlEvent::End {
            name: QualifiedName::new(NS, local),
        })
    }

    fn leaf(local: &str, attrs: &[(&str, &str)]) -> Vec<Result<XmlEvent>> {
        vec![start(local, attrs), end(local)]
    }

    fn document(body: Vec<Result<XmlEvent>>) -> Vec<Result<XmlEvent>> {
        let mut events = vec![start("alphabetRules", &[("language", "es"), ("source", "q.txt")])];
        events.extend(body);
        events.push(end("alphabetRules"));
        events
    }

    fn section(local: &str, children: Vec<Vec<Result<XmlEvent>>>) -> Vec<Result<XmlEvent>> {
        let mut events = vec![start(local, &[])];
        events.extend(children.into_iter().flatten());
        events.push(end(local));
        events
    }

    fn parse(events: Vec<Result<XmlEvent>>) -> Result<AlphabetRuleSet> {
        AlphabetRulesParser::new(&ParseOptions::default()).parse(events)
    }

    #[test]
    fn test_sections_are_routed() {
        let mut body = section("include", vec![leaf("character", &[("char", "ñ")])]);
        body.extend(section("ignore", vec![leaf("character", &[("char", ",")])]));
        body.extend(section(
            "replace",
            vec![leaf("occurrences", &[("ofChar", "á"), ("byChar", "a")])],
        ));

        let rules = parse(document(body)).unwrap();
        assert_eq!(rules.locale(), &Locale::new("es", None));
        assert_eq!(rules.source(), Some("q.txt"));
        assert_eq!(rules.include().len(), 1);
        assert_eq!(rules.ignore().len(), 1);
        assert!(rules.include_exclusively().is_empty());
        let (of, by) = rules.replace().iter().next().unwrap();
        assert_eq!((of.source(), by.source()), ("á", "a"));
    }

    #[test]
    fn test_duplicate_character_in_section() {
        let body = section(
            "include",
            vec![leaf("character", &[("char", "a")]), leaf("character", &[("char", "a")])],
        );
        let err = parse(document(body)).unwrap_err();
        assert_eq!(
            err.validation(),
            Some(&ValidationError::DuplicateEntry {
                value: "a".to_string(),
                section: Section::Include,
            })
        );
    }

    #[test]
    fn test_character_in_two_roles_is_duplicate() {
        let mut body = section("include", vec![leaf("character", &[("char", "x")])]);
        body.extend(section("ignore", vec![leaf("character", &[("char", "x")])]));
        let err = parse(document(body)).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::DuplicateEntry { section: Section::Ignore, .. })
        ));
    }

    #[test]
    fn test_identical_strength_keeps_diacritics_apart() {
        let body = section(
            "include",
            vec![leaf("character", &[("char", "e")]), leaf("character", &[("char", "é")])],
        );
        assert_eq!(parse(document(body)).unwrap().include().len(), 2);
    }

    #[test]
    fn test_multi_character_value_rejected() {
        let body = section("include", vec![leaf("character", &[("char", "ll")])]);
        let err = parse(document(body)).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::InvalidCharacter { section: Section::Include, .. })
        ));
    }

    #[test]
    fn test_replacement_source_replaced_once() {
        let body = section(
            "replace",
            vec![
                leaf("occurrences", &[("ofChar", "a"), ("byChar", "b")]),
                leaf("occurrences", &[("ofChar", "a"), ("byChar", "c")]),
            ],
        );
        let err = parse(document(body)).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::DuplicateEntry { section: Section::Replace, .. })
        ));
    }

    #[test]
    fn test_replacement_requires_both_attributes() {
        let body = section("replace", vec![leaf("occurrences", &[("ofChar", "a")])]);
        let err = parse(document(body)).unwrap_err();
        assert_eq!(
            err.validation(),
            Some(&ValidationError::MissingAttribute {
                element: "occurrences".to_string(),
                attribute: "byChar",
            })
        );
    }

    #[test]
    fn test_occurrences_outside_replace() {
        let body = section(
            "include",
            vec![leaf("occurrences", &[("ofChar", "a"), ("byChar", "b")])],
        );
        let err = parse(document(body)).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::UnexpectedElement { .. })
        ));
    }

    #[test]
    fn test_foreign_namespace() {
        let events = vec![Ok(XmlEvent::Start {
            name: QualifiedName::new(crate::FREQUENCIES_NAMESPACE, "alphabetRules"),
            attributes: [("language", "en")].into_iter().collect(),
        })];
        assert!(matches!(parse(events), Err(DocumentError::WrongNamespace { .. })));
    }

    #[test]
    fn test_empty_stream_has_no_root() {
        assert!(matches!(parse(Vec::new()), Err(DocumentError::Markup { .. })));
    }

    struct Exact;

    impl LocaleServices for Exact {
        fn classifier(&self, locale: &Locale) -> Box<dyn CharacterClassifier> {
            Box::new(GraphemeClassifier::for_locale(locale))
        }

        fn canonicalizer(&self, _locale: &Locale, _strength: Strength) -> Box<dyn Canonicalizer> {
            Box::new(ExactCanonicalizer)
        }
    }

    #[test]
    fn test_injected_services() {
        // precomposed and decomposed forms differ under exact comparison
        let body = section(
            "include",
            vec![
                leaf("character", &[("char", "é")]),
                leaf("character", &[("char", "e\u{301}")]),
            ],
        );
        let rules = AlphabetRulesParser::with_services(&ParseOptions::default(), Arc::new(Exact))
            .parse(document(body))
            .unwrap();
        assert_eq!(rules.include().len(), 2);

        let body = section(
            "include",
            vec![
                leaf("character", &[("char", "é")]),
                leaf("character", &[("char", "e\u{301}")]),
            ],
        );
        assert!(parse(document(body)).is_err());
    }
}
