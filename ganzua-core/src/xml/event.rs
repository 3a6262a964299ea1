//! Markup events and the handler capability the parsers implement

use crate::error::Result;
use std::fmt;

/// Namespace-resolved element name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Namespace URI the element is bound to, if any
    pub namespace: Option<String>,
    /// Local part of the name
    pub local: String,
}

impl QualifiedName {
    /// Name bound to `namespace`
    pub fn new(namespace: &str, local: &str) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            local: local.to_string(),
        }
    }

    /// Name without a namespace
    pub fn unbound(local: &str) -> Self {
        Self {
            namespace: None,
            local: local.to_string(),
        }
    }

    /// Whether the name is bound to `namespace`
    pub fn is_in(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Unprefixed attributes of an element, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the attribute named `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Append an attribute
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attributes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One event of a markup stream
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    /// An element opens
    Start {
        /// Element name
        name: QualifiedName,
        /// Element attributes
        attributes: Attributes,
    },
    /// Character data, already unescaped
    Text(String),
    /// An element closes
    End {
        /// Element name
        name: QualifiedName,
    },
}

/// Callbacks a document parser needs from a markup stream
pub trait DocumentHandler {
    /// Model produced once the document is complete
    type Output;

    /// An element opened
    fn start_element(&mut self, name: &QualifiedName, attributes: &Attributes) -> Result<()>;

    /// Character data inside the current element
    fn characters(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }

    /// An element closed
    fn end_element(&mut self, name: &QualifiedName) -> Result<()>;

    /// The stream ended; produce the model
    fn end_document(self) -> Result<Self::Output>;
}

/// Feed `events` to `handler`, stopping at the first error
pub fn drive<H, I>(mut handler: H, events: I) -> Result<H::Output>
where
    H: DocumentHandler,
    I: IntoIterator<Item = Result<XmlEvent>>,
{
    for event in events {
        match event? {
            XmlEvent::Start { name, attributes } => handler.start_element(&name, &attributes)?,
            XmlEvent::Text(text) => handler.characters(&text)?,
            XmlEvent::End { name } => handler.end_element(&name)?,
        }
    }
    handler.end_document()
}
