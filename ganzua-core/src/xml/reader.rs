//! Event stream over `quick_xml`
//!
//! The reader turns tokenizer output into [`XmlEvent`]s with resolved
//! namespaces. Anything the tokenizer would merely tolerate (unclosed
//! elements at end of input, a second root, stray text outside the root) is
//! escalated to a [`DocumentError::Markup`] error.

use super::event::{Attributes, QualifiedName, XmlEvent};
use crate::error::{DocumentError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::fmt::Display;
use std::io::BufRead;

fn markup(position: u64, message: impl Display) -> DocumentError {
    DocumentError::Markup {
        position,
        message: message.to_string(),
    }
}

fn utf8(bytes: &[u8], position: u64) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| markup(position, e))
}

fn namespace_of(resolved: ResolveResult<'_>, position: u64) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(ns) => utf8(ns.0, position).map(Some),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(markup(
            position,
            format!(
                "unknown namespace prefix \"{}\"",
                String::from_utf8_lossy(&prefix)
            ),
        )),
    }
}

fn collect_attributes(start: &BytesStart<'_>, position: u64) -> Result<Attributes> {
    let mut attributes = Attributes::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| markup(position, e))?;
        // xmlns declarations and prefixed attributes such as xsi:schemaLocation
        if attr.key.as_namespace_binding().is_some() || attr.key.prefix().is_some() {
            continue;
        }
        let name = utf8(attr.key.local_name().as_ref(), position)?;
        let value = attr.unescape_value().map_err(|e| markup(position, e))?;
        attributes.push(name, value.into_owned());
    }
    Ok(attributes)
}

/// Pull-style event iterator over a markup byte stream
pub struct EventReader<R> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    pending_end: Option<QualifiedName>,
    depth: usize,
    seen_root: bool,
    finished: bool,
}

impl<R: BufRead> EventReader<R> {
    /// Wrap a buffered byte source
    pub fn new(source: R) -> Self {
        let mut reader = NsReader::from_reader(source);
        reader.config_mut().check_end_names = true;

        Self {
            reader,
            buf: Vec::new(),
            pending_end: None,
            depth: 0,
            seen_root: false,
            finished: false,
        }
    }

    fn read_next(&mut self) -> Result<Option<XmlEvent>> {
        loop {
            self.buf.clear();
            let position = self.reader.buffer_position() as u64;
            let (resolved, event) = self
                .reader
                .read_resolved_event_into(&mut self.buf)
                .map_err(|e| markup(position, e))?;
            let namespace = namespace_of(resolved, position)?;

            match event {
                Event::Start(start) | Event::Empty(start) if self.seen_root && self.depth == 0 => {
                    let local = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
                    return Err(markup(
                        position,
                        format!("element <{local}> after the root element"),
                    ));
                }
                Event::Start(start) => {
                    let name = QualifiedName {
                        namespace,
                        local: utf8(start.local_name().as_ref(), position)?,
                    };
                    let attributes = collect_attributes(&start, position)?;
                    self.depth += 1;
                    self.seen_root = true;
                    return Ok(Some(XmlEvent::Start { name, attributes }));
                }
                Event::Empty(start) => {
                    let name = QualifiedName {
                        namespace,
                        local: utf8(start.local_name().as_ref(), position)?,
                    };
                    let attributes = collect_attributes(&start, position)?;
                    self.seen_root = true;
                    self.pending_end = Some(name.clone());
                    return Ok(Some(XmlEvent::Start { name, attributes }));
                }
                Event::End(end) => {
                    let name = QualifiedName {
                        namespace,
                        local: utf8(end.local_name().as_ref(), position)?,
                    };
                    self.depth = self.depth.saturating_sub(1);
                    return Ok(Some(XmlEvent::End { name }));
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| markup(position, e))?;
                    if self.depth == 0 {
                        if text.trim().is_empty() {
                            continue;
                        }
                        return Err(markup(position, "text outside the root element"));
                    }
                    return Ok(Some(XmlEvent::Text(text.into_owned())));
                }
                Event::CData(data) => {
                    let text = utf8(&data.into_inner(), position)?;
                    if self.depth == 0 {
                        return Err(markup(position, "CDATA outside the root element"));
                    }
                    return Ok(Some(XmlEvent::Text(text)));
                }
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(markup(
                            position,
                            format!("unexpected end of input with {} open element(s)", self.depth),
                        ));
                    }
                    if !self.seen_root {
                        return Err(markup(position, "document has no root element"));
                    }
                    return Ok(None);
                }
                // declarations, comments, processing instructions, doctype
                _ => continue,
            }
        }
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<XmlEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(name) = self.pending_end.take() {
            return Some(Ok(XmlEvent::End { name }));
        }
        if self.finished {
            return None;
        }

        match self.read_next() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
