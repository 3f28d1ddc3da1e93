// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup reader used by [`Surface`](crate::surface::Surface).
//!
//! Builds a [`Fragment`] from `quick_xml` events. End tags are matched here
//! rather than by the reader so HTML void elements (`<br>`, `<img>`) may stay
//! unclosed. Input is parsed in full before anything is inserted, so a
//! malformed string never leaves a half-built subtree behind.
//!
//! Text is kept as written, whitespace included.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::MarkupError;

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "meta", "link", "wbr"];

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct ParsedElement {
    pub(crate) tag: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) text: String,
    pub(crate) children: Vec<usize>,
}

impl ParsedElement {
    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parsed elements in document order plus the indices of top-level elements.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Fragment {
    pub(crate) nodes: Vec<ParsedElement>,
    pub(crate) roots: Vec<usize>,
}

impl Fragment {
    fn push(&mut self, element: ParsedElement, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(element);
        match parent {
            Some(parent) => self.nodes[parent].children.push(idx),
            None => self.roots.push(idx),
        }
        idx
    }

    fn push_text(&mut self, open: Option<usize>, text: &str) {
        if let Some(open) = open {
            self.nodes[open].text.push_str(text);
        }
    }
}

pub(crate) fn parse(src: &str) -> Result<Fragment, MarkupError> {
    let mut reader = Reader::from_str(src);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;

    let mut frag = Fragment::default();
    let mut stack: Vec<usize> = Vec::new();
    loop {
        let offset = reader.buffer_position();
        let event = reader.read_event().map_err(|err| MarkupError::Syntax {
            offset: reader.error_position(),
            reason: err.to_string(),
        })?;
        match event {
            Event::Start(e) => {
                let element = element(&reader, &e, offset)?;
                let void = VOID_TAGS.contains(&element.tag.as_str());
                let idx = frag.push(element, stack.last().copied());
                if !void {
                    stack.push(idx);
                }
            }
            Event::Empty(e) => {
                let element = element(&reader, &e, offset)?;
                frag.push(element, stack.last().copied());
            }
            Event::End(e) => {
                let name = tag_name(&reader, e.name().as_ref(), offset)?;
                if VOID_TAGS.contains(&name.as_str()) {
                    continue;
                }
                let Some(open) = stack.pop() else {
                    return Err(MarkupError::UnexpectedClose { tag: name });
                };
                if frag.nodes[open].tag != name {
                    return Err(MarkupError::MismatchedClose {
                        expected: frag.nodes[open].tag.clone(),
                        found: name,
                    });
                }
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|err| syntax(offset, &err))?;
                frag.push_text(stack.last().copied(), &text);
            }
            Event::CData(e) => {
                let text = reader.decoder().decode(&e).map_err(|err| syntax(offset, &err))?;
                frag.push_text(stack.last().copied(), &text);
            }
            Event::GeneralRef(e) => {
                let name = e.decode().map_err(|err| syntax(offset, &err))?;
                let entity = format!("&{name};");
                let resolved = unescape(&entity).map_err(|err| syntax(offset, &err))?;
                frag.push_text(stack.last().copied(), &resolved);
            }
            Event::Eof => break,
            // Comments, declarations, doctypes, processing instructions.
            _ => {}
        }
    }
    if let Some(&open) = stack.last() {
        return Err(MarkupError::Unclosed {
            tag: frag.nodes[open].tag.clone(),
        });
    }
    Ok(frag)
}

fn element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    offset: u64,
) -> Result<ParsedElement, MarkupError> {
    let tag = tag_name(reader, start.name().as_ref(), offset)?;
    let mut attrs = Vec::new();
    for attr in start.html_attributes() {
        let attr = attr.map_err(|_| MarkupError::MalformedAttribute { offset })?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|err| syntax(offset, &err))?;
        let raw = reader
            .decoder()
            .decode(&attr.value)
            .map_err(|err| syntax(offset, &err))?;
        let value: Cow<'_, str> = unescape(&raw).map_err(|err| syntax(offset, &err))?;
        attrs.push((key.to_ascii_lowercase(), value.into_owned()));
    }
    Ok(ParsedElement {
        tag,
        attrs,
        text: String::new(),
        children: Vec::new(),
    })
}

fn tag_name(reader: &Reader<&[u8]>, raw: &[u8], offset: u64) -> Result<String, MarkupError> {
    let name = reader.decoder().decode(raw).map_err(|err| syntax(offset, &err))?;
    Ok(name.to_ascii_lowercase())
}

fn syntax(offset: u64, err: &impl ToString) -> MarkupError {
    MarkupError::Syntax {
        offset,
        reason: err.to_string(),
    }
}
