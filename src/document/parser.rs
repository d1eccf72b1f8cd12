//! Markup front-end.
//!
//! Raw XML is tokenised by `quick-xml` and folded into an [`XmlNode`] tree.
//! Only elements, attributes and the character data preceding an element's
//! first child are kept; the prolog, comments, processing instructions and
//! text following a child element are dropped.
//!
//! # Example
//!
//! ```
//! use yaxi::document::parser::parse_xml;
//!
//! let root = parse_xml(r#"<Root><What name="3">inner</What></Root>"#).unwrap();
//! let what = root.find("What").unwrap();
//! assert_eq!(what.get("name"), Some("3"));
//! assert_eq!(what.text(), Some("inner"));
//! ```

use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use super::node::XmlNode;
use crate::error::{Result, YaxiError};

/// Options for turning markup into a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Strip leading/trailing whitespace from text and drop whitespace-only text.
    pub trim_text: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { trim_text: true }
    }
}

/// An element still waiting for its end tag.
struct OpenElement {
    node: XmlNode,
    seen_child: bool,
}

/// Parses markup with default options.
pub fn parse_xml(markup: &str) -> Result<XmlNode> {
    parse_xml_with(markup, &ParseOptions::default())
}

/// Parses markup into the tree rooted at its single document element.
///
/// # Errors
///
/// Returns [`YaxiError::Parse`] when the markup is malformed, has no root
/// element, or has more than one.
pub fn parse_xml_with(markup: &str, options: &ParseOptions) -> Result<XmlNode> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(options.trim_text);

    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<XmlNode> = None;
    let mut elements = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                elements += 1;
                mark_child(&mut stack);
                stack.push(OpenElement {
                    node: element_from(&start)?,
                    seen_child: false,
                });
            }
            Event::Empty(start) => {
                elements += 1;
                mark_child(&mut stack);
                close(element_from(&start)?, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let open = stack
                    .pop()
                    .ok_or_else(|| YaxiError::Parse("unexpected end tag".to_string()))?;
                close(open.node, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text);
            }
            Event::CData(cdata) => {
                let text = String::from_utf8_lossy(&cdata);
                push_text(&mut stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(YaxiError::Parse(format!(
            "unclosed element <{}> at end of document",
            open.node.tag()
        )));
    }
    let root = root.ok_or_else(|| YaxiError::Parse("document has no root element".to_string()))?;
    debug!(root = %root.tag(), elements, "parsed document");
    Ok(root)
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlNode> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut node = XmlNode::new(tag);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        node.attributes.insert(key, value);
    }
    Ok(node)
}

fn mark_child(stack: &mut [OpenElement]) {
    if let Some(parent) = stack.last_mut() {
        parent.seen_child = true;
    }
}

/// Appends text to the innermost open element unless it already has a child.
fn push_text(stack: &mut [OpenElement], text: &str) {
    let Some(open) = stack.last_mut() else {
        return;
    };
    if open.seen_child || text.is_empty() {
        return;
    }
    match open.node.text.as_mut() {
        Some(existing) => existing.push_str(text),
        None => open.node.text = Some(text.to_string()),
    }
}

/// Attaches a finished element to its parent, or makes it the document root.
fn close(node: XmlNode, stack: &mut [OpenElement], root: &mut Option<XmlNode>) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.node.append(node);
            Ok(())
        }
        None if root.is_some() => Err(YaxiError::Parse(format!(
            "second root element <{}>",
            node.tag()
        ))),
        None => {
            *root = Some(node);
            Ok(())
        }
    }
}

impl XmlNode {
    /// Builds a tree from raw markup using `options`.
    pub fn from_markup(markup: &str, options: &ParseOptions) -> Result<Self> {
        parse_xml_with(markup, options)
    }
}

impl FromStr for XmlNode {
    type Err = YaxiError;

    fn from_str(markup: &str) -> Result<Self> {
        parse_xml(markup)
    }
}
