//! Results produced by running a query.

use crate::document::node::XmlNode;

/// What a query matched, borrowed from the tree it ran against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matched<'a> {
    /// A single node (tag or positional lookup, or the fallback root).
    Node(&'a XmlNode),
    /// A possibly empty sequence of nodes (filter results).
    Nodes(Vec<&'a XmlNode>),
    /// Text content or an attribute value.
    Text(Option<&'a str>),
}

impl<'a> Matched<'a> {
    pub fn as_node(&self) -> Option<&'a XmlNode> {
        match self {
            Matched::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_nodes(&self) -> Option<&[&'a XmlNode]> {
        match self {
            Matched::Nodes(nodes) => Some(nodes),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Matched::Text(text) => *text,
            _ => None,
        }
    }

    /// Short description used in error messages and logs.
    pub fn describe(&self) -> String {
        match self {
            Matched::Node(node) => format!("<{}>", node.tag()),
            Matched::Nodes(nodes) => format!("{} node(s)", nodes.len()),
            Matched::Text(Some(text)) => format!("'{}'", text),
            Matched::Text(None) => "no text".to_string(),
        }
    }
}
