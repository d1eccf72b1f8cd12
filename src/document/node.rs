//! XML element representation used by the query engine.
//!
//! An [`XmlNode`] is a deep copy of one element of an already-parsed document:
//! its tag, its attributes (in document order), the text that precedes its
//! first child, and its child elements. Nodes are built once, either from
//! markup (see [`crate::document::parser`]), from any other parsed tree that
//! implements [`SourceElement`], or from the portable nested-tuple form.
//!
//! # Example
//!
//! ```
//! use yaxi::document::node::XmlNode;
//!
//! let mut root = XmlNode::new("Root");
//! root.append(XmlNode::with_attributes("Item", [("id", "a"), ("val", "1")]));
//! root.append(XmlNode::with_attributes("Item", [("id", "b"), ("val", "2")]));
//!
//! assert_eq!(root.find("Item").and_then(|n| n.get("id")), Some("a"));
//! assert_eq!(root.find_all("Item").len(), 2);
//! assert!(root.attr("missing").is_err());
//! ```

use indexmap::IndexMap;

use crate::error::{Result, YaxiError};
use crate::query::{evaluator, Attempt, Matched, Query};

/// A parsed element exposing the shape [`XmlNode`] is built from.
///
/// Implement this for the element type of an external parser to build a tree
/// without going through markup again.
pub trait SourceElement {
    /// Element tag name.
    fn tag(&self) -> &str;
    /// Attribute name/value pairs in document order.
    fn attributes(&self) -> Vec<(&str, &str)>;
    /// Character data before the first child element, if any.
    fn text(&self) -> Option<&str>;
    /// Child elements in document order.
    fn children(&self) -> Vec<&Self>;
}

/// One element of an XML document together with its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    pub(crate) tag: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) text: Option<String>,
    pub(crate) children: Vec<XmlNode>,
}

impl XmlNode {
    /// Creates an element with no attributes, text or children.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Creates an element with the given attributes.
    ///
    /// A repeated attribute name keeps its first position and its last value.
    pub fn with_attributes<K, V, I>(tag: impl Into<String>, attributes: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..Self::new(tag)
        }
    }

    /// Deep-copies an externally parsed element and all of its descendants.
    pub fn from_element<E: SourceElement + ?Sized>(element: &E) -> Self {
        let mut node = Self::with_attributes(element.tag(), element.attributes());
        node.text = element.text().map(str::to_string);
        node.children = element
            .children()
            .into_iter()
            .map(|child| Self::from_element(child))
            .collect();
        node
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Sets the text content. Only used while a tree is being built.
    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    /// Appends a child element. Only used while a tree is being built.
    pub fn append(&mut self, child: XmlNode) {
        self.children.push(child);
    }

    /// Returns an attribute value, or `None` when the attribute is absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns an attribute value, failing with NotFound when it is absent.
    ///
    /// This is the "call the node with an attribute name" operation.
    pub fn attr(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| YaxiError::not_found(format!("attribute '{}' on <{}>", name, self.tag)))
    }

    /// Returns the first child with the given tag.
    pub fn find(&self, tag: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// Returns every child with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&XmlNode> {
        self.children.iter().filter(|child| child.tag == tag).collect()
    }

    /// Returns the child at `index`; negative indices count from the end.
    pub fn child(&self, index: isize) -> Option<&XmlNode> {
        normalize_index(index, self.children.len()).map(|i| &self.children[i])
    }

    /// Runs a query against this node.
    ///
    /// Plain tag and positional lookups fail with NotFound when nothing
    /// matches; filters never fail and may return an empty sequence.
    ///
    /// ```
    /// use yaxi::document::node::XmlNode;
    /// use yaxi::query::{Filter, Matched, Query};
    ///
    /// let root: XmlNode = r#"<Root><Item id="a"/><Item id="b"/></Root>"#.parse().unwrap();
    /// let found = root.query(&Filter::new("Item").attrs(["id"]).values(["b"]).into()).unwrap();
    /// assert!(matches!(found, Matched::Nodes(ref nodes) if nodes.len() == 1));
    /// assert!(root.query(&Query::tag("Missing")).is_err());
    /// ```
    pub fn query(&self, query: &Query) -> Result<Matched<'_>> {
        evaluator::evaluate(self, query)
    }

    /// Starts an attempt chain rooted at this node.
    pub fn attempt(&self) -> Attempt<'_> {
        Attempt::new(self)
    }
}

impl SourceElement for XmlNode {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn children(&self) -> Vec<&Self> {
        self.children.iter().collect()
    }
}

/// Maps a possibly negative index onto `0..len`.
pub(crate) fn normalize_index(index: isize, len: usize) -> Option<usize> {
    let len = len as isize;
    let normalized = if index < 0 { len + index } else { index };
    if normalized >= 0 && normalized < len {
        Some(normalized as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_tree() -> XmlNode {
        let mut root = XmlNode::new("Root");
        root.append(XmlNode::with_attributes("Item", [("id", "a"), ("val", "1")]));
        root.append(XmlNode::new("Other"));
        root.append(XmlNode::with_attributes("Item", [("id", "b"), ("val", "2")]));
        root
    }

    #[test]
    fn test_find_returns_first_match() {
        let root = make_test_tree();
        assert_eq!(root.find("Item").and_then(|n| n.get("id")), Some("a"));
        assert!(root.find("Missing").is_none());
    }

    #[test]
    fn test_find_all_preserves_order() {
        let root = make_test_tree();
        let ids: Vec<_> = root
            .find_all("Item")
            .into_iter()
            .filter_map(|n| n.get("id"))
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(root.find_all("Missing").is_empty());
    }

    #[test]
    fn test_child_positions() {
        let root = make_test_tree();
        assert_eq!(root.child(1).map(XmlNode::tag), Some("Other"));
        assert_eq!(root.child(-1).and_then(|n| n.get("id")), Some("b"));
        assert!(root.child(3).is_none());
        assert!(root.child(-4).is_none());
    }

    #[test]
    fn test_attr_missing_is_not_found() {
        let root = make_test_tree();
        let item = root.find("Item").unwrap();
        assert_eq!(item.attr("val").unwrap(), "1");
        let err = item.attr("nope").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_with_attributes_keeps_order() {
        let node = XmlNode::with_attributes("P", [("z", "1"), ("a", "2")]);
        let keys: Vec<_> = node.attributes().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_from_element_deep_copies() {
        let mut source = make_test_tree();
        source.set_text(Some("hello".to_string()));
        let copy = XmlNode::from_element(&source);
        assert_eq!(copy, source);

        source.append(XmlNode::new("Late"));
        assert_ne!(copy, source);
        assert_eq!(copy.children().len(), 3);
    }

    #[test]
    fn test_normalize_index() {
        assert_eq!(normalize_index(0, 3), Some(0));
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(3, 3), None);
        assert_eq!(normalize_index(-1, 0), None);
    }
}
