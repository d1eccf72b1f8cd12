//! JSON-compatible nested-tuple form of a tree.
//!
//! A node becomes `[tag, text, {attributes}, [children...]]`, recursively:
//!
//! ```
//! use yaxi::document::node::XmlNode;
//!
//! let root: XmlNode = r#"<Root><Item id="a">x</Item></Root>"#.parse().unwrap();
//! let json = root.to_json().unwrap();
//! assert_eq!(json, r#"["Root",null,{},[["Item","x",{"id":"a"},[]]]]"#);
//! assert_eq!(XmlNode::from_json(&json).unwrap(), root);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::XmlNode;
use crate::error::{Result, YaxiError};

/// Portable representation: `(tag, text, attributes, children)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portable(
    pub String,
    pub Option<String>,
    pub IndexMap<String, String>,
    pub Vec<Portable>,
);

impl XmlNode {
    pub fn to_portable(&self) -> Portable {
        Portable(
            self.tag.clone(),
            self.text.clone(),
            self.attributes.clone(),
            self.children.iter().map(XmlNode::to_portable).collect(),
        )
    }

    /// Rebuilds a tree from its portable form.
    pub fn from_portable(portable: &Portable) -> Self {
        let Portable(tag, text, attributes, children) = portable;
        let mut node = XmlNode::with_attributes(tag.as_str(), attributes.clone());
        node.set_text(text.clone());
        for child in children {
            node.append(XmlNode::from_portable(child));
        }
        node
    }

    /// # Errors
    ///
    /// [`YaxiError::Serialize`] when serde_json cannot encode the tree.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.to_portable()).map_err(serialize_error)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_portable()).map_err(serialize_error)
    }

    /// The portable form as a JSON value; attributes keep document order.
    pub fn to_json_value(&self) -> Result<Value> {
        serde_json::to_value(self.to_portable()).map_err(serialize_error)
    }

    /// Parses the portable form from JSON text.
    ///
    /// # Errors
    ///
    /// [`YaxiError::InvalidInput`] when the JSON is not shaped like a node.
    pub fn from_json(json: &str) -> Result<Self> {
        let portable: Portable = serde_json::from_str(json)
            .map_err(|e| YaxiError::InvalidInput(format!("not a portable node: {}", e)))?;
        Ok(XmlNode::from_portable(&portable))
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        let portable: Portable = serde_json::from_value(value)
            .map_err(|e| YaxiError::InvalidInput(format!("not a portable node: {}", e)))?;
        Ok(XmlNode::from_portable(&portable))
    }
}

fn serialize_error(e: serde_json::Error) -> YaxiError {
    YaxiError::Serialize(e.to_string())
}
