//! Reusable query chains with a final attribute/text selection and a cast.
//!
//! A [`StoredQuery`] is built once and resolved against many nodes. Each
//! builder call returns a new value. Resolution runs the steps as an
//! [`Attempt`](super::Attempt) (so a step that finds nothing is skipped and a
//! chain that finds nothing falls back to the node itself), then applies the
//! selection. A missing attribute at that point is *not* swallowed.
//!
//! ```
//! use yaxi::document::node::XmlNode;
//! use yaxi::query::StoredQuery;
//!
//! let name = StoredQuery::new().step("What").unwrap().attr("name").unwrap();
//! let node: XmlNode = r#"<Root><What name="3"/></Root>"#.parse().unwrap();
//! assert_eq!(name.resolve_as::<i64>(&node).unwrap(), 3);
//!
//! let bare: XmlNode = "<Root/>".parse().unwrap();
//! assert!(name.resolve_as::<i64>(&bare).unwrap_err().is_not_found());
//! ```

use std::fmt;

use tracing::trace;

use super::ast::Query;
use super::matched::Matched;
use crate::document::node::XmlNode;
use crate::error::{Result, YaxiError};

/// What a stored query takes from the node its steps resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// The match itself.
    #[default]
    Node,
    /// One attribute of the matched node.
    Attribute(String),
    /// The matched node's text content.
    Text,
}

/// An immutable chain of query steps plus a final selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredQuery {
    steps: Vec<Query>,
    selection: Selection,
}

impl StoredQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with one more candidate query.
    ///
    /// Fails with Misuse once an attribute or the text has been selected.
    pub fn step(&self, query: impl Into<Query>) -> Result<Self> {
        match &self.selection {
            Selection::Node => {
                let mut next = self.clone();
                next.steps.push(query.into());
                Ok(next)
            }
            Selection::Attribute(name) => Err(YaxiError::misuse(format!(
                "cannot add a query step after selecting attribute '{}'",
                name
            ))),
            Selection::Text => Err(YaxiError::misuse(
                "cannot add a query step after selecting text",
            )),
        }
    }

    /// Returns a copy that selects attribute `name` of the resolved node.
    pub fn attr(&self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        match &self.selection {
            Selection::Node => Ok(Self {
                steps: self.steps.clone(),
                selection: Selection::Attribute(name),
            }),
            Selection::Attribute(existing) => Err(YaxiError::misuse(format!(
                "attribute '{}' already selected, cannot select '{}'",
                existing, name
            ))),
            Selection::Text => Err(YaxiError::misuse(format!(
                "cannot select attribute '{}' after selecting text",
                name
            ))),
        }
    }

    /// Returns a copy that selects the text of the resolved node.
    pub fn text(&self) -> Result<Self> {
        match &self.selection {
            Selection::Node => Ok(Self {
                steps: self.steps.clone(),
                selection: Selection::Text,
            }),
            Selection::Attribute(name) => Err(YaxiError::misuse(format!(
                "cannot select text after selecting attribute '{}'",
                name
            ))),
            Selection::Text => Err(YaxiError::misuse("text already selected")),
        }
    }

    pub fn steps(&self) -> &[Query] {
        &self.steps
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Runs the steps against `node` and applies the selection.
    pub fn resolve<'a>(&self, node: &'a XmlNode) -> Result<Matched<'a>> {
        let matched = self
            .steps
            .iter()
            .fold(node.attempt(), |attempt, step| attempt.query(step.clone()))
            .value();

        let selected = match &self.selection {
            Selection::Node => matched,
            Selection::Attribute(name) => {
                let target = single_node(&matched, || format!("attribute '{}'", name))?;
                Matched::Text(Some(target.attr(name)?))
            }
            Selection::Text => {
                let target = single_node(&matched, || "text".to_string())?;
                Matched::Text(target.text())
            }
        };
        trace!(query = %self, resolved = %selected.describe(), "stored query resolved");
        Ok(selected)
    }

    /// Resolves against `node` and converts the result to `T`.
    pub fn resolve_as<T: FromMatched>(&self, node: &XmlNode) -> Result<T> {
        T::from_matched(self.resolve(node)?)
    }
}

fn single_node<'a>(matched: &Matched<'a>, wanted: impl FnOnce() -> String) -> Result<&'a XmlNode> {
    matched.as_node().ok_or_else(|| {
        YaxiError::not_found(format!("{} of {}", wanted(), matched.describe()))
    })
}

impl fmt::Display for StoredQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "{}", step)?;
        }
        match &self.selection {
            Selection::Node => Ok(()),
            Selection::Attribute(name) => write!(f, " @{}", name),
            Selection::Text => write!(f, " #text"),
        }
    }
}

/// Conversion from a resolved match into a model field type.
pub trait FromMatched: Sized {
    fn from_matched(matched: Matched<'_>) -> Result<Self>;
}

fn cast_error(matched: &Matched<'_>, target: &'static str) -> YaxiError {
    YaxiError::Cast {
        value: matched.describe(),
        target,
    }
}

impl FromMatched for String {
    fn from_matched(matched: Matched<'_>) -> Result<Self> {
        match matched {
            Matched::Text(Some(text)) => Ok(text.to_string()),
            other => Err(cast_error(&other, "String")),
        }
    }
}

impl FromMatched for Option<String> {
    fn from_matched(matched: Matched<'_>) -> Result<Self> {
        match matched {
            Matched::Text(text) => Ok(text.map(str::to_string)),
            other => Err(cast_error(&other, "Option<String>")),
        }
    }
}

impl FromMatched for XmlNode {
    fn from_matched(matched: Matched<'_>) -> Result<Self> {
        match matched {
            Matched::Node(node) => Ok(node.clone()),
            other => Err(cast_error(&other, "XmlNode")),
        }
    }
}

impl FromMatched for Option<XmlNode> {
    fn from_matched(matched: Matched<'_>) -> Result<Self> {
        match matched {
            Matched::Node(node) => Ok(Some(node.clone())),
            Matched::Nodes(nodes) => Ok(nodes.first().map(|n| (*n).clone())),
            other => Err(cast_error(&other, "Option<XmlNode>")),
        }
    }
}

impl FromMatched for Vec<XmlNode> {
    fn from_matched(matched: Matched<'_>) -> Result<Self> {
        match matched {
            Matched::Nodes(nodes) => Ok(nodes.into_iter().cloned().collect()),
            Matched::Node(node) => Ok(vec![node.clone()]),
            other => Err(cast_error(&other, "Vec<XmlNode>")),
        }
    }
}

macro_rules! from_matched_via_parse {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromMatched for $ty {
                fn from_matched(matched: Matched<'_>) -> Result<Self> {
                    matched
                        .as_text()
                        .and_then(|text| text.trim().parse::<$ty>().ok())
                        .ok_or_else(|| cast_error(&matched, stringify!($ty)))
                }
            }

            impl FromMatched for Option<$ty> {
                fn from_matched(matched: Matched<'_>) -> Result<Self> {
                    match matched {
                        Matched::Text(None) => Ok(None),
                        other => <$ty>::from_matched(other).map(Some),
                    }
                }
            }
        )*
    };
}

from_matched_via_parse!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64, bool);
