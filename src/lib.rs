//! Yet Another Xml Interface: terse queries over parsed XML trees.
//!
//! - [`XmlNode`] wraps a parsed element and answers tag, positional and
//!   attribute-filter queries ([`query::Query`]).
//! - [`query::Attempt`] tries several queries and keeps the first match,
//!   falling back to the starting node.
//! - [`query::StoredQuery`] stores a query chain with a final attribute or
//!   text selection, and [`xml_model!`] binds stored queries to typed fields.
//!
//! ```
//! use yaxi::query::{Filter, Matched, Query};
//! use yaxi::XmlNode;
//!
//! let root: XmlNode = r#"<Root><Item id="a" val="1"/><Item id="b" val="2"/></Root>"#
//!     .parse()
//!     .unwrap();
//!
//! let b = root.query(&Filter::new("Item").attrs(["id"]).value("b").into()).unwrap();
//! assert_eq!(b.as_nodes().unwrap()[0].get("val"), Some("2"));
//!
//! let first = root.query(&Query::path(vec![Query::all("Item"), Query::at(0)])).unwrap();
//! assert_eq!(first.as_node().unwrap().attr("val").unwrap(), "1");
//!
//! let fallback = root.attempt().query("Missing").value();
//! assert_eq!(fallback, Matched::Node(&root));
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod file;
pub mod model;
pub mod query;

pub use document::node::{SourceElement, XmlNode};
pub use error::{Result, YaxiError};
pub use model::Model;
