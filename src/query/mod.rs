//! Query engine over [`XmlNode`](crate::XmlNode) trees.
//!
//! # Query shapes
//!
//! - [`Query::Tag`] - first child with a tag, NotFound otherwise
//! - [`Query::Position`] - child at a position (negative from the end), NotFound otherwise
//! - [`Query::Filter`] - every child with a tag whose named attributes take an
//!   accepted value, optionally sliced; never fails
//! - [`Query::Path`] - steps applied left to right
//!
//! On top of single queries sit [`Attempt`] (first success of several
//! queries, falling back to the root) and [`StoredQuery`] (a reusable chain
//! with attribute/text selection and typed conversion).
//!
//! # Examples
//!
//! ```
//! use yaxi::query::parse_query;
//! use yaxi::XmlNode;
//!
//! let root: XmlNode = r#"<Root><Item id="a" val="1"/><Item id="b" val="2"/></Root>"#
//!     .parse()
//!     .unwrap();
//!
//! let b = root.query(&parse_query("Item[id=b]").unwrap()).unwrap();
//! assert_eq!(b.as_nodes().map(|n| n.len()), Some(1));
//!
//! let first = root.query(&parse_query("Item[*]/0").unwrap()).unwrap();
//! assert_eq!(first.as_node().unwrap().attr("val").unwrap(), "1");
//! ```

pub mod ast;
pub mod attempt;
pub mod evaluator;
pub mod matched;
pub mod parser;
pub mod stored;

pub use ast::{Filter, Query};
pub use attempt::{Attempt, AttemptState};
pub use evaluator::Evaluator;
pub use matched::Matched;
pub use parser::{parse_query, Parser};
pub use stored::{FromMatched, Selection, StoredQuery};
