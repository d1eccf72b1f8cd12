//! First-success query chains.
//!
//! Documents change shape without notice. An [`Attempt`] tries several
//! queries against one root, keeps the first that matches and never fails:
//! a query that finds nothing is recorded and skipped, and when every query
//! misses, [`Attempt::value`] hands back the root itself.
//!
//! ```
//! use yaxi::document::node::XmlNode;
//! use yaxi::query::{Filter, Matched, Query};
//!
//! let root: XmlNode = r#"<Root><New><Item id="b"/></New></Root>"#.parse().unwrap();
//! let found = root
//!     .attempt()
//!     .query(Query::path(["Old", "Item"]))
//!     .query(Query::path(["New", "Item"]))
//!     .value();
//! assert_eq!(found.as_node().and_then(|n| n.get("id")), Some("b"));
//!
//! // Nothing matched: the root comes back.
//! let fallback = root.attempt().query("Missing").value();
//! assert_eq!(fallback, Matched::Node(&root));
//! ```

use tracing::{debug, trace, warn};

use super::ast::Query;
use super::matched::Matched;
use crate::document::node::XmlNode;
use crate::error::YaxiError;

/// Where an attempt chain stands.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptState<'a> {
    /// No query has run yet.
    Empty,
    /// The last query found nothing; later queries still run.
    Failed(YaxiError),
    /// A query matched. Terminal: later queries are skipped.
    Resolved(Matched<'a>),
}

/// A single-use chain of queries against a fixed root.
#[derive(Debug)]
pub struct Attempt<'a> {
    root: &'a XmlNode,
    state: AttemptState<'a>,
}

impl<'a> Attempt<'a> {
    pub fn new(root: &'a XmlNode) -> Self {
        Self {
            root,
            state: AttemptState::Empty,
        }
    }

    /// Runs `query` against the root unless an earlier query already matched.
    ///
    /// A query that matches nothing moves the chain to `Failed` and the
    /// NotFound is kept for [`Attempt::last_error`]; no error escapes.
    /// Evaluation fails with nothing but NotFound.
    pub fn query(mut self, query: impl Into<Query>) -> Self {
        if self.is_resolved() {
            return self;
        }
        let query = query.into();
        match self.root.query(&query) {
            Ok(matched) => {
                trace!(query = %query, matched = %matched.describe(), "attempt resolved");
                self.state = AttemptState::Resolved(matched);
            }
            Err(err) => {
                debug_assert!(err.is_not_found(), "query evaluation failed with {}", err);
                if !err.is_not_found() {
                    warn!(query = %query, error = %err, "unexpected query failure");
                }
                trace!(query = %query, error = %err, "attempt missed");
                self.state = AttemptState::Failed(err);
            }
        }
        self
    }

    /// Replaces a matched node with its text content.
    ///
    /// Does nothing before a match or when the match is not a single node.
    pub fn text(mut self) -> Self {
        if let AttemptState::Resolved(Matched::Node(node)) = self.state {
            self.state = AttemptState::Resolved(Matched::Text(node.text()));
        } else if let AttemptState::Resolved(ref other) = self.state {
            debug!(matched = %other.describe(), "text requested on a non-node match; ignored");
        }
        self
    }

    /// Returns the first match, or the root when nothing matched.
    pub fn value(self) -> Matched<'a> {
        match self.state {
            AttemptState::Resolved(matched) => matched,
            AttemptState::Failed(err) => {
                debug!(error = %err, root = %self.root.tag(), "no query matched; falling back to root");
                Matched::Node(self.root)
            }
            AttemptState::Empty => Matched::Node(self.root),
        }
    }

    pub fn root(&self) -> &'a XmlNode {
        self.root
    }

    pub fn state(&self) -> &AttemptState<'a> {
        &self.state
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.state, AttemptState::Resolved(_))
    }

    /// The failure recorded by the most recent query that found nothing.
    pub fn last_error(&self) -> Option<&YaxiError> {
        match &self.state {
            AttemptState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Filter;

    fn make_test_tree() -> XmlNode {
        let mut root = XmlNode::new("Root");
        let mut what = XmlNode::with_attributes("What", [("name", "3")]);
        what.set_text(Some("inner".to_string()));
        root.append(what);
        root.append(XmlNode::with_attributes("Item", [("id", "a")]));
        root
    }

    #[test]
    fn test_first_success_wins() {
        let tree = make_test_tree();
        let value = tree.attempt().query("What").query("Item").value();
        assert_eq!(value.as_node().map(XmlNode::tag), Some("What"));
    }

    #[test]
    fn test_failure_then_success() {
        let tree = make_test_tree();
        let attempt = tree.attempt().query("Missing");
        assert!(attempt.last_error().is_some_and(YaxiError::is_not_found));
        let value = attempt.query("Item").value();
        assert_eq!(value.as_node().and_then(|n| n.get("id")), Some("a"));
    }

    #[test]
    fn test_every_kind_of_miss_is_not_found() {
        let tree = make_test_tree();
        let misses = vec![
            Query::tag("Missing"),
            Query::at(9),
            Query::at(-9),
            Query::path(vec![Query::all("Item"), Query::tag("What")]),
            Query::path(vec![Query::all("Item"), Query::at(3)]),
            Query::path(vec![Query::tag("What"), Query::tag("Deeper")]),
        ];
        for query in misses {
            let attempt = tree.attempt().query(query.clone());
            assert!(
                matches!(attempt.state(), AttemptState::Failed(YaxiError::NotFound { .. })),
                "{} left {:?}",
                query,
                attempt.state()
            );
        }
    }

    #[test]
    fn test_total_failure_falls_back_to_root() {
        let tree = make_test_tree();
        let value = tree.attempt().query("Missing").query(7).value();
        assert_eq!(value, Matched::Node(&tree));
    }

    #[test]
    fn test_no_queries_returns_root() {
        let tree = make_test_tree();
        assert_eq!(tree.attempt().value(), Matched::Node(&tree));
    }

    #[test]
    fn test_resolved_is_terminal() {
        let tree = make_test_tree();
        let attempt = tree.attempt().query("Item");
        let before = attempt.state().clone();
        let attempt = attempt.query("What").query("Missing");
        assert_eq!(attempt.state(), &before);
    }

    #[test]
    fn test_empty_filter_counts_as_success() {
        let tree = make_test_tree();
        let value = tree
            .attempt()
            .query(Filter::new("Item").attrs(["id"]).value("zzz"))
            .query("What")
            .value();
        assert_eq!(value, Matched::Nodes(vec![]));
    }

    #[test]
    fn test_text_after_match() {
        let tree = make_test_tree();
        let value = tree.attempt().query("What").text().value();
        assert_eq!(value, Matched::Text(Some("inner")));
    }

    #[test]
    fn test_text_before_match_is_noop() {
        let tree = make_test_tree();
        let attempt = tree.attempt().text();
        assert_eq!(attempt.state(), &AttemptState::Empty);
        assert_eq!(attempt.query("Item").text().value(), Matched::Text(None));
    }
}
