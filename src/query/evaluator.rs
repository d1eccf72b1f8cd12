use std::num::NonZeroIsize;

use super::ast::{Filter, Query};
use super::matched::Matched;
use crate::document::node::{normalize_index, XmlNode};
use crate::error::{Result, YaxiError};

/// Runs [`Query`] values against a fixed node.
pub struct Evaluator<'a> {
    root: &'a XmlNode,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a XmlNode) -> Self {
        Evaluator { root }
    }

    pub fn evaluate(&self, query: &Query) -> Result<Matched<'a>> {
        self.evaluate_on(self.root, query)
    }

    fn evaluate_on(&self, node: &'a XmlNode, query: &Query) -> Result<Matched<'a>> {
        match query {
            Query::Tag(tag) => node
                .find(tag)
                .map(Matched::Node)
                .ok_or_else(|| YaxiError::not_found(format!("no <{}> under <{}>", tag, node.tag()))),
            Query::Position(position) => node.child(*position).map(Matched::Node).ok_or_else(|| {
                YaxiError::not_found(format!(
                    "no child {} under <{}> ({} children)",
                    position,
                    node.tag(),
                    node.children().len()
                ))
            }),
            Query::Filter(filter) => Ok(Matched::Nodes(self.filter(node, filter))),
            Query::Path(steps) => {
                let mut current = Matched::Node(node);
                for step in steps {
                    current = self.apply_step(current, step)?;
                }
                Ok(current)
            }
        }
    }

    /// Applies one path step to the running result.
    fn apply_step(&self, current: Matched<'a>, step: &Query) -> Result<Matched<'a>> {
        match current {
            Matched::Node(node) => self.evaluate_on(node, step),
            Matched::Nodes(nodes) => match step {
                Query::Position(position) => normalize_index(*position, nodes.len())
                    .map(|i| Matched::Node(nodes[i]))
                    .ok_or_else(|| {
                        YaxiError::not_found(format!(
                            "no item {} in a sequence of {}",
                            position,
                            nodes.len()
                        ))
                    }),
                other => Err(YaxiError::not_found(format!(
                    "'{}' cannot be applied to a sequence of {} node(s)",
                    other,
                    nodes.len()
                ))),
            },
            Matched::Text(_) => Err(YaxiError::not_found(format!(
                "'{}' cannot be applied to text",
                step
            ))),
        }
    }

    fn filter(&self, node: &'a XmlNode, filter: &Filter) -> Vec<&'a XmlNode> {
        let candidates = node.find_all(&filter.tag);
        let matched: Vec<&'a XmlNode> = if filter.is_filtering() {
            candidates
                .into_iter()
                .filter(|child| matches_filter(child, filter))
                .collect()
        } else {
            candidates
        };
        slice(&matched, filter.stop, filter.step)
    }
}

/// Evaluates `query` against `node`.
pub fn evaluate<'a>(node: &'a XmlNode, query: &Query) -> Result<Matched<'a>> {
    Evaluator::new(node).evaluate(query)
}

/// True when any named attribute of `node` equals any accepted value.
///
/// A missing attribute is simply unequal.
fn matches_filter(node: &XmlNode, filter: &Filter) -> bool {
    filter.attributes.iter().any(|name| {
        node.get(name)
            .map(|value| filter.values.iter().any(|accepted| accepted == value))
            .unwrap_or(false)
    })
}

/// Sequence slice `items[:stop:step]` with negative stop and step support.
pub(crate) fn slice<T: Copy>(items: &[T], stop: Option<isize>, step: Option<NonZeroIsize>) -> Vec<T> {
    let len = items.len() as isize;
    let step = step.map(NonZeroIsize::get).unwrap_or(1);

    if step > 0 {
        let end = match stop {
            Some(s) if s < 0 => (len + s).max(0),
            Some(s) => s.min(len),
            None => len,
        };
        (0..end)
            .step_by(step as usize)
            .map(|i| items[i as usize])
            .collect()
    } else {
        // Walking backwards from the last item; `end` is exclusive.
        let end = match stop {
            Some(s) if s < 0 => (len + s).max(-1),
            Some(s) => s.min(len - 1),
            None => -1,
        };
        let mut out = Vec::new();
        let mut i = len - 1;
        while i > end {
            out.push(items[i as usize]);
            i += step;
        }
        out
    }
}
