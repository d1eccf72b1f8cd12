//! Query descriptions understood by [`XmlNode::query`](crate::XmlNode::query).

use std::fmt;
use std::num::NonZeroIsize;

/// One query against a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// First child with this tag.
    Tag(String),
    /// Child at this position; negative positions count from the end.
    Position(isize),
    /// Every child with a tag, optionally filtered on attribute values and sliced.
    Filter(Filter),
    /// Steps applied left to right, each to the previous step's result.
    Path(Vec<Query>),
}

impl Query {
    pub fn tag(tag: impl Into<String>) -> Self {
        Query::Tag(tag.into())
    }

    pub fn at(position: isize) -> Self {
        Query::Position(position)
    }

    /// Every child with `tag`, unfiltered.
    pub fn all(tag: impl Into<String>) -> Self {
        Query::Filter(Filter::new(tag))
    }

    pub fn path<I, Q>(steps: I) -> Self
    where
        I: IntoIterator<Item = Q>,
        Q: Into<Query>,
    {
        Query::Path(steps.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Query {
    fn from(tag: &str) -> Self {
        Query::Tag(tag.to_string())
    }
}

impl From<String> for Query {
    fn from(tag: String) -> Self {
        Query::Tag(tag)
    }
}

impl From<isize> for Query {
    fn from(position: isize) -> Self {
        Query::Position(position)
    }
}

impl From<i32> for Query {
    fn from(position: i32) -> Self {
        Query::Position(position as isize)
    }
}

impl From<Filter> for Query {
    fn from(filter: Filter) -> Self {
        Query::Filter(filter)
    }
}

impl From<Vec<Query>> for Query {
    fn from(steps: Vec<Query>) -> Self {
        Query::Path(steps)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Tag(tag) => write!(f, "{}", tag),
            Query::Position(position) => write!(f, "{}", position),
            Query::Filter(filter) => write!(f, "{}", filter),
            Query::Path(steps) => {
                for (i, step) in steps.iter().enumerate() {
                    if i > 0 {
                        write!(f, "/")?;
                    }
                    write!(f, "{}", step)?;
                }
                Ok(())
            }
        }
    }
}

/// Composite filter: children with a tag whose named attributes take one of
/// the accepted values, sliced as `[:stop:step]`.
///
/// A child matches when *any* named attribute equals *any* accepted value.
/// With no attribute names, every child with the tag matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub tag: String,
    pub attributes: Vec<String>,
    pub values: Vec<String>,
    pub stop: Option<isize>,
    pub step: Option<NonZeroIsize>,
}

impl Filter {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            values: Vec::new(),
            stop: None,
            step: None,
        }
    }

    /// Attribute names to compare.
    pub fn attrs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Accepted attribute values.
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Single accepted attribute value.
    pub fn value(self, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.values([value])
    }

    pub fn stop(mut self, stop: isize) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Slice step. Zero leaves the step unset.
    pub fn step(mut self, step: isize) -> Self {
        self.step = NonZeroIsize::new(step);
        self
    }

    pub fn is_filtering(&self) -> bool {
        !self.attributes.is_empty()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.tag)?;
        if self.is_filtering() {
            write!(f, "{}={}", self.attributes.join(","), self.values.join(","))?;
        } else {
            write!(f, "*")?;
        }
        write!(f, "]")?;
        if self.stop.is_some() || self.step.is_some() {
            write!(f, "[:")?;
            if let Some(stop) = self.stop {
                write!(f, "{}", stop)?;
            }
            if let Some(step) = self.step {
                write!(f, ":{}", step)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Query::from("What"), Query::Tag("What".to_string()));
        assert_eq!(Query::from(-1), Query::Position(-1));
        assert_eq!(
            Query::path(["What", "Param"]),
            Query::Path(vec![Query::tag("What"), Query::tag("Param")])
        );
    }

    #[test]
    fn test_zero_step_is_unset() {
        assert_eq!(Filter::new("Item").step(0).step, None);
        assert_eq!(Filter::new("Item").step(-2).step, NonZeroIsize::new(-2));
    }

    #[test]
    fn test_display() {
        let filter = Filter::new("Param").attrs(["name", "id"]).values(["FAR"]);
        assert_eq!(filter.to_string(), "Param[name,id=FAR]");
        assert_eq!(Filter::new("Item").stop(2).to_string(), "Item[*][:2]");
        assert_eq!(Filter::new("Item").step(-1).to_string(), "Item[*][::-1]");
        let path = Query::path(vec![Query::tag("What"), Query::all("Param"), Query::at(0)]);
        assert_eq!(path.to_string(), "What/Param[*]/0");
    }
}
