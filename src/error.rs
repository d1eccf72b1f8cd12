//! Error types shared by the tree, query and model layers.

use thiserror::Error;

/// Errors raised by node lookups, query evaluation and stored-query building.
///
/// Query evaluation only ever fails with [`YaxiError::NotFound`], which an
/// attempt chain records and moves past. The other variants come from
/// building stored queries, converting values, reading input and writing
/// output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YaxiError {
    /// A tag, position or attribute lookup matched nothing.
    #[error("Not found: {query}")]
    NotFound { query: String },
    /// Stored query builder operations were combined illegally.
    #[error("Misuse: {0}")]
    Misuse(String),
    /// Construction input does not have the shape of a tree node.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A resolved value could not be converted to the requested type.
    #[error("Cannot cast {value} to {target}")]
    Cast { value: String, target: &'static str },
    /// A tree could not be written out in the portable JSON form.
    #[error("Serialization error: {0}")]
    Serialize(String),
    /// The markup front-end rejected the document.
    #[error("Parse error: {0}")]
    Parse(String),
    /// A textual query could not be parsed.
    #[error("Query syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },
}

pub type Result<T> = std::result::Result<T, YaxiError>;

impl YaxiError {
    pub fn not_found(query: impl Into<String>) -> Self {
        YaxiError::NotFound {
            query: query.into(),
        }
    }

    pub fn misuse(message: impl Into<String>) -> Self {
        YaxiError::Misuse(message.into())
    }

    /// Returns true for the condition an attempt chain is allowed to swallow.
    pub fn is_not_found(&self) -> bool {
        matches!(self, YaxiError::NotFound { .. })
    }
}

impl From<quick_xml::Error> for YaxiError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for YaxiError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_recoverable() {
        assert!(YaxiError::not_found("What").is_not_found());
        assert!(!YaxiError::misuse("text then step").is_not_found());
        assert!(!YaxiError::Parse("bad".to_string()).is_not_found());
    }

    #[test]
    fn test_display() {
        assert_eq!(YaxiError::not_found("What").to_string(), "Not found: What");
        let err = YaxiError::Cast {
            value: "abc".to_string(),
            target: "i64",
        };
        assert_eq!(err.to_string(), "Cannot cast abc to i64");
        assert_eq!(
            YaxiError::Serialize("boom".to_string()).to_string(),
            "Serialization error: boom"
        );
        let err = YaxiError::Syntax {
            position: 4,
            message: "expected ']'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Query syntax error at position 4: expected ']'"
        );
    }
}
