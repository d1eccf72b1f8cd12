//! Declarative models: typed fields filled from stored queries.
//!
//! [`xml_model!`](crate::xml_model) declares a struct whose fields are each
//! bound to a [`StoredQuery`]. The macro builds a static [`FieldTable`] for
//! the type (once, on first use) and a constructor that resolves every field
//! against the node the model wraps.
//!
//! ```
//! use yaxi::model::Model;
//! use yaxi::query::{Filter, Query, StoredQuery};
//! use yaxi::xml_model;
//!
//! xml_model! {
//!     #[derive(Debug)]
//!     pub struct Event {
//!         pub ivorn: String = StoredQuery::new().attr("ivorn")?,
//!         pub far: f64 = StoredQuery::new()
//!             .step(Query::path(vec![
//!                 Query::tag("What"),
//!                 Filter::new("Param").attrs(["name"]).value("FAR").into(),
//!                 Query::at(0),
//!             ]))?
//!             .attr("value")?,
//!     }
//! }
//!
//! let event = Event::parse(
//!     r#"<Event ivorn="ivo://x"><What><Param name="FAR" value="0.5"/></What></Event>"#,
//! )
//! .unwrap();
//! assert_eq!(event.ivorn, "ivo://x");
//! assert_eq!(event.far, 0.5);
//! assert_eq!(event.tag(), "Event");
//! ```

use tracing::trace;

use crate::document::node::{SourceElement, XmlNode};
use crate::document::parser::{parse_xml_with, ParseOptions};
use crate::error::{Result, YaxiError};
use crate::query::{FromMatched, StoredQuery};

/// One declared field of a model type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: &'static str,
    output: &'static str,
    owner: &'static str,
    query: StoredQuery,
}

impl FieldSpec {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name of the value the field holds after resolution.
    pub fn output(&self) -> &'static str {
        self.output
    }

    /// Model type that declared the field.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn query(&self) -> &StoredQuery {
        &self.query
    }
}

/// Field name to stored query mapping for one model type.
///
/// Inherited entries come first, followed by the type's own entries.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTable {
    model: &'static str,
    fields: Vec<FieldSpec>,
}

impl FieldTable {
    pub fn new(model: &'static str) -> Self {
        Self {
            model,
            fields: Vec::new(),
        }
    }

    /// Copies every entry of a base model's table into this one.
    pub fn inherit(&mut self, base: &FieldTable) {
        self.fields.extend(base.fields.iter().cloned());
    }

    /// Records a field declared by this table's model.
    pub fn declare(&mut self, name: &'static str, output: &'static str, query: StoredQuery) {
        self.fields.push(FieldSpec {
            name,
            output,
            owner: self.model,
            query,
        });
    }

    pub fn model(&self) -> &'static str {
        self.model
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Most derived entry with this name.
    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().rev().find(|f| f.name == name)
    }

    /// Entry declared by this table's own model.
    pub fn own(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.owner == self.model && f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolves one of this model's own fields against `node`.
    pub fn resolve_field<T: FromMatched>(&self, name: &str, node: &XmlNode) -> Result<T> {
        let spec = self.own(name).ok_or_else(|| {
            YaxiError::not_found(format!("field '{}' on model {}", name, self.model))
        })?;
        trace!(model = self.model, field = name, query = %spec.query, "resolving field");
        spec.query.resolve_as::<T>(node)
    }
}

/// A type whose fields are populated from a tree at construction.
///
/// Implemented by [`xml_model!`](crate::xml_model).
pub trait Model: Sized {
    /// The type's field table, built on first call.
    fn field_table() -> Result<&'static FieldTable>;

    /// Wraps `node` and resolves every declared field against it.
    fn from_node(node: XmlNode) -> Result<Self>;

    /// The node the model was built from.
    fn node(&self) -> &XmlNode;

    fn parse(markup: &str) -> Result<Self> {
        Self::parse_with(markup, &ParseOptions::default())
    }

    fn parse_with(markup: &str, options: &ParseOptions) -> Result<Self> {
        Self::from_node(parse_xml_with(markup, options)?)
    }

    fn from_element<E: SourceElement + ?Sized>(element: &E) -> Result<Self> {
        Self::from_node(XmlNode::from_element(element))
    }
}

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}

/// Declares a model struct with fields bound to stored queries.
///
/// Each field is written `name: Type = <StoredQuery expression>`; the
/// expression may use `?` on builder calls. `Type` must implement
/// [`FromMatched`](crate::query::FromMatched). Writing
/// `struct Name extends Base { .. }` embeds a `Base` model, inherits its
/// field table and derefs to it; otherwise the struct derefs to its
/// [`XmlNode`](crate::XmlNode).
#[macro_export]
macro_rules! xml_model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident extends $base:ty {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty = $query:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            base: $base,
            $( $(#[$fmeta])* $fvis $field: $fty, )*
        }

        impl $crate::model::Model for $name {
            fn field_table() -> $crate::Result<&'static $crate::model::FieldTable> {
                static TABLE: $crate::model::__private::OnceCell<$crate::model::FieldTable> =
                    $crate::model::__private::OnceCell::new();
                TABLE.get_or_try_init(|| -> $crate::Result<$crate::model::FieldTable> {
                    let mut table = $crate::model::FieldTable::new(stringify!($name));
                    table.inherit(<$base as $crate::model::Model>::field_table()?);
                    $(
                        table.declare(stringify!($field), ::std::any::type_name::<$fty>(), $query);
                    )*
                    Ok(table)
                })
            }

            fn from_node(node: $crate::XmlNode) -> $crate::Result<Self> {
                #[allow(unused_variables)]
                let table = <Self as $crate::model::Model>::field_table()?;
                let base = <$base as $crate::model::Model>::from_node(node)?;
                $(
                    let $field = table.resolve_field::<$fty>(
                        stringify!($field),
                        $crate::model::Model::node(&base),
                    )?;
                )*
                Ok(Self { base, $($field),* })
            }

            fn node(&self) -> &$crate::XmlNode {
                $crate::model::Model::node(&self.base)
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $base;

            fn deref(&self) -> &Self::Target {
                &self.base
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $fty:ty = $query:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            source: $crate::XmlNode,
            $( $(#[$fmeta])* $fvis $field: $fty, )*
        }

        impl $crate::model::Model for $name {
            fn field_table() -> $crate::Result<&'static $crate::model::FieldTable> {
                static TABLE: $crate::model::__private::OnceCell<$crate::model::FieldTable> =
                    $crate::model::__private::OnceCell::new();
                TABLE.get_or_try_init(|| -> $crate::Result<$crate::model::FieldTable> {
                    #[allow(unused_mut)]
                    let mut table = $crate::model::FieldTable::new(stringify!($name));
                    $(
                        table.declare(stringify!($field), ::std::any::type_name::<$fty>(), $query);
                    )*
                    Ok(table)
                })
            }

            fn from_node(node: $crate::XmlNode) -> $crate::Result<Self> {
                #[allow(unused_variables)]
                let table = <Self as $crate::model::Model>::field_table()?;
                $(
                    let $field = table.resolve_field::<$fty>(stringify!($field), &node)?;
                )*
                Ok(Self { source: node, $($field),* })
            }

            fn node(&self) -> &$crate::XmlNode {
                &self.source
            }
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::XmlNode;

            fn deref(&self) -> &Self::Target {
                &self.source
            }
        }
    };
}
