//! Document tree: element nodes, the markup front-end and the portable form.

pub mod node;
pub mod parser;
pub mod portable;

pub use node::{SourceElement, XmlNode};
pub use parser::{parse_xml, parse_xml_with, ParseOptions};
pub use portable::Portable;
