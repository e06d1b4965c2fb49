//! Generic XML parsing and writing primitives used by higher-level tools.

pub mod parser;
pub mod tree;
pub mod writer;

pub use parser::{parse, parse_file, parse_str, ParseError};
pub use tree::XmlNode;
pub use writer::{write, write_file, WriteError};
