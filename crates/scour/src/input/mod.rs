//! Loading delimited files into typed tables.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{is_missing_token, SourceMetadata};
