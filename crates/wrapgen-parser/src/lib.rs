//! Header parsing for the wrapper generator.
//!
//! This crate provides:
//! - The lexical word reader (position tracking, doc-comment capture)
//! - The recursive-descent declaration parser
//! - Positioned parse error types
//!
//! # Example
//!
//! ```
//! use wrapgen_parser::Parser;
//!
//! let source = r#"
//!     namespace acme {
//!     /// @brief A mode switch.
//!     enum class Mode { On, Off };
//!     }
//! "#;
//!
//! let decls = Parser::new().parse_header("Mode.h", source).unwrap();
//! assert_eq!(decls.enums[0].full_name(), "acme::Mode");
//! ```

mod error;
mod parser;
mod reader;

pub use error::ParseError;
pub use parser::Parser;
pub use reader::{Word, WordKind, WordReader};
