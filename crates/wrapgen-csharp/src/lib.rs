//! C# binding backend.
//!
//! Consumes the frozen interface model, applies type/namespace/doc-comment
//! translation and callback extraction, and renders one source file per
//! entity through the Tera template set. Other targets follow the same
//! contract with their own tables and templates.

mod backend;
mod docs;
mod error;
mod render;
mod rewrite;
mod translate;
mod view;

pub use backend::CSharpBackend;
pub use error::GenerateError;
