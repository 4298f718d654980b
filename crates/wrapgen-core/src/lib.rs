//! Core metadata model for the wrapper generator.
//!
//! This crate defines the typed interface description extracted from native
//! headers: type expressions, doc comments, declaration metadata, and the
//! shared configuration object. It has no opinions about parsing or about
//! any particular binding target — those live in `wrapgen-parser` and the
//! backend crates.

pub mod config;
pub mod doc;
pub mod metadata;
pub mod name;
pub mod span;

pub use config::{Config, ConfigError};
pub use doc::DocComment;
pub use metadata::{
    BaseRef, ClassMetadata, EnumFieldMetadata, EnumMetadata, FieldMetadata, FileDecls,
    FunctionMetadata, FunctionSignature, InterfaceMetadata, MethodFlags, MethodMetadata,
    ParamModifier, Parameter, StructMetadata, TemplateInstantiation, TemplateMetadata, TypeExpr,
};
pub use span::Span;
