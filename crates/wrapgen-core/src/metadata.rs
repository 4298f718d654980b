//! Declaration metadata model.
//!
//! The parser produces these values, the registries aggregate them, and each
//! backend clones whatever it needs before rewriting. Everything here is an
//! owned value type: backend isolation is a `clone()`, not a discipline.

use bitflags::bitflags;

use crate::doc::DocComment;
use crate::name;

/// A parsed type expression.
///
/// Exactly one of the following shapes holds: a plain named type, a pointer
/// or reference to a named type, a template instantiation, or a function
/// signature (callback) type. Template arguments and signature parameters
/// recursively satisfy the same invariant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeExpr {
    /// Base type name; multi-word builtins keep their spelling (`unsigned char`).
    pub name: String,
    /// `::`-joined namespace qualification, if written.
    pub namespace: Option<String>,
    pub is_const: bool,
    pub is_pointer: bool,
    pub is_reference: bool,
    pub is_template: bool,
    /// Ordered template arguments; empty unless `is_template`.
    pub template_arguments: Vec<TypeExpr>,
    /// Present when the base name resolves to a callback alias.
    pub function_signature: Option<Box<FunctionSignature>>,
}

impl TypeExpr {
    /// A plain named type with no qualification.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_pointer_or_reference(&self) -> bool {
        self.is_pointer || self.is_reference
    }

    #[inline]
    pub fn is_function_signature(&self) -> bool {
        self.function_signature.is_some()
    }

    /// Fully-qualified name as written (`ns::Name` or bare `Name`).
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.is_empty() => format!("{}::{}", ns, self.name),
            _ => self.name.clone(),
        }
    }
}

/// The signature carried by a callback type: return type, parameters, and
/// the doc block attached to the alias declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    /// `None` for `void`.
    pub return_type: Option<TypeExpr>,
    pub parameters: Vec<Parameter>,
    pub doc_comments: Option<Vec<DocComment>>,
}

/// Directionality of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamModifier {
    #[default]
    In,
    Out,
    InOut,
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeExpr,
    pub modifier: ParamModifier,
    /// True for the final parameter of the visible list. Reassigned by
    /// backends after callback extraction shortens the list.
    pub is_last: bool,
    pub doc_comments: Option<Vec<DocComment>>,
}

bitflags! {
    /// Modifier and annotation flags on a method.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MethodFlags: u8 {
        const STATIC = 1;
        const CONST = 1 << 1;
        const ASYNC_RESULT = 1 << 2;
        const ASYNC_RESULT_WITH_PROGRESS = 1 << 3;
        const EVENT = 1 << 4;
    }
}

/// A free function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionMetadata {
    pub header_file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub namespace: String,
    pub name: String,
    /// `None` for `void`.
    pub return_type: Option<TypeExpr>,
    pub parameters: Vec<Parameter>,
    pub doc_comments: Option<Vec<DocComment>>,
}

impl FunctionMetadata {
    #[inline]
    pub fn has_return(&self) -> bool {
        self.return_type.is_some()
    }

    #[inline]
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    pub fn full_name(&self) -> String {
        name::full_name(&self.namespace, &[], &self.name)
    }
}

/// A method: a function owned by exactly one class or interface.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodMetadata {
    pub function: FunctionMetadata,
    pub flags: MethodFlags,
    /// Simple name of the owning class or interface.
    pub parent_type: String,
    /// Stable native entry-point name, disambiguated across overloads
    /// (`Class_Method`, `Class_Method_2`, ...).
    pub unique_name: String,
}

impl MethodMetadata {
    #[inline]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    #[inline]
    pub fn is_const(&self) -> bool {
        self.flags.contains(MethodFlags::CONST)
    }

    #[inline]
    pub fn is_async_result(&self) -> bool {
        self.flags.contains(MethodFlags::ASYNC_RESULT)
    }

    #[inline]
    pub fn is_async_result_with_progress(&self) -> bool {
        self.flags.contains(MethodFlags::ASYNC_RESULT_WITH_PROGRESS)
    }

    /// Async in either form: the target surface exposes this as a task.
    #[inline]
    pub fn is_task(&self) -> bool {
        self.is_async_result() || self.is_async_result_with_progress()
    }

    #[inline]
    pub fn is_event(&self) -> bool {
        self.flags.contains(MethodFlags::EVENT)
    }
}

/// One enumerator of an enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumFieldMetadata {
    pub name: String,
    /// Literal value text exactly as written (`-1`, `0x10`), never evaluated.
    pub value: Option<String>,
    pub doc_comments: Option<Vec<DocComment>>,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMetadata {
    pub header_file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub namespace: String,
    /// Enclosing type names for nested declarations, innermost last.
    pub enclosing_types: Vec<String>,
    pub name: String,
    /// Underlying integer base type name, if declared.
    pub base: Option<String>,
    pub fields: Vec<EnumFieldMetadata>,
    pub is_flags: bool,
    pub doc_comments: Option<Vec<DocComment>>,
}

impl EnumMetadata {
    #[inline]
    pub fn is_nested_type(&self) -> bool {
        !self.enclosing_types.is_empty()
    }

    pub fn full_name(&self) -> String {
        name::full_name(&self.namespace, &self.enclosing_types, &self.name)
    }

    pub fn full_safe_type_name(&self) -> String {
        name::full_safe_type_name(&self.namespace, &self.name)
    }
}

/// A lazily-resolved base type reference: stored as names, looked up in the
/// class registry only when an inheritance query asks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRef {
    pub namespace: String,
    pub name: String,
}

impl BaseRef {
    pub fn full_name(&self) -> String {
        name::full_name(&self.namespace, &[], &self.name)
    }
}

/// A data member of a class or struct.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetadata {
    pub name: String,
    pub ty: TypeExpr,
    pub doc_comments: Option<Vec<DocComment>>,
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    pub header_file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub namespace: String,
    pub enclosing_types: Vec<String>,
    pub name: String,
    pub base: Option<BaseRef>,
    pub fields: Vec<FieldMetadata>,
    pub methods: Vec<MethodMetadata>,
    pub doc_comments: Option<Vec<DocComment>>,
}

impl ClassMetadata {
    #[inline]
    pub fn is_nested_type(&self) -> bool {
        !self.enclosing_types.is_empty()
    }

    pub fn full_name(&self) -> String {
        name::full_name(&self.namespace, &self.enclosing_types, &self.name)
    }

    pub fn full_safe_type_name(&self) -> String {
        name::full_safe_type_name(&self.namespace, &self.name)
    }
}

/// A struct declaration. Same shape as a class; kept distinct because
/// backends render the two through different templates.
#[derive(Debug, Clone, PartialEq)]
pub struct StructMetadata {
    pub header_file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub namespace: String,
    pub enclosing_types: Vec<String>,
    pub name: String,
    pub base: Option<BaseRef>,
    pub fields: Vec<FieldMetadata>,
    pub methods: Vec<MethodMetadata>,
    pub doc_comments: Option<Vec<DocComment>>,
}

impl StructMetadata {
    #[inline]
    pub fn is_nested_type(&self) -> bool {
        !self.enclosing_types.is_empty()
    }

    pub fn full_name(&self) -> String {
        name::full_name(&self.namespace, &self.enclosing_types, &self.name)
    }
}

/// An interface declaration: methods only, no state.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceMetadata {
    pub header_file: String,
    pub start_line: u32,
    pub end_line: u32,
    pub namespace: String,
    pub enclosing_types: Vec<String>,
    pub name: String,
    pub methods: Vec<MethodMetadata>,
    pub doc_comments: Option<Vec<DocComment>>,
}

impl InterfaceMetadata {
    #[inline]
    pub fn is_nested_type(&self) -> bool {
        !self.enclosing_types.is_empty()
    }

    pub fn full_name(&self) -> String {
        name::full_name(&self.namespace, &self.enclosing_types, &self.name)
    }
}

/// An explicit template instantiation record (`template class Name<Arg>;`).
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateInstantiation {
    pub arguments: Vec<TypeExpr>,
    pub header_file: String,
    pub line: u32,
}

/// A class template: the class-shaped definition, its parameter names, and
/// any explicit instantiations seen across the header set.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateMetadata {
    pub definition: ClassMetadata,
    /// Template parameter names in declaration order.
    pub parameters: Vec<String>,
    pub instantiations: Vec<TemplateInstantiation>,
}

impl TemplateMetadata {
    pub fn full_name(&self) -> String {
        self.definition.full_name()
    }
}

/// Everything the parser extracted from one header file.
#[derive(Debug, Clone, Default)]
pub struct FileDecls {
    pub enums: Vec<EnumMetadata>,
    pub structs: Vec<StructMetadata>,
    pub classes: Vec<ClassMetadata>,
    pub interfaces: Vec<InterfaceMetadata>,
    pub functions: Vec<FunctionMetadata>,
    pub templates: Vec<TemplateMetadata>,
    /// Instantiations recorded against the template's fully-qualified name;
    /// attached to their definitions when the registries merge.
    pub instantiations: Vec<(String, TemplateInstantiation)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_full_name() {
        let mut ty = TypeExpr::named("String");
        assert_eq!(ty.full_name(), "String");

        ty.namespace = Some("acme::common".to_string());
        assert_eq!(ty.full_name(), "acme::common::String");
    }

    #[test]
    fn method_flag_queries() {
        let flags = MethodFlags::STATIC | MethodFlags::ASYNC_RESULT;
        assert!(flags.contains(MethodFlags::STATIC));
        assert!(!flags.contains(MethodFlags::EVENT));
    }

    #[test]
    fn nested_enum_full_name() {
        let e = EnumMetadata {
            header_file: "test.h".to_string(),
            start_line: 1,
            end_line: 1,
            namespace: "acme".to_string(),
            enclosing_types: vec!["Widget".to_string()],
            name: "Mode".to_string(),
            base: None,
            fields: Vec::new(),
            is_flags: false,
            doc_comments: None,
        };
        assert!(e.is_nested_type());
        assert_eq!(e.full_name(), "acme::Widget::Mode");
    }
}
