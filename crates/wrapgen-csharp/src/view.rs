//! Rendering views.
//!
//! Serializable snapshots assembled per entity just before rendering. All
//! computed state (translated names, delegates, events, result shapes)
//! lives here; the canonical parsed metadata is never patched.

use serde::Serialize;

use wrapgen_core::metadata::{
    EnumFieldMetadata, EnumMetadata, FieldMetadata, FunctionMetadata, MethodMetadata,
    ParamModifier, Parameter, TypeExpr,
};
use wrapgen_core::name;

use crate::docs;
use crate::translate::{Translator, translate_enum_base, translate_type_name};

/// A translated type, ready to print.
#[derive(Debug, Clone, Serialize)]
pub struct TypeView {
    pub name: String,
    /// Translated namespace, `.`-joined; absent for builtins and for types
    /// whose translation discards the qualification.
    pub namespace: Option<String>,
    /// The full C# spelling (`Acme.Systems.Thing`, `Common.List<int>`).
    pub display: String,
    pub is_pointer: bool,
    pub is_reference: bool,
    pub is_pointer_or_reference: bool,
    pub is_template: bool,
    pub is_void_pointer: bool,
    /// Set on callback arguments whose class derives from the configured
    /// result base; rendering unwraps these differently from plain data.
    pub is_result_base: bool,
    pub template_arguments: Vec<TypeView>,
}

impl TypeView {
    pub fn from_expr(ty: &TypeExpr, tr: &Translator<'_>) -> Self {
        let mut type_name = ty.name.clone();
        let mut namespace = ty.namespace.clone();
        let mut is_pointer = ty.is_pointer;
        let mut is_reference = ty.is_reference;
        let mut is_void_pointer = false;

        if type_name == "String" {
            // The owned native string type maps to the managed string;
            // qualification and indirection disappear with it.
            type_name = "string".to_string();
            namespace = None;
            is_pointer = false;
            is_reference = false;
        } else if (type_name == "void" || type_name == "char") && ty.is_pointer {
            type_name = "IntPtr".to_string();
            namespace = None;
            is_pointer = false;
            is_reference = false;
            is_void_pointer = true;
        } else if let Some(alias) = translate_type_name(&type_name) {
            type_name = alias.to_string();
        }

        let namespace = tr.type_namespace(namespace.as_deref());
        let template_arguments: Vec<TypeView> = ty
            .template_arguments
            .iter()
            .map(|arg| TypeView::from_expr(arg, tr))
            .collect();

        let mut display = match &namespace {
            Some(ns) => format!("{}.{}", ns, type_name),
            None => type_name.clone(),
        };
        if ty.is_template {
            let args: Vec<&str> = template_arguments.iter().map(|a| a.display.as_str()).collect();
            display = format!("{}<{}>", display, args.join(", "));
        }

        TypeView {
            name: type_name,
            namespace,
            display,
            is_pointer,
            is_reference,
            is_pointer_or_reference: is_pointer || is_reference,
            is_template: ty.is_template,
            is_void_pointer,
            is_result_base: false,
            template_arguments,
        }
    }
}

/// A parameter of a method, delegate, or event.
#[derive(Debug, Clone, Serialize)]
pub struct ParamView {
    pub name: String,
    pub ty: TypeView,
    pub is_out: bool,
    pub is_in_out: bool,
    pub is_last: bool,
    /// Present when this parameter's type was lifted into a delegate.
    pub delegate_name: Option<String>,
}

impl ParamView {
    pub fn from_parameter(p: &Parameter, tr: &Translator<'_>) -> Self {
        ParamView {
            name: p.name.clone(),
            ty: TypeView::from_expr(&p.ty, tr),
            is_out: p.modifier == ParamModifier::Out,
            is_in_out: p.modifier == ParamModifier::InOut,
            is_last: p.is_last,
            delegate_name: None,
        }
    }
}

/// A callback lifted into a standalone delegate declaration.
#[derive(Debug, Clone, Serialize)]
pub struct DelegateView {
    pub name: String,
    pub method_name: String,
    pub return_type: Option<TypeView>,
    pub return_display: String,
    pub parameters: Vec<ParamView>,
    pub has_parameters: bool,
    pub has_progress: bool,
    /// Delegates of plain (non-async, non-event) methods also surface on
    /// the managed side.
    pub include_managed: bool,
}

/// A subscribable event derived from an event-registration method.
#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub name: String,
    pub class_name: String,
    pub method_name: String,
    pub unique_method_name: String,
    pub delegate_name: String,
    pub parameters: Vec<ParamView>,
    pub has_parameters: bool,
    pub has_multiple_parameters: bool,
}

/// A method after callback extraction and type translation.
#[derive(Debug, Clone, Serialize)]
pub struct MethodView {
    pub name: String,
    pub unique_name: String,
    pub doc_comments: Vec<String>,
    pub return_type: Option<TypeView>,
    pub has_return: bool,
    /// Printed return type: the translated type, `void`, or the task shape
    /// for async methods.
    pub return_display: String,
    pub parameters: Vec<ParamView>,
    pub has_parameters: bool,
    pub is_static: bool,
    pub is_const: bool,
    pub is_task: bool,
    pub has_progress: bool,
    pub is_event: bool,
    /// The async result shape promoted from the callback's parameters.
    pub results: Vec<ParamView>,
    pub has_results: bool,
    pub has_multiple_results: bool,
    pub event_name: Option<String>,
    pub delegate_name: Option<String>,
}

impl MethodView {
    /// Plain translation without callback extraction. Template definitions
    /// render their methods generically, so no rewriting applies.
    pub fn simple(m: &MethodMetadata, tr: &Translator<'_>) -> Self {
        let f = &m.function;
        let return_type = f.return_type.as_ref().map(|t| TypeView::from_expr(t, tr));
        let return_display = return_type
            .as_ref()
            .map_or_else(|| "void".to_string(), |t| t.display.clone());
        MethodView {
            name: f.name.clone(),
            unique_name: m.unique_name.clone(),
            doc_comments: docs::translate_comments(f.doc_comments.as_ref()),
            has_return: return_type.is_some(),
            return_type,
            return_display,
            parameters: f
                .parameters
                .iter()
                .map(|p| ParamView::from_parameter(p, tr))
                .collect(),
            has_parameters: f.has_parameters(),
            is_static: m.is_static(),
            is_const: m.is_const(),
            is_task: false,
            has_progress: false,
            is_event: false,
            results: Vec::new(),
            has_results: false,
            has_multiple_results: false,
            event_name: None,
            delegate_name: None,
        }
    }
}

/// One enumerator.
#[derive(Debug, Clone, Serialize)]
pub struct EnumFieldView {
    pub name: String,
    pub value: Option<String>,
    pub has_value: bool,
    pub doc_comments: Vec<String>,
}

impl EnumFieldView {
    fn from_metadata(f: &EnumFieldMetadata) -> Self {
        EnumFieldView {
            name: f.name.clone(),
            value: f.value.clone(),
            has_value: f.value.is_some(),
            doc_comments: docs::translate_comments(f.doc_comments.as_ref()),
        }
    }
}

/// An enum, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct EnumView {
    pub name: String,
    pub namespace: String,
    pub full_safe_type_name: String,
    pub base: Option<String>,
    pub is_flags: bool,
    pub doc_comments: Vec<String>,
    pub fields: Vec<EnumFieldView>,
    pub surrounding_types: Vec<String>,
    pub is_nested_type: bool,
}

impl EnumView {
    pub fn build(e: &EnumMetadata, tr: &Translator<'_>) -> Self {
        let base = e
            .base
            .as_deref()
            .map(|b| translate_enum_base(b).unwrap_or(b).to_string());
        EnumView {
            name: e.name.clone(),
            namespace: tr.entity_namespace(&e.namespace),
            full_safe_type_name: e.full_safe_type_name(),
            base,
            is_flags: e.is_flags,
            doc_comments: docs::translate_comments(e.doc_comments.as_ref()),
            fields: e.fields.iter().map(EnumFieldView::from_metadata).collect(),
            surrounding_types: e.enclosing_types.clone(),
            is_nested_type: e.is_nested_type(),
        }
    }
}

/// A data member rendered as a property.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub name: String,
    pub ty: TypeView,
    pub doc_comments: Vec<String>,
}

impl FieldView {
    pub fn from_metadata(f: &FieldMetadata, tr: &Translator<'_>) -> Self {
        FieldView {
            name: f.name.clone(),
            ty: TypeView::from_expr(&f.ty, tr),
            doc_comments: docs::translate_comments(f.doc_comments.as_ref()),
        }
    }
}

/// A struct, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct StructView {
    pub name: String,
    pub namespace: String,
    pub doc_comments: Vec<String>,
    pub fields: Vec<FieldView>,
    pub surrounding_types: Vec<String>,
    pub is_nested_type: bool,
}

/// A class, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct ClassView {
    pub name: String,
    pub namespace: String,
    pub full_safe_type_name: String,
    /// Translated display name of the base type, if any.
    pub base: Option<String>,
    pub doc_comments: Vec<String>,
    pub fields: Vec<FieldView>,
    pub methods: Vec<MethodView>,
    pub delegates: Vec<DelegateView>,
    pub events: Vec<EventView>,
    pub has_events: bool,
    pub surrounding_types: Vec<String>,
    pub is_nested_type: bool,
}

/// An interface, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct InterfaceView {
    pub name: String,
    pub namespace: String,
    pub doc_comments: Vec<String>,
    pub methods: Vec<MethodView>,
    pub delegates: Vec<DelegateView>,
    pub events: Vec<EventView>,
    pub has_events: bool,
    pub surrounding_types: Vec<String>,
    pub is_nested_type: bool,
}

/// A class template, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateView {
    pub name: String,
    pub namespace: String,
    pub parameters: Vec<String>,
    pub doc_comments: Vec<String>,
    pub fields: Vec<FieldView>,
    pub methods: Vec<MethodView>,
    /// Display names of the explicit instantiations (`List<int>`).
    pub instantiations: Vec<String>,
}

/// A free function, rendered into the aggregate file.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionView {
    pub name: String,
    /// Native entry-point name.
    pub entry_point: String,
    pub doc_comments: Vec<String>,
    pub return_type: Option<TypeView>,
    pub has_return: bool,
    pub return_display: String,
    pub parameters: Vec<ParamView>,
    pub has_parameters: bool,
}

impl FunctionView {
    pub fn build(f: &FunctionMetadata, tr: &Translator<'_>) -> Self {
        let return_type = f.return_type.as_ref().map(|t| TypeView::from_expr(t, tr));
        let return_display = return_type
            .as_ref()
            .map_or_else(|| "void".to_string(), |t| t.display.clone());
        FunctionView {
            name: f.name.clone(),
            entry_point: name::full_safe_type_name(&f.namespace, &f.name),
            doc_comments: docs::translate_comments(f.doc_comments.as_ref()),
            return_type,
            has_return: f.has_return(),
            return_display,
            parameters: f
                .parameters
                .iter()
                .map(|p| ParamView::from_parameter(p, tr))
                .collect(),
            has_parameters: f.has_parameters(),
        }
    }
}
