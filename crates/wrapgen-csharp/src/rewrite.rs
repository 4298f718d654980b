//! Callback extraction and event/async rewriting.
//!
//! A method parameter whose type is a function signature never renders as
//! an ordinary parameter. Its signature is lifted into a named delegate;
//! async methods promote the callback's parameters to their result shape,
//! event-registration methods expose the callback as a subscribable event.

use tracing::warn;

use wrapgen_core::DocComment;
use wrapgen_core::metadata::{MethodMetadata, TypeExpr};
use wrapgen_registry::ApiModel;

use crate::docs;
use crate::error::GenerateError;
use crate::translate::Translator;
use crate::view::{DelegateView, EventView, MethodView, ParamView, TypeView};

/// Fallback returns-documentation for async methods whose callback carries
/// no doc block.
const GENERIC_RETURNS: &str = "<returns>The result for the request</returns>";

pub(crate) struct MethodRewriter<'a> {
    model: &'a ApiModel,
    translator: &'a Translator<'a>,
    /// Interfaces keep callback parameters of plain methods untouched.
    is_interface: bool,
}

impl<'a> MethodRewriter<'a> {
    pub fn new(model: &'a ApiModel, translator: &'a Translator<'a>, is_interface: bool) -> Self {
        Self {
            model,
            translator,
            is_interface,
        }
    }

    /// Rewrite one method into its rendering view, appending any extracted
    /// delegates and events to the owning type's collections.
    pub fn rewrite_method(
        &self,
        m: &MethodMetadata,
        delegates: &mut Vec<DelegateView>,
        events: &mut Vec<EventView>,
    ) -> Result<MethodView, GenerateError> {
        let f = &m.function;
        let tr = self.translator;

        let mut doc_comments = docs::translate_comments(f.doc_comments.as_ref());
        if m.is_task() {
            self.rewrite_task_docs(m, &mut doc_comments)?;
        }

        let return_type = f.return_type.as_ref().map(|t| TypeView::from_expr(t, tr));
        let is_regular = !m.is_task() && !m.is_event();

        let mut parameters: Vec<ParamView> = Vec::new();
        let mut results: Vec<ParamView> = Vec::new();
        let mut delegate_name = None;
        let mut event_name = None;

        for p in &f.parameters {
            if self.is_interface && is_regular {
                parameters.push(ParamView::from_parameter(p, tr));
                continue;
            }
            let Some(sig) = p.ty.function_signature.as_deref() else {
                parameters.push(ParamView::from_parameter(p, tr));
                continue;
            };

            let delegate_params: Vec<ParamView> = sig
                .parameters
                .iter()
                .map(|dp| {
                    let mut view = ParamView::from_parameter(dp, tr);
                    view.ty.is_result_base = self.is_result_base(&dp.ty, &f.namespace);
                    view
                })
                .collect();

            let name = format!("{}{}Delegate", f.name, docs::capitalize_first(&p.name));
            let sig_return = sig.return_type.as_ref().map(|t| TypeView::from_expr(t, tr));
            delegates.push(DelegateView {
                name: name.clone(),
                method_name: f.name.clone(),
                return_display: sig_return
                    .as_ref()
                    .map_or_else(|| "void".to_string(), |t| t.display.clone()),
                return_type: sig_return,
                parameters: delegate_params.clone(),
                has_parameters: !delegate_params.is_empty(),
                has_progress: m.is_async_result_with_progress(),
                include_managed: is_regular,
            });
            delegate_name = Some(name.clone());
            results = delegate_params.clone();

            if !self.is_interface && is_regular {
                // Plain methods keep the parameter, rendered as its delegate.
                let mut view = ParamView::from_parameter(p, tr);
                view.delegate_name = Some(name.clone());
                parameters.push(view);
                continue;
            }

            if m.is_event() {
                let derived = derive_event_name(m);
                events.push(EventView {
                    name: derived.clone(),
                    class_name: m.parent_type.clone(),
                    method_name: f.name.clone(),
                    unique_method_name: m.unique_name.clone(),
                    delegate_name: name.clone(),
                    has_parameters: !delegate_params.is_empty(),
                    has_multiple_parameters: delegate_params.len() > 1,
                    parameters: delegate_params,
                });
                event_name = Some(derived);
            }
            // Async and event callbacks vanish from the visible list.
        }

        let count = parameters.len();
        for (i, p) in parameters.iter_mut().enumerate() {
            p.is_last = i + 1 == count;
        }

        let return_display = if m.is_task() {
            task_display(&results)
        } else {
            return_type
                .as_ref()
                .map_or_else(|| "void".to_string(), |t| t.display.clone())
        };

        Ok(MethodView {
            name: f.name.clone(),
            unique_name: m.unique_name.clone(),
            doc_comments,
            has_return: return_type.is_some(),
            return_type,
            return_display,
            has_parameters: !parameters.is_empty(),
            parameters,
            is_static: m.is_static(),
            is_const: m.is_const(),
            is_task: m.is_task(),
            has_progress: m.is_async_result_with_progress(),
            is_event: m.is_event(),
            has_results: !results.is_empty(),
            has_multiple_results: results.len() > 1,
            results,
            event_name,
            delegate_name,
        })
    }

    /// An async method's returns-documentation comes from its callback: the
    /// method's own last doc line (describing the callback parameter) is
    /// replaced by a `<returns>` derived from the callback's last `@param`
    /// line, or a generic fallback when the callback is undocumented.
    fn rewrite_task_docs(
        &self,
        m: &MethodMetadata,
        doc_lines: &mut Vec<String>,
    ) -> Result<(), GenerateError> {
        let f = &m.function;
        if doc_lines.is_empty() {
            return Ok(());
        }
        let Some(sig) = f
            .parameters
            .last()
            .and_then(|p| p.ty.function_signature.as_deref())
        else {
            return Ok(());
        };

        doc_lines.pop();

        let sig_docs = sig.doc_comments.as_deref().unwrap_or_default();
        match sig_docs.last() {
            Some(DocComment::Param { rest, .. }) => {
                let text = docs::strip_descriptor(&docs::escape_angle(rest));
                doc_lines.push(format!("<returns>{}</returns>", text));
            }
            Some(other) => {
                return Err(GenerateError::MalformedCallbackDoc {
                    file: f.header_file.clone(),
                    comment: raw_doc_line(other),
                });
            }
            None => doc_lines.push(GENERIC_RETURNS.to_string()),
        }
        Ok(())
    }

    /// Does the type's declared class derive from the configured result
    /// base? Unqualified references fall back to the owning method's
    /// namespace; anything unresolved is a plain negative.
    fn is_result_base(&self, ty: &TypeExpr, fallback_namespace: &str) -> bool {
        let Some((base_ns, base_name)) = self.translator.config().result_base_parts() else {
            return false;
        };

        let class = self.model.classes.get(&ty.full_name()).or_else(|| {
            if ty.namespace.is_none() && !fallback_namespace.is_empty() {
                self.model
                    .classes
                    .get(&format!("{}::{}", fallback_namespace, ty.name))
            } else {
                None
            }
        });
        match class {
            Some(c) => self.model.class_derives_from(c, base_ns, base_name),
            None => false,
        }
    }
}

/// `SetFooCallback` → `OnFoo`. A method that violates the convention still
/// produces an event under its own name, with a warning.
fn derive_event_name(m: &MethodMetadata) -> String {
    let f = &m.function;
    if let Some(middle) = f.name.strip_prefix("Set").and_then(|s| s.strip_suffix("Callback")) {
        return format!("On{}", middle);
    }
    warn!(
        file = %f.header_file,
        line = f.start_line,
        "event functions should follow the naming pattern 'SetXCallback'"
    );
    f.name.clone()
}

/// The C# task shape for a promoted result list.
fn task_display(results: &[ParamView]) -> String {
    match results {
        [] => "Task".to_string(),
        [single] => format!("Task<{}>", single.ty.display),
        many => {
            let items: Vec<String> = many
                .iter()
                .map(|r| format!("{} {}", r.ty.display, docs::capitalize_first(&r.name)))
                .collect();
            format!("Task<({})>", items.join(", "))
        }
    }
}

/// Reconstruct the raw spelling of a doc line for error messages.
fn raw_doc_line(line: &DocComment) -> String {
    match line {
        DocComment::Brief(text) => format!("@brief {}", text),
        DocComment::Note(text) => format!("@note {}", text),
        DocComment::Return(rest) => format!("@return {}", rest),
        DocComment::Param { name, rest } => format!("@param {} {}", name, rest),
        DocComment::Free(text) => text.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use wrapgen_core::Config;
    use wrapgen_parser::Parser;

    fn config() -> Config {
        let mut namespace_translations = BTreeMap::new();
        namespace_translations.insert("acme".to_string(), "Acme".to_string());
        namespace_translations.insert("systems".to_string(), "Systems".to_string());
        Config {
            template_directory: "templates".into(),
            output_directory: "out".into(),
            base_namespace: "Acme".to_string(),
            namespace_translations,
            result_base: Some("acme::systems::ResultBase".to_string()),
            header_root: "".into(),
            formatter_command: None,
        }
    }

    fn model_of(source: &str) -> ApiModel {
        let mut model = ApiModel::new();
        let decls = Parser::new().parse_header("test.h", source).unwrap();
        model.merge(decls);
        model
    }

    fn rewrite_first_method(
        model: &ApiModel,
        config: &Config,
        class_key: &str,
        index: usize,
    ) -> (
        Result<MethodView, GenerateError>,
        Vec<DelegateView>,
        Vec<EventView>,
    ) {
        let tr = Translator::new(config);
        let rewriter = MethodRewriter::new(model, &tr, false);
        let mut delegates = Vec::new();
        let mut events = Vec::new();
        let view = rewriter.rewrite_method(
            &model.classes[class_key].methods[index],
            &mut delegates,
            &mut events,
        );
        (view, delegates, events)
    }

    #[test]
    fn event_extraction_is_lossless() {
        let model = model_of(
            r#"
            namespace acme::systems {
            typedef void (*ThingChangedCallback)(const Thing& Item, int Kind);
            class Service {
            public:
                EVENT void SetThingChangedCallback(ThingChangedCallback Callback);
            };
            }
            "#,
        );
        let config = config();
        let (view, delegates, events) =
            rewrite_first_method(&model, &config, "acme::systems::Service", 0);
        let view = view.unwrap();

        // The callback parameter no longer appears in the visible list.
        assert!(view.parameters.is_empty());
        assert!(view.is_event);
        assert_eq!(view.event_name.as_deref(), Some("OnThingChanged"));

        let event = &events[0];
        assert_eq!(event.name, "OnThingChanged");
        assert_eq!(event.class_name, "Service");
        let names: Vec<&str> = event.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Item", "Kind"]);
        assert_eq!(event.parameters[1].ty.display, "int");
        assert!(event.has_multiple_parameters);

        assert_eq!(delegates[0].name, "SetThingChangedCallbackCallbackDelegate");
        assert_eq!(event.delegate_name, delegates[0].name);
    }

    #[test]
    fn unconventional_event_name_still_produces_event() {
        let model = model_of(
            r#"
            typedef void (*PingCallback)(int Count);
            class Service {
            public:
                EVENT void RegisterPing(PingCallback Callback);
            };
            "#,
        );
        let config = config();
        let (view, _delegates, events) = rewrite_first_method(&model, &config, "Service", 0);
        assert!(view.is_ok());
        assert_eq!(events[0].name, "RegisterPing");
    }

    #[test]
    fn async_extraction_promotes_callback_parameters() {
        let model = model_of(
            r#"
            namespace acme::systems {
            /// @brief Called when creation completes.
            /// @param Result ThingResult : the created thing
            typedef void (*ThingResultCallback)(const acme::systems::ThingResult& Result);
            class Service {
            public:
                /// @brief Create a thing.
                /// @param Name String : the thing's name
                /// @param Callback ThingResultCallback : completion callback
                ASYNC_RESULT void CreateThing(const String& Name, ThingResultCallback Callback);
            };
            }
            "#,
        );
        let config = config();
        let (view, delegates, events) =
            rewrite_first_method(&model, &config, "acme::systems::Service", 0);
        let view = view.unwrap();

        assert!(view.is_task);
        assert!(events.is_empty());
        assert_eq!(delegates[0].name, "CreateThingCallbackDelegate");

        // Exactly the trailing callback parameter was removed; the new last
        // parameter is re-flagged.
        assert_eq!(view.parameters.len(), 1);
        assert_eq!(view.parameters[0].name, "Name");
        assert!(view.parameters[0].is_last);

        // The callback's parameters became the result shape.
        assert!(view.has_results);
        assert!(!view.has_multiple_results);
        assert_eq!(view.results[0].name, "Result");
        assert_eq!(view.return_display, "Task<Acme.Systems.ThingResult>");

        // The returns-documentation is the callback's descriptor-stripped
        // @param text, replacing the method's own last doc line.
        assert_eq!(
            view.doc_comments,
            vec![
                "<summary>Create a thing.</summary>".to_string(),
                "<param name=\"Name\">The thing's name</param>".to_string(),
                "<returns>The created thing</returns>".to_string(),
            ]
        );
    }

    #[test]
    fn undocumented_callback_gets_generic_returns() {
        let model = model_of(
            r#"
            typedef void (*DoneCallback)(int Code);
            class Service {
            public:
                /// @brief Run it.
                /// @param Callback DoneCallback : completion callback
                ASYNC_RESULT void Run(DoneCallback Callback);
            };
            "#,
        );
        let config = config();
        let (view, _, _) = rewrite_first_method(&model, &config, "Service", 0);
        let view = view.unwrap();
        assert_eq!(
            view.doc_comments.last().map(String::as_str),
            Some("<returns>The result for the request</returns>")
        );
    }

    #[test]
    fn malformed_callback_docs_are_fatal() {
        let model = model_of(
            r#"
            /// @brief Called when done.
            typedef void (*DoneCallback)(int Code);
            class Service {
            public:
                /// @brief Run it.
                /// @param Callback DoneCallback : completion callback
                ASYNC_RESULT void Run(DoneCallback Callback);
            };
            "#,
        );
        let config = config();
        let (view, _, _) = rewrite_first_method(&model, &config, "Service", 0);
        let err = view.unwrap_err();
        let text = err.to_string();
        assert!(text.contains("test.h:unknown"));
        assert!(text.contains("callback parameter"));
    }

    #[test]
    fn result_base_detection_uses_inheritance() {
        let model = model_of(
            r#"
            namespace acme::systems {
            class ResultBase {};
            class ThingResult : public ResultBase { public: int Dummy() const; };
            class PlainData {};
            typedef void (*MixedCallback)(const ThingResult& Result, const PlainData& Extra);
            class Service {
            public:
                EVENT void SetMixedCallback(MixedCallback Callback);
            };
            }
            "#,
        );
        let config = config();
        let (_, delegates, _) = rewrite_first_method(&model, &config, "acme::systems::Service", 0);
        assert!(delegates[0].parameters[0].ty.is_result_base);
        assert!(!delegates[0].parameters[1].ty.is_result_base);
    }

    #[test]
    fn plain_method_keeps_callback_parameter_with_delegate() {
        let model = model_of(
            r#"
            typedef void (*TickCallback)(int Count);
            class Service {
            public:
                void Observe(TickCallback Callback);
            };
            "#,
        );
        let config = config();
        let (view, delegates, events) = rewrite_first_method(&model, &config, "Service", 0);
        let view = view.unwrap();
        assert!(events.is_empty());
        assert_eq!(view.parameters.len(), 1);
        assert_eq!(
            view.parameters[0].delegate_name.as_deref(),
            Some("ObserveCallbackDelegate")
        );
        assert!(delegates[0].include_managed);
    }
}
