//! Recursive-descent declaration parser.
//!
//! Consumes the word stream one header at a time and produces declaration
//! metadata. The grammar is the constrained subset sufficient for public
//! API surfaces: enums, structs, classes, interfaces, free functions,
//! class templates with explicit instantiations, callback typedefs, and
//! nested namespaces. Anything outside the subset is a positioned error.

use rustc_hash::FxHashMap;
use tracing::debug;

use wrapgen_core::metadata::{
    BaseRef, ClassMetadata, EnumFieldMetadata, EnumMetadata, FieldMetadata, FileDecls,
    FunctionMetadata, FunctionSignature, InterfaceMetadata, MethodFlags, MethodMetadata,
    ParamModifier, Parameter, StructMetadata, TemplateInstantiation, TemplateMetadata, TypeExpr,
};

use crate::error::ParseError;
use crate::reader::{Word, WordKind, WordReader};

/// Trailing words of multi-word builtin type names.
const BUILTIN_TAILS: &[&str] = &["char", "short", "int", "long"];

/// The declaration parser.
///
/// One instance parses an entire header set in order; callback aliases
/// registered by earlier headers resolve in later ones.
#[derive(Default)]
pub struct Parser {
    callbacks: FxHashMap<String, FunctionSignature>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one header file into its declarations.
    ///
    /// `header_file` is recorded verbatim on every declaration and in every
    /// diagnostic.
    pub fn parse_header(
        &mut self,
        header_file: &str,
        source: &str,
    ) -> Result<FileDecls, ParseError> {
        let parser = FileParser {
            file: header_file,
            reader: WordReader::new(source),
            callbacks: &mut self.callbacks,
            decls: FileDecls::default(),
            namespace: Vec::new(),
            scope_depths: Vec::new(),
        };
        parser.run()
    }
}

/// Which record keyword introduced the declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Class,
    Struct,
    Interface,
}

/// Parsed pieces of a record body, shared by classes, structs, interfaces,
/// and template definitions.
struct RecordParts {
    name: String,
    base: Option<BaseRef>,
    fields: Vec<FieldMetadata>,
    methods: Vec<MethodMetadata>,
    end_line: u32,
}

struct FileParser<'a, 'src> {
    file: &'a str,
    reader: WordReader<'src>,
    callbacks: &'a mut FxHashMap<String, FunctionSignature>,
    decls: FileDecls,
    /// Current namespace segments.
    namespace: Vec<String>,
    /// Segments opened per `namespace ... {` block, for popping on `}`.
    scope_depths: Vec<usize>,
}

impl FileParser<'_, '_> {
    fn run(mut self) -> Result<FileDecls, ParseError> {
        while let Some(word) = self.reader.next() {
            self.parse_top_level(word)?;
        }
        Ok(self.decls)
    }

    fn parse_top_level(&mut self, word: Word) -> Result<(), ParseError> {
        match word.text.as_str() {
            "namespace" => self.parse_namespace_open(),
            "}" if !self.scope_depths.is_empty() => {
                let opened = self.scope_depths.pop().unwrap_or(0);
                let keep = self.namespace.len().saturating_sub(opened);
                self.namespace.truncate(keep);
                Ok(())
            }
            "enum" => {
                let decl = self.parse_enum(word, &[])?;
                self.decls.enums.push(decl);
                Ok(())
            }
            "class" | "struct" | "interface" => self.parse_record(word, &[]),
            "template" => self.parse_template(word),
            "typedef" => self.parse_callback_alias(word),
            ";" => Ok(()),
            _ => {
                let decl = self.parse_function(word)?;
                self.decls.functions.push(decl);
                Ok(())
            }
        }
    }

    // =========================================================================
    // Namespaces
    // =========================================================================

    fn parse_namespace_open(&mut self) -> Result<(), ParseError> {
        let mut segments = vec![self.expect_ident("namespace name")?];
        while self.eat("::") {
            segments.push(self.expect_ident("namespace name")?);
        }
        self.expect_punct("{", "namespace body")?;
        self.scope_depths.push(segments.len());
        self.namespace.extend(segments);
        Ok(())
    }

    fn namespace_string(&self) -> String {
        self.namespace.join("::")
    }

    // =========================================================================
    // Enums
    // =========================================================================

    fn parse_enum(
        &mut self,
        mut enum_word: Word,
        enclosing: &[String],
    ) -> Result<EnumMetadata, ParseError> {
        let doc_comments = enum_word.docs.take();
        let start_line = enum_word.span.line;

        let mut word = self.expect_word("enum name")?;
        if word.text == "class" {
            word = self.expect_word("enum name")?;
        }

        let mut is_flags = false;
        if word.text == "Flags" && self.peek_is_ident() {
            is_flags = true;
            word = self.expect_word("enum name")?;
        }
        let name = self.require_ident(word, "enum name")?;

        let mut base = None;
        if self.eat(":") {
            let mut parts = vec![self.expect_ident("enum base type")?];
            while self.peek_is_ident() {
                parts.push(self.expect_ident("enum base type")?);
            }
            base = Some(parts.join(" "));
        }

        let mut fields = Vec::new();
        let mut end_line = start_line;

        if self.eat("{") {
            loop {
                let mut word = self.expect_word("enum body")?;
                if word.text == "}" {
                    end_line = word.span.line;
                    break;
                }
                let doc_comments = word.docs.take();
                let field_name = self.require_ident(word, "enum field name")?;

                let mut value = None;
                if self.eat("=") {
                    let mut text = String::new();
                    while let Some(next) = self.reader.peek() {
                        if next.text == "," || next.text == "}" {
                            break;
                        }
                        text.push_str(&next.text);
                        self.reader.next();
                    }
                    value = Some(text);
                }
                self.eat(",");

                fields.push(EnumFieldMetadata {
                    name: field_name,
                    value,
                    doc_comments,
                });
            }
        }
        self.eat(";");

        Ok(EnumMetadata {
            header_file: self.file.to_string(),
            start_line,
            end_line,
            namespace: self.namespace_string(),
            enclosing_types: enclosing.to_vec(),
            name,
            base,
            fields,
            is_flags,
            doc_comments,
        })
    }

    // =========================================================================
    // Classes, structs, interfaces
    // =========================================================================

    fn parse_record(&mut self, mut word: Word, enclosing: &[String]) -> Result<(), ParseError> {
        let kind = match word.text.as_str() {
            "class" => RecordKind::Class,
            "struct" => RecordKind::Struct,
            _ => RecordKind::Interface,
        };
        let doc_comments = word.docs.take();
        let start_line = word.span.line;

        let Some(parts) = self.parse_record_parts(kind, enclosing)? else {
            return Ok(());
        };

        let header_file = self.file.to_string();
        let namespace = self.namespace_string();
        match kind {
            RecordKind::Class => self.decls.classes.push(ClassMetadata {
                header_file,
                start_line,
                end_line: parts.end_line,
                namespace,
                enclosing_types: enclosing.to_vec(),
                name: parts.name,
                base: parts.base,
                fields: parts.fields,
                methods: parts.methods,
                doc_comments,
            }),
            RecordKind::Struct => self.decls.structs.push(StructMetadata {
                header_file,
                start_line,
                end_line: parts.end_line,
                namespace,
                enclosing_types: enclosing.to_vec(),
                name: parts.name,
                base: parts.base,
                fields: parts.fields,
                methods: parts.methods,
                doc_comments,
            }),
            RecordKind::Interface => self.decls.interfaces.push(InterfaceMetadata {
                header_file,
                start_line,
                end_line: parts.end_line,
                namespace,
                enclosing_types: enclosing.to_vec(),
                name: parts.name,
                methods: parts.methods,
                doc_comments,
            }),
        }
        Ok(())
    }

    /// Parse everything after the record keyword. Returns `None` for a
    /// forward declaration, which produces no metadata.
    fn parse_record_parts(
        &mut self,
        kind: RecordKind,
        enclosing: &[String],
    ) -> Result<Option<RecordParts>, ParseError> {
        let name = self.expect_ident("type name")?;

        if self.eat(";") {
            return Ok(None);
        }

        let base = self.parse_base_clause()?;
        self.expect_punct("{", "type body")?;
        let (fields, methods, end_line) = self.parse_members(kind, &name, enclosing)?;
        self.eat(";");

        Ok(Some(RecordParts {
            name,
            base,
            fields,
            methods,
            end_line,
        }))
    }

    /// Parse an optional `: [public] Base [, ...]` clause. Only the first
    /// base is recorded; the declaration subset models single inheritance.
    fn parse_base_clause(&mut self) -> Result<Option<BaseRef>, ParseError> {
        if !self.eat(":") {
            return Ok(None);
        }

        let mut base = None;
        loop {
            while self.eat("public") || self.eat("protected") || self.eat("private") {}

            let mut segments = vec![self.expect_ident("base type name")?];
            while self.eat("::") {
                segments.push(self.expect_ident("base type name")?);
            }
            let name = segments.pop().unwrap_or_default();
            let namespace = if segments.is_empty() {
                // An unqualified base refers to the surrounding namespace.
                self.namespace_string()
            } else {
                segments.join("::")
            };

            if base.is_none() {
                base = Some(BaseRef { namespace, name });
            } else {
                debug!(file = self.file, "ignoring additional base type");
            }

            if !self.eat(",") {
                break;
            }
        }
        Ok(base)
    }

    fn parse_members(
        &mut self,
        kind: RecordKind,
        type_name: &str,
        enclosing: &[String],
    ) -> Result<(Vec<FieldMetadata>, Vec<MethodMetadata>, u32), ParseError> {
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        let mut overloads: FxHashMap<String, u32> = FxHashMap::default();

        loop {
            let word = self.expect_word("type member list")?;
            match word.text.as_str() {
                "}" => return Ok((fields, methods, word.span.line)),
                "public" | "protected" | "private" => {
                    self.expect_punct(":", "access label")?;
                }
                "enum" if kind != RecordKind::Interface => {
                    let mut nested = enclosing.to_vec();
                    nested.push(type_name.to_string());
                    let decl = self.parse_enum(word, &nested)?;
                    self.decls.enums.push(decl);
                }
                "class" | "struct" if kind != RecordKind::Interface => {
                    let mut nested = enclosing.to_vec();
                    nested.push(type_name.to_string());
                    self.parse_record(word, &nested)?;
                }
                "~" => {
                    // Destructors carry nothing a binding surface needs.
                    self.skip_through_terminator("destructor")?;
                }
                _ => {
                    self.parse_member(word, kind, type_name, &mut overloads, &mut fields, &mut methods)?;
                }
            }
        }
    }

    fn parse_member(
        &mut self,
        first: Word,
        kind: RecordKind,
        type_name: &str,
        overloads: &mut FxHashMap<String, u32>,
        fields: &mut Vec<FieldMetadata>,
        methods: &mut Vec<MethodMetadata>,
    ) -> Result<(), ParseError> {
        let mut word = first;
        let doc_comments = word.docs.take();
        let start_line = word.span.line;

        let mut flags = MethodFlags::empty();
        loop {
            match word.text.as_str() {
                "static" => flags |= MethodFlags::STATIC,
                "ASYNC_RESULT" => flags |= MethodFlags::ASYNC_RESULT,
                "ASYNC_RESULT_WITH_PROGRESS" => flags |= MethodFlags::ASYNC_RESULT_WITH_PROGRESS,
                "EVENT" => flags |= MethodFlags::EVENT,
                _ => break,
            }
            word = self.expect_word("member declaration")?;
        }

        let ty = self.parse_type_from(word)?;

        // A parenthesis directly after the type means the "type" was the
        // class name itself: a constructor. Not part of the binding surface.
        if self.peek_text() == Some("(") && ty.name == type_name {
            self.skip_through_terminator("constructor")?;
            return Ok(());
        }

        let name = self.expect_ident("member name")?;

        if self.eat(";") {
            if kind == RecordKind::Interface {
                return Err(ParseError::Unexpected {
                    file: self.file.to_string(),
                    line: start_line,
                    expected: "method declaration".to_string(),
                    found: name,
                });
            }
            fields.push(FieldMetadata {
                name,
                ty,
                doc_comments,
            });
            return Ok(());
        }

        let parameters = self.parse_parameters()?;
        if self.eat("const") {
            flags |= MethodFlags::CONST;
        }
        let end_line = self.expect_terminator(&name)?;

        let count = overloads.entry(name.clone()).or_insert(0);
        *count += 1;
        let unique_name = if *count == 1 {
            format!("{}_{}", type_name, name)
        } else {
            format!("{}_{}_{}", type_name, name, count)
        };

        methods.push(MethodMetadata {
            function: FunctionMetadata {
                header_file: self.file.to_string(),
                start_line,
                end_line,
                namespace: self.namespace_string(),
                name,
                return_type: void_to_none(ty),
                parameters,
                doc_comments,
            },
            flags,
            parent_type: type_name.to_string(),
            unique_name,
        });
        Ok(())
    }

    // =========================================================================
    // Functions and parameters
    // =========================================================================

    fn parse_function(&mut self, first: Word) -> Result<FunctionMetadata, ParseError> {
        let mut word = first;
        let doc_comments = word.docs.take();
        let start_line = word.span.line;

        let ty = self.parse_type_from(word)?;
        let name = self.expect_ident("function name")?;
        let parameters = self.parse_parameters()?;
        let end_line = self.expect_terminator(&name)?;

        Ok(FunctionMetadata {
            header_file: self.file.to_string(),
            start_line,
            end_line,
            namespace: self.namespace_string(),
            name,
            return_type: void_to_none(ty),
            parameters,
            doc_comments,
        })
    }

    fn parse_parameters(&mut self) -> Result<Vec<Parameter>, ParseError> {
        self.expect_punct("(", "parameter list")?;

        let mut parameters = Vec::new();
        if self.eat(")") {
            return Ok(parameters);
        }

        loop {
            parameters.push(self.parse_parameter()?);
            if self.eat(",") {
                continue;
            }
            self.expect_punct(")", "parameter list")?;
            break;
        }

        if let Some(last) = parameters.last_mut() {
            last.is_last = true;
        }
        Ok(parameters)
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let mut word = self.expect_word("parameter")?;
        let doc_comments = word.docs.take();

        let modifier = match word.text.as_str() {
            "OUT" => {
                word = self.expect_word("parameter type")?;
                ParamModifier::Out
            }
            "IN_OUT" => {
                word = self.expect_word("parameter type")?;
                ParamModifier::InOut
            }
            _ => ParamModifier::In,
        };

        let ty = self.parse_type_from(word)?;
        let name = self.expect_ident("parameter name")?;

        Ok(Parameter {
            name,
            ty,
            modifier,
            is_last: false,
            doc_comments,
        })
    }

    // =========================================================================
    // Type expressions
    // =========================================================================

    /// Parse a type expression whose first word has already been consumed.
    fn parse_type_from(&mut self, word: Word) -> Result<TypeExpr, ParseError> {
        let mut word = word;
        let mut is_const = false;
        if word.text == "const" {
            is_const = true;
            word = self.expect_word("type name")?;
        }

        let first = self.require_ident(word, "type name")?;
        let mut segments = vec![first];
        while self.eat("::") {
            segments.push(self.expect_ident("type name")?);
        }

        let mut name = segments.pop().unwrap_or_default();
        let namespace = if segments.is_empty() {
            None
        } else {
            Some(segments.join("::"))
        };

        // Multi-word builtins (`unsigned char`, `long long`, ...).
        if namespace.is_none()
            && matches!(name.as_str(), "unsigned" | "signed" | "long" | "short")
        {
            while self
                .reader
                .peek()
                .is_some_and(|w| w.kind == WordKind::Ident && BUILTIN_TAILS.contains(&w.text.as_str()))
            {
                let tail = self.expect_ident("type name")?;
                name.push(' ');
                name.push_str(&tail);
            }
        }

        let mut is_template = false;
        let mut template_arguments = Vec::new();
        if self.eat("<") {
            is_template = true;
            if !self.eat(">") {
                loop {
                    let arg_word = self.expect_word("template argument")?;
                    template_arguments.push(self.parse_type_from(arg_word)?);
                    if self.eat(",") {
                        continue;
                    }
                    self.expect_punct(">", "template argument list")?;
                    break;
                }
            }
        }

        let is_pointer = self.eat("*");
        let is_reference = !is_pointer && self.eat("&");

        let function_signature = if !is_template {
            self.callbacks.get(&name).cloned().map(Box::new)
        } else {
            None
        };

        Ok(TypeExpr {
            name,
            namespace,
            is_const,
            is_pointer,
            is_reference,
            is_template,
            template_arguments,
            function_signature,
        })
    }

    // =========================================================================
    // Callback aliases
    // =========================================================================

    /// `typedef Ret (*Name)(params);` — registers a callback signature
    /// alias. Parameter types named after an alias parse as
    /// function-signature types from then on.
    fn parse_callback_alias(&mut self, mut typedef_word: Word) -> Result<(), ParseError> {
        let doc_comments = typedef_word.docs.take();

        let ret_word = self.expect_word("callback return type")?;
        let ret = self.parse_type_from(ret_word)?;
        self.expect_punct("(", "callback alias")?;
        self.expect_punct("*", "callback alias")?;
        let name = self.expect_ident("callback alias name")?;
        self.expect_punct(")", "callback alias")?;
        let parameters = self.parse_parameters()?;
        self.expect_terminator(&name)?;

        self.callbacks.insert(
            name,
            FunctionSignature {
                return_type: void_to_none(ret),
                parameters,
                doc_comments,
            },
        );
        Ok(())
    }

    // =========================================================================
    // Templates
    // =========================================================================

    fn parse_template(&mut self, mut template_word: Word) -> Result<(), ParseError> {
        let doc_comments = template_word.docs.take();
        let start_line = template_word.span.line;

        if !self.eat("<") {
            return self.parse_template_instantiation();
        }

        let mut parameters = Vec::new();
        loop {
            let kw = self.expect_word("template parameter")?;
            if kw.text != "typename" && kw.text != "class" {
                return Err(self.unexpected(&kw, "'typename' or 'class'"));
            }
            parameters.push(self.expect_ident("template parameter name")?);
            if !self.eat(",") {
                break;
            }
        }
        self.expect_punct(">", "template parameter list")?;

        let kind_word = self.expect_word("template definition")?;
        if kind_word.text != "class" && kind_word.text != "struct" {
            return Err(self.unexpected(&kind_word, "'class' or 'struct'"));
        }

        let Some(parts) = self.parse_record_parts(RecordKind::Class, &[])? else {
            return Ok(());
        };

        self.decls.templates.push(TemplateMetadata {
            definition: ClassMetadata {
                header_file: self.file.to_string(),
                start_line,
                end_line: parts.end_line,
                namespace: self.namespace_string(),
                enclosing_types: Vec::new(),
                name: parts.name,
                base: parts.base,
                fields: parts.fields,
                methods: parts.methods,
                doc_comments,
            },
            parameters,
            instantiations: Vec::new(),
        });
        Ok(())
    }

    /// `template class Name<Args>;` — an explicit instantiation record.
    fn parse_template_instantiation(&mut self) -> Result<(), ParseError> {
        let kind_word = self.expect_word("template instantiation")?;
        if kind_word.text != "class" && kind_word.text != "struct" {
            return Err(self.unexpected(&kind_word, "'class' or 'struct'"));
        }
        let line = kind_word.span.line;

        let mut segments = vec![self.expect_ident("template name")?];
        while self.eat("::") {
            segments.push(self.expect_ident("template name")?);
        }
        let name = segments.pop().unwrap_or_default();
        let namespace = if segments.is_empty() {
            self.namespace_string()
        } else {
            segments.join("::")
        };

        self.expect_punct("<", "template argument list")?;
        let mut arguments = Vec::new();
        loop {
            let arg_word = self.expect_word("template argument")?;
            arguments.push(self.parse_type_from(arg_word)?);
            if !self.eat(",") {
                break;
            }
        }
        self.expect_punct(">", "template argument list")?;
        self.expect_terminator(&name)?;

        let full_name = wrapgen_core::name::full_name(&namespace, &[], &name);
        self.decls.instantiations.push((
            full_name,
            TemplateInstantiation {
                arguments,
                header_file: self.file.to_string(),
                line,
            },
        ));
        Ok(())
    }

    // =========================================================================
    // Word-level helpers
    // =========================================================================

    fn expect_word(&mut self, context: &str) -> Result<Word, ParseError> {
        self.reader.next().ok_or_else(|| ParseError::UnexpectedEof {
            file: self.file.to_string(),
            line: self.reader.line(),
            context: context.to_string(),
        })
    }

    fn expect_ident(&mut self, context: &str) -> Result<String, ParseError> {
        let word = self.expect_word(context)?;
        self.require_ident(word, context)
    }

    fn require_ident(&self, word: Word, context: &str) -> Result<String, ParseError> {
        if word.kind == WordKind::Ident {
            Ok(word.text)
        } else {
            Err(self.unexpected(&word, context))
        }
    }

    fn expect_punct(&mut self, text: &str, context: &str) -> Result<(), ParseError> {
        let word = self.expect_word(context)?;
        if word.text == text {
            Ok(())
        } else {
            Err(self.unexpected(&word, &format!("'{}' in {}", text, context)))
        }
    }

    /// Require the `;` terminator of a declaration, returning its line.
    fn expect_terminator(&mut self, name: &str) -> Result<u32, ParseError> {
        match self.reader.next() {
            Some(word) if word.text == ";" => Ok(word.span.line),
            Some(word) => Err(ParseError::UnterminatedDeclaration {
                file: self.file.to_string(),
                line: word.span.line,
                name: name.to_string(),
            }),
            None => Err(ParseError::UnterminatedDeclaration {
                file: self.file.to_string(),
                line: self.reader.line(),
                name: name.to_string(),
            }),
        }
    }

    /// Skip a member declaration the binding surface does not model:
    /// everything through the closing `;`, tracking paren depth.
    fn skip_through_terminator(&mut self, context: &str) -> Result<(), ParseError> {
        debug!(file = self.file, context, "skipping declaration");
        let mut depth = 0u32;
        loop {
            let word = self.expect_word(context)?;
            match word.text.as_str() {
                "(" => depth += 1,
                ")" => depth = depth.saturating_sub(1),
                ";" if depth == 0 => return Ok(()),
                _ => {}
            }
        }
    }

    fn eat(&mut self, text: &str) -> bool {
        if self.peek_text() == Some(text) {
            self.reader.next();
            true
        } else {
            false
        }
    }

    fn peek_text(&mut self) -> Option<&str> {
        self.reader.peek().map(|w| w.text.as_str())
    }

    fn peek_is_ident(&mut self) -> bool {
        self.reader.peek().is_some_and(|w| w.kind == WordKind::Ident)
    }

    fn unexpected(&self, word: &Word, expected: &str) -> ParseError {
        ParseError::Unexpected {
            file: self.file.to_string(),
            line: word.span.line,
            expected: expected.to_string(),
            found: word.text.clone(),
        }
    }
}

/// `void` return types are modeled as absence.
fn void_to_none(ty: TypeExpr) -> Option<TypeExpr> {
    let is_void = ty.name == "void"
        && ty.namespace.is_none()
        && !ty.is_pointer
        && !ty.is_reference
        && !ty.is_template;
    if is_void { None } else { Some(ty) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrapgen_core::DocComment;

    fn parse(source: &str) -> FileDecls {
        Parser::new().parse_header("test.h", source).unwrap()
    }

    #[test]
    fn parse_empty_enum() {
        let decls = parse("enum Foo {}");
        let e = &decls.enums[0];
        assert_eq!(e.namespace, "");
        assert_eq!(e.name, "Foo");
        assert_eq!(e.full_safe_type_name(), "_Foo");
        assert!(e.fields.is_empty());
        assert!(!e.is_flags);
        assert!(!e.is_nested_type());
        assert_eq!(e.doc_comments, None);
    }

    #[test]
    fn enum_without_body_has_empty_fields() {
        let decls = parse("enum Foo;");
        let e = &decls.enums[0];
        assert_eq!(e.name, "Foo");
        assert!(e.fields.is_empty());
        assert_eq!(e.doc_comments, None);
    }

    #[test]
    fn parse_enum_fields() {
        let decls = parse("enum EnumName {\n    Foo,\n    Bar,\n    Baz\n}");
        let e = &decls.enums[0];
        let names: Vec<&str> = e.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Foo", "Bar", "Baz"]);
        assert!(e.fields.iter().all(|f| f.value.is_none()));
        assert!(e.fields.iter().all(|f| f.doc_comments.is_none()));
    }

    #[test]
    fn enum_field_values_round_trip_verbatim() {
        let decls = parse("enum EnumName {\n    Foo = -1,\n    Bar = 0,\n    Baz = 1234\n}");
        let values: Vec<Option<&str>> = decls.enums[0]
            .fields
            .iter()
            .map(|f| f.value.as_deref())
            .collect();
        assert_eq!(values, vec![Some("-1"), Some("0"), Some("1234")]);
    }

    #[test]
    fn enum_hex_values_keep_radix() {
        let decls = parse("enum Flags Mask { A = 0x01, B = 0x10 }");
        let e = &decls.enums[0];
        assert!(e.is_flags);
        assert_eq!(e.fields[1].value.as_deref(), Some("0x10"));
    }

    #[test]
    fn enum_class_with_base() {
        let decls = parse("enum class Mode : uint8_t { On, Off };");
        let e = &decls.enums[0];
        assert_eq!(e.name, "Mode");
        assert_eq!(e.base.as_deref(), Some("uint8_t"));
    }

    #[test]
    fn enum_inside_namespace() {
        let decls = parse("namespace acme::systems {\nenum Foo {}\n}");
        assert_eq!(decls.enums[0].namespace, "acme::systems");
        assert_eq!(decls.enums[0].full_name(), "acme::systems::Foo");
    }

    #[test]
    fn parse_function_no_params() {
        let decls = parse("void FunctionName();");
        let f = &decls.functions[0];
        assert_eq!(f.namespace, "");
        assert_eq!(f.name, "FunctionName");
        assert_eq!(f.return_type, None);
        assert!(f.parameters.is_empty());
        assert_eq!(f.doc_comments, None);
    }

    #[test]
    fn parse_function_with_param_flags_last() {
        let decls = parse("int FunctionName(int param1);");
        let f = &decls.functions[0];
        assert!(f.has_return());
        assert_eq!(f.return_type.as_ref().unwrap().name, "int");
        assert_eq!(f.parameters.len(), 1);
        let p = &f.parameters[0];
        assert_eq!(p.name, "param1");
        assert_eq!(p.ty.name, "int");
        assert!(p.is_last);
        assert_eq!(p.doc_comments, None);
    }

    #[test]
    fn only_final_parameter_is_last() {
        let decls = parse("float FunctionName(int param1, const char* param2, double param3);");
        let f = &decls.functions[0];
        let last_flags: Vec<bool> = f.parameters.iter().map(|p| p.is_last).collect();
        assert_eq!(last_flags, vec![false, false, true]);
        assert!(f.parameters[1].ty.is_const);
        assert!(f.parameters[1].ty.is_pointer);
        assert_eq!(f.parameters[1].ty.name, "char");
    }

    #[test]
    fn missing_terminator_is_a_parse_error() {
        let err = Parser::new()
            .parse_header("test.h", "void FunctionName()")
            .unwrap_err();
        match &err {
            ParseError::UnterminatedDeclaration { name, .. } => {
                assert_eq!(name, "FunctionName");
            }
            other => panic!("expected UnterminatedDeclaration, got {:?}", other),
        }
        assert!(err.to_string().contains("FunctionName"));
    }

    #[test]
    fn doc_block_attaches_to_declaration() {
        let decls = parse("/// @brief A thing.\nenum Foo {}");
        assert_eq!(
            decls.enums[0].doc_comments,
            Some(vec![DocComment::Brief("A thing.".to_string())])
        );
    }

    #[test]
    fn class_with_members() {
        let source = r#"
            namespace acme {
            /// @brief A widget.
            class Widget : public Gadget
            {
            public:
                /// @brief The widget's display name.
                String Name;

                /// @brief Resize the widget.
                /// @param Width int : new width
                void Resize(int Width, int Height);

                static int Count();
                int Size() const;
            };
            }
        "#;
        let decls = parse(source);
        let c = &decls.classes[0];
        assert_eq!(c.name, "Widget");
        assert_eq!(c.namespace, "acme");
        let base = c.base.as_ref().unwrap();
        assert_eq!(base.namespace, "acme");
        assert_eq!(base.name, "Gadget");
        assert_eq!(c.fields.len(), 1);
        assert_eq!(c.fields[0].name, "Name");
        assert_eq!(c.methods.len(), 3);
        assert_eq!(c.methods[0].function.name, "Resize");
        assert_eq!(c.methods[0].unique_name, "Widget_Resize");
        assert!(c.methods[1].is_static());
        assert!(c.methods[2].is_const());
        assert!(c.methods[0].function.doc_comments.is_some());
    }

    #[test]
    fn qualified_base_keeps_namespace() {
        let decls = parse("class Foo : public acme::systems::ResultBase {};");
        let base = decls.classes[0].base.as_ref().unwrap();
        assert_eq!(base.namespace, "acme::systems");
        assert_eq!(base.name, "ResultBase");
    }

    #[test]
    fn forward_declaration_produces_nothing() {
        let decls = parse("class Foo;\nstruct Bar;");
        assert!(decls.classes.is_empty());
        assert!(decls.structs.is_empty());
    }

    #[test]
    fn overloads_get_distinct_unique_names() {
        let source = "class Foo { void Bar(); void Bar(int x); };";
        let decls = parse(source);
        let names: Vec<&str> = decls.classes[0]
            .methods
            .iter()
            .map(|m| m.unique_name.as_str())
            .collect();
        assert_eq!(names, vec!["Foo_Bar", "Foo_Bar_2"]);
    }

    #[test]
    fn constructors_and_destructors_are_skipped() {
        let source = "class Foo { Foo(int x); ~Foo(); void Real(); };";
        let decls = parse(source);
        assert_eq!(decls.classes[0].methods.len(), 1);
        assert_eq!(decls.classes[0].methods[0].function.name, "Real");
    }

    #[test]
    fn nested_enum_records_enclosing_type() {
        let source = "namespace acme {\nclass Widget {\npublic:\n    enum Mode { A, B };\n};\n}";
        let decls = parse(source);
        let e = &decls.enums[0];
        assert_eq!(e.namespace, "acme");
        assert_eq!(e.enclosing_types, vec!["Widget".to_string()]);
        assert!(e.is_nested_type());
        assert_eq!(e.full_name(), "acme::Widget::Mode");
    }

    #[test]
    fn method_markers_set_flags() {
        let source = r#"
            class Service {
            public:
                ASYNC_RESULT void CreateThing(ThingResultCallback Callback);
                EVENT void SetThingChangedCallback(ThingResultCallback Callback);
            };
        "#;
        let decls = parse(source);
        let methods = &decls.classes[0].methods;
        assert!(methods[0].is_async_result());
        assert!(methods[0].is_task());
        assert!(methods[1].is_event());
    }

    #[test]
    fn out_parameter_modifiers() {
        let decls = parse("void Fetch(OUT String& Value, IN_OUT int& Count);");
        let f = &decls.functions[0];
        assert_eq!(f.parameters[0].modifier, ParamModifier::Out);
        assert_eq!(f.parameters[1].modifier, ParamModifier::InOut);
    }

    #[test]
    fn template_type_arguments_recurse() {
        let decls = parse("void Store(common::Map<String, common::Array<int>> Items);");
        let ty = &decls.functions[0].parameters[0].ty;
        assert!(ty.is_template);
        assert_eq!(ty.name, "Map");
        assert_eq!(ty.namespace.as_deref(), Some("common"));
        assert_eq!(ty.template_arguments.len(), 2);
        let inner = &ty.template_arguments[1];
        assert!(inner.is_template);
        assert_eq!(inner.template_arguments[0].name, "int");
    }

    #[test]
    fn callback_alias_makes_signature_types() {
        let source = r#"
            /// @brief Called when the thing is ready.
            /// @param Result ThingResult : the outcome of the request
            typedef void (*ThingResultCallback)(const ThingResult& Result);

            class Service {
            public:
                ASYNC_RESULT void CreateThing(ThingResultCallback Callback);
            };
        "#;
        let decls = parse(source);
        let cb = &decls.classes[0].methods[0].function.parameters[0];
        assert!(cb.ty.is_function_signature());
        let sig = cb.ty.function_signature.as_ref().unwrap();
        assert_eq!(sig.return_type, None);
        assert_eq!(sig.parameters.len(), 1);
        assert_eq!(sig.parameters[0].name, "Result");
        assert_eq!(sig.parameters[0].ty.name, "ThingResult");
        let docs = sig.doc_comments.as_ref().unwrap();
        assert_eq!(docs.len(), 2);
        assert!(matches!(&docs[1], DocComment::Param { name, .. } if name == "Result"));
    }

    #[test]
    fn template_definition_and_instantiation() {
        let source = r#"
            namespace acme::common {
            template <typename T> class List {
            public:
                void Append(T Item);
                int Size() const;
            };
            template class List<int>;
            }
        "#;
        let decls = parse(source);
        let t = &decls.templates[0];
        assert_eq!(t.definition.name, "List");
        assert_eq!(t.parameters, vec!["T".to_string()]);
        assert_eq!(t.definition.methods.len(), 2);
        assert_eq!(decls.instantiations.len(), 1);
        assert_eq!(decls.instantiations[0].0, "acme::common::List");
        assert_eq!(decls.instantiations[0].1.arguments[0].name, "int");
    }

    #[test]
    fn interface_rejects_fields() {
        let err = Parser::new()
            .parse_header("test.h", "interface IThing { int Value; };")
            .unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { .. }));
    }

    #[test]
    fn multi_word_builtin_types() {
        let decls = parse("void Take(unsigned long long Big, long int Medium);");
        let f = &decls.functions[0];
        assert_eq!(f.parameters[0].ty.name, "unsigned long long");
        assert_eq!(f.parameters[1].ty.name, "long int");
    }
}
