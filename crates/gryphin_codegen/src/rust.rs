//! Rust source emission.
//!
//! Every emitted type lives in its own unit. Units refer to each other
//! through `use super::*;`, and `mod.rs` re-exports all of them, so the
//! output directory is a self-contained module.

use crate::names::{is_emitted, Names};
use crate::unit::{GeneratedUnit, UnitKind};
use crate::CodegenOptions;
use gryphin_core::{to_snake_case, Case, NameScope, TYPENAME_FIELD};
use gryphin_schema::{
    Deprecation, EnumValue, Field, InputValue, NamedType, ScalarSource, TypeBody, TypeGraph,
    TypeId, TypeKind, TypeRef,
};

const RT: &str = "::gryphin_runtime";

const MODULE_LINTS: &str = "#![allow(non_camel_case_types, non_snake_case, unused_imports, \
                            dead_code, deprecated, clippy::all)]";

/// Rust types the built-in scalars alias to.
const BUILTIN_ALIASES: [(&str, &str); 5] = [
    ("Int", "i32"),
    ("Float", "f64"),
    ("String", "::std::string::String"),
    ("Boolean", "bool"),
    ("ID", "::std::string::String"),
];

/// Indentation-aware line writer.
struct Writer {
    output: String,
    indent: usize,
}

impl Writer {
    fn new(header: &str) -> Self {
        let mut writer = Self {
            output: String::new(),
            indent: 0,
        };
        if !header.is_empty() {
            for line in header.lines() {
                writer.line(line);
            }
            writer.blank();
        }
        writer
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            self.push_indent();
            self.output.push_str(text);
        }
        self.output.push('\n');
    }

    fn blank(&mut self) {
        self.output.push('\n');
    }

    /// Writes a line ending in an opening brace and indents.
    fn open(&mut self, text: &str) {
        self.line(text);
        self.indent += 1;
    }

    /// Dedents and writes the closing line.
    fn close(&mut self, text: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }

    fn doc(&mut self, text: Option<&str>) {
        let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
            return;
        };
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.line("///");
            } else {
                self.line(&format!("/// {line}"));
            }
        }
    }

    fn deprecated(&mut self, deprecation: Option<&Deprecation>) {
        match deprecation.map(|d| d.reason.as_deref()) {
            Some(Some(reason)) => self.line(&format!("#[deprecated(note = {reason:?})]")),
            Some(None) => self.line("#[deprecated]"),
            None => {}
        }
    }

    fn push_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str("    ");
        }
    }

    fn finish(self) -> String {
        self.output
    }
}

/// Emits the Rust units for a graph.
pub(crate) struct RustEmitter<'a> {
    graph: &'a TypeGraph,
    options: &'a CodegenOptions,
    names: Names,
}

impl<'a> RustEmitter<'a> {
    pub fn new(graph: &'a TypeGraph, options: &'a CodegenOptions) -> Self {
        Self {
            graph,
            options,
            names: Names::build(graph, options),
        }
    }

    /// Returns `mod.rs`, `aliases.rs` and one unit per emitted type.
    pub fn emit(&self) -> Vec<GeneratedUnit> {
        let mut modules = vec!["aliases".to_string()];
        let mut type_units = Vec::new();

        for (id, ty) in self.graph.iter() {
            let Some(module) = self.names.get(id).module.clone() else {
                continue;
            };
            let (kind, content) = match &ty.body {
                TypeBody::Object { fields, .. } => (UnitKind::Object, self.composite(id, ty, fields)),
                TypeBody::Interface { fields, .. } => {
                    (UnitKind::Interface, self.composite(id, ty, fields))
                }
                TypeBody::Union { .. } => (UnitKind::Union, self.composite(id, ty, &[])),
                TypeBody::Enum { values } => (UnitKind::Enum, self.enumeration(id, ty, values)),
                TypeBody::InputObject { input_fields } => {
                    (UnitKind::InputObject, self.input_object(id, ty, input_fields))
                }
                TypeBody::Scalar { .. } => continue,
            };
            tracing::trace!(name = %ty.name, module = %module, "emitted unit");
            type_units.push(GeneratedUnit::new(kind, format!("{module}.rs"), content));
            modules.push(module);
        }

        let mut units = Vec::with_capacity(type_units.len() + 2);
        units.push(GeneratedUnit::new(
            UnitKind::Module,
            "mod.rs",
            self.module(&modules),
        ));
        units.push(self.aliases());
        units.extend(type_units);
        units
    }

    fn module(&self, modules: &[String]) -> String {
        let mut w = Writer::new(&self.options.header);
        w.line(MODULE_LINTS);
        w.blank();
        for module in modules {
            w.line(&format!("pub mod {module};"));
        }
        w.blank();
        for module in modules {
            w.line(&format!("pub use {module}::*;"));
        }
        w.finish()
    }

    fn aliases(&self) -> GeneratedUnit {
        let mut w = Writer::new(&self.options.header);
        for (name, target) in BUILTIN_ALIASES {
            w.line(&format!("pub type {name} = {target};"));
        }

        let mut inline: Vec<&str> = Vec::new();
        for (id, ty) in self.graph.iter() {
            if ty.kind() != TypeKind::Scalar || ty.is_builtin_scalar() {
                continue;
            }
            match ty.scalar_override() {
                None => {
                    w.blank();
                    w.doc(ty.description.as_deref());
                    w.line(&format!(
                        "pub type {} = ::std::string::String;",
                        self.names.ident(id)
                    ));
                }
                Some(ScalarSource::Inline(text)) if !inline.contains(&text.as_str()) => {
                    inline.push(text);
                }
                Some(_) => {}
            }
        }

        let mut unit = GeneratedUnit::new(UnitKind::Aliases, "aliases.rs", w.finish());
        for text in inline {
            unit.append_source(text);
        }
        unit
    }

    fn composite(&self, id: TypeId, ty: &NamedType, fields: &[Field]) -> String {
        let fields: Vec<&Field> = fields.iter().filter(|f| self.is_usable(f)).collect();
        let mut w = Writer::new(&self.options.header);
        w.line("use super::*;");
        w.blank();

        self.model(&mut w, id, ty, &fields);
        w.blank();
        self.selection(&mut w, id, ty, &fields);

        let roots = self.graph.roots();
        let entries = [
            (roots.query, "query", "a query"),
            (roots.mutation, "mutation", "a mutation"),
            (roots.subscription, "subscription", "a subscription"),
        ];
        for (root, operation, article) in entries {
            if root != Some(id) {
                continue;
            }
            let selection = self.names.selection(id);
            w.blank();
            w.line(&format!("/// Starts {article} on `{}`.", ty.name));
            w.open(&format!(
                "pub fn {operation}(build: impl FnOnce(&mut {selection})) -> {RT}::Operation {{"
            ));
            w.line(&format!("{RT}::Operation::{operation}({RT}::nested(build))"));
            w.close("}");
        }

        w.finish()
    }

    /// Writes the response model and, for abstract types, its variant enum.
    fn model(&self, w: &mut Writer, id: TypeId, ty: &NamedType, fields: &[&Field]) {
        let ident = self.names.ident(id);
        let mut methods = NameScope::with_reserved(Case::Snake, ["typename", "variant", "response"]);

        w.doc(ty.description.as_deref());
        w.line(&format!(
            "#[derive(Debug, Clone, PartialEq, {RT}::serde::Deserialize)]"
        ));
        w.line(&format!("#[serde(crate = \"{RT}::serde\", transparent)]"));
        w.open(&format!("pub struct {ident} {{"));
        w.line(&format!("data: {RT}::ResponseObject,"));
        w.close("}");
        w.blank();

        w.open(&format!("impl From<{RT}::ResponseObject> for {ident} {{"));
        w.open(&format!("fn from(data: {RT}::ResponseObject) -> Self {{"));
        w.line("Self { data }");
        w.close("}");
        w.close("}");
        w.blank();

        w.open(&format!("impl {ident} {{"));
        w.line("/// Returns the underlying response object.");
        w.open(&format!("pub fn response(&self) -> &{RT}::ResponseObject {{"));
        w.line("&self.data");
        w.close("}");
        w.blank();
        w.line("/// Returns `__typename`, which must have been selected.");
        w.open(&format!(
            "pub fn typename(&self) -> Result<&str, {RT}::ResponseError> {{"
        ));
        w.line("self.data.typename()");
        w.close("}");

        let plain: Vec<String> = fields.iter().map(|f| methods.claim(&f.name)).collect();
        let keyed: Vec<String> = fields
            .iter()
            .map(|f| methods.claim(&format!("{}_at", f.name)))
            .collect();
        for ((field, method), keyed) in fields.iter().zip(&plain).zip(&keyed) {
            let getter = if field.ty.is_non_null() {
                "required"
            } else {
                "optional"
            };
            let rust_ty = self.rust_type(&field.ty, false);
            w.blank();
            w.doc(field.description.as_deref());
            w.deprecated(field.deprecation.as_ref());
            w.open(&format!(
                "pub fn {method}(&self) -> Result<{rust_ty}, {RT}::ResponseError> {{"
            ));
            w.line(&format!("self.data.{getter}({:?})", field.name));
            w.close("}");
            w.blank();
            w.line(&format!(
                "/// Reads `{}` under a response key returned by the selection builder.",
                field.name
            ));
            w.deprecated(field.deprecation.as_ref());
            w.open(&format!(
                "pub fn {keyed}(&self, key: &str) -> Result<{rust_ty}, {RT}::ResponseError> {{"
            ));
            w.line(&format!("self.data.{getter}(key)"));
            w.close("}");
        }

        let members = self.members(ty);
        if let Some(variant) = &self.names.get(id).variant {
            w.blank();
            w.line("/// Returns the concrete type of this object.");
            w.open(&format!(
                "pub fn variant(&self) -> Result<{variant}, {RT}::ResponseError> {{"
            ));
            w.open("match self.data.typename()? {");
            for (member, case) in &members {
                w.line(&format!(
                    "{:?} => Ok({variant}::{case}({}::from(self.data.clone()))),",
                    self.graph.name_of(*member),
                    self.names.ident(*member)
                ));
            }
            w.open(&format!("other => Err({RT}::ResponseError::UnknownTypename {{"));
            w.line(&format!("abstract_type: {:?}.to_string(),", ty.name));
            w.line("typename: other.to_string(),");
            w.close("}),");
            w.close("}");
            w.close("}");
        }
        w.close("}");

        if let Some(variant) = &self.names.get(id).variant {
            w.blank();
            w.line(&format!("/// The possible concrete types of `{}`.", ty.name));
            w.line("#[derive(Debug, Clone, PartialEq)]");
            w.open(&format!("pub enum {variant} {{"));
            for (member, case) in &members {
                w.line(&format!("{case}({}),", self.names.ident(*member)));
            }
            w.close("}");
        }
    }

    /// Writes the selection builder.
    fn selection(&self, w: &mut Writer, id: TypeId, ty: &NamedType, fields: &[&Field]) {
        let builder = self.names.selection(id);
        let mut methods =
            NameScope::with_reserved(Case::Snake, ["typename", "into_selection", "default"]);

        w.line(&format!("/// Selects fields of `{}`.", ty.name));
        if ty.kind().is_abstract() {
            w.line("#[derive(Debug)]");
        } else {
            w.line("#[derive(Debug, Default)]");
        }
        w.open(&format!("pub struct {builder} {{"));
        w.line(&format!("selection: {RT}::SelectionSet,"));
        w.close("}");
        w.blank();

        if ty.kind().is_abstract() {
            w.open(&format!("impl Default for {builder} {{"));
            w.open("fn default() -> Self {");
            w.open("Self {");
            w.line(&format!("selection: {RT}::SelectionSet::with_typename(),"));
            w.close("}");
            w.close("}");
            w.close("}");
            w.blank();
        }

        w.open(&format!("impl {RT}::SelectionBuilder for {builder} {{"));
        w.open(&format!("fn into_selection(self) -> {RT}::SelectionSet {{"));
        w.line("self.selection");
        w.close("}");
        w.close("}");
        w.blank();

        w.open(&format!("impl {builder} {{"));
        w.line(&format!("/// Selects `{TYPENAME_FIELD}`."));
        w.open("pub fn typename(&mut self) -> &mut Self {");
        w.line("self.selection.add_typename();");
        w.line("self");
        w.close("}");

        let plain: Vec<String> = fields.iter().map(|f| methods.claim(&f.name)).collect();
        let keyed: Vec<String> = fields
            .iter()
            .map(|f| methods.claim(&format!("{}_keyed", f.name)))
            .collect();
        for ((field, method), keyed) in fields.iter().zip(&plain).zip(&keyed) {
            w.blank();
            self.field_method(w, method, keyed, field);
        }

        for (member, _) in self.members(ty) {
            let name = self.graph.name_of(member);
            let method = methods.claim(&format!("on_{}", to_snake_case(name)));
            w.blank();
            w.line(&format!("/// Selects fields when the object is a `{name}`."));
            w.open(&format!(
                "pub fn {method}(&mut self, build: impl FnOnce(&mut {})) -> &mut Self {{",
                self.names.selection(member)
            ));
            w.line(&format!(
                "self.selection.add_fragment({name:?}, {RT}::nested(build));"
            ));
            w.line("self");
            w.close("}");
        }
        w.close("}");
    }

    /// Writes the builder method for a field and its keyed variant, which
    /// returns the response key the occurrence answers under.
    fn field_method(&self, w: &mut Writer, method: &str, keyed: &str, field: &Field) {
        let mut params = NameScope::with_reserved(Case::Snake, ["build", "arguments", "self"]);
        let arguments: Vec<(String, &InputValue)> = field
            .arguments
            .iter()
            .map(|arg| (params.claim(&arg.name), arg))
            .collect();

        w.doc(field.description.as_deref());
        let documented: Vec<_> = arguments
            .iter()
            .filter(|(_, arg)| arg.description.is_some() || arg.default_value.is_some())
            .collect();
        if !documented.is_empty() {
            if field.description.is_some() {
                w.line("///");
            }
            for (param, arg) in documented {
                let mut line = format!("/// - `{param}`");
                if let Some(description) = arg.description.as_deref() {
                    line.push_str(": ");
                    line.push_str(description.lines().next().unwrap_or_default().trim());
                }
                if let Some(default) = &arg.default_value {
                    line.push_str(&format!(" (defaults to `{default}`)"));
                }
                w.line(&line);
            }
        }
        w.deprecated(field.deprecation.as_ref());

        let mut signature = vec!["&mut self".to_string()];
        let mut forwarded = Vec::new();
        for (param, arg) in &arguments {
            signature.push(format!("{param}: {}", self.rust_type(&arg.ty, false)));
            forwarded.push(param.clone());
        }
        let target = field.ty.named_type();
        let composite = self.graph.get(target).kind().is_composite();
        if composite {
            signature.push(format!(
                "build: impl FnOnce(&mut {})",
                self.names.selection(target)
            ));
            forwarded.push("build".to_string());
        }
        let signature = signature.join(", ");

        w.open(&format!("pub fn {method}({signature}) -> &mut Self {{"));
        w.line(&format!("self.{keyed}({});", forwarded.join(", ")));
        w.line("self");
        w.close("}");
        w.blank();

        w.line(&format!(
            "/// Selects `{}` and returns the key its result answers under.",
            field.name
        ));
        w.line("///");
        w.line("/// Selecting the field again with other arguments yields an alias key.");
        w.deprecated(field.deprecation.as_ref());
        w.open(&format!(
            "pub fn {keyed}({signature}) -> ::std::string::String {{"
        ));
        let argument_list = if arguments.is_empty() {
            "Vec::new()"
        } else {
            w.open("let arguments = [");
            for (param, arg) in &arguments {
                if arg.ty.is_non_null() {
                    w.line(&format!(
                        "Some({RT}::Argument::new({:?}, {param})),",
                        arg.name
                    ));
                } else {
                    w.line(&format!(
                        "{RT}::Argument::optional({:?}, {param}),",
                        arg.name
                    ));
                }
            }
            w.close("]");
            w.line(".into_iter()");
            w.line(".flatten()");
            w.line(".collect();");
            "arguments"
        };
        let nested = if composite {
            format!("Some({RT}::nested(build))")
        } else {
            "None".to_string()
        };
        w.line(&format!(
            "self.selection.add_field({:?}, {argument_list}, {nested})",
            field.name
        ));
        w.close("}");
    }

    fn enumeration(&self, id: TypeId, ty: &NamedType, values: &[EnumValue]) -> String {
        let ident = self.names.ident(id);
        let mut cases = NameScope::new(Case::Pascal);
        let values: Vec<(String, &EnumValue)> = values
            .iter()
            .map(|value| (cases.claim(&value.name), value))
            .collect();

        let mut w = Writer::new(&self.options.header);
        w.line("use super::*;");
        w.blank();
        w.doc(ty.description.as_deref());
        w.line(&format!(
            "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, {RT}::serde::Deserialize, {RT}::serde::Serialize)]"
        ));
        w.line(&format!("#[serde(crate = \"{RT}::serde\")]"));
        w.open(&format!("pub enum {ident} {{"));
        for (case, value) in &values {
            w.doc(value.description.as_deref());
            w.deprecated(value.deprecation.as_ref());
            w.line(&format!("#[serde(rename = {:?})]", value.name));
            w.line(&format!("{case},"));
        }
        w.close("}");
        w.blank();

        w.open(&format!("impl {ident} {{"));
        w.line("/// Returns the GraphQL name of this value.");
        w.open("pub const fn as_str(self) -> &'static str {");
        if values.is_empty() {
            w.line("match self {}");
        } else {
            w.open("match self {");
            for (case, value) in &values {
                w.line(&format!("Self::{case} => {:?},", value.name));
            }
            w.close("}");
        }
        w.close("}");
        w.close("}");
        w.blank();

        w.open(&format!("impl {RT}::IntoValue for {ident} {{"));
        w.open(&format!("fn into_value(self) -> {RT}::Value {{"));
        w.line(&format!("{RT}::Value::Enum(self.as_str().to_string())"));
        w.close("}");
        w.close("}");
        w.finish()
    }

    fn input_object(&self, id: TypeId, ty: &NamedType, input_fields: &[InputValue]) -> String {
        let ident = self.names.ident(id);
        let mut members = NameScope::with_reserved(Case::Snake, ["self"]);
        let input_fields: Vec<(String, &InputValue)> = input_fields
            .iter()
            .filter(|field| self.is_known(field.ty.named_type()))
            .map(|field| (members.claim(&field.name), field))
            .collect();

        let mut w = Writer::new(&self.options.header);
        w.line("use super::*;");
        w.blank();
        w.doc(ty.description.as_deref());
        w.line("#[derive(Debug, Clone)]");
        w.open(&format!("pub struct {ident} {{"));
        for (member, field) in &input_fields {
            w.doc(field.description.as_deref());
            let boxed = !field.ty.contains_list()
                && self.graph.get(field.ty.named_type()).kind() == TypeKind::InputObject;
            w.line(&format!("pub {member}: {},", self.rust_type(&field.ty, boxed)));
        }
        w.close("}");
        w.blank();

        w.open(&format!("impl {RT}::IntoValue for {ident} {{"));
        w.open(&format!("fn into_value(self) -> {RT}::Value {{"));
        w.line(&format!("{RT}::ObjectValue::new()"));
        w.indent += 1;
        for (member, field) in &input_fields {
            let setter = if field.ty.is_non_null() {
                "field"
            } else {
                "optional_field"
            };
            w.line(&format!(".{setter}({:?}, self.{member})", field.name));
        }
        w.line(".build()");
        w.indent -= 1;
        w.close("}");
        w.close("}");
        w.finish()
    }

    /// Renders a type reference. Nullable positions become `Option`.
    fn rust_type(&self, ty: &TypeRef, boxed: bool) -> String {
        match ty {
            TypeRef::NonNull(inner) => self.required_type(inner, boxed),
            other => format!("Option<{}>", self.required_type(other, boxed)),
        }
    }

    fn required_type(&self, ty: &TypeRef, boxed: bool) -> String {
        match ty {
            TypeRef::NonNull(inner) => self.required_type(inner, boxed),
            TypeRef::List(inner) => format!("Vec<{}>", self.rust_type(inner, false)),
            TypeRef::Named(id) if boxed => format!("Box<{}>", self.names.ident(*id)),
            TypeRef::Named(id) => self.names.ident(*id).to_string(),
        }
    }

    /// Returns true if the named type exists in the generated code.
    fn is_known(&self, id: TypeId) -> bool {
        let ty = self.graph.get(id);
        ty.kind() == TypeKind::Scalar || is_emitted(ty, self.options)
    }

    /// Fields pointing at types left out of the output are skipped.
    fn is_usable(&self, field: &Field) -> bool {
        self.is_known(field.ty.named_type())
            && field
                .arguments
                .iter()
                .all(|arg| self.is_known(arg.ty.named_type()))
    }

    /// Returns the emitted possible types with their variant names.
    fn members(&self, ty: &NamedType) -> Vec<(TypeId, String)> {
        let mut cases = NameScope::new(Case::Pascal);
        ty.possible_types()
            .iter()
            .filter(|member| self.names.get(**member).selection.is_some())
            .map(|member| (*member, cases.claim(self.graph.name_of(*member))))
            .collect()
    }
}
