//! Integration tests for code generation.

use gryphin_codegen::{generate, CodeGenerator, CodegenOptions, UnitKind};
use gryphin_schema::{ingest_value, scalars, ScalarOverride, ScalarSource, TypeGraph};
use serde_json::{json, Value};
use std::path::Path;

fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

fn field(name: &str, ty: Value) -> Value {
    json!({ "name": name, "args": [], "type": ty, "isDeprecated": false })
}

fn schema() -> TypeGraph {
    ingest_value(json!({
        "data": {
            "__schema": {
                "queryType": { "name": "Query" },
                "mutationType": null,
                "subscriptionType": null,
                "types": [
                    {
                        "kind": "OBJECT",
                        "name": "Query",
                        "fields": [
                            field("viewer", non_null(named("OBJECT", "User"))),
                            {
                                "name": "node",
                                "args": [
                                    { "name": "id", "type": non_null(named("SCALAR", "ID")) }
                                ],
                                "type": named("INTERFACE", "Node"),
                                "isDeprecated": false
                            },
                            {
                                "name": "posts",
                                "args": [
                                    { "name": "filter", "type": named("INPUT_OBJECT", "PostFilter") },
                                    { "name": "first", "description": "Page size.", "type": named("SCALAR", "Int"), "defaultValue": "10" }
                                ],
                                "type": non_null(list(non_null(named("OBJECT", "Post")))),
                                "isDeprecated": false
                            },
                            field("search", non_null(list(non_null(named("UNION", "SearchResult")))))
                        ]
                    },
                    {
                        "kind": "INTERFACE",
                        "name": "Node",
                        "fields": [field("id", non_null(named("SCALAR", "ID")))],
                        "possibleTypes": [named("OBJECT", "User"), named("OBJECT", "Post")]
                    },
                    {
                        "kind": "OBJECT",
                        "name": "User",
                        "description": "A registered user.",
                        "fields": [
                            field("id", non_null(named("SCALAR", "ID"))),
                            field("name", named("SCALAR", "String")),
                            field("posts", list(named("OBJECT", "Post"))),
                            field("role", named("ENUM", "Role"))
                        ],
                        "interfaces": [named("INTERFACE", "Node")]
                    },
                    {
                        "kind": "OBJECT",
                        "name": "Post",
                        "fields": [
                            field("id", non_null(named("SCALAR", "ID"))),
                            field("createdAt", non_null(named("SCALAR", "DateTime"))),
                            {
                                "name": "legacyTitle",
                                "args": [],
                                "type": named("SCALAR", "String"),
                                "isDeprecated": true,
                                "deprecationReason": "Use `title`."
                            }
                        ],
                        "interfaces": [named("INTERFACE", "Node")]
                    },
                    {
                        "kind": "UNION",
                        "name": "SearchResult",
                        "possibleTypes": [named("OBJECT", "User"), named("OBJECT", "Post")]
                    },
                    {
                        "kind": "ENUM",
                        "name": "Role",
                        "enumValues": [
                            { "name": "ADMIN", "isDeprecated": false },
                            { "name": "IN_REVIEW", "isDeprecated": false }
                        ]
                    },
                    {
                        "kind": "INPUT_OBJECT",
                        "name": "PostFilter",
                        "inputFields": [
                            { "name": "author", "type": named("SCALAR", "ID") },
                            { "name": "role", "type": non_null(named("ENUM", "Role")) },
                            { "name": "and", "type": list(non_null(named("INPUT_OBJECT", "PostFilter"))) },
                            { "name": "not", "type": named("INPUT_OBJECT", "PostFilter") }
                        ]
                    },
                    { "kind": "SCALAR", "name": "ID" },
                    { "kind": "SCALAR", "name": "Int" },
                    { "kind": "SCALAR", "name": "String" },
                    { "kind": "SCALAR", "name": "DateTime", "description": "An ISO-8601 timestamp." },
                    {
                        "kind": "OBJECT",
                        "name": "__Type",
                        "fields": [field("name", named("SCALAR", "String"))]
                    }
                ]
            }
        }
    }))
    .unwrap()
}

fn content<'a>(output: &'a gryphin_codegen::GeneratedOutput, path: &str) -> &'a str {
    &output.unit(path).unwrap().content
}

#[test]
fn test_units_follow_ingestion_order() {
    let output = generate(&schema());

    let paths: Vec<_> = output
        .units()
        .iter()
        .map(|u| u.relative_path.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        paths,
        vec![
            "mod.rs",
            "aliases.rs",
            "query.rs",
            "node.rs",
            "user.rs",
            "post.rs",
            "search_result.rs",
            "role.rs",
            "post_filter.rs",
        ]
    );

    let kinds: Vec<_> = output.units().iter().skip(2).map(|u| u.kind).collect();
    assert_eq!(
        kinds,
        vec![
            UnitKind::Object,
            UnitKind::Interface,
            UnitKind::Object,
            UnitKind::Object,
            UnitKind::Union,
            UnitKind::Enum,
            UnitKind::InputObject,
        ]
    );
}

#[test]
fn test_generation_is_deterministic() {
    let graph = schema();
    assert_eq!(generate(&graph), generate(&graph));
    assert_eq!(generate(&graph), generate(&schema()));
}

#[test]
fn test_module_declares_every_unit() {
    let output = generate(&schema());
    let module = content(&output, "mod.rs");

    assert!(module.starts_with("// Generated by Gryphin. Do not edit.\n"));
    assert!(module.contains("#![allow(non_camel_case_types"));
    for name in ["aliases", "query", "node", "user", "post", "search_result", "role", "post_filter"] {
        assert!(module.contains(&format!("pub mod {name};\n")), "{name}");
        assert!(module.contains(&format!("pub use {name}::*;\n")), "{name}");
    }
}

#[test]
fn test_object_model_accessors() {
    let output = generate(&schema());
    let user = content(&output, "user.rs");

    assert!(user.contains("use super::*;"));
    assert!(user.contains("/// A registered user.\n"));
    assert!(user.contains("pub struct User {\n    data: ::gryphin_runtime::ResponseObject,\n}"));
    assert!(user.contains(
        "    pub fn id(&self) -> Result<ID, ::gryphin_runtime::ResponseError> {\n        self.data.required(\"id\")\n    }"
    ));
    assert!(user.contains(
        "    pub fn name(&self) -> Result<Option<String>, ::gryphin_runtime::ResponseError> {\n        self.data.optional(\"name\")\n    }"
    ));
    assert!(user.contains(
        "pub fn posts(&self) -> Result<Option<Vec<Option<Post>>>, ::gryphin_runtime::ResponseError> {"
    ));
    assert!(user.contains("pub fn role(&self) -> Result<Option<Role>, ::gryphin_runtime::ResponseError> {"));
}

#[test]
fn test_repeated_selections_are_reachable_by_key() {
    let output = generate(&schema());
    let query = content(&output, "query.rs");

    assert!(query.contains(
        "    pub fn node_at(&self, key: &str) -> Result<Option<Node>, ::gryphin_runtime::ResponseError> {\n        self.data.optional(key)\n    }"
    ));
    assert!(query.contains(
        "    pub fn node(&mut self, id: ID, build: impl FnOnce(&mut NodeSelection)) -> &mut Self {\n        self.node_keyed(id, build);\n        self\n    }"
    ));
    assert!(query.contains(
        "pub fn node_keyed(&mut self, id: ID, build: impl FnOnce(&mut NodeSelection)) -> ::std::string::String {"
    ));
    assert!(query.contains(
        "        self.selection.add_field(\"node\", arguments, Some(::gryphin_runtime::nested(build)))\n    }"
    ));

    let post = content(&output, "post.rs");
    assert!(post.contains(
        "pub fn created_at_at(&self, key: &str) -> Result<DateTime, ::gryphin_runtime::ResponseError> {"
    ));
}

#[test]
fn test_selection_builder_methods() {
    let output = generate(&schema());
    let query = content(&output, "query.rs");

    assert!(query.contains("#[derive(Debug, Default)]\npub struct QuerySelection {"));
    assert!(query.contains(
        "    pub fn viewer(&mut self, build: impl FnOnce(&mut UserSelection)) -> &mut Self {\n        self.viewer_keyed(build);\n        self\n    }"
    ));
    assert!(query.contains(
        "    pub fn viewer_keyed(&mut self, build: impl FnOnce(&mut UserSelection)) -> ::std::string::String {\n        self.selection.add_field(\"viewer\", Vec::new(), Some(::gryphin_runtime::nested(build)))\n    }"
    ));
    assert!(query.contains(
        "pub fn node(&mut self, id: ID, build: impl FnOnce(&mut NodeSelection)) -> &mut Self {"
    ));
    assert!(query.contains("Some(::gryphin_runtime::Argument::new(\"id\", id)),"));
    assert!(query.contains(
        "pub fn posts(&mut self, filter: Option<PostFilter>, first: Option<Int>, build: impl FnOnce(&mut PostSelection)) -> &mut Self {"
    ));
    assert!(query.contains("::gryphin_runtime::Argument::optional(\"first\", first),"));
    assert!(query.contains("/// - `first`: Page size. (defaults to `10`)"));

    let user = content(&output, "user.rs");
    assert!(user.contains(
        "    pub fn name(&mut self) -> &mut Self {\n        self.name_keyed();\n        self\n    }"
    ));
    assert!(user.contains(
        "    pub fn name_keyed(&mut self) -> ::std::string::String {\n        self.selection.add_field(\"name\", Vec::new(), None)\n    }"
    ));
    assert!(user.contains("pub fn typename(&mut self) -> &mut Self {"));
}

#[test]
fn test_root_entry_point() {
    let output = generate(&schema());
    let query = content(&output, "query.rs");

    assert!(query.contains(
        "pub fn query(build: impl FnOnce(&mut QuerySelection)) -> ::gryphin_runtime::Operation {\n    ::gryphin_runtime::Operation::query(::gryphin_runtime::nested(build))\n}"
    ));
    assert!(!query.contains("pub fn mutation("));
    assert!(!content(&output, "user.rs").contains("pub fn query("));
}

#[test]
fn test_abstract_types_dispatch_on_typename() {
    let output = generate(&schema());

    for path in ["node.rs", "search_result.rs"] {
        let unit = content(&output, path);
        assert!(unit.contains("selection: ::gryphin_runtime::SelectionSet::with_typename(),"));
        assert!(unit.contains(
            "pub fn on_user(&mut self, build: impl FnOnce(&mut UserSelection)) -> &mut Self {"
        ));
        assert!(unit.contains("self.selection.add_fragment(\"Post\", ::gryphin_runtime::nested(build));"));
    }

    let node = content(&output, "node.rs");
    assert!(node.contains("pub enum NodeVariant {\n    User(User),\n    Post(Post),\n}"));
    assert!(node.contains("\"User\" => Ok(NodeVariant::User(User::from(self.data.clone()))),"));
    assert!(node.contains("abstract_type: \"Node\".to_string(),"));

    let search = content(&output, "search_result.rs");
    assert!(search.contains("pub enum SearchResultVariant {"));
    assert!(search.contains("pub fn variant(&self) -> Result<SearchResultVariant, ::gryphin_runtime::ResponseError> {"));
}

#[test]
fn test_enum_unit() {
    let output = generate(&schema());

    insta::assert_snapshot!(content(&output, "role.rs"), @r##"
    // Generated by Gryphin. Do not edit.

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::gryphin_runtime::serde::Deserialize, ::gryphin_runtime::serde::Serialize)]
    #[serde(crate = "::gryphin_runtime::serde")]
    pub enum Role {
        #[serde(rename = "ADMIN")]
        Admin,
        #[serde(rename = "IN_REVIEW")]
        InReview,
    }

    impl Role {
        /// Returns the GraphQL name of this value.
        pub const fn as_str(self) -> &'static str {
            match self {
                Self::Admin => "ADMIN",
                Self::InReview => "IN_REVIEW",
            }
        }
    }

    impl ::gryphin_runtime::IntoValue for Role {
        fn into_value(self) -> ::gryphin_runtime::Value {
            ::gryphin_runtime::Value::Enum(self.as_str().to_string())
        }
    }
    "##);
}

#[test]
fn test_input_object_unit() {
    let output = generate(&schema());
    let filter = content(&output, "post_filter.rs");

    assert!(filter.contains("    pub author: Option<ID>,\n"));
    assert!(filter.contains("    pub role: Role,\n"));
    assert!(filter.contains("    pub and: Option<Vec<PostFilter>>,\n"));
    assert!(filter.contains("    pub not: Option<Box<PostFilter>>,\n"));
    assert!(filter.contains(".optional_field(\"author\", self.author)"));
    assert!(filter.contains(".field(\"role\", self.role)"));
}

#[test]
fn test_deprecated_field() {
    let output = generate(&schema());
    let post = content(&output, "post.rs");

    assert!(post.contains("#[deprecated(note = \"Use `title`.\")]\n    pub fn legacy_title(&self)"));
    assert!(post.contains("#[deprecated(note = \"Use `title`.\")]\n    pub fn legacy_title(&mut self)"));
    assert!(post.contains("self.data.required(\"createdAt\")"));
    assert!(post.contains("pub fn created_at(&self) -> Result<DateTime, ::gryphin_runtime::ResponseError> {"));
}

#[test]
fn test_introspection_types_are_opt_in() {
    let graph = schema();
    assert!(generate(&graph).unit("__type.rs").is_none());

    let output = CodeGenerator::with_options(
        &graph,
        CodegenOptions {
            include_introspection_types: true,
            ..CodegenOptions::default()
        },
    )
    .generate();
    assert_eq!(output.unit("__type.rs").unwrap().kind, UnitKind::Object);
    assert!(content(&output, "mod.rs").contains("pub mod __type;"));
}

#[test]
fn test_aliases_unit_defaults() {
    let output = generate(&schema());
    assert_eq!(output.of_kind(UnitKind::Aliases).count(), 1);

    let aliases = &output.aliases().content;
    assert!(aliases.contains("pub type Int = i32;\n"));
    assert!(aliases.contains("pub type Float = f64;\n"));
    assert!(aliases.contains("pub type Boolean = bool;\n"));
    assert!(aliases.contains("pub type ID = ::std::string::String;\n"));
    assert!(aliases.contains(
        "/// An ISO-8601 timestamp.\npub type DateTime = ::std::string::String;\n"
    ));
}

#[test]
fn test_scalar_overrides_end_to_end() {
    let mut graph = schema();
    let overrides = vec![
        ScalarOverride::new("DateTime", ScalarSource::File("scalars/time.rs".into())),
        ScalarOverride::new(
            "Int",
            ScalarSource::Inline("pub type Int = i64;".into()),
        ),
    ];
    let report = scalars::merge(&overrides, &mut graph);
    assert_eq!(report.applied.len(), 1);

    let mut output = generate(&graph);
    assert!(!output.aliases().content.contains("pub type DateTime"));

    let loader = |path: &Path| -> Result<String, std::io::Error> {
        assert_eq!(path, Path::new("scalars/time.rs"));
        Ok("pub type DateTime = chrono::DateTime<chrono::Utc>;".to_string())
    };
    output.append_file_overrides(&graph, &overrides, &loader).unwrap();

    let aliases = &output.aliases().content;
    assert!(aliases.ends_with("\npub type DateTime = chrono::DateTime<chrono::Utc>;\n"));
    assert!(aliases.contains("pub type Int = i32;\n"));
    assert!(!aliases.contains("i64"));
}

#[test]
fn test_inline_overrides_are_deduplicated() {
    let mut graph = ingest_value(json!({
        "types": [
            { "kind": "SCALAR", "name": "Date" },
            { "kind": "SCALAR", "name": "Time" }
        ]
    }))
    .unwrap();
    let text = "pub type Date = u32;\npub type Time = u32;";
    scalars::merge(
        &[
            ScalarOverride::new("Date", ScalarSource::Inline(text.into())),
            ScalarOverride::new("Time", ScalarSource::Inline(text.into())),
        ],
        &mut graph,
    );

    let output = generate(&graph);
    let aliases = &output.aliases().content;
    assert_eq!(aliases.matches("pub type Date = u32;").count(), 1);
    assert!(aliases.ends_with("\n\npub type Date = u32;\npub type Time = u32;\n"));
}
