//! Introspection JSON ingestion.
//!
//! Building the graph takes two passes over the type list. The first pass
//! registers every name with an empty body; the second fills the bodies,
//! resolving `{kind, name, ofType}` reference chains against the names
//! registered in the first pass. References may therefore point forward or
//! back at their own type.

use crate::error::{SchemaError, SchemaResult};
use crate::graph::{
    Deprecation, EnumValue, Field, InputValue, RootTypes, TypeBody, TypeGraph, TypeId, TypeKind,
    TypeRef,
};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSchema {
    query_type: Option<RawRootRef>,
    mutation_type: Option<RawRootRef>,
    subscription_type: Option<RawRootRef>,
    types: Vec<RawType>,
}

#[derive(Debug, Deserialize)]
struct RawRootRef {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawType {
    kind: String,
    name: String,
    description: Option<String>,
    fields: Option<Vec<RawField>>,
    interfaces: Option<Vec<RawTypeRef>>,
    possible_types: Option<Vec<RawTypeRef>>,
    enum_values: Option<Vec<RawEnumValue>>,
    input_fields: Option<Vec<RawInputValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    name: String,
    description: Option<String>,
    args: Option<Vec<RawInputValue>>,
    #[serde(rename = "type")]
    ty: RawTypeRef,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInputValue {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    ty: RawTypeRef,
    default_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEnumValue {
    name: String,
    description: Option<String>,
    #[serde(default)]
    is_deprecated: bool,
    deprecation_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTypeRef {
    kind: String,
    name: Option<String>,
    of_type: Option<Box<RawTypeRef>>,
}

/// The `kind` tags an introspection result may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KindTag {
    Named(TypeKind),
    List,
    NonNull,
}

impl KindTag {
    fn parse(tag: &str, location: impl FnOnce() -> String) -> SchemaResult<Self> {
        Ok(match tag {
            "OBJECT" => Self::Named(TypeKind::Object),
            "INTERFACE" => Self::Named(TypeKind::Interface),
            "UNION" => Self::Named(TypeKind::Union),
            "ENUM" => Self::Named(TypeKind::Enum),
            "SCALAR" => Self::Named(TypeKind::Scalar),
            "INPUT_OBJECT" => Self::Named(TypeKind::InputObject),
            "LIST" => Self::List,
            "NON_NULL" => Self::NonNull,
            other => {
                return Err(SchemaError::UnknownKind {
                    kind: other.to_string(),
                    location: location(),
                })
            }
        })
    }
}

/// Ingests an introspection result from JSON text.
///
/// # Errors
///
/// Returns a [`SchemaError`] if the text is not JSON, does not have the
/// introspection shape, carries an unknown kind, or references a type that is
/// not declared.
pub fn ingest(raw: &str) -> SchemaResult<TypeGraph> {
    let value: Value = serde_json::from_str(raw)?;
    ingest_value(value)
}

/// Ingests an already parsed introspection result.
///
/// Accepts `{"data": {"__schema": ...}}`, `{"__schema": ...}` or the schema
/// object itself.
///
/// # Errors
///
/// See [`ingest`].
pub fn ingest_value(value: Value) -> SchemaResult<TypeGraph> {
    let value = unwrap_envelope(value)?;
    let schema: RawSchema = serde_path_to_error::deserialize(value)
        .map_err(|err| SchemaError::format(err.path().to_string(), err.inner().to_string()))?;

    let mut graph = TypeGraph::new();
    let ids = register_types(&schema.types, &mut graph)?;
    debug!(types = ids.len(), "registered type names");

    for (raw, &id) in schema.types.iter().zip(&ids) {
        let body = Resolver { graph: &graph }.resolve_body(raw, graph.get(id).kind())?;
        graph.set_body(id, body);
    }
    debug!("resolved type bodies");

    let resolver = Resolver { graph: &graph };
    let roots = RootTypes {
        query: resolver.resolve_root(schema.query_type.as_ref(), "queryType")?,
        mutation: resolver.resolve_root(schema.mutation_type.as_ref(), "mutationType")?,
        subscription: resolver.resolve_root(schema.subscription_type.as_ref(), "subscriptionType")?,
    };
    graph.set_roots(roots);

    Ok(graph)
}

fn unwrap_envelope(mut value: Value) -> SchemaResult<Value> {
    if let Some(data) = value.get_mut("data") {
        value = data.take();
    }
    if let Some(schema) = value.get_mut("__schema") {
        value = schema.take();
    }
    if value.is_object() {
        Ok(value)
    } else {
        Err(SchemaError::format(".", "expected an introspection schema object"))
    }
}

/// First pass: registers every named type with an empty body.
fn register_types(types: &[RawType], graph: &mut TypeGraph) -> SchemaResult<Vec<TypeId>> {
    let mut ids = Vec::with_capacity(types.len());

    for (i, raw) in types.iter().enumerate() {
        let kind = match KindTag::parse(&raw.kind, || format!("types[{i}].kind"))? {
            KindTag::Named(kind) => kind,
            KindTag::List | KindTag::NonNull => {
                return Err(SchemaError::format(
                    format!("types[{i}].kind"),
                    format!("wrapper kind `{}` cannot declare a named type", raw.kind),
                ))
            }
        };

        let id = graph
            .register(raw.name.clone(), raw.description.clone(), kind)
            .map_err(|err| SchemaError::format(format!("types[{i}].name"), err.to_string()))?;
        ids.push(id);
    }

    Ok(ids)
}

/// Second pass: resolves references against the registered names.
struct Resolver<'g> {
    graph: &'g TypeGraph,
}

impl Resolver<'_> {
    fn resolve_body(&self, raw: &RawType, kind: TypeKind) -> SchemaResult<TypeBody> {
        let owner = raw.name.as_str();
        Ok(match kind {
            TypeKind::Object => TypeBody::Object {
                fields: self.resolve_fields(owner, raw.fields.as_deref())?,
                interfaces: self.resolve_named_list(owner, raw.interfaces.as_deref())?,
            },
            TypeKind::Interface => TypeBody::Interface {
                fields: self.resolve_fields(owner, raw.fields.as_deref())?,
                possible_types: self.resolve_named_list(owner, raw.possible_types.as_deref())?,
            },
            TypeKind::Union => TypeBody::Union {
                possible_types: self.resolve_named_list(owner, raw.possible_types.as_deref())?,
            },
            TypeKind::Enum => TypeBody::Enum {
                values: resolve_enum_values(owner, raw.enum_values.as_deref())?,
            },
            TypeKind::Scalar => TypeBody::Scalar {
                override_source: None,
            },
            TypeKind::InputObject => TypeBody::InputObject {
                input_fields: self.resolve_input_values(owner, raw.input_fields.as_deref())?,
            },
        })
    }

    fn resolve_fields(&self, owner: &str, raw: Option<&[RawField]>) -> SchemaResult<Vec<Field>> {
        let raw = raw.unwrap_or_default();
        ensure_unique(owner, raw.iter().map(|f| f.name.as_str()))?;

        raw.iter()
            .map(|field| {
                let referrer = format!("{owner}.{}", field.name);
                Ok(Field {
                    name: field.name.clone(),
                    description: field.description.clone(),
                    ty: self.resolve_ref(&field.ty, &referrer)?,
                    arguments: self.resolve_input_values(&referrer, field.args.as_deref())?,
                    deprecation: field.is_deprecated.then(|| Deprecation {
                        reason: field.deprecation_reason.clone(),
                    }),
                })
            })
            .collect()
    }

    fn resolve_input_values(
        &self,
        owner: &str,
        raw: Option<&[RawInputValue]>,
    ) -> SchemaResult<Vec<InputValue>> {
        let raw = raw.unwrap_or_default();
        ensure_unique(owner, raw.iter().map(|v| v.name.as_str()))?;

        raw.iter()
            .map(|value| {
                Ok(InputValue {
                    name: value.name.clone(),
                    description: value.description.clone(),
                    ty: self.resolve_ref(&value.ty, &format!("{owner}({})", value.name))?,
                    default_value: value.default_value.clone(),
                })
            })
            .collect()
    }

    fn resolve_named_list(
        &self,
        owner: &str,
        raw: Option<&[RawTypeRef]>,
    ) -> SchemaResult<Vec<TypeId>> {
        raw.unwrap_or_default()
            .iter()
            .map(|reference| match self.resolve_ref(reference, owner)? {
                TypeRef::Named(id) => Ok(id),
                TypeRef::List(_) | TypeRef::NonNull(_) => Err(SchemaError::format(
                    owner,
                    "interfaces and possible types must be named types",
                )),
            })
            .collect()
    }

    /// Unwinds a `{kind, name, ofType}` chain.
    fn resolve_ref(&self, raw: &RawTypeRef, referrer: &str) -> SchemaResult<TypeRef> {
        let tag = KindTag::parse(&raw.kind, || referrer.to_string())?;
        match tag {
            KindTag::List => {
                let inner = self.resolve_wrapped(raw, referrer)?;
                Ok(TypeRef::List(Box::new(inner)))
            }
            KindTag::NonNull => {
                let inner = self.resolve_wrapped(raw, referrer)?;
                if inner.is_non_null() {
                    return Err(SchemaError::format(
                        referrer,
                        "NON_NULL cannot wrap another NON_NULL",
                    ));
                }
                Ok(TypeRef::NonNull(Box::new(inner)))
            }
            KindTag::Named(expected) => {
                let name = raw.name.as_deref().ok_or_else(|| {
                    SchemaError::format(referrer, format!("{expected} reference without a name"))
                })?;
                let id = self
                    .graph
                    .lookup(name)
                    .ok_or_else(|| SchemaError::Reference {
                        referrer: referrer.to_string(),
                        name: name.to_string(),
                    })?;
                let actual = self.graph.get(id).kind();
                if actual != expected {
                    return Err(SchemaError::KindMismatch {
                        referrer: referrer.to_string(),
                        name: name.to_string(),
                        expected: expected.to_string(),
                        actual: actual.to_string(),
                    });
                }
                Ok(TypeRef::Named(id))
            }
        }
    }

    fn resolve_wrapped(&self, raw: &RawTypeRef, referrer: &str) -> SchemaResult<TypeRef> {
        let inner = raw.of_type.as_deref().ok_or_else(|| {
            SchemaError::format(referrer, format!("{} reference without `ofType`", raw.kind))
        })?;
        self.resolve_ref(inner, referrer)
    }

    fn resolve_root(&self, raw: Option<&RawRootRef>, key: &str) -> SchemaResult<Option<TypeId>> {
        let Some(root) = raw else {
            return Ok(None);
        };
        let id = self
            .graph
            .lookup(&root.name)
            .ok_or_else(|| SchemaError::Reference {
                referrer: key.to_string(),
                name: root.name.clone(),
            })?;
        let actual = self.graph.get(id).kind();
        if actual != TypeKind::Object {
            return Err(SchemaError::KindMismatch {
                referrer: key.to_string(),
                name: root.name.clone(),
                expected: TypeKind::Object.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(Some(id))
    }
}

fn resolve_enum_values(owner: &str, raw: Option<&[RawEnumValue]>) -> SchemaResult<Vec<EnumValue>> {
    let raw = raw.unwrap_or_default();
    ensure_unique(owner, raw.iter().map(|v| v.name.as_str()))?;

    Ok(raw
        .iter()
        .map(|value| EnumValue {
            name: value.name.clone(),
            description: value.description.clone(),
            deprecation: value.is_deprecated.then(|| Deprecation {
                reason: value.deprecation_reason.clone(),
            }),
        })
        .collect())
}

fn ensure_unique<'a>(owner: &str, names: impl Iterator<Item = &'a str>) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(SchemaError::format(owner, format!("duplicate member `{name}`")));
        }
    }
    Ok(())
}
