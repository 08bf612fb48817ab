//! The type graph.
//!
//! Named types live in an arena addressed by [`TypeId`]. Every cross
//! reference (field result types, arguments, interfaces, possible types) is
//! an id into that arena, so the ownership structure stays a tree even though
//! the schema itself is cyclic.

use crate::scalars::ScalarSource;
use indexmap::IndexMap;
use thiserror::Error;

/// Scalars every GraphQL schema provides.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// Identifies a named type in a [`TypeGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    fn from_index(index: usize) -> Result<Self, RegisterError> {
        u32::try_from(index)
            .map(Self)
            .map_err(|_| RegisterError::Capacity(index))
    }

    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Why [`TypeGraph::register`] refused a type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("duplicate type name `{0}`")]
    Duplicate(String),

    /// Ids are 32-bit; the graph cannot address this many types.
    #[error("too many types: cannot register type number {0}")]
    Capacity(usize),
}

/// The kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    InputObject,
}

impl TypeKind {
    /// Returns the introspection tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "OBJECT",
            Self::Interface => "INTERFACE",
            Self::Union => "UNION",
            Self::Enum => "ENUM",
            Self::Scalar => "SCALAR",
            Self::InputObject => "INPUT_OBJECT",
        }
    }

    /// Returns true for types selected through a nested selection set.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Object | Self::Interface | Self::Union)
    }

    /// Returns true for types whose concrete type is only known at runtime.
    #[must_use]
    pub const fn is_abstract(self) -> bool {
        matches!(self, Self::Interface | Self::Union)
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A possibly wrapped reference to a named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(TypeId),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    /// Returns the named type at the bottom of the wrapper chain.
    #[must_use]
    pub fn named_type(&self) -> TypeId {
        match self {
            Self::Named(id) => *id,
            Self::List(inner) | Self::NonNull(inner) => inner.named_type(),
        }
    }

    /// Returns true if the outermost wrapper is non-null.
    #[must_use]
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns true if a list wrapper appears anywhere in the chain.
    #[must_use]
    pub fn contains_list(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::List(_) => true,
            Self::NonNull(inner) => inner.contains_list(),
        }
    }
}

/// Deprecation marker on a field or enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    pub reason: Option<String>,
}

/// An argument or input object field.
#[derive(Debug, Clone)]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    /// The default value as a GraphQL literal.
    pub default_value: Option<String>,
}

/// A field of an object or interface type.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub ty: TypeRef,
    pub arguments: Vec<InputValue>,
    pub deprecation: Option<Deprecation>,
}

/// A member of an enum type.
#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub deprecation: Option<Deprecation>,
}

/// Kind-specific contents of a named type.
#[derive(Debug, Clone)]
pub enum TypeBody {
    Object {
        fields: Vec<Field>,
        interfaces: Vec<TypeId>,
    },
    Interface {
        fields: Vec<Field>,
        possible_types: Vec<TypeId>,
    },
    Union {
        possible_types: Vec<TypeId>,
    },
    Enum {
        values: Vec<EnumValue>,
    },
    Scalar {
        override_source: Option<ScalarSource>,
    },
    InputObject {
        input_fields: Vec<InputValue>,
    },
}

impl TypeBody {
    /// Returns an empty body of the given kind.
    #[must_use]
    pub fn empty(kind: TypeKind) -> Self {
        match kind {
            TypeKind::Object => Self::Object {
                fields: Vec::new(),
                interfaces: Vec::new(),
            },
            TypeKind::Interface => Self::Interface {
                fields: Vec::new(),
                possible_types: Vec::new(),
            },
            TypeKind::Union => Self::Union {
                possible_types: Vec::new(),
            },
            TypeKind::Enum => Self::Enum { values: Vec::new() },
            TypeKind::Scalar => Self::Scalar {
                override_source: None,
            },
            TypeKind::InputObject => Self::InputObject {
                input_fields: Vec::new(),
            },
        }
    }

    /// Returns the kind of this body.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Object { .. } => TypeKind::Object,
            Self::Interface { .. } => TypeKind::Interface,
            Self::Union { .. } => TypeKind::Union,
            Self::Enum { .. } => TypeKind::Enum,
            Self::Scalar { .. } => TypeKind::Scalar,
            Self::InputObject { .. } => TypeKind::InputObject,
        }
    }
}

/// A named type in the graph.
#[derive(Debug, Clone)]
pub struct NamedType {
    pub name: String,
    pub description: Option<String>,
    pub body: TypeBody,
}

impl NamedType {
    /// Returns the kind of this type.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.body.kind()
    }

    /// Returns the fields of an object or interface, empty otherwise.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        match &self.body {
            TypeBody::Object { fields, .. } | TypeBody::Interface { fields, .. } => fields,
            _ => &[],
        }
    }

    /// Returns the possible types of an interface or union, empty otherwise.
    #[must_use]
    pub fn possible_types(&self) -> &[TypeId] {
        match &self.body {
            TypeBody::Interface { possible_types, .. } | TypeBody::Union { possible_types } => {
                possible_types
            }
            _ => &[],
        }
    }

    /// Returns the override attached to a scalar, if any.
    #[must_use]
    pub fn scalar_override(&self) -> Option<&ScalarSource> {
        match &self.body {
            TypeBody::Scalar { override_source } => override_source.as_ref(),
            _ => None,
        }
    }

    /// Returns true for the scalars every schema provides.
    #[must_use]
    pub fn is_builtin_scalar(&self) -> bool {
        self.kind() == TypeKind::Scalar && BUILTIN_SCALARS.contains(&self.name.as_str())
    }

    /// Returns true for the introspection meta types (`__Type`, `__Schema`, ...).
    #[must_use]
    pub fn is_introspection(&self) -> bool {
        self.name.starts_with("__")
    }
}

/// The root operation types of a schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootTypes {
    pub query: Option<TypeId>,
    pub mutation: Option<TypeId>,
    pub subscription: Option<TypeId>,
}

/// All named types of a schema.
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    types: Vec<NamedType>,
    index: IndexMap<String, TypeId>,
    roots: RootTypes,
}

impl TypeGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a named type with an empty body.
    ///
    /// # Errors
    ///
    /// Fails if the name is already registered or the id space is exhausted.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        kind: TypeKind,
    ) -> Result<TypeId, RegisterError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(RegisterError::Duplicate(name));
        }

        let id = TypeId::from_index(self.types.len())?;
        self.index.insert(name.clone(), id);
        self.types.push(NamedType {
            name,
            description,
            body: TypeBody::empty(kind),
        });
        Ok(id)
    }

    /// Replaces the body of a registered type.
    pub(crate) fn set_body(&mut self, id: TypeId, body: TypeBody) {
        debug_assert_eq!(self.types[id.index()].kind(), body.kind());
        self.types[id.index()].body = body;
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> &mut NamedType {
        &mut self.types[id.index()]
    }

    pub(crate) fn set_roots(&mut self, roots: RootTypes) {
        self.roots = roots;
    }

    /// Returns the type with the given id.
    ///
    /// Ids are only handed out by this graph, so every id resolves.
    #[must_use]
    pub fn get(&self, id: TypeId) -> &NamedType {
        &self.types[id.index()]
    }

    /// Returns the name of the type with the given id.
    #[must_use]
    pub fn name_of(&self, id: TypeId) -> &str {
        &self.get(id).name
    }

    /// Looks up a type id by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.index.get(name).copied()
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&NamedType> {
        self.lookup(name).map(|id| self.get(id))
    }

    /// Iterates over all types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &NamedType)> {
        self.index.values().map(|&id| (id, self.get(id)))
    }

    /// Returns the root operation types.
    #[must_use]
    pub const fn roots(&self) -> &RootTypes {
        &self.roots
    }

    /// Returns the number of types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the graph has no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns every type id referenced from the body of `id`.
    #[must_use]
    pub fn references(&self, id: TypeId) -> Vec<TypeId> {
        let mut out = Vec::new();
        match &self.get(id).body {
            TypeBody::Object { fields, interfaces } => {
                collect_field_refs(fields, &mut out);
                out.extend(interfaces.iter().copied());
            }
            TypeBody::Interface {
                fields,
                possible_types,
            } => {
                collect_field_refs(fields, &mut out);
                out.extend(possible_types.iter().copied());
            }
            TypeBody::Union { possible_types } => out.extend(possible_types.iter().copied()),
            TypeBody::InputObject { input_fields } => {
                out.extend(input_fields.iter().map(|v| v.ty.named_type()));
            }
            TypeBody::Enum { .. } | TypeBody::Scalar { .. } => {}
        }
        out
    }

    /// Renders a reference in GraphQL notation, e.g. `[ID!]!`.
    #[must_use]
    pub fn display_ref(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Named(id) => self.name_of(*id).to_string(),
            TypeRef::List(inner) => format!("[{}]", self.display_ref(inner)),
            TypeRef::NonNull(inner) => format!("{}!", self.display_ref(inner)),
        }
    }
}

fn collect_field_refs(fields: &[Field], out: &mut Vec<TypeId>) {
    for field in fields {
        out.push(field.ty.named_type());
        out.extend(field.arguments.iter().map(|arg| arg.ty.named_type()));
    }
}
