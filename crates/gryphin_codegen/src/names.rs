//! Rust identifiers for the types of a graph.

use crate::CodegenOptions;
use gryphin_core::{escape_keyword, to_snake_case, Case, NameScope};
use gryphin_schema::{NamedType, TypeGraph, TypeId, TypeKind, BUILTIN_SCALARS};

/// Names generated code may not shadow at module level.
const RESERVED: &[&str] = &[
    "Option", "Some", "None", "Result", "Ok", "Err", "Vec", "Box", "Default", "From", "Into",
    "Clone", "Copy", "Debug", "PartialEq", "Eq", "Hash", "Fn", "FnMut", "FnOnce", "Send", "Sync",
    "Sized", "Iterator", "IntoIterator", "ToString", "str", "bool", "char", "i8", "i16", "i32",
    "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize", "f32", "f64", "std",
    "core", "alloc", "serde", "aliases",
];

/// The identifiers of one named type.
#[derive(Debug, Clone, Default)]
pub(crate) struct TypeNames {
    /// The type (or alias) identifier.
    pub ident: String,
    /// Module the type's unit is declared as.
    pub module: Option<String>,
    /// Selection builder of a composite type.
    pub selection: Option<String>,
    /// Variant enum of an interface or union.
    pub variant: Option<String>,
}

/// Identifiers for every type of a graph, indexed by [`TypeId`].
///
/// Types, selection builders, variant enums, and unit modules all share one
/// namespace because `mod.rs` glob re-exports every unit.
#[derive(Debug)]
pub(crate) struct Names {
    types: Vec<TypeNames>,
}

impl Names {
    pub fn build(graph: &TypeGraph, options: &CodegenOptions) -> Self {
        let mut scope = NameScope::with_reserved(Case::Verbatim, RESERVED.iter().copied());
        for builtin in BUILTIN_SCALARS {
            scope.reserve(builtin);
        }

        let mut types: Vec<TypeNames> = graph
            .iter()
            .map(|(_, ty)| {
                let ident = if ty.is_builtin_scalar() {
                    ty.name.clone()
                } else if is_emitted(ty, options) || ty.kind() == TypeKind::Scalar {
                    scope.claim(&ty.name)
                } else {
                    ty.name.clone()
                };
                TypeNames {
                    ident,
                    ..TypeNames::default()
                }
            })
            .collect();

        for (id, ty) in graph.iter() {
            if !is_emitted(ty, options) || !ty.kind().is_composite() {
                continue;
            }
            let names = &mut types[id.index()];
            let base = names.ident.trim_start_matches("r#").to_string();
            names.selection = Some(scope.claim(&format!("{base}Selection")));
            if ty.kind().is_abstract() {
                names.variant = Some(scope.claim(&format!("{base}Variant")));
            }
        }

        for (id, ty) in graph.iter() {
            if !is_emitted(ty, options) {
                continue;
            }
            let mut base = to_snake_case(&ty.name);
            if escape_keyword(&base) != base {
                base.push('_');
            }
            types[id.index()].module = Some(scope.claim(&base));
        }

        Self { types }
    }

    pub fn get(&self, id: TypeId) -> &TypeNames {
        &self.types[id.index()]
    }

    pub fn ident(&self, id: TypeId) -> &str {
        &self.get(id).ident
    }

    /// Returns the selection builder of a composite type.
    ///
    /// Falls back to the type identifier for types that have none, which a
    /// validated graph never asks for.
    pub fn selection(&self, id: TypeId) -> &str {
        let names = self.get(id);
        names.selection.as_deref().unwrap_or(&names.ident)
    }
}

/// Returns true if the type gets a unit of its own.
pub(crate) fn is_emitted(ty: &NamedType, options: &CodegenOptions) -> bool {
    ty.kind() != TypeKind::Scalar && (options.include_introspection_types || !ty.is_introspection())
}
