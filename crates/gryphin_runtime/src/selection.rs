//! Selection sets and operations.

use crate::value::{render_arguments, Argument};
use gryphin_core::{AliasResolver, TYPENAME_FIELD};
use std::fmt;

/// A selected field.
#[derive(Debug, Clone)]
pub struct FieldSelection {
    pub name: String,
    /// Generated alias, set when the same field is selected with other arguments.
    pub alias: Option<String>,
    pub arguments: Vec<Argument>,
    /// Nested selections of a composite field.
    pub selection: Option<SelectionSet>,
}

impl FieldSelection {
    /// Returns the key this field answers under in the response.
    #[must_use]
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// An inline fragment (`... on Type { ... }`).
#[derive(Debug, Clone)]
pub struct InlineFragment {
    pub type_condition: String,
    pub selection: SelectionSet,
}

/// One entry of a selection set.
#[derive(Debug, Clone)]
pub enum Selection {
    Field(FieldSelection),
    Fragment(InlineFragment),
}

/// An ordered set of selections with its own alias context.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    selections: Vec<Selection>,
    aliases: AliasResolver,
}

impl SelectionSet {
    /// Creates an empty selection set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a selection set that already selects `__typename`.
    ///
    /// Selections on interfaces and unions start this way so the concrete
    /// type of every response object is known.
    #[must_use]
    pub fn with_typename() -> Self {
        let mut set = Self::new();
        set.add_typename();
        set
    }

    /// Selects a field and returns its response key.
    ///
    /// Selecting a field again with the same arguments merges the nested
    /// selections into the earlier occurrence. Selecting it with different
    /// arguments adds an aliased occurrence.
    pub fn add_field(
        &mut self,
        name: &str,
        arguments: Vec<Argument>,
        nested: Option<SelectionSet>,
    ) -> String {
        let signature = render_arguments(&arguments);
        let key = self.aliases.resolve(name, &signature, self.selections.len());

        if let Some(existing) = self.field_mut(&key) {
            if let Some(nested) = nested {
                existing.selection = Some(match existing.selection.take() {
                    Some(mut current) => {
                        current.merge(nested);
                        current
                    }
                    None => nested,
                });
            }
            return key;
        }

        self.selections.push(Selection::Field(FieldSelection {
            name: name.to_string(),
            alias: (key != name).then(|| key.clone()),
            arguments,
            selection: nested,
        }));
        key
    }

    /// Selects the `__typename` meta-field once.
    pub fn add_typename(&mut self) {
        self.add_field(TYPENAME_FIELD, Vec::new(), None);
    }

    /// Adds an inline fragment, merging with an earlier one on the same type.
    pub fn add_fragment(&mut self, type_condition: &str, nested: SelectionSet) {
        let existing = self.selections.iter_mut().find_map(|s| match s {
            Selection::Fragment(fragment) if fragment.type_condition == type_condition => {
                Some(fragment)
            }
            _ => None,
        });

        match existing {
            Some(fragment) => fragment.selection.merge(nested),
            None => self.selections.push(Selection::Fragment(InlineFragment {
                type_condition: type_condition.to_string(),
                selection: nested,
            })),
        }
    }

    /// Adds every selection of `other` to this set.
    pub fn merge(&mut self, other: SelectionSet) {
        for selection in other.selections {
            match selection {
                Selection::Field(field) => {
                    self.add_field(&field.name, field.arguments, field.selection);
                }
                Selection::Fragment(fragment) => {
                    self.add_fragment(&fragment.type_condition, fragment.selection);
                }
            }
        }
    }

    /// Returns the selections in order.
    #[must_use]
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Renders the set as GraphQL, e.g. `{ id name }`.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn field_mut(&mut self, key: &str) -> Option<&mut FieldSelection> {
        self.selections.iter_mut().find_map(|s| match s {
            Selection::Field(field) if field.response_key() == key => Some(field),
            _ => None,
        })
    }
}

impl fmt::Display for SelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for selection in &self.selections {
            f.write_str(" ")?;
            match selection {
                Selection::Field(field) => {
                    if let Some(alias) = &field.alias {
                        write!(f, "{alias}: ")?;
                    }
                    write!(f, "{}{}", field.name, render_arguments(&field.arguments))?;
                    if let Some(nested) = &field.selection {
                        write!(f, " {nested}")?;
                    }
                }
                Selection::Fragment(fragment) => {
                    write!(f, "... on {} {}", fragment.type_condition, fragment.selection)?;
                }
            }
        }
        f.write_str(" }")
    }
}

/// Implemented by generated selection builders.
pub trait SelectionBuilder: Default {
    /// Consumes the builder, returning what it selected.
    fn into_selection(self) -> SelectionSet;
}

/// Runs `build` against a fresh builder and returns its selection set.
pub fn nested<B: SelectionBuilder>(build: impl FnOnce(&mut B)) -> SelectionSet {
    let mut builder = B::default();
    build(&mut builder);
    builder.into_selection()
}

/// The kind of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Returns the GraphQL keyword.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

/// A complete operation ready to be sent.
#[derive(Debug, Clone)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub selection: SelectionSet,
}

impl Operation {
    /// Creates an anonymous operation.
    #[must_use]
    pub fn new(kind: OperationKind, selection: SelectionSet) -> Self {
        Self {
            kind,
            name: None,
            selection,
        }
    }

    /// Creates a query.
    #[must_use]
    pub fn query(selection: SelectionSet) -> Self {
        Self::new(OperationKind::Query, selection)
    }

    /// Creates a mutation.
    #[must_use]
    pub fn mutation(selection: SelectionSet) -> Self {
        Self::new(OperationKind::Mutation, selection)
    }

    /// Creates a subscription.
    #[must_use]
    pub fn subscription(selection: SelectionSet) -> Self {
        Self::new(OperationKind::Subscription, selection)
    }

    /// Sets the operation name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Renders the operation as GraphQL.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if let Some(name) = &self.name {
            write!(f, " {name}")?;
        }
        write!(f, " {}", self.selection)
    }
}
