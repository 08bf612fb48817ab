//! Response-key aliasing for repeated field selections.
//!
//! A selection set may select the same field more than once with different
//! arguments (`user(id: "1")` and `user(id: "2")`). GraphQL requires each of
//! those occurrences to answer under a distinct response key, so every
//! occurrence after the first receives a generated alias.

use rustc_hash::{FxHashMap, FxHashSet};

/// The type discriminator meta-field. Never aliased.
pub const TYPENAME_FIELD: &str = "__typename";

/// Prefix of every generated alias. The occurrence index follows it.
pub const ALIAS_PREFIX: &str = "__alias_";

/// A previously resolved occurrence of a field name.
#[derive(Debug, Clone)]
struct Occurrence {
    signature: String,
    identifier: String,
}

/// Assigns response keys to field occurrences within one selection context.
///
/// One resolver belongs to exactly one selection set; nested selection sets
/// own their own resolver.
#[derive(Debug, Default, Clone)]
pub struct AliasResolver {
    occurrences: FxHashMap<String, Vec<Occurrence>>,
    issued: FxHashSet<String>,
}

impl AliasResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the response key for an occurrence of `field_name`.
    ///
    /// - The first occurrence of a name keeps the bare name.
    /// - An occurrence whose `signature` matches an earlier occurrence of the
    ///   same name reuses that occurrence's key.
    /// - Any other occurrence is aliased as [`ALIAS_PREFIX`] followed by
    ///   `occurrence_index`.
    ///
    /// `occurrence_index` is the position of the occurrence inside the
    /// selection context and is expected to be distinct per call. If an index
    /// is reused anyway, the next free index is taken instead.
    pub fn resolve(&mut self, field_name: &str, signature: &str, occurrence_index: usize) -> String {
        if field_name == TYPENAME_FIELD {
            return field_name.to_string();
        }

        let seen = self.occurrences.entry(field_name.to_string()).or_default();
        if let Some(existing) = seen.iter().find(|o| o.signature == signature) {
            return existing.identifier.clone();
        }

        let identifier = if seen.is_empty() {
            field_name.to_string()
        } else {
            let mut index = occurrence_index;
            loop {
                let candidate = format!("{ALIAS_PREFIX}{index}");
                if !self.issued.contains(&candidate) {
                    break candidate;
                }
                index += 1;
            }
        };

        seen.push(Occurrence {
            signature: signature.to_string(),
            identifier: identifier.clone(),
        });
        self.issued.insert(identifier.clone());
        identifier
    }

    /// Returns the number of distinct response keys handed out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    /// Returns true if nothing has been resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

/// Returns true if `identifier` is a generated alias.
#[must_use]
pub fn is_alias(identifier: &str) -> bool {
    identifier
        .strip_prefix(ALIAS_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
}
