//! Rust identifier naming for generated code.

use rustc_hash::FxHashSet;

/// Keywords that can be used as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use",
    "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers and get a trailing underscore.
const PLAIN_KEYWORDS: &[&str] = &["self", "Self", "super", "crate", "_"];

/// Identifier casing convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// `snake_case`, used for methods, parameters and fields.
    Snake,
    /// `PascalCase`, used for enum variants.
    Pascal,
    /// The name is kept as written, used for type names.
    Verbatim,
}

impl Case {
    /// Applies the casing convention to a name.
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Snake => to_snake_case(name),
            Self::Pascal => to_pascal_case(name),
            Self::Verbatim => name.to_string(),
        }
    }
}

/// Converts a GraphQL name to `snake_case`.
///
/// Acronym runs stay together: `userID` becomes `user_id` and `HTMLParser`
/// becomes `html_parser`. Leading underscores are preserved.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                let prev = chars[i - 1];
                let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                let boundary = prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_is_lower);
                if boundary && prev != '_' {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Converts a GraphQL name to `PascalCase`.
///
/// Segments written entirely in capitals are lowered after their first
/// letter, so `IN_PROGRESS` becomes `InProgress` while `inProgress` becomes
/// `InProgress` too.
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());

    for segment in name.split('_').filter(|s| !s.is_empty()) {
        let shout = !segment.chars().any(char::is_lowercase);
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            if shout {
                out.extend(chars.flat_map(char::to_lowercase));
            } else {
                out.push_str(chars.as_str());
            }
        }
    }

    if out.is_empty() {
        return "Unnamed".to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Makes an identifier safe to use in Rust source.
#[must_use]
pub fn escape_keyword(ident: &str) -> String {
    if PLAIN_KEYWORDS.contains(&ident) {
        format!("{ident}_")
    } else if RAW_KEYWORDS.contains(&ident) {
        format!("r#{ident}")
    } else {
        ident.to_string()
    }
}

/// Hands out collision-free identifiers within one Rust namespace.
///
/// Uniqueness is decided on the unescaped identifier, so `type` and
/// `r#type` count as the same name.
#[derive(Debug, Clone)]
pub struct NameScope {
    case: Case,
    taken: FxHashSet<String>,
}

impl NameScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new(case: Case) -> Self {
        Self {
            case,
            taken: FxHashSet::default(),
        }
    }

    /// Creates a scope with names that must never be handed out.
    #[must_use]
    pub fn with_reserved<'a>(case: Case, reserved: impl IntoIterator<Item = &'a str>) -> Self {
        let mut scope = Self::new(case);
        for name in reserved {
            scope.reserve(name);
        }
        scope
    }

    /// Marks a name as taken without handing it out.
    pub fn reserve(&mut self, name: &str) {
        self.taken.insert(name.to_string());
    }

    /// Returns true if the name, after casing, is already taken.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains(&self.case.apply(name))
    }

    /// Converts `name` to the scope's case and returns a unique identifier.
    ///
    /// Collisions get a numeric suffix: `name_2`, `name_3` for snake case,
    /// `Name2`, `Name3` otherwise.
    pub fn claim(&mut self, name: &str) -> String {
        let base = self.case.apply(name);
        let mut candidate = base.clone();
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = match self.case {
                Case::Snake => format!("{base}_{n}"),
                Case::Pascal | Case::Verbatim => format!("{base}{n}"),
            };
            n += 1;
        }
        self.taken.insert(candidate.clone());
        escape_keyword(&candidate)
    }
}
