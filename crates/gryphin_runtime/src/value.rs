//! GraphQL input values and arguments.

use indexmap::IndexMap;
use std::fmt::{self, Write as _};

/// A GraphQL input value literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    /// An enum value, rendered without quotes.
    Enum(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) if n.is_finite() => write!(f, "{n}"),
            Self::Float(_) => f.write_str("null"),
            Self::String(s) => write_string(f, s),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Enum(name) => f.write_str(name),
            Self::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_char(']')
            }
            Self::Object(fields) => {
                f.write_char('{')?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_char('}')
            }
        }
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c.is_control() => write!(f, "\\u{:04X}", u32::from(c))?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// Conversion into a GraphQL input value.
///
/// Generated enums and input objects implement this, as do the Rust types
/// the built-in scalars alias to.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue> IntoValue for Box<T> {
    fn into_value(self) -> Value {
        (*self).into_value()
    }
}

/// Builds the value of an input object.
#[derive(Debug, Clone, Default)]
pub struct ObjectValue {
    fields: IndexMap<String, Value>,
}

impl ObjectValue {
    /// Creates an empty input object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field.
    #[must_use]
    pub fn field(mut self, name: &str, value: impl IntoValue) -> Self {
        self.fields.insert(name.to_string(), value.into_value());
        self
    }

    /// Sets a field when a value is present. `None` leaves the field out.
    #[must_use]
    pub fn optional_field<T: IntoValue>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// Finishes the object.
    #[must_use]
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }
}

/// A field argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

impl Argument {
    /// Creates an argument.
    pub fn new(name: &str, value: impl IntoValue) -> Self {
        Self {
            name: name.to_string(),
            value: value.into_value(),
        }
    }

    /// Creates an argument when a value is present.
    ///
    /// Omitting an optional argument lets the server apply its default.
    pub fn optional<T: IntoValue>(name: &str, value: Option<T>) -> Option<Self> {
        value.map(|value| Self::new(name, value))
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Renders an argument list as `(a: 1, b: 2)`, or nothing when empty.
///
/// The rendering doubles as the argument signature used for aliasing.
#[must_use]
pub fn render_arguments(arguments: &[Argument]) -> String {
    if arguments.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = arguments.iter().map(ToString::to_string).collect();
    format!("({})", rendered.join(", "))
}
