use std::fmt::{self, Display};

use itertools::Itertools;
use serde_json::Value;

use super::naming::{property_key, quote};

// MARK: Types

/// A TypeScript type expression.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TsType {
    /// A keyword type like `string` or `unknown`.
    Keyword(&'static str),
    /// A literal type, already rendered, like `"active"` or `42`.
    Literal(String),
    /// A named type reference, like `NodeType`.
    Ref(String),
    /// The type inferred from a validator, like `z.infer<typeof PetSchema>`.
    Infer(String),
    Array(Box<TsType>),
    Tuple(Vec<TsType>),
    /// `Record<string, V>`.
    Record(Box<TsType>),
    Object(Vec<TsProperty>),
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
}

/// A property in an object type.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct TsProperty {
    pub name: String,
    pub optional: bool,
    pub ty: TsType,
}

impl TsType {
    #[inline]
    pub fn string() -> Self {
        Self::Keyword("string")
    }

    #[inline]
    pub fn number() -> Self {
        Self::Keyword("number")
    }

    #[inline]
    pub fn boolean() -> Self {
        Self::Keyword("boolean")
    }

    #[inline]
    pub fn null() -> Self {
        Self::Keyword("null")
    }

    #[inline]
    pub fn unknown() -> Self {
        Self::Keyword("unknown")
    }

    /// Returns the literal type for a JSON scalar, `null` for JSON `null`,
    /// or `unknown` for an array or object.
    pub fn literal(value: &Value) -> Self {
        match literal(value) {
            Some(lit) => Self::Literal(lit),
            None if value.is_null() => Self::null(),
            None => Self::unknown(),
        }
    }

    #[inline]
    pub fn array(elem: TsType) -> Self {
        Self::Array(elem.into())
    }

    #[inline]
    pub fn record(value: TsType) -> Self {
        Self::Record(value.into())
    }

    /// Creates a union type `A | B | C`. Nested unions are flattened,
    /// duplicate members are dropped, and a union with one member
    /// collapses to that member.
    pub fn union(members: impl IntoIterator<Item = TsType>) -> Self {
        let members = members
            .into_iter()
            .flat_map(|member| match member {
                Self::Union(members) => members,
                member => vec![member],
            })
            .unique()
            .collect_vec();
        Self::collapse(members, Self::Union)
    }

    /// Creates an intersection type `A & B & C`, flattening
    /// nested intersections.
    pub fn intersection(members: impl IntoIterator<Item = TsType>) -> Self {
        let members = members
            .into_iter()
            .flat_map(|member| match member {
                Self::Intersection(members) => members,
                member => vec![member],
            })
            .collect_vec();
        Self::collapse(members, Self::Intersection)
    }

    /// Wraps a type in a nullable union (`T | null`).
    pub fn nullable(self) -> Self {
        match self {
            ty @ (Self::Keyword("null") | Self::Keyword("unknown")) => ty,
            ty => Self::union([ty, Self::null()]),
        }
    }

    fn collapse(mut members: Vec<TsType>, f: impl FnOnce(Vec<TsType>) -> TsType) -> Self {
        match members.len() {
            0 => Self::unknown(),
            1 => members.pop().unwrap_or_else(Self::unknown),
            _ => f(members),
        }
    }

    /// Returns the binding strength of this type's outermost operator.
    /// Higher binds tighter.
    fn precedence(&self) -> u8 {
        match self {
            Self::Union(_) => 0,
            Self::Intersection(_) => 1,
            _ => 2,
        }
    }

    /// Writes this type, parenthesized if it binds looser than `min`.
    fn fmt_at(&self, f: &mut fmt::Formatter<'_>, min: u8) -> fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => f.write_str(keyword),
            Self::Literal(lit) => f.write_str(lit),
            Self::Ref(name) => f.write_str(name),
            Self::Infer(ident) => write!(f, "z.infer<typeof {ident}>"),
            Self::Array(elem) => {
                elem.fmt_at(f, 2)?;
                f.write_str("[]")
            }
            Self::Tuple(elems) => write!(f, "[{}]", elems.iter().format(", ")),
            Self::Record(value) => write!(f, "Record<string, {value}>"),
            Self::Object(props) if props.is_empty() => f.write_str("{}"),
            Self::Object(props) => {
                f.write_str("{ ")?;
                for (index, prop) in props.iter().enumerate() {
                    if index > 0 {
                        f.write_str("; ")?;
                    }
                    let optional = if prop.optional { "?" } else { "" };
                    write!(f, "{}{optional}: {}", property_key(&prop.name), prop.ty)?;
                }
                f.write_str(" }")
            }
            Self::Union(members) => {
                for (index, member) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" | ")?;
                    }
                    member.fmt_at(f, 1)?;
                }
                Ok(())
            }
            Self::Intersection(members) => {
                for (index, member) in members.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" & ")?;
                    }
                    member.fmt_at(f, 2)?;
                }
                Ok(())
            }
        }
    }
}

// MARK: Literals

/// Renders a JSON scalar as a JavaScript literal, or returns `None`
/// for `null`, arrays, and objects.
pub fn literal(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(quote(s)),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Renders a numeric bound, dropping the fractional part
/// of integral values.
pub fn number(n: f64) -> String {
    if n.is_infinite() {
        let sign = if n.is_sign_negative() { "-" } else { "" };
        format!("{sign}Infinity")
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Renders a regular expression literal, escaping forward slashes
/// and line terminators.
///
/// An empty pattern renders as `/(?:)/`, since `//` starts a comment.
pub fn regex(pattern: &str) -> String {
    if pattern.is_empty() {
        return "/(?:)/".to_owned();
    }
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('/');
    let mut escaped = false;
    for c in pattern.chars() {
        match c {
            '/' if !escaped => out.push_str("\\/"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
        escaped = c == '\\' && !escaped;
    }
    out.push('/');
    out
}

// MARK: Identifiers

/// Returns `true` if `haystack` mentions `ident` as a whole
/// identifier token, and not as part of a longer identifier.
pub fn mentions_ident(haystack: &str, ident: &str) -> bool {
    if ident.is_empty() {
        return false;
    }
    haystack.match_indices(ident).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + ident.len()..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    })
}

fn is_ident_char(c: char) -> bool {
    c == '$' || unicode_ident::is_xid_continue(c)
}
