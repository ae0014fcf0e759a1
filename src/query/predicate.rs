//! Filter predicates and their wire rendering.

use std::fmt;

/// Comparison operators understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    ILike,
    Is,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::ILike => "ilike",
            Operator::Is => "is",
        }
    }
}

/// A literal on the right-hand side of a predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Null,
}

impl FilterValue {
    /// Render the value for use inside an `or=(...)` or `in.(...)` list.
    ///
    /// Values containing list syntax are double-quoted, with `"` and `\`
    /// escaped, so a location like `Austin, TX` stays one value.
    fn render_in_list(&self) -> String {
        match self {
            FilterValue::Text(text) if needs_quoting(text) => {
                let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
                format!("\"{}\"", escaped)
            }
            other => other.to_string(),
        }
    }
}

fn needs_quoting(text: &str) -> bool {
    text.is_empty()
        || text
            .chars()
            .any(|c| matches!(c, ',' | '.' | ':' | '(' | ')' | '"' | '\\') || c.is_whitespace())
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(text) => f.write_str(text),
            FilterValue::Integer(n) => write!(f, "{}", n),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(FilterValue::Integer)
            .unwrap_or(FilterValue::Number(value as f64))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Number(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

/// A single filter clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> value`
    Compare {
        column: String,
        op: Operator,
        value: FilterValue,
    },
    /// `column IN (values)`
    In {
        column: String,
        values: Vec<FilterValue>,
    },
    /// Any of the nested predicates holds.
    Or(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(column: impl Into<String>, op: Operator, value: impl Into<FilterValue>) -> Self {
        Predicate::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// Case-insensitive substring match: `column ILIKE %needle%`.
    pub fn contains(column: impl Into<String>, needle: &str) -> Self {
        Predicate::compare(column, Operator::ILike, format!("%{}%", needle))
    }

    /// Render as a top-level query parameter.
    pub fn to_param(&self) -> (String, String) {
        match self {
            Predicate::Compare { column, op, value } => {
                (column.clone(), format!("{}.{}", op.as_str(), value))
            }
            Predicate::In { column, values } => (column.clone(), format!("in.{}", render_list(values))),
            Predicate::Or(parts) => ("or".to_string(), format!("({})", render_or_parts(parts))),
        }
    }

    /// Render in the nested `column.op.value` form used inside `or=(...)`.
    fn render_nested(&self) -> String {
        match self {
            Predicate::Compare { column, op, value } => {
                format!("{}.{}.{}", column, op.as_str(), value.render_in_list())
            }
            Predicate::In { column, values } => format!("{}.in.{}", column, render_list(values)),
            Predicate::Or(parts) => format!("or({})", render_or_parts(parts)),
        }
    }

    /// Column the predicate constrains, if it targets exactly one.
    pub fn column(&self) -> Option<&str> {
        match self {
            Predicate::Compare { column, .. } | Predicate::In { column, .. } => Some(column),
            Predicate::Or(_) => None,
        }
    }
}

fn render_list(values: &[FilterValue]) -> String {
    let items: Vec<String> = values.iter().map(FilterValue::render_in_list).collect();
    format!("({})", items.join(","))
}

fn render_or_parts(parts: &[Predicate]) -> String {
    parts
        .iter()
        .map(Predicate::render_nested)
        .collect::<Vec<_>>()
        .join(",")
}
