use std::fmt::{Display, Formatter};
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::constant::{DEFAULT_DATE_FORMAT, LIST_SEPARATOR, NULL_LITERAL};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Text,
    Number,
    Boolean,
    Date,
    Array,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,

    Boolean(bool),

    Int64(i64),
    Float64(f64),

    Utf8(String),

    Date(NaiveDate),

    List(Vec<Value>),
    Json(serde_json::Value),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null | Value::Utf8(_) => ValueKind::Text,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Int64(_) | Value::Float64(_) => ValueKind::Number,
            Value::Date(_) => ValueKind::Date,
            Value::List(_) => ValueKind::Array,
            Value::Json(_) => ValueKind::Json,
        }
    }

    /// Elements of a list value, or the value itself as a single element
    pub fn elements(&self) -> Vec<Value> {
        match self {
            Value::List(values) => values.clone(),
            Value::Json(serde_json::Value::Array(values)) => values.iter()
                .map(|value| Value::Json(value.clone()))
                .collect(),
            value => vec![value.clone()],
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "{}", NULL_LITERAL),
            Value::Boolean(value) => write!(f, "{}", value),
            Value::Int64(value) => write!(f, "{}", value),
            Value::Float64(value) => write!(f, "{}", value),
            Value::Utf8(value) => write!(f, "{}", value),
            Value::Date(value) => write!(f, "{}", value.format(DEFAULT_DATE_FORMAT)),
            Value::List(values) => {
                let joined = values.iter()
                    .map(|value| value.to_string())
                    .collect::<Vec<String>>()
                    .join(&LIST_SEPARATOR.to_string());

                write!(f, "{}", joined)
            },
            Value::Json(serde_json::Value::String(value)) => write!(f, "{}", value),
            Value::Json(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Utf8(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Utf8(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}
