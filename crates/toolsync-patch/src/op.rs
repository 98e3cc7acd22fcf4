//! Array operations decoded from modifier arrays

use crate::{Error, Result};
use serde_json::{Map, Value, json};

/// Prefix reserved for operator keys inside modifier arrays.
pub const OPERATOR_MARKER: char = '@';

/// Splice `data` next to the element with a given `id`.
pub const INSERT: &str = "@insert";

/// Merge `data` into the element with a given `id`.
pub const UPDATE: &str = "@update";

/// Where an inserted element goes relative to its anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anchor {
    Before(String),
    After(String),
}

impl Anchor {
    pub fn id(&self) -> &str {
        match self {
            Anchor::Before(id) | Anchor::After(id) => id,
        }
    }
}

/// One element of a modifier array.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayOp {
    /// A plain element, pushed to the end of the target array
    Append(Value),
    Insert { anchor: Anchor, data: Value },
    /// Merge `data` into the matching element using the full merge rules
    Update { id: String, data: Value },
}

/// Whether a value is an operator object, i.e. an object with any key
/// starting with [`OPERATOR_MARKER`].
pub fn is_operator(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.keys().any(|k| k.starts_with(OPERATOR_MARKER)))
}

impl ArrayOp {
    pub fn append(value: Value) -> Self {
        ArrayOp::Append(value)
    }

    pub fn insert_before(id: impl Into<String>, data: Value) -> Self {
        ArrayOp::Insert {
            anchor: Anchor::Before(id.into()),
            data,
        }
    }

    pub fn insert_after(id: impl Into<String>, data: Value) -> Self {
        ArrayOp::Insert {
            anchor: Anchor::After(id.into()),
            data,
        }
    }

    pub fn update(id: impl Into<String>, data: Value) -> Self {
        ArrayOp::Update {
            id: id.into(),
            data,
        }
    }

    /// Encode into the JSON form accepted by [`ArrayOp::decode`].
    pub fn into_value(self) -> Value {
        match self {
            ArrayOp::Append(value) => value,
            ArrayOp::Insert {
                anchor: Anchor::Before(id),
                data,
            } => json!({ INSERT: { "before": id, "data": data } }),
            ArrayOp::Insert {
                anchor: Anchor::After(id),
                data,
            } => json!({ INSERT: { "after": id, "data": data } }),
            ArrayOp::Update { id, data } => json!({ UPDATE: { "id": id, "data": data } }),
        }
    }

    /// Decode one modifier array element.
    pub fn decode(element: &Value, path: &str) -> Result<Self> {
        let Some(map) = element.as_object().filter(|_| is_operator(element)) else {
            return Ok(ArrayOp::Append(element.clone()));
        };

        if map.len() != 1 {
            let operator = map
                .keys()
                .find(|k| k.starts_with(OPERATOR_MARKER))
                .cloned()
                .unwrap_or_default();
            return Err(Error::InvalidOperator {
                operator,
                path: path.to_string(),
                reason: "operator objects must contain exactly one key".to_string(),
            });
        }

        let (operator, body) = map.iter().next().ok_or_else(|| Error::InvalidOperator {
            operator: String::new(),
            path: path.to_string(),
            reason: "empty operator object".to_string(),
        })?;
        let invalid = |reason: &str| Error::InvalidOperator {
            operator: operator.clone(),
            path: path.to_string(),
            reason: reason.to_string(),
        };

        let body = body
            .as_object()
            .ok_or_else(|| invalid("operator body must be an object"))?;

        match operator.as_str() {
            INSERT => {
                let before = string_field(body, "before").map_err(invalid)?;
                let after = string_field(body, "after").map_err(invalid)?;
                let anchor = match (before, after) {
                    (Some(id), None) => Anchor::Before(id),
                    (None, Some(id)) => Anchor::After(id),
                    (Some(_), Some(_)) => {
                        return Err(invalid("'before' and 'after' are mutually exclusive"));
                    }
                    (None, None) => return Err(invalid("missing 'before' or 'after' anchor")),
                };
                let data = body
                    .get("data")
                    .cloned()
                    .ok_or_else(|| invalid("missing 'data'"))?;
                Ok(ArrayOp::Insert { anchor, data })
            }
            UPDATE => {
                let id = string_field(body, "id")
                    .map_err(invalid)?
                    .ok_or_else(|| invalid("missing 'id'"))?;
                let data = body
                    .get("data")
                    .cloned()
                    .ok_or_else(|| invalid("missing 'data'"))?;
                Ok(ArrayOp::Update { id, data })
            }
            other => Err(Error::UnknownOperator {
                operator: other.to_string(),
                path: path.to_string(),
            }),
        }
    }

    /// Decode every element of a modifier array.
    pub fn decode_all(elements: &[Value], path: &str) -> Result<Vec<Self>> {
        elements.iter().map(|e| Self::decode(e, path)).collect()
    }
}

fn string_field(
    body: &Map<String, Value>,
    key: &str,
) -> std::result::Result<Option<String>, &'static str> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err("anchor ids must be strings"),
    }
}

/// Index of the first element whose `id` field equals `id`.
pub(crate) fn position_of(target: &[Value], id: &str) -> Option<usize> {
    target
        .iter()
        .position(|item| item.get("id").and_then(Value::as_str) == Some(id))
}
