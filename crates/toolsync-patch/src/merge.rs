//! The merge algorithm

use crate::op::{Anchor, ArrayOp, position_of};
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Apply `modifier` to `target` key by key, in place.
///
/// Returns the target for chaining. On error the target may already hold
/// the changes made by earlier keys.
pub fn modify<'a>(
    target: &'a mut Map<String, Value>,
    modifier: &Map<String, Value>,
) -> Result<&'a mut Map<String, Value>> {
    modify_at(target, modifier, "")?;
    Ok(target)
}

/// Like [`modify`], for callers holding untyped values.
///
/// Both sides must be objects; anything else is [`Error::NotAnObject`].
pub fn modify_value<'a>(target: &'a mut Value, modifier: &Value) -> Result<&'a mut Value> {
    let modifier = modifier.as_object().ok_or(Error::NotAnObject {
        kind: kind_of(modifier),
    })?;
    let kind = kind_of(target);
    let map = target.as_object_mut().ok_or(Error::NotAnObject { kind })?;
    modify_at(map, modifier, "")?;
    Ok(target)
}

/// Merge any modifier value into any target value.
///
/// - both objects: recurse key by key
/// - both arrays: apply the modifier as array operations
/// - otherwise: replace the target with the modifier
pub fn merge_value(target: &mut Value, modifier: &Value) -> Result<()> {
    merge_at(target, modifier, "")
}

fn modify_at(
    target: &mut Map<String, Value>,
    modifier: &Map<String, Value>,
    path: &str,
) -> Result<()> {
    for (key, mod_val) in modifier {
        let child_path = join_key(path, key);
        match target.get_mut(key) {
            Some(target_val) => merge_at(target_val, mod_val, &child_path)?,
            None => {
                target.insert(key.clone(), mod_val.clone());
            }
        }
    }
    Ok(())
}

fn merge_at(target: &mut Value, modifier: &Value, path: &str) -> Result<()> {
    match (target, modifier) {
        (Value::Object(target_map), Value::Object(mod_map)) => {
            modify_at(target_map, mod_map, path)
        }
        (Value::Array(target_items), Value::Array(mod_items)) => {
            let ops = ArrayOp::decode_all(mod_items, path)?;
            apply_ops(target_items, ops, path)
        }
        (target, modifier) => {
            *target = modifier.clone();
            Ok(())
        }
    }
}

fn apply_ops(target: &mut Vec<Value>, ops: Vec<ArrayOp>, path: &str) -> Result<()> {
    for op in ops {
        match op {
            ArrayOp::Append(value) => target.push(value),
            ArrayOp::Insert { anchor, data } => {
                let index =
                    position_of(target, anchor.id()).ok_or_else(|| Error::AnchorNotFound {
                        id: anchor.id().to_string(),
                        path: path.to_string(),
                    })?;
                let at = match anchor {
                    Anchor::Before(_) => index,
                    Anchor::After(_) => index + 1,
                };
                tracing::trace!(path, at, "Inserting array element");
                target.insert(at, data);
            }
            ArrayOp::Update { id, data } => {
                let index = position_of(target, &id).ok_or_else(|| Error::AnchorNotFound {
                    id: id.clone(),
                    path: path.to_string(),
                })?;
                let element_path = format!("{path}[{index}]");
                merge_at(&mut target[index], &data, &element_path)?;
            }
        }
    }
    Ok(())
}

fn join_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
