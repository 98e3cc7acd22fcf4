//! Structured deep-merge for toolsync configuration fragments
//!
//! A *modifier* is shaped like a subset of the value it is applied to:
//!
//! - objects are merged key by key, recursively;
//! - scalars, and values whose shape differs from the target, replace the
//!   target value wholesale;
//! - arrays are read as a list of operations against the target array.
//!
//! Array operations are plain elements (appended) or single-key operator
//! objects:
//!
//! ```json
//! { "@insert": { "before": "lint", "data": { "id": "format" } } }
//! { "@insert": { "after": "lint", "data": { "id": "format" } } }
//! { "@update": { "id": "lint", "data": { "run": "pnpm lint" } } }
//! ```
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use toolsync_patch::{ArrayOp, merge_value};
//!
//! let mut target = json!({ "steps": [{ "id": "a" }, { "id": "b" }] });
//! let modifier = json!({
//!     "steps": [ArrayOp::insert_before("b", json!({ "id": "x" })).into_value()]
//! });
//!
//! merge_value(&mut target, &modifier).unwrap();
//! assert_eq!(target, json!({ "steps": [{ "id": "a" }, { "id": "x" }, { "id": "b" }] }));
//! ```
//!
//! Merging mutates the target in place and is not commutative: callers must
//! apply modifiers in a fixed order to get a deterministic result.

pub mod error;
mod merge;
mod op;

pub use error::{Error, Result};
pub use merge::{merge_value, modify, modify_value};
pub use op::{Anchor, ArrayOp, INSERT, OPERATOR_MARKER, UPDATE, is_operator};
