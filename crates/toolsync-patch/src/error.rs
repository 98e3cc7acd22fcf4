//! Error types for toolsync-patch

/// Result type for patch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while applying a modifier.
///
/// `path` is the dotted key path of the array or value being patched,
/// e.g. `@toolsync/builtin/vscode.extensions`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An `@insert` or `@update` referenced an `id` that the target array does not contain
    #[error("Item with id '{id}' not found in '{path}'")]
    AnchorNotFound { id: String, path: String },

    /// An array element used a reserved `@` key that is not a known operator
    #[error("Unknown operator '{operator}' in modifier at '{path}'")]
    UnknownOperator { operator: String, path: String },

    /// A known operator with a malformed body
    #[error("Invalid '{operator}' operation at '{path}': {reason}")]
    InvalidOperator {
        operator: String,
        path: String,
        reason: String,
    },

    /// A modifier applied at the top level was not an object
    #[error("Modifier must be an object, got {kind}")]
    NotAnObject { kind: &'static str },
}
