use thiserror::Error;

/// Errors raised while resolving or applying a modifier.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    /// The dot-path does not address any known leaf.
    #[error("variable not found: {0}")]
    VariableNotFound(String),
    /// Applying the operation would produce a non-finite value (NaN/inf).
    #[error("non-finite result for {variable}: operation would produce {attempted}")]
    NonFinite {
        /// The dot-path that was being mutated.
        variable: String,
        /// The value that would have been written.
        attempted: f64,
    },
    /// A `clamp` operation was requested without both bounds resolvable.
    #[error("clamp on {0} requires both min and max")]
    MissingClampBounds(String),
}
