//! Query compilation errors

/// Errors raised while compiling a request's filter model.
///
/// These never escape the server: a request that fails to compile is
/// answered with an unsuccessful response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    /// The filter spec for a column is not an object.
    #[error("Filter for '{column}' must be an object")]
    MalformedFilter {
        /// Column the filter applies to.
        column: String,
    },

    /// The filter type is not supported.
    #[error("Unsupported filter type '{filter_type}' for '{column}'")]
    UnsupportedFilterType {
        /// Column the filter applies to.
        column: String,
        /// The filter type that was requested.
        filter_type: String,
    },

    /// The filter operator is not supported for the filter type.
    #[error("Unsupported {filter_type} operator '{operator}' for '{column}'")]
    UnsupportedOperator {
        /// Column the filter applies to.
        column: String,
        /// The resolved filter type.
        filter_type: &'static str,
        /// The operator that was requested.
        operator: String,
    },

    /// A required operand is missing or has the wrong type.
    #[error("Filter for '{column}' is missing operand '{operand}'")]
    MissingOperand {
        /// Column the filter applies to.
        column: String,
        /// Name of the missing operand.
        operand: &'static str,
    },
}
