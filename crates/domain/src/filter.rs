//! Collection query filters.

/// One equality constraint applied to a collection query.
///
/// Equality is the only operator: filters come from query-string
/// parameters, so values are always text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// Column the constraint applies to. Always a schema column by the
    /// time a filter exists.
    pub column: String,
    /// Raw query-string value to compare against.
    pub value: String,
}

impl Filter {
    /// Build an equality filter.
    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}
