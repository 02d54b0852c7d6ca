//! Column schemas.

/// Ordered set of column names a model accepts.
///
/// Includes the primary-key column: collection filters may target it even
/// though write payloads never set it directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<String>,
}

impl Schema {
    /// Build a schema from column names, keeping their order.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// True when `column` exactly matches a known column name.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|known| known == column)
    }

    /// Iterate over column names in schema order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
