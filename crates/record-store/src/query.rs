/// Builder for listing records.
///
/// Filters are applied first, then `offset` and `limit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Top-level field equality filters, compared as text.
    pub filters: Vec<(String, String)>,

    /// Number of matching records to skip.
    pub offset: Option<usize>,

    /// Maximum number of records to return.
    pub limit: Option<usize>,
}

impl RecordQuery {
    /// Creates a query matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality filter on a top-level field.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    /// Skips this many matching records.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Limits the number of records returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Selects a 1-based page of `per_page` records.
    ///
    /// An offset too large to represent saturates, selecting past the end.
    pub fn page(self, page: usize, per_page: usize) -> Self {
        self.offset(page.saturating_sub(1).saturating_mul(per_page))
            .limit(per_page)
    }
}
