//! Query description passed to table backends.

use serde_json::Value;

/// A table row as the backend returns it.
pub type Row = serde_json::Map<String, Value>;

/// Column equality filter. The only predicate the storefront needs; the
/// BaaS supports richer operators but nothing here uses them.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }
}

/// Sort key for a select.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

/// A filtered select against one table.
///
/// ```rust
/// use nearfood_store::Select;
///
/// let q = Select::from("restaurants")
///     .eq("is_open", true)
///     .order_desc("rating")
///     .limit(20);
/// assert_eq!(q.table, "restaurants");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub filters: Vec<Filter>,
    pub order: Vec<OrderBy>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl Select {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Add a column equality filter.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Sort ascending by a column.
    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            descending: false,
        });
        self
    }

    /// Sort descending by a column.
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order.push(OrderBy {
            column: column.into(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_accumulates_clauses() {
        let q = Select::from("menu_items")
            .eq("restaurant_id", "r-1")
            .eq("is_available", true)
            .order_asc("category_id")
            .limit(50)
            .offset(50);

        assert_eq!(q.filters.len(), 2);
        assert_eq!(q.filters[0], Filter::eq("restaurant_id", "r-1"));
        assert_eq!(q.order.len(), 1);
        assert!(!q.order[0].descending);
        assert_eq!(q.limit, Some(50));
        assert_eq!(q.offset, Some(50));
    }
}
