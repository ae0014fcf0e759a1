//! Fluent query builder over a backend table.

use super::predicate::{FilterValue, Operator, Predicate};
use std::fmt;

/// One `order=` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

impl OrderBy {
    fn render(&self) -> String {
        format!(
            "{}.{}",
            self.column,
            if self.ascending { "asc" } else { "desc" }
        )
    }
}

/// A read against one backend table.
///
/// # Example
///
/// ```
/// use realty_mcp_server::query::Query;
///
/// let query = Query::table("properties")
///     .select("id, title, price")
///     .eq("status", "active")
///     .gte("price", 500000u64)
///     .order("price", true)
///     .limit(20);
///
/// assert_eq!(
///     query.to_string(),
///     "select=id,title,price&status=eq.active&price=gte.500000&order=price.asc&limit=20"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    table: String,
    columns: Option<String>,
    predicates: Vec<Predicate>,
    order: Vec<OrderBy>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl Query {
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            columns: None,
            predicates: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Column selection, including embedded resources such as
    /// `property_images(image_url, is_primary)`. Whitespace is stripped.
    pub fn select(mut self, columns: &str) -> Self {
        let compact: String = columns.split_whitespace().collect();
        self.columns = Some(compact);
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn eq(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(Predicate::compare(column, Operator::Eq, value))
    }

    pub fn neq(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(Predicate::compare(column, Operator::Neq, value))
    }

    pub fn gte(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(Predicate::compare(column, Operator::Gte, value))
    }

    pub fn lte(self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.filter(Predicate::compare(column, Operator::Lte, value))
    }

    pub fn ilike(self, column: &str, pattern: &str) -> Self {
        self.filter(Predicate::compare(column, Operator::ILike, pattern))
    }

    pub fn in_list(self, column: &str, values: Vec<FilterValue>) -> Self {
        self.filter(Predicate::In {
            column: column.to_string(),
            values,
        })
    }

    /// Match any of `predicates`. An empty list adds nothing.
    pub fn or(self, predicates: Vec<Predicate>) -> Self {
        if predicates.is_empty() {
            return self;
        }
        self.filter(Predicate::Or(predicates))
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(OrderBy {
            column: column.to_string(),
            ascending,
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

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.order
    }

    pub fn limit_value(&self) -> Option<usize> {
        self.limit
    }

    /// Whether any predicate constrains `column` directly.
    pub fn constrains(&self, column: &str) -> bool {
        self.predicates.iter().any(|p| p.column() == Some(column))
    }

    /// Query-string pairs in a stable order: select, predicates in insertion
    /// order, order, limit, offset. Values are not percent-encoded.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.predicates.len() + 4);

        if let Some(columns) = &self.columns {
            params.push(("select".to_string(), columns.clone()));
        }

        params.extend(self.predicates.iter().map(Predicate::to_param));

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(OrderBy::render)
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }

        params
    }

    /// Predicate pairs only, for writes (`PATCH`/`DELETE`) that target rows.
    pub fn filter_params(&self) -> Vec<(String, String)> {
        self.predicates.iter().map(Predicate::to_param).collect()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self
            .to_params()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        f.write_str(&rendered)
    }
}
