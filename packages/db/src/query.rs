//! Generic row query: equality filters, one ordering column, optional limit.

use serde_json::Value as JsonValue;

use crate::DbError;

/// Sort direction for [`RowQuery::order_by`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    fn as_sql(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASC",
            Direction::Descending => "DESC",
        }
    }
}

/// Filter options for listing rows of a table.
///
/// Filters are ANDed together. Column names are interpolated into SurrealQL,
/// so they must be plain identifiers; values are always bound.
#[derive(Debug, Default, Clone)]
pub struct RowQuery {
    filters: Vec<(String, JsonValue)>,
    order: Option<(String, Direction)>,
    limit: Option<usize>,
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_identifier(name: &str) -> Result<(), DbError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(DbError::Query(format!("Invalid column name: {:?}", name)))
    }
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    /// Order results by `column`.
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    /// Cap the number of rows returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render a SELECT statement and its bindings.
    pub(crate) fn build(
        &self,
        table: &str,
        columns: &str,
    ) -> Result<(String, Vec<(String, JsonValue)>), DbError> {
        check_identifier(table)?;

        let mut conditions = Vec::with_capacity(self.filters.len());
        let mut bindings = Vec::with_capacity(self.filters.len());
        for (i, (column, value)) in self.filters.iter().enumerate() {
            check_identifier(column)?;
            let name = format!("p{}", i);
            conditions.push(format!("{} = ${}", column, name));
            bindings.push((name, value.clone()));
        }

        let mut query = format!("SELECT {} FROM {}", columns, table);
        if !conditions.is_empty() {
            query.push_str(&format!(" WHERE {}", conditions.join(" AND ")));
        }
        if let Some((column, direction)) = &self.order {
            check_identifier(column)?;
            query.push_str(&format!(" ORDER BY {} {}", column, direction.as_sql()));
        }
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }

        Ok((query, bindings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_filters_order_and_limit() {
        let (query, bindings) = RowQuery::new()
            .eq("user_id", "u-1")
            .eq("queue_id", "q-1")
            .order_by("booked_at", Direction::Descending)
            .limit(5)
            .build("appointment", "*")
            .unwrap();

        assert_eq!(
            query,
            "SELECT * FROM appointment WHERE user_id = $p0 AND queue_id = $p1 ORDER BY booked_at DESC LIMIT 5"
        );
        assert_eq!(bindings[0], ("p0".to_string(), JsonValue::from("u-1")));
        assert_eq!(bindings[1].0, "p1");
    }

    #[test]
    fn empty_query_selects_everything() {
        let (query, bindings) = RowQuery::new().build("queue_status", "*").unwrap();
        assert_eq!(query, "SELECT * FROM queue_status");
        assert!(bindings.is_empty());
    }

    #[test]
    fn rejects_unsafe_column_names() {
        let injected = RowQuery::new().eq("user_id = 1; DELETE appointment; --", "x");
        assert!(matches!(
            injected.build("appointment", "*"),
            Err(DbError::Query(_))
        ));

        let bad_order = RowQuery::new().order_by("1st", Direction::Ascending);
        assert!(bad_order.build("appointment", "*").is_err());
    }
}
