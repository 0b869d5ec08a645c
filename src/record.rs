use std::fmt;

/// A single cell value. Numbers order before text when a column mixes both.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Value {
    Number(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

/// Describes one displayable field of a record type `R`.
pub struct Column<R> {
    pub field: &'static str,
    pub label: &'static str,
    pub sortable: bool,
    accessor: fn(&R) -> Option<Value>,
}

impl<R> Column<R> {
    pub fn new(field: &'static str, label: &'static str, accessor: fn(&R) -> Option<Value>) -> Self {
        Self {
            field,
            label,
            sortable: true,
            accessor,
        }
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn value(&self, record: &R) -> Option<Value> {
        (self.accessor)(record)
    }

    /// Text shown for the record in this column, empty if the record has no value.
    pub fn display(&self, record: &R) -> String {
        self.value(record).map(|v| v.to_string()).unwrap_or_default()
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            label: self.label,
            sortable: self.sortable,
            accessor: self.accessor,
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: i64,
        right: Option<String>,
    }

    #[test]
    fn numbers_compare_numerically() {
        assert!(Value::Number(9) < Value::Number(10));
        assert!(Value::from("10") < Value::from("9"));
        assert!(Value::Number(100) < Value::from("1"));
    }

    #[test]
    fn missing_values_display_empty() {
        let col: Column<Pair> = Column::new("right", "Right", |p: &Pair| p.right.as_deref().map(Value::from));
        let with = Pair { left: 1, right: Some("x".into()) };
        let without = Pair { left: 2, right: None };
        assert_eq!(col.display(&with), "x");
        assert_eq!(col.display(&without), "");
    }

    #[test]
    fn unsortable_column() {
        let col: Column<Pair> = Column::new("left", "Left", |p: &Pair| Some(p.left.into()));
        assert!(col.sortable);
        assert!(!col.clone().unsortable().sortable);
        assert_eq!(col.value(&Pair { left: 3, right: None }), Some(Value::Number(3)));
    }
}
