//! Ordering for table listings.

use std::fmt;

/// Ascending sort key for a listing, rendered as `column.asc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
}

impl Order {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.asc", self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_display() {
        assert_eq!(Order::asc("category").to_string(), "category.asc");
    }
}
