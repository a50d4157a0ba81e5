use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exhibition {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Maximum ticket count sellable for this exhibition. Never negative
    /// (CHECK constraint in the schema).
    pub capacity: i32,
}

/// Derived view over an exhibition's ticket sales. `remaining` is always
/// computed, never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Availability {
    pub capacity: i32,
    pub sold: i64,
    pub remaining: i64,
}

impl Availability {
    pub fn new(capacity: i32, sold: i64) -> Self {
        Self {
            capacity,
            sold,
            remaining: i64::from(capacity) - sold,
        }
    }

    pub fn is_sold_out(&self) -> bool {
        self.sold >= i64::from(self.capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_capacity_minus_sold() {
        let a = Availability::new(100, 0);
        assert_eq!(a.capacity, 100);
        assert_eq!(a.sold, 0);
        assert_eq!(a.remaining, 100);
        assert!(!a.is_sold_out());
    }

    #[test]
    fn sold_out_at_capacity() {
        assert!(Availability::new(1, 1).is_sold_out());
        assert!(Availability::new(0, 0).is_sold_out());
        assert!(!Availability::new(2, 1).is_sold_out());
    }
}
