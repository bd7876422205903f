use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Action, Cents};

pub type TransactionId = Uuid;

/// Sentinel party for money entering or leaving the household.
/// An EARN comes from the world; a SPEND goes to the world.
pub const WORLD: &str = "WORLD";

/// A transaction is an atomic movement of money from one party to another.
/// The ledger is append-only: transactions are never updated or deleted.
///
/// A party is any non-empty string - a household member, the WORLD sentinel,
/// or a free-text lender name. No party registry exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Monotonically increasing insertion position, assigned by the repository
    pub sequence: i64,
    /// When the record was created, assigned server-side
    pub timestamp: DateTime<Utc>,
    /// Source party (balance decreases)
    pub from: String,
    /// Destination party (balance increases)
    pub to: String,
    pub action: Action,
    /// Amount in cents (always positive)
    pub amount_cents: Cents,
    /// Free-text classification: income source, expense category, lender name
    pub category: String,
    /// Free-text annotation
    pub note: String,
}

impl Transaction {
    /// Create a new transaction. Sequence number must be assigned by the repository.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        action: Action,
        amount_cents: Cents,
        timestamp: DateTime<Utc>,
    ) -> Self {
        assert!(amount_cents > 0, "Transaction amount must be positive");
        Self {
            id: Uuid::new_v4(),
            sequence: 0, // Will be set by repository
            timestamp,
            from: from.into(),
            to: to.into(),
            action,
            amount_cents,
            category: String::new(),
            note: String::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// True if the person appears on either side of the movement.
    pub fn involves(&self, person: &str) -> bool {
        self.from == person || self.to == person
    }
}
