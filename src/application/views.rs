use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Summary, Transaction, cents_to_units};

/// A stored transaction as seen by callers: exactly the seven ledger fields,
/// with the amount in decimal units rather than cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionView {
    #[serde(rename = "DateTime")]
    pub datetime: DateTime<Utc>,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Note")]
    pub note: String,
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        Self {
            datetime: tx.timestamp,
            from: tx.from.clone(),
            to: tx.to.clone(),
            action: tx.action.as_str().to_string(),
            amount: cents_to_units(tx.amount_cents),
            category: tx.category.clone(),
            note: tx.note.clone(),
        }
    }
}

/// Per-person summary as seen by callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub person: String,
    pub wallet_balance: f64,
    pub total_earn: f64,
    pub total_spend: f64,
}

impl From<&Summary> for SummaryView {
    fn from(summary: &Summary) -> Self {
        Self {
            person: summary.person.clone(),
            wallet_balance: cents_to_units(summary.wallet_balance),
            total_earn: cents_to_units(summary.total_earn),
            total_spend: cents_to_units(summary.total_spend),
        }
    }
}

/// Successful create response.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedResponse {
    pub success: bool,
    pub transaction: TransactionView,
}

impl RecordedResponse {
    pub fn new(transaction: &Transaction) -> Self {
        Self {
            success: true,
            transaction: transaction.into(),
        }
    }
}

/// Structured failure response. Carries only the message meant for the
/// caller, never internal detail.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
