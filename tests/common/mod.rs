// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use domus::application::{LedgerService, TransactionDraft};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Shorthand for a draft with no category or note
pub fn draft(from: &str, to: &str, action: &str, amount: &str) -> TransactionDraft {
    TransactionDraft {
        from: from.to_string(),
        to: to.to_string(),
        action: action.to_string(),
        amount: amount.to_string(),
        category: None,
        note: None,
    }
}

/// Shorthand for a draft with a category
pub fn draft_with_category(
    from: &str,
    to: &str,
    action: &str,
    amount: &str,
    category: &str,
) -> TransactionDraft {
    TransactionDraft {
        category: Some(category.to_string()),
        ..draft(from, to, action, amount)
    }
}
