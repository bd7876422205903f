mod common;

use anyhow::Result;
use common::{draft, draft_with_category, test_service};
use domus::domain::{self, WORLD};

#[tokio::test]
async fn test_summary_zero_state() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // A person the ledger has never seen is not an error
    let summary = service.summary("Nobody").await?;
    assert_eq!(summary.wallet_balance, 0);
    assert_eq!(summary.total_earn, 0);
    assert_eq!(summary.total_spend, 0);

    Ok(())
}

#[tokio::test]
async fn test_summary_earn_then_spend() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_transaction(draft_with_category(WORLD, "Alice", "earn", "100", "Salary"))
        .await?;

    let summary = service.summary("Alice").await?;
    assert_eq!(summary.wallet_balance, 10000);
    assert_eq!(summary.total_earn, 10000);
    assert_eq!(summary.total_spend, 0);

    service
        .record_transaction(draft_with_category("Alice", WORLD, "spend", "30", "Food"))
        .await?;

    let summary = service.summary("Alice").await?;
    assert_eq!(summary.wallet_balance, 7000);
    assert_eq!(summary.total_earn, 10000);
    assert_eq!(summary.total_spend, 3000);

    Ok(())
}

#[tokio::test]
async fn test_borrow_moves_balance_but_not_totals() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_transaction(draft("HDFC", "Alice", "borrow", "500"))
        .await?;

    let summary = service.summary("Alice").await?;
    assert_eq!(summary.wallet_balance, 50000);
    assert_eq!(summary.total_earn, 0, "a received borrow is not earned income");
    assert_eq!(summary.total_spend, 0);

    Ok(())
}

#[tokio::test]
async fn test_transfer_moves_balance_between_persons() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_transaction(draft(WORLD, "Alice", "earn", "100"))
        .await?;
    service
        .record_transaction(draft("Alice", "Bob", "transfer", "40"))
        .await?;

    let alice = service.summary("Alice").await?;
    let bob = service.summary("Bob").await?;

    assert_eq!(alice.wallet_balance, 6000);
    assert_eq!(bob.wallet_balance, 4000);
    // The transfer shows in neither earn nor spend totals
    assert_eq!(alice.total_spend, 0);
    assert_eq!(bob.total_earn, 0);

    Ok(())
}

#[tokio::test]
async fn test_balance_may_go_negative() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_transaction(draft("Alice", WORLD, "spend", "45"))
        .await?;

    let summary = service.summary("Alice").await?;
    assert_eq!(summary.wallet_balance, -4500);
    assert_eq!(summary.total_spend, 4500);

    Ok(())
}

#[tokio::test]
async fn test_balance_identity_against_full_scan() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_transaction(draft(WORLD, "Alice", "earn", "123.45"))
        .await?;
    service
        .record_transaction(draft("Alice", WORLD, "spend", "6.78"))
        .await?;
    service
        .record_transaction(draft("Lender", "Alice", "borrow", "99.99"))
        .await?;
    service
        .record_transaction(draft("Alice", "Bob", "transfer", "25"))
        .await?;
    service
        .record_transaction(draft(WORLD, "Bob", "earn", "10"))
        .await?;

    let transactions = service.list_transactions(None).await?;

    for person in ["Alice", "Bob", "Lender", WORLD] {
        let stored = service.summary(person).await?;
        let recomputed = domain::compute_summary(person, &transactions);
        assert_eq!(stored, recomputed, "summary mismatch for {}", person);
        assert_eq!(
            stored.wallet_balance,
            domain::inflow(person, &transactions) - domain::outflow(person, &transactions)
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_check_integrity_on_healthy_ledger() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .record_transaction(draft(WORLD, "Alice", "earn", "100"))
        .await?;
    service
        .record_transaction(draft("Alice", "Bob", "transfer", "40"))
        .await?;

    let report = service.check_integrity().await?;
    assert!(report.is_healthy(), "issues: {:?}", report.issues);
    assert_eq!(report.transaction_count, 2);
    assert_eq!(report.person_count, 3); // Alice, Bob, WORLD

    Ok(())
}

#[tokio::test]
async fn test_check_integrity_on_empty_ledger() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let report = service.check_integrity().await?;
    assert!(report.is_healthy());
    assert_eq!(report.transaction_count, 0);
    assert_eq!(report.person_count, 0);

    Ok(())
}
