use std::collections::HashMap;

use super::{Action, Cents, Transaction};

/// Per-person wallet summary.
/// `total_earn` and `total_spend` are narrower than inflow/outflow: they
/// count only EARN money received and SPEND money paid out, so a received
/// BORROW or TRANSFER moves the balance without touching the totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub person: String,
    pub wallet_balance: Cents,
    pub total_earn: Cents,
    pub total_spend: Cents,
}

impl Summary {
    /// The all-zero summary. A person with no transactions gets this, not an error.
    pub fn empty(person: impl Into<String>) -> Self {
        Self {
            person: person.into(),
            wallet_balance: 0,
            total_earn: 0,
            total_spend: 0,
        }
    }
}

/// Sum of amounts received by a person.
pub fn inflow(person: &str, transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|tx| tx.to == person)
        .map(|tx| tx.amount_cents)
        .sum()
}

/// Sum of amounts paid out by a person.
pub fn outflow(person: &str, transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|tx| tx.from == person)
        .map(|tx| tx.amount_cents)
        .sum()
}

/// Compute the full summary for a person from a list of transactions.
/// Balance = inflow - outflow; it may legitimately go negative.
pub fn compute_summary(person: &str, transactions: &[Transaction]) -> Summary {
    transactions.iter().fold(
        Summary::empty(person),
        |mut summary, tx| {
            if tx.to == person {
                summary.wallet_balance += tx.amount_cents;
                if tx.action == Action::Earn {
                    summary.total_earn += tx.amount_cents;
                }
            }
            if tx.from == person {
                summary.wallet_balance -= tx.amount_cents;
                if tx.action == Action::Spend {
                    summary.total_spend += tx.amount_cents;
                }
            }
            summary
        },
    )
}

/// Compute balances for every party appearing in the ledger.
/// Returns a map of party -> balance.
pub fn compute_all_balances(transactions: &[Transaction]) -> HashMap<String, Cents> {
    let mut balances: HashMap<String, Cents> = HashMap::new();

    for tx in transactions {
        *balances.entry(tx.from.clone()).or_insert(0) -= tx.amount_cents;
        *balances.entry(tx.to.clone()).or_insert(0) += tx.amount_cents;
    }

    balances
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::WORLD;

    fn make_tx(from: &str, to: &str, action: Action, amount: Cents) -> Transaction {
        Transaction::new(from, to, action, amount, Utc::now())
    }

    #[test]
    fn test_summary_empty_ledger() {
        let summary = compute_summary("Alice", &[]);
        assert_eq!(summary, Summary::empty("Alice"));
    }

    #[test]
    fn test_summary_unknown_person() {
        let txs = vec![make_tx(WORLD, "Alice", Action::Earn, 10000)];
        let summary = compute_summary("Nobody", &txs);
        assert_eq!(summary.wallet_balance, 0);
        assert_eq!(summary.total_earn, 0);
        assert_eq!(summary.total_spend, 0);
    }

    #[test]
    fn test_summary_earn_then_spend() {
        let txs = vec![
            make_tx(WORLD, "Alice", Action::Earn, 10000),
            make_tx("Alice", WORLD, Action::Spend, 3000),
        ];

        let summary = compute_summary("Alice", &txs);
        assert_eq!(summary.wallet_balance, 7000);
        assert_eq!(summary.total_earn, 10000);
        assert_eq!(summary.total_spend, 3000);
    }

    #[test]
    fn test_balance_may_go_negative() {
        let txs = vec![make_tx("Alice", WORLD, Action::Spend, 4500)];
        let summary = compute_summary("Alice", &txs);
        assert_eq!(summary.wallet_balance, -4500);
        assert_eq!(summary.total_spend, 4500);
    }

    #[test]
    fn test_borrow_moves_balance_but_not_total_earn() {
        let txs = vec![make_tx("HDFC", "Alice", Action::Borrow, 50000)];
        let summary = compute_summary("Alice", &txs);
        assert_eq!(summary.wallet_balance, 50000);
        assert_eq!(summary.total_earn, 0);
        assert_eq!(summary.total_spend, 0);
    }

    #[test]
    fn test_transfer_is_symmetric() {
        let txs = vec![
            make_tx(WORLD, "Alice", Action::Earn, 10000),
            make_tx("Alice", "Bob", Action::Transfer, 4000),
        ];

        let alice = compute_summary("Alice", &txs);
        let bob = compute_summary("Bob", &txs);

        assert_eq!(alice.wallet_balance, 6000);
        assert_eq!(bob.wallet_balance, 4000);
        // Transfers count in neither earn nor spend totals
        assert_eq!(alice.total_spend, 0);
        assert_eq!(bob.total_earn, 0);
    }

    #[test]
    fn test_balance_identity() {
        let txs = vec![
            make_tx(WORLD, "Alice", Action::Earn, 12345),
            make_tx("Alice", WORLD, Action::Spend, 678),
            make_tx("Lender", "Alice", Action::Borrow, 9999),
            make_tx("Alice", "Bob", Action::Transfer, 2500),
        ];

        let summary = compute_summary("Alice", &txs);
        assert_eq!(
            summary.wallet_balance,
            inflow("Alice", &txs) - outflow("Alice", &txs)
        );
    }

    #[test]
    fn test_all_balances_sum_to_zero() {
        // Every movement has a source and a destination, WORLD included,
        // so the ledger as a whole is a closed system.
        let txs = vec![
            make_tx(WORLD, "Alice", Action::Earn, 10000),
            make_tx("Alice", "Bob", Action::Transfer, 3000),
            make_tx("Bob", WORLD, Action::Spend, 1000),
            make_tx("HDFC", "Bob", Action::Borrow, 5000),
        ];

        let balances = compute_all_balances(&txs);
        let total: Cents = balances.values().sum();

        assert_eq!(total, 0, "All balances must sum to zero (closed system)");
        assert_eq!(balances.get("Alice"), Some(&7000));
        assert_eq!(balances.get("Bob"), Some(&7000));
    }
}
