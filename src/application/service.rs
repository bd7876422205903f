use chrono::{DateTime, Utc};

use crate::domain::{self, Cents, Summary, Transaction, parse_cents};
use crate::storage::Repository;

use super::AppError;

/// Application service providing the core ledger operations.
/// This is the primary interface for any client (CLI, API, ...).
pub struct LedgerService {
    repo: Repository,
}

/// Raw transaction input as it arrives from a caller, before validation.
/// The amount is carried as text: the boundary (CLI flags, CSV cells, JSON
/// bodies) always delivers it as a decimal string.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub from: String,
    pub to: String,
    pub action: String,
    pub amount: String,
    pub category: Option<String>,
    pub note: Option<String>,
}

/// Result of verifying ledger integrity.
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub transaction_count: i64,
    pub person_count: usize,
    pub issues: Vec<String>,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Validate, normalize and persist a transaction.
    ///
    /// Validation order: empty `from`/`to`/`action` first, then the action
    /// against the closed set, then the amount (parseable and positive).
    /// Exactly one append per successful call; the timestamp is assigned
    /// here, never taken from the caller.
    ///
    /// The service stores whatever `from`/`to` pair it is given - deriving
    /// the pair from the action kind (EARN implies `from = WORLD`, etc.) is
    /// the caller's concern.
    pub async fn record_transaction(
        &self,
        draft: TransactionDraft,
    ) -> Result<Transaction, AppError> {
        self.record_transaction_at(draft, Utc::now()).await
    }

    /// Restore path: same validation and normalization as
    /// [`record_transaction`](Self::record_transaction), but stores a
    /// caller-supplied timestamp. Used by imports to preserve original
    /// record times.
    pub async fn record_transaction_at(
        &self,
        draft: TransactionDraft,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, AppError> {
        let from = draft.from.trim();
        let to = draft.to.trim();
        let action_raw = draft.action.trim();

        if from.is_empty() {
            return Err(AppError::MissingField("from"));
        }
        if to.is_empty() {
            return Err(AppError::MissingField("to"));
        }
        if action_raw.is_empty() {
            return Err(AppError::MissingField("action"));
        }

        let action = domain::Action::from_str(action_raw)
            .ok_or_else(|| AppError::InvalidAction(action_raw.to_string()))?;

        let amount_cents = parse_cents(&draft.amount)
            .map_err(|_| AppError::InvalidAmount(format!("'{}' is not a number", draft.amount)))?;
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount("amount must be positive".into()));
        }

        let mut transaction = Transaction::new(from, to, action, amount_cents, timestamp);
        if let Some(category) = draft.category {
            transaction = transaction.with_category(category.trim());
        }
        if let Some(note) = draft.note {
            transaction = transaction.with_note(note.trim());
        }

        self.repo.append_transaction(&mut transaction).await?;

        tracing::debug!(
            sequence = transaction.sequence,
            action = %transaction.action,
            "recorded transaction"
        );

        Ok(transaction)
    }

    /// List transactions, optionally filtered to one person. Most recent first.
    pub async fn list_transactions(
        &self,
        person: Option<&str>,
    ) -> Result<Vec<Transaction>, AppError> {
        Ok(self.repo.list_transactions(person).await?)
    }

    /// Wallet summary for a person. A person the ledger has never seen gets
    /// the all-zero summary, not an error.
    pub async fn summary(&self, person: &str) -> Result<Summary, AppError> {
        Ok(self.repo.compute_summary(person).await?)
    }

    /// Check ledger integrity and return a report.
    ///
    /// Invariant violations in stored rows are reported alongside a
    /// cross-check of the SQL aggregation against an independent full-scan
    /// recomputation. Nothing is repaired.
    pub async fn check_integrity(&self) -> Result<IntegrityReport, AppError> {
        let stats = self.repo.get_integrity_stats().await?;
        let mut issues = Vec::new();

        if stats.has_sequence_gaps {
            issues.push("sequence numbers have gaps".to_string());
        }
        if stats.non_positive_amounts > 0 {
            issues.push(format!(
                "{} transaction(s) with non-positive amount",
                stats.non_positive_amounts
            ));
        }
        if stats.unknown_actions > 0 {
            issues.push(format!(
                "{} transaction(s) with unknown action",
                stats.unknown_actions
            ));
        }
        if stats.empty_parties > 0 {
            issues.push(format!(
                "{} transaction(s) with an empty party",
                stats.empty_parties
            ));
        }

        // Cross-check the SQL aggregation against a full-scan recomputation.
        let transactions = self.repo.list_transactions(None).await?;
        let persons = self.repo.distinct_persons().await?;
        for person in &persons {
            let stored = self.repo.compute_summary(person).await?;
            let recomputed = domain::compute_summary(person, &transactions);
            if stored != recomputed {
                issues.push(format!(
                    "summary mismatch for '{}': aggregation says balance {}, full scan says {}",
                    person, stored.wallet_balance, recomputed.wallet_balance
                ));
            }
        }

        // Closed system: every movement debits one party and credits another,
        // WORLD included, so all balances must sum to zero
        let total: Cents = domain::compute_all_balances(&transactions).values().sum();
        if total != 0 {
            issues.push(format!("party balances sum to {}, expected 0", total));
        }

        Ok(IntegrityReport {
            transaction_count: stats.transaction_count,
            person_count: persons.len(),
            issues,
        })
    }
}
