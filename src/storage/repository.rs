use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{Action, Summary, Transaction};

use super::MIGRATION_001_INITIAL;

/// Statistics for ledger integrity verification.
#[derive(Debug, Clone)]
pub struct IntegrityStats {
    pub transaction_count: i64,
    pub has_sequence_gaps: bool,
    pub non_positive_amounts: i64,
    pub unknown_actions: i64,
    pub empty_parties: i64,
}

/// Repository for the append-only transaction ledger, backed by SQLite.
///
/// Ordering contract: queries return records by timestamp descending, with
/// ties broken by sequence descending (most recent insertion first).
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;

        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Transaction operations
    // ========================

    /// Append a transaction to the ledger.
    /// Automatically assigns the next sequence number.
    pub async fn append_transaction(&self, transaction: &mut Transaction) -> Result<()> {
        let sequence = self.next_sequence().await?;
        transaction.sequence = sequence;

        sqlx::query(
            r#"
            INSERT INTO transactions (id, sequence, timestamp, from_person, to_person, action, amount_cents, category, note)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.sequence)
        .bind(transaction.timestamp.to_rfc3339())
        .bind(&transaction.from)
        .bind(&transaction.to)
        .bind(transaction.action.as_str())
        .bind(transaction.amount_cents)
        .bind(&transaction.category)
        .bind(&transaction.note)
        .execute(&self.pool)
        .await
        .context("Failed to append transaction")?;

        Ok(())
    }

    /// Get the next sequence number and increment the counter.
    async fn next_sequence(&self) -> Result<i64> {
        let row = sqlx::query(
            r#"
            UPDATE sequence_counter
            SET value = value + 1
            WHERE name = 'transaction_sequence'
            RETURNING value
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .context("Failed to get next sequence number")?;

        Ok(row.get("value"))
    }

    /// List all transactions, or only those involving the given person as
    /// source or destination. Most recent first.
    pub async fn list_transactions(&self, person: Option<&str>) -> Result<Vec<Transaction>> {
        let rows = match person {
            Some(person) => {
                sqlx::query(
                    r#"
                    SELECT id, sequence, timestamp, from_person, to_person, action, amount_cents, category, note
                    FROM transactions
                    WHERE from_person = ? OR to_person = ?
                    ORDER BY timestamp DESC, sequence DESC
                    "#,
                )
                .bind(person)
                .bind(person)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, sequence, timestamp, from_person, to_person, action, amount_cents, category, note
                    FROM transactions
                    ORDER BY timestamp DESC, sequence DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .context("Failed to list transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    /// Compute the wallet summary for a person using SQL aggregation.
    /// This is more efficient than loading all transactions and computing in memory.
    pub async fn compute_summary(&self, person: &str) -> Result<Summary> {
        let row = sqlx::query(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN to_person = ? THEN amount_cents ELSE 0 END), 0) AS inflow,
                COALESCE(SUM(CASE WHEN from_person = ? THEN amount_cents ELSE 0 END), 0) AS outflow,
                COALESCE(SUM(CASE WHEN to_person = ? AND action = 'EARN' THEN amount_cents ELSE 0 END), 0) AS total_earn,
                COALESCE(SUM(CASE WHEN from_person = ? AND action = 'SPEND' THEN amount_cents ELSE 0 END), 0) AS total_spend
            FROM transactions
            WHERE from_person = ? OR to_person = ?
            "#,
        )
        .bind(person)
        .bind(person)
        .bind(person)
        .bind(person)
        .bind(person)
        .bind(person)
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute summary")?;

        let inflow: i64 = row.get("inflow");
        let outflow: i64 = row.get("outflow");

        Ok(Summary {
            person: person.to_string(),
            wallet_balance: inflow - outflow,
            total_earn: row.get("total_earn"),
            total_spend: row.get("total_spend"),
        })
    }

    /// Every distinct party appearing on either side of the ledger.
    pub async fn distinct_persons(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT from_person AS person FROM transactions
            UNION
            SELECT to_person AS person FROM transactions
            ORDER BY person
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list persons")?;

        Ok(rows.iter().map(|row| row.get("person")).collect())
    }

    /// Get statistics for integrity checking.
    pub async fn get_integrity_stats(&self) -> Result<IntegrityStats> {
        let transaction_count: i64 = sqlx::query("SELECT COUNT(*) as count FROM transactions")
            .fetch_one(&self.pool)
            .await?
            .get("count");

        // Check for sequence gaps
        let sequence_check = sqlx::query(
            r#"
            SELECT
                MIN(sequence) as min_seq,
                MAX(sequence) as max_seq,
                COUNT(*) as count
            FROM transactions
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let min_seq: Option<i64> = sequence_check.get("min_seq");
        let max_seq: Option<i64> = sequence_check.get("max_seq");
        let count: i64 = sequence_check.get("count");

        let has_sequence_gaps = match (min_seq, max_seq) {
            (Some(min), Some(max)) => (max - min + 1) != count,
            _ => false,
        };

        let non_positive_amounts: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM transactions
            WHERE amount_cents <= 0
            "#,
        )
        .fetch_one(&self.pool)
        .await?
        .get("count");

        let unknown_actions: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM transactions
            WHERE action NOT IN ('EARN', 'SPEND', 'BORROW', 'TRANSFER')
            "#,
        )
        .fetch_one(&self.pool)
        .await?
        .get("count");

        let empty_parties: i64 = sqlx::query(
            r#"
            SELECT COUNT(*) as count
            FROM transactions
            WHERE from_person = '' OR to_person = ''
            "#,
        )
        .fetch_one(&self.pool)
        .await?
        .get("count");

        Ok(IntegrityStats {
            transaction_count,
            has_sequence_gaps,
            non_positive_amounts,
            unknown_actions,
            empty_parties,
        })
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.get("id");
        let timestamp_str: String = row.get("timestamp");
        let action_str: String = row.get("action");

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            sequence: row.get("sequence"),
            timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                .context("Invalid timestamp")?
                .with_timezone(&Utc),
            from: row.get("from_person"),
            to: row.get("to_person"),
            action: Action::from_str(&action_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid action: {}", action_str))?,
            amount_cents: row.get("amount_cents"),
            category: row.get("category"),
            note: row.get("note"),
        })
    }
}
