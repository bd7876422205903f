use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use std::io::Read;

use crate::application::{LedgerService, TransactionDraft};

/// Result of an import operation
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<ImportError>,
}

/// Error that occurred during import
#[derive(Debug, Clone)]
pub struct ImportError {
    pub line: usize,
    pub field: Option<String>,
    pub error: String,
}

/// Options for import operations
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub dry_run: bool,
}

/// Importer for loading external records into the ledger
pub struct Importer<'a> {
    service: &'a LedgerService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Import transactions from CSV in the DateTime/From/To/Action/Amount/
    /// Category/Note layout. Each row passes through the same validation as
    /// a live record; failures are collected per line, never aborting the
    /// rest of the file. The DateTime cell is preserved as the stored
    /// timestamp.
    pub async fn import_transactions_csv<R: Read>(
        &self,
        reader: R,
        options: ImportOptions,
    ) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut imported = 0;
        let mut errors = Vec::new();

        for (line_num, result) in csv_reader.records().enumerate() {
            let line = line_num + 2; // +2 for header and 0-indexing

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: format!("CSV parse error: {}", e),
                    });
                    continue;
                }
            };

            let timestamp_str = record.get(0).unwrap_or("");
            let draft = TransactionDraft {
                from: record.get(1).unwrap_or("").to_string(),
                to: record.get(2).unwrap_or("").to_string(),
                action: record.get(3).unwrap_or("").to_string(),
                amount: record.get(4).unwrap_or("").to_string(),
                category: record.get(5).map(|s| s.to_string()),
                note: record.get(6).map(|s| s.to_string()),
            };

            let timestamp = match parse_timestamp(timestamp_str) {
                Ok(ts) => ts,
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: Some("DateTime".to_string()),
                        error: format!("Invalid timestamp: {}", e),
                    });
                    continue;
                }
            };

            if options.dry_run {
                imported += 1;
                continue;
            }

            match self.service.record_transaction_at(draft, timestamp).await {
                Ok(_) => {
                    imported += 1;
                }
                Err(e) => {
                    errors.push(ImportError {
                        line,
                        field: None,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(ImportResult { imported, errors })
    }
}

// Accept RFC3339 or bare YYYY-MM-DD dates
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap().and_utc());
    }

    anyhow::bail!("Invalid timestamp format: {}", s)
}
