use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{
    AppError, ErrorResponse, LedgerService, RecordedResponse, SummaryView, TransactionDraft,
    TransactionView,
};
use crate::domain::{WORLD, format_cents};

/// Domus - Household Finance Ledger
#[derive(Parser)]
#[command(name = "domus")]
#[command(about = "A local-first household finance ledger for the command line")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "domus.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a raw transaction with an explicit From/To pair
    Add {
        /// Source party (a person, a lender name, or WORLD)
        #[arg(long)]
        from: String,

        /// Destination party
        #[arg(long)]
        to: String,

        /// Action kind: earn, spend, borrow, transfer (any casing)
        #[arg(short, long)]
        action: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Category (income source, expense category, transfer reason)
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record income from the outside world
    Earn {
        /// Person receiving the money
        person: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Source of income (Salary, Gift, etc.)
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record an expense to the outside world
    Spend {
        /// Person spending the money
        person: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Expense category (Food, Current bill, etc.)
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record money borrowed from a bank or lender
    Borrow {
        /// Person receiving the money
        person: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Bank or lender name (HDFC, Weekly lender, etc.)
        #[arg(short, long)]
        lender: String,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Give money to another household member
    Transfer {
        /// Person giving the money
        person: String,

        /// Person receiving the money
        #[arg(long)]
        to: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Reason (Repay, Household, Gift, etc.)
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,

        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },

    /// List transactions, most recent first
    Transactions {
        /// Only transactions involving this person
        #[arg(short, long)]
        person: Option<String>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the wallet summary for a person
    Summary {
        /// Person name
        person: String,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Verify ledger integrity
    Check,

    /// Export data to CSV or JSON
    Export {
        /// What to export: transactions, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import transactions from CSV
    Import {
        /// Input file (stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,

        /// Preview without importing
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                from,
                to,
                action,
                amount,
                category,
                note,
                json,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let draft = TransactionDraft {
                    from,
                    to,
                    action,
                    amount,
                    category,
                    note,
                };
                run_record_command(&service, draft, json).await;
            }

            Commands::Earn {
                person,
                amount,
                category,
                note,
                json,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let draft = TransactionDraft {
                    from: WORLD.to_string(),
                    to: person,
                    action: "EARN".to_string(),
                    amount,
                    category,
                    note,
                };
                run_record_command(&service, draft, json).await;
            }

            Commands::Spend {
                person,
                amount,
                category,
                note,
                json,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let draft = TransactionDraft {
                    from: person,
                    to: WORLD.to_string(),
                    action: "SPEND".to_string(),
                    amount,
                    category,
                    note,
                };
                run_record_command(&service, draft, json).await;
            }

            Commands::Borrow {
                person,
                amount,
                lender,
                note,
                json,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                // The lender doubles as the category, matching how borrows
                // are displayed in history
                let draft = TransactionDraft {
                    from: lender.clone(),
                    to: person,
                    action: "BORROW".to_string(),
                    amount,
                    category: Some(lender),
                    note,
                };
                run_record_command(&service, draft, json).await;
            }

            Commands::Transfer {
                person,
                to,
                amount,
                category,
                note,
                json,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let draft = TransactionDraft {
                    from: person,
                    to,
                    action: "TRANSFER".to_string(),
                    amount,
                    category,
                    note,
                };
                run_record_command(&service, draft, json).await;
            }

            Commands::Transactions { person, json } => {
                let service = LedgerService::connect(&self.database).await?;
                run_transactions_command(&service, person.as_deref(), json).await;
            }

            Commands::Summary { person, json } => {
                let service = LedgerService::connect(&self.database).await?;
                run_summary_command(&service, &person, json).await;
            }

            Commands::Check => {
                let service = LedgerService::connect(&self.database).await?;
                run_check_command(&service).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }

            Commands::Import { input, dry_run } => {
                let service = LedgerService::connect(&self.database).await?;
                run_import_command(&service, input.as_deref(), dry_run).await?;
            }
        }

        Ok(())
    }
}

/// Translate a service failure into a structured response and exit.
/// Validation failures keep their message and exit 2 (the client-error
/// class); anything else is logged and reported with a generic message,
/// exit 1 (the server-error class).
fn handle_failure(err: AppError, json: bool, generic: &str) -> ! {
    let message = if err.is_validation() {
        err.to_string()
    } else {
        tracing::error!(error = %err, "storage-class failure");
        generic.to_string()
    };

    if json {
        match serde_json::to_string(&ErrorResponse::new(&message)) {
            Ok(body) => println!("{}", body),
            Err(e) => tracing::error!(error = %e, "failed to serialize error response"),
        }
    } else {
        eprintln!("Error: {}", message);
    }

    std::process::exit(if err.is_validation() { 2 } else { 1 });
}

async fn run_record_command(service: &LedgerService, draft: TransactionDraft, json: bool) {
    match service.record_transaction(draft).await {
        Ok(tx) => {
            if json {
                match serde_json::to_string_pretty(&RecordedResponse::new(&tx)) {
                    Ok(body) => println!("{}", body),
                    Err(e) => tracing::error!(error = %e, "failed to serialize response"),
                }
            } else {
                println!(
                    "Recorded {}: {} {} -> {} ({})",
                    tx.action,
                    format_cents(tx.amount_cents),
                    tx.from,
                    tx.to,
                    tx.id
                );
            }
        }
        Err(err) => handle_failure(err, json, "failed to save transaction"),
    }
}

async fn run_transactions_command(service: &LedgerService, person: Option<&str>, json: bool) {
    let transactions = match service.list_transactions(person).await {
        Ok(txs) => txs,
        Err(err) => handle_failure(err, json, "failed to read transactions"),
    };

    if json {
        let views: Vec<TransactionView> = transactions.iter().map(TransactionView::from).collect();
        match serde_json::to_string_pretty(&views) {
            Ok(body) => println!("{}", body),
            Err(e) => tracing::error!(error = %e, "failed to serialize transactions"),
        }
        return;
    }

    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<17} {:<12} {:<12} {:<10} {:>10} {:<15} NOTE",
        "DATE", "FROM", "TO", "ACTION", "AMOUNT", "CATEGORY"
    );
    println!("{}", "-".repeat(90));

    for tx in &transactions {
        println!(
            "{:<17} {:<12} {:<12} {:<10} {:>10} {:<15} {}",
            tx.timestamp.format("%Y-%m-%d %H:%M"),
            truncate(&tx.from, 12),
            truncate(&tx.to, 12),
            tx.action,
            format_cents(tx.amount_cents),
            truncate(&tx.category, 15),
            truncate(&tx.note, 30)
        );
    }
}

async fn run_summary_command(service: &LedgerService, person: &str, json: bool) {
    let summary = match service.summary(person).await {
        Ok(summary) => summary,
        Err(err) => handle_failure(err, json, "failed to compute summary"),
    };

    if json {
        match serde_json::to_string_pretty(&SummaryView::from(&summary)) {
            Ok(body) => println!("{}", body),
            Err(e) => tracing::error!(error = %e, "failed to serialize summary"),
        }
        return;
    }

    println!("{}", summary.person);
    println!("  Wallet balance: {:>12}", format_cents(summary.wallet_balance));
    println!("  Total earned:   {:>12}", format_cents(summary.total_earn));
    println!("  Total spent:    {:>12}", format_cents(summary.total_spend));
}

async fn run_check_command(service: &LedgerService) -> Result<()> {
    println!("Checking ledger integrity...\n");

    let report = service.check_integrity().await?;

    println!("Transactions: {}", report.transaction_count);
    println!("Persons:      {}", report.person_count);
    println!();

    if report.is_healthy() {
        println!("Ledger is consistent.");
    } else {
        println!("Issues found:");
        for issue in &report.issues {
            println!("  - {}", issue);
        }
        anyhow::bail!("Ledger integrity check failed");
    }

    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "transactions" => {
            let count = exporter.export_transactions_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!("Exported full ledger: {} transactions", snapshot.transactions.len());
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: transactions, full",
                export_type
            );
        }
    }

    Ok(())
}

async fn run_import_command(
    service: &LedgerService,
    input: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    use crate::io::{ImportOptions, Importer};
    use std::fs::File;
    use std::io::{Read, stdin};

    let importer = Importer::new(service);

    let reader: Box<dyn Read> = match input {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open input file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdin()),
    };

    let options = ImportOptions { dry_run };
    let result = importer.import_transactions_csv(reader, options).await?;

    if dry_run {
        println!("Dry run complete");
    } else {
        println!("Import complete");
    }
    println!("  Imported: {}", result.imported);
    println!("  Errors:   {}", result.errors.len());

    if !result.errors.is_empty() {
        println!("\nErrors:");
        for error in result.errors.iter().take(10) {
            println!(
                "  Line {}: {}",
                error.line,
                error
                    .field
                    .as_ref()
                    .map(|f| format!("{}: ", f))
                    .unwrap_or_default()
                    + &error.error
            );
        }
        if result.errors.len() > 10 {
            println!("  ... and {} more errors", result.errors.len() - 10);
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
