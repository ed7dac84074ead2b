pub mod backup;
pub mod export;
pub mod init;
pub mod status;
pub mod summary;
pub mod transactions;

use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::error::Result;
use crate::models::{SortKey, Transaction};
use crate::settings::resolve_db_path;
use crate::store::TransactionStore;

pub(crate) fn open_store() -> Result<TransactionStore> {
    let db_path = resolve_db_path()?;
    debug!(path = %db_path.display(), "opening transaction store");
    TransactionStore::open(db_path)
}

#[derive(Parser)]
#[command(name = "tally", about = "Track personal transactions in a local SQLite file.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// The four stored fields, all required, all taken verbatim.
#[derive(Args)]
pub struct RecordArgs {
    /// Amount, e.g. 12.50
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,
    /// Category label, e.g. food
    #[arg(long)]
    pub category: String,
    /// Date as MMDDYYYY (stored as typed)
    #[arg(long)]
    pub date: String,
    /// Free-form description
    #[arg(long)]
    pub desc: String,
}

impl RecordArgs {
    pub fn into_transaction(self) -> Transaction {
        Transaction::new(self.amount, self.category, self.date, self.desc)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and create the database.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// List transactions.
    List {
        /// Ordering (default from settings, otherwise storage order)
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one transaction.
    Show {
        /// Item number (shown in `tally list`)
        item: i64,
        #[arg(long)]
        json: bool,
    },
    /// Add a transaction.
    Add {
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Replace every field of a transaction.
    Update {
        /// Item number (shown in `tally list`)
        item: i64,
        #[command(flatten)]
        record: RecordArgs,
    },
    /// Delete a transaction.
    Delete {
        /// Item number (shown in `tally list`)
        item: i64,
    },
    /// Totals per category.
    Summary,
    /// Export all transactions as CSV.
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Back up the database.
    Backup {
        /// Output path (default: <data_dir>/backups/tally-YYYYMMDD-HHMMSS.db)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the current database and record count.
    Status,
}
