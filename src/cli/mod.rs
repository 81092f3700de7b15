pub mod backup;
pub mod dashboard;
pub mod demo;
pub mod goal;
pub mod init;
pub mod privacy;
pub mod status;
pub mod summary;
pub mod transactions;

use std::path::Path;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};

use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::{Category, TxType, MAX_INSTALLMENTS};
use crate::store::FileStore;
use crate::views::{TypeFilter, YearMonth};

pub(crate) fn open_ledger(data_dir: &Path) -> Result<Ledger<FileStore>> {
    Ledger::open(FileStore::in_dir(data_dir)?)
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `--month YYYY-MM`, defaulting to the current month.
pub(crate) fn month_or_current(month: Option<&str>) -> Result<YearMonth> {
    match month {
        Some(m) => YearMonth::parse(m),
        None => Ok(YearMonth::current()),
    }
}

#[derive(Parser)]
#[command(name = "tally", about = "Personal income and expense tracker with recurring and installment entries.")]
pub struct Cli {
    /// Data directory for this run (default: the one saved by `tally init`)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose and create the data directory.
    Init,
    /// Record an income or expense; --recurring repeats it monthly for a
    /// year, --installments splits it across months.
    Add {
        /// What the money was for
        description: String,
        /// Amount, e.g. 120.50 or 120,50
        #[arg(value_parser = transactions::parse_amount)]
        amount: f64,
        /// income or expense
        #[arg(long = "type", default_value = "expense")]
        tx_type: TxType,
        /// food, transport, home, leisure, shopping, salary, other
        #[arg(long, default_value = "other")]
        category: Category,
        /// Due or occurrence date: YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Repeat monthly for 12 months
        #[arg(long, conflicts_with = "installments")]
        recurring: bool,
        /// Split the amount into N monthly installments
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_INSTALLMENTS as i64))]
        installments: Option<u32>,
    },
    /// List one month's transactions, pending first.
    List {
        /// Month: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
        /// Only descriptions containing this text
        #[arg(long)]
        search: Option<String>,
        /// all, income, expense or debt (debt spans every month)
        #[arg(long, default_value = "all")]
        filter: TypeFilter,
    },
    /// Month totals, spending goal, category breakdown and alerts.
    Summary {
        /// Month: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Pending expenses whose date has passed.
    Overdue,
    /// Flip a transaction between pending and paid.
    Toggle {
        /// Transaction ID or unique prefix
        id: String,
    },
    /// Delete a single transaction (other installments are kept).
    Delete {
        /// Transaction ID or unique prefix
        id: String,
    },
    /// Write a JSON backup of every transaction.
    Export {
        /// Output path (default: <data_dir>/exports/financas-backup-YYYY-MM-DD.json)
        #[arg(long)]
        output: Option<String>,
    },
    /// Replace all transactions with a JSON backup.
    Import {
        /// Backup file (JSON array of transactions)
        file: String,
    },
    /// Show, set or clear the monthly spending goal.
    Goal {
        /// New goal amount
        #[arg(value_parser = transactions::parse_amount)]
        amount: Option<f64>,
        /// Remove the goal
        #[arg(long, conflicts_with = "amount")]
        clear: bool,
    },
    /// Show or change privacy mode (masks amounts in all output).
    Privacy {
        #[arg(value_enum)]
        mode: Option<PrivacyMode>,
    },
    /// Interactive month dashboard.
    Dashboard {
        /// Month to open: YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    /// Load sample data into an empty ledger.
    Demo,
    /// Show the data directory and collection statistics.
    Status,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrivacyMode {
    On,
    Off,
    Toggle,
}
