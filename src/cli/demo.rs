use std::path::Path;

use chrono::{Datelike, NaiveDate};

use crate::cli::{open_ledger, today};
use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::{Category, Draft, TxType};
use crate::store::KeyValueStore;
use crate::views::YearMonth;

/// How a sample entry expands.
enum Repeat {
    Once,
    Monthly,
    Installments(u32),
}

struct DemoEntry {
    /// Months relative to the current one (-1 = last month).
    month_offset: i32,
    day: u32,
    description: &'static str,
    amount: f64,
    tx_type: TxType,
    category: Category,
    repeat: Repeat,
}

const ENTRIES: &[DemoEntry] = &[
    DemoEntry { month_offset: 0, day: 5, description: "Salário", amount: 5200.00, tx_type: TxType::Income, category: Category::Salary, repeat: Repeat::Monthly },
    DemoEntry { month_offset: 0, day: 10, description: "Aluguel", amount: 1800.00, tx_type: TxType::Expense, category: Category::Home, repeat: Repeat::Monthly },
    DemoEntry { month_offset: 0, day: 12, description: "Internet", amount: 99.90, tx_type: TxType::Expense, category: Category::Home, repeat: Repeat::Monthly },
    DemoEntry { month_offset: -1, day: 15, description: "Notebook", amount: 3600.00, tx_type: TxType::Expense, category: Category::Shopping, repeat: Repeat::Installments(10) },
    DemoEntry { month_offset: 0, day: 3, description: "Mercado", amount: 450.30, tx_type: TxType::Expense, category: Category::Food, repeat: Repeat::Once },
    DemoEntry { month_offset: 0, day: 7, description: "Uber", amount: 38.90, tx_type: TxType::Expense, category: Category::Transport, repeat: Repeat::Once },
    DemoEntry { month_offset: 0, day: 14, description: "Cinema", amount: 64.00, tx_type: TxType::Expense, category: Category::Leisure, repeat: Repeat::Once },
    DemoEntry { month_offset: 0, day: 20, description: "Freelance", amount: 1200.00, tx_type: TxType::Income, category: Category::Other, repeat: Repeat::Once },
    DemoEntry { month_offset: -1, day: 20, description: "Conta de luz", amount: 180.45, tx_type: TxType::Expense, category: Category::Home, repeat: Repeat::Once },
];

/// Left pending so the demo shows an overdue alert.
const UNPAID: &str = "Conta de luz";

fn month_at(today: NaiveDate, offset: i32) -> YearMonth {
    let mut month = YearMonth::of(today);
    for _ in 0..offset.unsigned_abs() {
        month = if offset < 0 { month.prev() } else { month.next() };
    }
    month
}

fn entry_date(entry: &DemoEntry, today: NaiveDate) -> NaiveDate {
    let first = month_at(today, entry.month_offset).first_day();
    first.with_day(entry.day).unwrap_or(first)
}

/// Fill an empty ledger with sample data. Records dated before `today` are
/// marked paid, except one overdue bill.
pub fn seed<S: KeyValueStore>(ledger: &mut Ledger<S>, today: NaiveDate) -> Result<usize> {
    for entry in ENTRIES {
        let mut draft = Draft::new(
            entry.description,
            entry.amount,
            entry.tx_type,
            entry.category,
            entry_date(entry, today),
        );
        draft = match entry.repeat {
            Repeat::Once => draft,
            Repeat::Monthly => draft.recurring(),
            Repeat::Installments(n) => draft.installments(n),
        };
        ledger.add(&draft)?;
    }

    let settled: Vec<String> = ledger
        .transactions()
        .iter()
        .filter(|t| t.date < today && t.description != UNPAID)
        .map(|t| t.id.clone())
        .collect();
    for id in &settled {
        ledger.toggle_status(id)?;
    }
    log::info!("seeded {} demo records, {} marked paid", ledger.transactions().len(), settled.len());
    Ok(ledger.transactions().len())
}

pub fn run(data_dir: &Path) -> Result<()> {
    let mut ledger = open_ledger(data_dir)?;

    // Idempotency guard
    if !ledger.is_empty() {
        println!(
            "Demo data not loaded: the ledger already has {} transactions.",
            ledger.transactions().len()
        );
        return Ok(());
    }

    let count = seed(&mut ledger, today())?;

    println!("Demo data loaded!");
    println!("  Transactions: {count}");
    println!("  Entries:      {}", ENTRIES.len());
    println!();
    println!("Try these next:");
    println!("  tally summary");
    println!("  tally list");
    println!("  tally list --filter debt");
    println!("  tally overdue");
    println!("  tally dashboard");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use crate::store::MemoryStore;
    use crate::views;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_seed_expands_entries() {
        let mut ledger = Ledger::open(MemoryStore::default()).unwrap();
        let count = seed(&mut ledger, date("2024-03-18")).unwrap();
        // 3 monthly x 12, 10 installments, 5 one-offs
        assert_eq!(count, 36 + 10 + 5);

        let notebook: Vec<_> = ledger
            .transactions()
            .iter()
            .filter(|t| t.description == "Notebook")
            .collect();
        assert!(notebook.iter().all(|t| t.amount == 360.0 && t.installments == 10));
        assert!(notebook.iter().any(|t| t.date == date("2024-02-15")));
    }

    #[test]
    fn test_seed_leaves_one_overdue_bill() {
        let today = date("2024-03-18");
        let mut ledger = Ledger::open(MemoryStore::default()).unwrap();
        seed(&mut ledger, today).unwrap();

        let overdue = views::overdue(ledger.transactions(), today);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].description, UNPAID);
        assert!(ledger
            .transactions()
            .iter()
            .filter(|t| t.date >= today)
            .all(|t| t.status == Status::Pending));
    }

    #[test]
    fn test_month_at_crosses_years() {
        assert_eq!(month_at(date("2024-01-31"), -1), YearMonth::new(2023, 12).unwrap());
        assert_eq!(month_at(date("2024-12-01"), 1), YearMonth::new(2025, 1).unwrap());
    }
}
