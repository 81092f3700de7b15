use std::path::Path;

use crate::cli::{open_ledger, today};
use crate::error::Result;
use crate::fmt::{self, format_bytes};
use crate::store::FileStore;
use crate::views;

pub fn run(data_dir: &Path) -> Result<()> {
    let store_path = data_dir.join(FileStore::FILE_NAME);

    println!("Data dir:   {}", data_dir.display());
    println!("Store:      {}", store_path.display());

    if !store_path.exists() {
        println!();
        println!("Store not found. Run `tally init` to set up.");
        return Ok(());
    }

    let size = std::fs::metadata(&store_path)?.len();
    println!("Size:       {}", format_bytes(size));

    let ledger = open_ledger(data_dir)?;
    let txns = ledger.transactions();
    let pending = txns.iter().filter(|t| t.is_pending()).count();
    let overdue = views::overdue(txns, today()).len();
    let privacy = ledger.privacy();
    let goal = ledger
        .goal()
        .map(|g| fmt::amount(g, privacy))
        .unwrap_or_else(|| "(not set)".to_string());

    println!();
    println!("Transactions:  {}", txns.len());
    println!("Pending:       {pending}");
    println!("Overdue:       {overdue}");
    println!("Debt:          {}", fmt::amount(views::installment_debt(txns), privacy));
    println!("Goal:          {goal}");
    println!("Privacy:       {}", if privacy { "on" } else { "off" });
    Ok(())
}
