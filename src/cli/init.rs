use std::path::Path;

use crate::error::Result;
use crate::ledger::Ledger;
use crate::settings::{load_settings, save_settings};
use crate::store::FileStore;

/// Create the data directory and its store, and remember it as the default.
pub fn run(data_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(data_dir.join("exports"))?;

    let store = FileStore::in_dir(data_dir)?;
    store.ensure_exists()?;
    println!("Store:      {}", store.path().display());
    let ledger = Ledger::open(store)?;

    let mut settings = load_settings();
    settings.data_dir = data_dir.to_string_lossy().to_string();
    save_settings(&settings)?;

    println!("Data dir:   {}", data_dir.display());
    if ledger.is_empty() {
        println!();
        println!("Ledger is empty. Try `tally demo` or `tally add`.");
    } else {
        println!("Found {} transactions.", ledger.transactions().len());
    }
    Ok(())
}
