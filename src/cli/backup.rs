use std::path::{Path, PathBuf};

use crate::cli::{open_ledger, today};
use crate::error::{Result, TallyError};
use crate::fmt::format_bytes;

/// `financas-backup-YYYY-MM-DD.json`
pub fn backup_file_name(date: chrono::NaiveDate) -> String {
    format!("financas-backup-{}.json", date.format("%Y-%m-%d"))
}

pub fn export(data_dir: &Path, output: Option<String>) -> Result<()> {
    let ledger = open_ledger(data_dir)?;

    let dest_path = match output {
        Some(p) => PathBuf::from(p),
        None => {
            let exports_dir = data_dir.join("exports");
            std::fs::create_dir_all(&exports_dir)?;
            exports_dir.join(backup_file_name(today()))
        }
    };

    let json = ledger.export_json()?;
    std::fs::write(&dest_path, json)?;
    log::info!("exported {} records to {}", ledger.transactions().len(), dest_path.display());

    let size = std::fs::metadata(&dest_path)?.len();
    println!(
        "Exported {} transactions to {}",
        ledger.transactions().len(),
        dest_path.display()
    );
    println!("Size: {}", format_bytes(size));
    Ok(())
}

pub fn import(data_dir: &Path, file: &str) -> Result<()> {
    let path = Path::new(file);
    if !path.exists() {
        return Err(TallyError::Import(format!("file not found: {file}")));
    }
    let content = std::fs::read_to_string(path)?;

    let mut ledger = open_ledger(data_dir)?;
    let previous = ledger.transactions().len();
    let count = ledger.import_json(&content)?;

    println!("Imported {count} transactions from {file}");
    if previous > 0 {
        println!("Replaced {previous} existing transactions.");
    }
    Ok(())
}
