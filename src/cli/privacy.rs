use std::path::Path;

use crate::cli::{open_ledger, PrivacyMode};
use crate::error::Result;

pub fn run(data_dir: &Path, mode: Option<PrivacyMode>) -> Result<()> {
    let mut ledger = open_ledger(data_dir)?;
    let on = match mode {
        Some(PrivacyMode::On) => {
            ledger.set_privacy(true)?;
            true
        }
        Some(PrivacyMode::Off) => {
            ledger.set_privacy(false)?;
            false
        }
        Some(PrivacyMode::Toggle) => ledger.toggle_privacy()?,
        None => ledger.privacy(),
    };
    println!("Privacy mode: {}", if on { "on" } else { "off" });
    Ok(())
}
