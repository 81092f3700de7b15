use std::io::IsTerminal;
use std::path::Path;

use crate::cli::{month_or_current, open_ledger, today};
use crate::dashboard::Dashboard;
use crate::error::Result;

pub fn run(data_dir: &Path, month: Option<&str>) -> Result<()> {
    let month = month_or_current(month)?;
    if !std::io::stdout().is_terminal() {
        log::debug!("stdout is not a terminal; printing the summary instead");
        let month = month.to_string();
        return super::summary::run(data_dir, Some(month.as_str()));
    }
    let mut ledger = open_ledger(data_dir)?;
    Dashboard::new(month, today()).run(&mut ledger)
}
