use std::path::Path;

use crate::cli::open_ledger;
use crate::error::Result;
use crate::fmt;

pub fn run(data_dir: &Path, amount: Option<f64>, clear: bool) -> Result<()> {
    let mut ledger = open_ledger(data_dir)?;
    if clear {
        ledger.set_goal(None)?;
        println!("Spending goal cleared.");
        return Ok(());
    }
    match amount {
        Some(goal) => {
            ledger.set_goal(Some(goal))?;
            println!(
                "Spending goal set to {} per month.",
                fmt::amount(goal, ledger.privacy())
            );
        }
        None => match ledger.goal() {
            Some(goal) => println!("Spending goal: {} per month", fmt::amount(goal, ledger.privacy())),
            None => println!("No spending goal set. Set one with: tally goal <amount>"),
        },
    }
    Ok(())
}
