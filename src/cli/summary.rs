use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{month_or_current, open_ledger, today};
use crate::error::Result;
use crate::fmt;
use crate::views::{self, MonthView, ViewQuery};

pub fn run(data_dir: &Path, month: Option<&str>) -> Result<()> {
    let ledger = open_ledger(data_dir)?;
    let query = ViewQuery::month(month_or_current(month)?);
    let view = views::build(ledger.transactions(), &query, today(), ledger.goal());
    println!("{}", format_summary(&view, ledger.privacy()));
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting
// ---------------------------------------------------------------------------

pub fn format_summary(view: &MonthView, privacy: bool) -> String {
    let s = &view.summary;
    let amt = |v: f64| fmt::amount(v, privacy);

    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![Cell::new("INCOME".green().bold()), Cell::new(amt(s.income))]);
    table.add_row(vec![Cell::new("EXPENSES".red().bold()), Cell::new(amt(s.expense))]);
    let balance_label = if s.balance >= 0.0 {
        "BALANCE".green().bold()
    } else {
        "BALANCE".red().bold()
    };
    table.add_row(vec![Cell::new(balance_label), Cell::new(amt(s.balance))]);
    table.add_row(vec![Cell::new("  paid only"), Cell::new(amt(s.realized_balance()))]);

    let mut out = format!("{}\n{table}", view.query.month.title());
    out.push_str(&format!("\n{} records, {} pending", s.count, s.pending_count));

    if let Some(goal) = &view.goal {
        let line = if goal.exceeded {
            format!(
                "Goal {}: {:.0}% spent, exceeded by {}",
                amt(goal.goal),
                goal.pct,
                amt(-goal.remaining)
            )
            .red()
            .bold()
            .to_string()
        } else {
            format!(
                "Goal {}: {:.0}% spent, {} left",
                amt(goal.goal),
                goal.pct,
                amt(goal.remaining)
            )
        };
        out.push_str(&format!("\n\n{line}"));
    }

    if !view.categories.is_empty() {
        let mut ctable = Table::new();
        ctable.set_header(vec!["Category", "Amount", "%", "Count"]);
        for c in &view.categories {
            let (r, g, b) = c.category.rgb();
            ctable.add_row(vec![
                Cell::new(format!("{} {}", "●".truecolor(r, g, b), c.category.label())),
                Cell::new(amt(c.total)),
                Cell::new(format!("{:.1}%", c.pct)),
                Cell::new(c.count),
            ]);
        }
        out.push_str(&format!("\n\nExpenses by Category\n{ctable}"));
    }

    if !view.overdue.is_empty() {
        let total: f64 = view.overdue.iter().map(|t| t.amount).sum();
        let line = format!("{} overdue expenses, {}", view.overdue.len(), amt(total));
        out.push_str(&format!("\n\n{}", line.red().bold()));
    }
    if view.installment_debt > 0.0 {
        out.push_str(&format!(
            "\nInstallment debt (all months): {}",
            amt(view.installment_debt)
        ));
    }
    out
}
