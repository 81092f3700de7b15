use std::path::Path;

use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{month_or_current, open_ledger, today};
use crate::error::{Result, TallyError};
use crate::fmt;
use crate::models::{Category, Draft, Status, Transaction, TxType};
use crate::views::{self, TypeFilter, ViewQuery};

/// Parse an amount typed by the user. Accepts `1234.56`, `1234,56` and
/// `1.234,56`.
pub fn parse_amount(raw: &str) -> std::result::Result<f64, String> {
    let s = raw.trim().trim_start_matches("R$").trim();
    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s.to_string()
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("Invalid amount: {raw}"))
}

#[allow(clippy::too_many_arguments)]
pub fn add(
    data_dir: &Path,
    description: &str,
    amount: f64,
    tx_type: TxType,
    category: Category,
    date: Option<NaiveDate>,
    recurring: bool,
    installments: Option<u32>,
) -> Result<()> {
    let mut draft = Draft::new(description, amount, tx_type, category, date.unwrap_or_else(today));
    if recurring {
        draft = draft.recurring();
    } else if let Some(n) = installments {
        draft = draft.installments(n);
    }
    if let Some(field) = draft.missing_field() {
        return Err(TallyError::Other(format!(
            "Nothing added: {field} is missing or invalid"
        )));
    }

    let mut ledger = open_ledger(data_dir)?;
    let privacy = ledger.privacy();
    let added = ledger.add(&draft)?;
    let Some(first) = added.first() else {
        return Ok(());
    };

    if added.len() == 1 {
        println!(
            "Added {} '{}' {} on {} [{}]",
            first.tx_type,
            first.description,
            fmt::amount(first.amount, privacy),
            fmt::date_br(first.date),
            first.id
        );
    } else {
        let last = &added[added.len() - 1];
        let kind = if recurring { "monthly entries" } else { "installments" };
        println!(
            "Added {} {kind} of {} for '{}' from {} to {} [{}]",
            added.len(),
            fmt::amount(first.amount, privacy),
            first.description,
            fmt::date_br(first.date),
            fmt::date_br(last.date),
            first.id.rsplit_once('-').map(|(base, _)| base).unwrap_or(&first.id)
        );
    }
    Ok(())
}

pub fn list(data_dir: &Path, month: Option<&str>, search: Option<&str>, filter: TypeFilter) -> Result<()> {
    let ledger = open_ledger(data_dir)?;
    let query = ViewQuery {
        month: month_or_current(month)?,
        search: search.unwrap_or_default().to_string(),
        filter,
    };
    let rows = views::visible(ledger.transactions(), &query);
    let title = if filter == TypeFilter::Debt {
        "Installment debt (all months)".to_string()
    } else {
        query.month.title()
    };
    println!("{title}");
    println!("{}", format_register(&rows, ledger.privacy(), today()));
    Ok(())
}

pub fn overdue(data_dir: &Path) -> Result<()> {
    let ledger = open_ledger(data_dir)?;
    let rows = views::overdue(ledger.transactions(), today());
    if rows.is_empty() {
        println!("Nothing overdue.");
        return Ok(());
    }
    let total: f64 = rows.iter().map(|t| t.amount).sum();
    println!("{}", "Overdue".red().bold());
    println!("{}", format_register(&rows, ledger.privacy(), today()));
    println!("{} overdue, {}", rows.len(), fmt::amount(total, ledger.privacy()));
    Ok(())
}

pub fn toggle(data_dir: &Path, id: &str) -> Result<()> {
    let mut ledger = open_ledger(data_dir)?;
    let id = ledger.resolve_id(id)?;
    let status = ledger.toggle_status(&id)?;
    let label = match status {
        Status::Paid => "paid".green(),
        Status::Pending => "pending".yellow(),
    };
    let desc = ledger.get(&id).map(|t| t.description.clone()).unwrap_or_default();
    println!("Marked '{desc}' [{id}] as {label}");
    Ok(())
}

pub fn delete(data_dir: &Path, id: &str) -> Result<()> {
    let mut ledger = open_ledger(data_dir)?;
    let id = ledger.resolve_id(id)?;
    let removed = ledger.delete(&id)?;
    let part = fmt::installment_badge(&removed);
    if part.is_empty() {
        println!("Deleted '{}' [{id}]", removed.description);
    } else {
        println!("Deleted '{}' installment {part} [{id}]", removed.description);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting
// ---------------------------------------------------------------------------

pub fn format_register(rows: &[&Transaction], privacy: bool, today: NaiveDate) -> String {
    if rows.is_empty() {
        return "No transactions.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Part", "Category", "Status", "Amount"]);
    for t in rows {
        let status = if !t.is_pending() {
            "paid".green()
        } else if t.is_overdue(today) {
            "overdue".red().bold()
        } else {
            "pending".yellow()
        };
        let amount = if t.is_expense() {
            fmt::signed_amount(t, privacy).red()
        } else {
            fmt::signed_amount(t, privacy).green()
        };
        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(fmt::date_br(t.date)),
            Cell::new(&t.description),
            Cell::new(fmt::installment_badge(t)),
            Cell::new(t.category.label()),
            Cell::new(status),
            Cell::new(amount),
        ]);
    }
    format!("{table}\n{} records", rows.len())
}
