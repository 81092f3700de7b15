use chrono::{Months, NaiveDate};
use rand::Rng;

use crate::error::{Result, TallyError};
use crate::models::{Draft, Status, Transaction};

/// Number of monthly records a recurring submission produces.
pub const RECURRING_MONTHS: u32 = 12;

/// Random 16-hex-digit identifier shared by every record of one submission.
pub fn new_base_id() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    hex::encode(bytes)
}

/// `date` shifted forward by `n` calendar months, clamped to the last day of
/// shorter months.
pub fn add_months(date: NaiveDate, n: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(n))
        .ok_or_else(|| TallyError::DateOutOfRange(format!("{date} + {n} months")))
}

/// Turn one submission into the records it stands for.
///
/// Recurring drafts become 12 monthly records with the same amount; installment
/// drafts become N monthly records each carrying `amount / N`; anything else is
/// a single record. Incomplete drafts produce nothing.
pub fn expand(draft: &Draft, base_id: &str) -> Result<Vec<Transaction>> {
    if !draft.is_complete() {
        log::debug!("ignoring incomplete draft {:?}", draft.description);
        return Ok(Vec::new());
    }

    let (count, amount, installments) = if draft.is_recurring {
        (RECURRING_MONTHS, draft.amount, 1)
    } else if draft.is_installment {
        let n = draft.installment_count;
        (n, draft.amount / n as f64, n)
    } else {
        return Ok(vec![record(draft, base_id.to_string(), draft.amount, draft.date, 1, 1)]);
    };

    let mut out = Vec::new();
    for i in 0..count {
        let date = add_months(draft.date, i)?;
        let current = if installments > 1 { i + 1 } else { 1 };
        out.push(record(
            draft,
            format!("{base_id}-{i}"),
            amount,
            date,
            installments,
            current,
        ));
    }
    log::debug!("expanded '{}' into {} records", draft.description, out.len());
    Ok(out)
}

fn record(
    draft: &Draft,
    id: String,
    amount: f64,
    date: NaiveDate,
    installments: u32,
    current_installment: u32,
) -> Transaction {
    Transaction {
        id,
        description: draft.description.trim().to_string(),
        amount,
        tx_type: draft.tx_type,
        category: draft.category,
        date,
        status: Status::Pending,
        installments,
        current_installment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TxType};
    use chrono::Datelike;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn draft(amount: f64, d: &str) -> Draft {
        Draft::new("Aluguel", amount, TxType::Expense, Category::Home, date(d))
    }

    #[test]
    fn test_single_record() {
        let txns = expand(&draft(100.0, "2024-03-01"), "base").unwrap();
        assert_eq!(txns.len(), 1);
        let t = &txns[0];
        assert_eq!(t.id, "base");
        assert_eq!(t.amount, 100.0);
        assert_eq!(t.installments, 1);
        assert_eq!(t.current_installment, 1);
        assert_eq!(t.status, Status::Pending);
        assert_eq!(t.date, date("2024-03-01"));
    }

    #[test]
    fn test_oversized_installment_count_produces_nothing() {
        let txns = expand(&draft(100.0, "2024-03-01").installments(u32::MAX), "big").unwrap();
        assert!(txns.is_empty());
        let txns = expand(&draft(100.0, "2024-03-01").installments(1201), "big").unwrap();
        assert!(txns.is_empty());
    }

    #[test]
    fn test_recurring_produces_twelve_monthly_records() {
        let txns = expand(&draft(1500.0, "2024-01-05").recurring(), "rent").unwrap();
        assert_eq!(txns.len(), 12);
        for (i, t) in txns.iter().enumerate() {
            assert_eq!(t.amount, 1500.0);
            assert_eq!(t.status, Status::Pending);
            assert_eq!(t.installments, 1);
            assert_eq!(t.current_installment, 1);
            assert_eq!(t.id, format!("rent-{i}"));
            assert_eq!(t.date.day(), 5);
        }
        assert_eq!(txns[0].date, date("2024-01-05"));
        assert_eq!(txns[11].date, date("2024-12-05"));
    }

    #[test]
    fn test_installments_split_amount() {
        let txns = expand(&draft(100.0, "2024-03-15").installments(3), "tv").unwrap();
        assert_eq!(txns.len(), 3);
        let total: f64 = txns.iter().map(|t| t.amount).sum();
        assert!((total - 100.0).abs() < 1e-9, "sum was {total}");
        for (i, t) in txns.iter().enumerate() {
            assert_eq!(t.installments, 3);
            assert_eq!(t.current_installment, i as u32 + 1);
            assert!((t.amount - 100.0 / 3.0).abs() < 1e-12);
        }
        assert_eq!(txns[2].date, date("2024-05-15"));
    }

    #[test]
    fn test_recurring_wins_over_installments() {
        let d = draft(50.0, "2024-01-01").installments(4).recurring();
        let txns = expand(&d, "b").unwrap();
        assert_eq!(txns.len(), 12);
        assert!(txns.iter().all(|t| t.amount == 50.0 && t.installments == 1));
    }

    #[test]
    fn test_month_end_clamps_without_drifting() {
        let txns = expand(&draft(10.0, "2024-01-31").installments(3), "b").unwrap();
        let dates: Vec<NaiveDate> = txns.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date("2024-01-31"), date("2024-02-29"), date("2024-03-31")]);
    }

    #[test]
    fn test_single_installment_is_standalone_shape() {
        let txns = expand(&draft(80.0, "2024-06-01").installments(1), "b").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].installments, 1);
        assert!(!txns[0].is_installment());
    }

    #[test]
    fn test_incomplete_draft_produces_nothing() {
        assert!(expand(&draft(0.0, "2024-01-01"), "b").unwrap().is_empty());
        let blank = Draft::new("", 10.0, TxType::Income, Category::Salary, date("2024-01-01"));
        assert!(expand(&blank, "b").unwrap().is_empty());
    }

    #[test]
    fn test_records_share_base_id() {
        let txns = expand(&draft(90.0, "2024-01-01").installments(3), "abcd").unwrap();
        assert!(txns.iter().all(|t| t.id.starts_with("abcd-")));
    }

    #[test]
    fn test_new_base_id_is_hex() {
        let id = new_base_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(new_base_id(), id);
    }
}
