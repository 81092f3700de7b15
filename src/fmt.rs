use chrono::NaiveDate;

use crate::models::Transaction;

pub const CURRENCY_SYMBOL: &str = "R$";

/// Shown in place of any monetary value while privacy mode is on.
pub const MASKED: &str = "R$ ••••••";

/// Format a float as Brazilian reais with thousands separators: R$ 1.234,56
pub fn money(val: f64) -> String {
    let negative = val < 0.0 && format!("{:.2}", val.abs()) != "0.00";
    let abs = val.abs();
    let cents = format!("{:.2}", abs);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));

    let mut with_dots = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    let with_dots: String = with_dots.chars().rev().collect();

    if negative {
        format!("-{CURRENCY_SYMBOL} {with_dots},{dec_part}")
    } else {
        format!("{CURRENCY_SYMBOL} {with_dots},{dec_part}")
    }
}

/// `money`, or the mask when privacy mode is on.
pub fn amount(val: f64, privacy: bool) -> String {
    if privacy {
        MASKED.to_string()
    } else {
        money(val)
    }
}

/// Signed amount for a listed record: "+ R$ 10,00" or "- R$ 10,00".
pub fn signed_amount(t: &Transaction, privacy: bool) -> String {
    let sign = if t.is_expense() { "-" } else { "+" };
    format!("{sign} {}", amount(t.amount, privacy))
}

pub fn date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// "3/10" for installment records, empty otherwise.
pub fn installment_badge(t: &Transaction) -> String {
    if t.is_installment() {
        format!("{}/{}", t.current_installment, t.installments)
    } else {
        String::new()
    }
}

pub fn format_bytes(size: u64) -> String {
    if size < 1024 {
        format!("{size} B")
    } else if size < 1024 * 1024 {
        format!("{:.1} KB", size as f64 / 1024.0)
    } else {
        format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
    }
}
