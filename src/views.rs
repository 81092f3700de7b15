use chrono::{Datelike, Local, Months, NaiveDate};

use crate::error::{Result, TallyError};
use crate::models::{Category, Transaction, TxType};

// ---------------------------------------------------------------------------
// Month selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(TallyError::InvalidMonth(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(Local::now().date_naive())
    }

    /// Parse `YYYY-MM`.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || TallyError::InvalidMonth(raw.to_string());
        let (y, m) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Self {
        self.first_day()
            .checked_add_months(Months::new(1))
            .map(Self::of)
            .unwrap_or(*self)
    }

    pub fn prev(&self) -> Self {
        self.first_day()
            .checked_sub_months(Months::new(1))
            .map(Self::of)
            .unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Long title, e.g. "March 2024".
    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
    /// Pending installment expenses from every month.
    Debt,
}

impl TypeFilter {
    pub fn next(self) -> Self {
        match self {
            TypeFilter::All => TypeFilter::Income,
            TypeFilter::Income => TypeFilter::Expense,
            TypeFilter::Expense => TypeFilter::Debt,
            TypeFilter::Debt => TypeFilter::All,
        }
    }

    fn matches(&self, t: &Transaction) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => t.tx_type == TxType::Income,
            TypeFilter::Expense => t.tx_type == TxType::Expense,
            TypeFilter::Debt => t.is_debt(),
        }
    }
}

impl std::str::FromStr for TypeFilter {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "income" => Ok(TypeFilter::Income),
            "expense" => Ok(TypeFilter::Expense),
            "debt" => Ok(TypeFilter::Debt),
            _ => Err(format!("Invalid filter: {s} (expected all, income, expense or debt)")),
        }
    }
}

impl std::fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeFilter::All => write!(f, "all"),
            TypeFilter::Income => write!(f, "income"),
            TypeFilter::Expense => write!(f, "expense"),
            TypeFilter::Debt => write!(f, "debt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewQuery {
    pub month: YearMonth,
    pub search: String,
    pub filter: TypeFilter,
}

impl ViewQuery {
    pub fn month(month: YearMonth) -> Self {
        Self {
            month,
            search: String::new(),
            filter: TypeFilter::All,
        }
    }
}

pub fn month_filter(txns: &[Transaction], month: YearMonth) -> Vec<&Transaction> {
    txns.iter().filter(|t| month.contains(t.date)).collect()
}

/// Pending before paid, then newest first. Stable, so equal rows keep
/// collection order.
pub fn sort_for_display(rows: &mut [&Transaction]) {
    rows.sort_by(|a, b| {
        b.is_pending()
            .cmp(&a.is_pending())
            .then_with(|| b.date.cmp(&a.date))
    });
}

/// The list the user sees: month, type and search filters composed, then
/// sorted. The debt filter ignores the month.
pub fn visible<'a>(txns: &'a [Transaction], query: &ViewQuery) -> Vec<&'a Transaction> {
    let needle = query.search.trim().to_lowercase();
    let mut rows: Vec<&Transaction> = txns
        .iter()
        .filter(|t| query.filter == TypeFilter::Debt || query.month.contains(t.date))
        .filter(|t| query.filter.matches(t))
        .filter(|t| needle.is_empty() || t.description.to_lowercase().contains(&needle))
        .collect();
    sort_for_display(&mut rows);
    rows
}

/// Pending expenses dated before `today`, from any month, oldest first.
pub fn overdue(txns: &[Transaction], today: NaiveDate) -> Vec<&Transaction> {
    let mut rows: Vec<&Transaction> = txns.iter().filter(|t| t.is_overdue(today)).collect();
    rows.sort_by_key(|t| t.date);
    rows
}

/// Outstanding amount on split purchases across all months.
pub fn installment_debt(txns: &[Transaction]) -> f64 {
    txns.iter().filter(|t| t.is_debt()).map(|t| t.amount).sum()
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    pub count: usize,
    pub pct: f64,
}

/// Expense totals per category, largest first.
pub fn category_totals(rows: &[&Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for t in rows.iter().filter(|t| t.is_expense()) {
        match totals.iter_mut().find(|c| c.category == t.category) {
            Some(entry) => {
                entry.total += t.amount;
                entry.count += 1;
            }
            None => totals.push(CategoryTotal {
                category: t.category,
                total: t.amount,
                count: 1,
                pct: 0.0,
            }),
        }
    }
    let grand: f64 = totals.iter().map(|c| c.total).sum();
    for c in &mut totals {
        c.pct = if grand != 0.0 { c.total / grand * 100.0 } else { 0.0 };
    }
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthSummary {
    pub income: f64,
    pub expense: f64,
    /// Income minus expense, counting pending amounts as already realized.
    pub balance: f64,
    pub paid_income: f64,
    pub paid_expense: f64,
    pub pending_count: usize,
    pub count: usize,
}

impl MonthSummary {
    /// Balance over paid records only.
    pub fn realized_balance(&self) -> f64 {
        self.paid_income - self.paid_expense
    }
}

pub fn summarize(rows: &[&Transaction]) -> MonthSummary {
    let mut s = MonthSummary::default();
    for t in rows {
        let paid = !t.is_pending();
        match t.tx_type {
            TxType::Income => {
                s.income += t.amount;
                if paid {
                    s.paid_income += t.amount;
                }
            }
            TxType::Expense => {
                s.expense += t.amount;
                if paid {
                    s.paid_expense += t.amount;
                }
            }
        }
        if !paid {
            s.pending_count += 1;
        }
        s.count += 1;
    }
    s.balance = s.income - s.expense;
    s
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub goal: f64,
    pub spent: f64,
    pub remaining: f64,
    pub pct: f64,
    pub exceeded: bool,
}

pub fn goal_progress(goal: f64, spent: f64) -> Option<GoalProgress> {
    if !goal.is_finite() || goal <= 0.0 {
        return None;
    }
    Some(GoalProgress {
        goal,
        spent,
        remaining: goal - spent,
        pct: spent / goal * 100.0,
        exceeded: spent > goal,
    })
}

// ---------------------------------------------------------------------------
// Month view: everything one render needs
// ---------------------------------------------------------------------------

pub struct MonthView<'a> {
    pub query: ViewQuery,
    pub rows: Vec<&'a Transaction>,
    pub summary: MonthSummary,
    pub categories: Vec<CategoryTotal>,
    pub overdue: Vec<&'a Transaction>,
    pub installment_debt: f64,
    pub goal: Option<GoalProgress>,
}

/// Derive the full view. Summary cards and category totals follow the selected
/// month only; the search and type filters narrow the listed rows.
pub fn build<'a>(
    txns: &'a [Transaction],
    query: &ViewQuery,
    today: NaiveDate,
    goal: Option<f64>,
) -> MonthView<'a> {
    let month_rows = month_filter(txns, query.month);
    let summary = summarize(&month_rows);
    let categories = category_totals(&month_rows);
    let goal = goal.and_then(|g| goal_progress(g, summary.expense));
    MonthView {
        query: query.clone(),
        rows: visible(txns, query),
        summary,
        categories,
        overdue: overdue(txns, today),
        installment_debt: installment_debt(txns),
        goal,
    }
}
