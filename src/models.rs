use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
}

impl std::str::FromStr for TxType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            _ => Err(format!("Invalid transaction type: {s} (expected income or expense)")),
        }
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxType::Income => write!(f, "income"),
            TxType::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Paid,
}

impl Status {
    pub fn toggled(self) -> Self {
        match self {
            Status::Pending => Status::Paid,
            Status::Paid => Status::Pending,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pending => write!(f, "pending"),
            Status::Paid => write!(f, "paid"),
        }
    }
}

/// The closed category set. Keys outside the set read back as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Home,
    Leisure,
    Shopping,
    Salary,
    #[default]
    #[serde(other)]
    Other,
}

// (category, key, label, rgb)
const CATEGORY_TABLE: &[(Category, &str, &str, (u8, u8, u8))] = &[
    (Category::Food, "food", "Alimentação", (245, 158, 11)),
    (Category::Transport, "transport", "Transporte", (59, 130, 246)),
    (Category::Home, "home", "Casa", (139, 92, 246)),
    (Category::Leisure, "leisure", "Lazer", (236, 72, 153)),
    (Category::Shopping, "shopping", "Compras", (20, 184, 166)),
    (Category::Salary, "salary", "Salário", (34, 197, 94)),
    (Category::Other, "other", "Outros", (100, 116, 139)),
];

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Home,
        Category::Leisure,
        Category::Shopping,
        Category::Salary,
        Category::Other,
    ];

    fn entry(&self) -> &'static (Category, &'static str, &'static str, (u8, u8, u8)) {
        CATEGORY_TABLE
            .iter()
            .find(|(c, ..)| c == self)
            .unwrap_or(&CATEGORY_TABLE[CATEGORY_TABLE.len() - 1])
    }

    pub fn key(&self) -> &'static str {
        self.entry().1
    }

    pub fn label(&self) -> &'static str {
        self.entry().2
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        self.entry().3
    }
}

impl std::str::FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        CATEGORY_TABLE
            .iter()
            .find(|(_, key, label, _)| *key == needle || label.to_lowercase() == needle)
            .map(|(c, ..)| *c)
            .ok_or_else(|| {
                let keys: Vec<&str> = Category::ALL.iter().map(|c| c.key()).collect();
                format!("Unknown category: {s} (expected one of {})", keys.join(", "))
            })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    #[serde(default)]
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: Status,
    #[serde(default = "one")]
    pub installments: u32,
    #[serde(default = "one")]
    pub current_installment: u32,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.tx_type == TxType::Expense
    }

    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Part of a purchase split across more than one installment.
    pub fn is_installment(&self) -> bool {
        self.installments > 1
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_expense() && self.is_pending() && self.date < today
    }

    /// A pending expense installment: money still owed on a split purchase.
    pub fn is_debt(&self) -> bool {
        self.is_expense() && self.is_pending() && self.is_installment()
    }
}

/// Upper bound on an installment plan (100 years of monthly records).
pub const MAX_INSTALLMENTS: u32 = 1200;

/// One user submission before expansion into records.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub description: String,
    pub amount: f64,
    pub tx_type: TxType,
    pub category: Category,
    pub date: NaiveDate,
    pub is_recurring: bool,
    pub is_installment: bool,
    pub installment_count: u32,
}

impl Draft {
    pub fn new(description: &str, amount: f64, tx_type: TxType, category: Category, date: NaiveDate) -> Self {
        Self {
            description: description.to_string(),
            amount,
            tx_type,
            category,
            date,
            is_recurring: false,
            is_installment: false,
            installment_count: 1,
        }
    }

    pub fn recurring(mut self) -> Self {
        self.is_recurring = true;
        self
    }

    pub fn installments(mut self, count: u32) -> Self {
        self.is_installment = true;
        self.installment_count = count;
        self
    }

    /// Returns the first missing or invalid field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.description.trim().is_empty() {
            return Some("description");
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Some("amount");
        }
        if self.is_installment
            && !self.is_recurring
            && !(1..=MAX_INSTALLMENTS).contains(&self.installment_count)
        {
            return Some("installment count");
        }
        None
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_transaction_json_uses_camel_case_keys() {
        let t = Transaction {
            id: "abc-0".to_string(),
            description: "Geladeira".to_string(),
            amount: 250.0,
            tx_type: TxType::Expense,
            category: Category::Home,
            date: date("2024-03-01"),
            status: Status::Pending,
            installments: 4,
            current_installment: 1,
        };
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "expense");
        assert_eq!(json["category"], "home");
        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["currentInstallment"], 1);
        assert!(json.get("tx_type").is_none());
    }

    #[test]
    fn test_legacy_record_takes_defaults() {
        let json = r#"{"id":"x","description":"Almoço","amount":32.5,"type":"expense","category":"food","date":"2024-01-10"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.status, Status::Pending);
        assert_eq!(t.installments, 1);
        assert_eq!(t.current_installment, 1);
    }

    #[test]
    fn test_unknown_category_reads_as_other() {
        let json = r#"{"id":"x","description":"?","amount":1,"type":"income","category":"crypto","date":"2024-01-10"}"#;
        let t: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(t.category, Category::Other);
    }

    #[test]
    fn test_category_table_lookup() {
        assert_eq!(Category::Food.label(), "Alimentação");
        assert_eq!(Category::Transport.rgb(), (59, 130, 246));
        assert_eq!("salary".parse::<Category>().unwrap(), Category::Salary);
        assert_eq!("Lazer".parse::<Category>().unwrap(), Category::Leisure);
        assert!("crypto".parse::<Category>().is_err());
        for c in Category::ALL {
            assert_eq!(c.key().parse::<Category>().unwrap(), c);
        }
    }

    #[test]
    fn test_status_toggle_twice_restores() {
        assert_eq!(Status::Pending.toggled(), Status::Paid);
        assert_eq!(Status::Pending.toggled().toggled(), Status::Pending);
    }

    #[test]
    fn test_draft_missing_fields() {
        let d = Draft::new("  ", 10.0, TxType::Expense, Category::Food, date("2024-01-01"));
        assert_eq!(d.missing_field(), Some("description"));
        let d = Draft::new("Pão", 0.0, TxType::Expense, Category::Food, date("2024-01-01"));
        assert_eq!(d.missing_field(), Some("amount"));
        let d = Draft::new("Pão", f64::NAN, TxType::Expense, Category::Food, date("2024-01-01"));
        assert!(!d.is_complete());
        let d = Draft::new("Pão", 5.0, TxType::Expense, Category::Food, date("2024-01-01")).installments(0);
        assert_eq!(d.missing_field(), Some("installment count"));
        let d = Draft::new("Pão", 5.0, TxType::Expense, Category::Food, date("2024-01-01"))
            .installments(MAX_INSTALLMENTS + 1);
        assert_eq!(d.missing_field(), Some("installment count"));
        let d = Draft::new("Pão", 5.0, TxType::Expense, Category::Food, date("2024-01-01"))
            .installments(MAX_INSTALLMENTS);
        assert!(d.is_complete());
        let d = Draft::new("Pão", 5.0, TxType::Expense, Category::Food, date("2024-01-01"));
        assert!(d.is_complete());
    }

    #[test]
    fn test_overdue_and_debt_predicates() {
        let mut t = Transaction {
            id: "a".to_string(),
            description: "TV".to_string(),
            amount: 100.0,
            tx_type: TxType::Expense,
            category: Category::Shopping,
            date: date("2024-03-10"),
            status: Status::Pending,
            installments: 10,
            current_installment: 2,
        };
        assert!(t.is_overdue(date("2024-03-11")));
        assert!(!t.is_overdue(date("2024-03-10")));
        assert!(t.is_debt());
        t.status = Status::Paid;
        assert!(!t.is_overdue(date("2024-03-11")));
        assert!(!t.is_debt());
        t.status = Status::Pending;
        t.tx_type = TxType::Income;
        assert!(!t.is_overdue(date("2024-03-11")));
    }
}
