use crate::error::{Result, TallyError};
use crate::expand::{expand, new_base_id};
use crate::models::{Draft, Status, Transaction};
use crate::store::KeyValueStore;

pub const TRANSACTIONS_KEY: &str = "finance_transactions";
pub const GOAL_KEY: &str = "finance_goal";
pub const PRIVACY_KEY: &str = "finance_privacy";

/// The in-memory transaction collection plus the two display settings, written
/// through to the store after every change.
pub struct Ledger<S: KeyValueStore> {
    store: S,
    transactions: Vec<Transaction>,
    goal: Option<f64>,
    privacy: bool,
}

impl<S: KeyValueStore> Ledger<S> {
    pub fn open(store: S) -> Result<Self> {
        let transactions = match store.get(TRANSACTIONS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| {
                TallyError::Storage(format!("stored transactions could not be read: {e}"))
            })?,
            None => Vec::new(),
        };

        let goal = match store.get(GOAL_KEY)? {
            Some(raw) => match parse_goal(&raw) {
                Some(g) => Some(g),
                None => {
                    log::warn!("ignoring stored spending goal {raw:?}");
                    None
                }
            },
            None => None,
        };

        let privacy = store
            .get(PRIVACY_KEY)?
            .map(|raw| raw.trim() == "true")
            .unwrap_or(false);

        Ok(Self {
            store,
            transactions,
            goal,
            privacy,
        })
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Expand a draft and prepend the new records. Returns the added records,
    /// which is empty when the draft was incomplete.
    pub fn add(&mut self, draft: &Draft) -> Result<&[Transaction]> {
        let new = expand(draft, &new_base_id())?;
        let added = new.len();
        if added > 0 {
            self.transactions.splice(0..0, new);
            self.persist()?;
        }
        Ok(&self.transactions[..added])
    }

    /// Flip one record between pending and paid. Returns the new status.
    pub fn toggle_status(&mut self, id: &str) -> Result<Status> {
        let txn = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TallyError::UnknownTransaction(id.to_string()))?;
        txn.status = txn.status.toggled();
        let status = txn.status;
        self.persist()?;
        Ok(status)
    }

    /// Remove exactly one record. Sibling installments are left alone.
    pub fn delete(&mut self, id: &str) -> Result<Transaction> {
        let idx = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TallyError::UnknownTransaction(id.to_string()))?;
        let removed = self.transactions.remove(idx);
        self.persist()?;
        Ok(removed)
    }

    /// Resolve a full id or a unique id prefix to a full id.
    pub fn resolve_id(&self, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(TallyError::UnknownTransaction(query.to_string()));
        }
        if let Some(t) = self.get(query) {
            return Ok(t.id.clone());
        }
        let matches: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| t.id.starts_with(query))
            .collect();
        match matches.len() {
            0 => Err(TallyError::UnknownTransaction(query.to_string())),
            1 => Ok(matches[0].id.clone()),
            n => Err(TallyError::AmbiguousId(query.to_string(), n)),
        }
    }

    /// Replace the whole collection with a backup. Anything other than a JSON
    /// array is rejected and the current collection is kept.
    pub fn import_json(&mut self, json: &str) -> Result<usize> {
        let imported = parse_backup(json)?;
        let count = imported.len();
        self.transactions = imported;
        self.persist()?;
        log::info!("imported {count} transactions");
        Ok(count)
    }

    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.transactions)?)
    }

    pub fn goal(&self) -> Option<f64> {
        self.goal
    }

    pub fn set_goal(&mut self, goal: Option<f64>) -> Result<()> {
        match goal {
            Some(g) if g.is_finite() && g > 0.0 => {
                self.store.set(GOAL_KEY, &g.to_string())?;
                self.goal = Some(g);
            }
            Some(g) => {
                return Err(TallyError::Other(format!(
                    "Spending goal must be a positive number, got {g}"
                )));
            }
            None => {
                self.store.remove(GOAL_KEY)?;
                self.goal = None;
            }
        }
        Ok(())
    }

    pub fn privacy(&self) -> bool {
        self.privacy
    }

    pub fn set_privacy(&mut self, on: bool) -> Result<()> {
        self.store.set(PRIVACY_KEY, if on { "true" } else { "false" })?;
        self.privacy = on;
        Ok(())
    }

    pub fn toggle_privacy(&mut self) -> Result<bool> {
        let on = !self.privacy;
        self.set_privacy(on)?;
        Ok(on)
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.transactions)?;
        self.store.set(TRANSACTIONS_KEY, &json)
    }
}

fn parse_goal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_matches('"');
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|g| g.is_finite() && *g > 0.0)
}

/// Parse a backup document: must be a JSON array whose elements read as records.
pub fn parse_backup(json: &str) -> Result<Vec<Transaction>> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| TallyError::Import(format!("file is not valid JSON: {e}")))?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            let kind = match other {
                serde_json::Value::Object(_) => "an object",
                serde_json::Value::String(_) => "a string",
                serde_json::Value::Number(_) => "a number",
                serde_json::Value::Bool(_) => "a boolean",
                _ => "null",
            };
            return Err(TallyError::Import(format!(
                "expected a JSON array of transactions, found {kind}"
            )));
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .map_err(|e| TallyError::Import(format!("record {i} is not a transaction: {e}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, TxType};
    use crate::store::{FileStore, MemoryStore};
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ledger() -> Ledger<MemoryStore> {
        Ledger::open(MemoryStore::default()).unwrap()
    }

    fn expense(desc: &str, amount: f64, d: &str) -> Draft {
        Draft::new(desc, amount, TxType::Expense, Category::Food, date(d))
    }

    #[test]
    fn test_open_empty_store() {
        let l = ledger();
        assert!(l.is_empty());
        assert_eq!(l.goal(), None);
        assert!(!l.privacy());
    }

    #[test]
    fn test_add_prepends_newest_first() {
        let mut l = ledger();
        l.add(&expense("Primeiro", 10.0, "2024-01-01")).unwrap();
        l.add(&expense("Segundo", 20.0, "2024-01-02").installments(2)).unwrap();
        let descs: Vec<&str> = l.transactions().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["Segundo", "Segundo", "Primeiro"]);
        assert_eq!(l.transactions()[0].current_installment, 1);
        assert_eq!(l.transactions()[1].current_installment, 2);
    }

    #[test]
    fn test_add_returns_added_records_and_persists() {
        let mut l = ledger();
        let added = l.add(&expense("Academia", 90.0, "2024-01-10").recurring()).unwrap();
        assert_eq!(added.len(), 12);
        let stored = l.store.get(TRANSACTIONS_KEY).unwrap().unwrap();
        let parsed: Vec<Transaction> = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed.len(), 12);
    }

    #[test]
    fn test_incomplete_draft_is_ignored() {
        let mut l = ledger();
        let added = l.add(&expense("", 10.0, "2024-01-01")).unwrap().len();
        assert_eq!(added, 0);
        assert!(l.is_empty());
        assert_eq!(l.store.get(TRANSACTIONS_KEY).unwrap(), None);
    }

    #[test]
    fn test_toggle_twice_restores_status() {
        let mut l = ledger();
        l.add(&expense("Mercado", 120.0, "2024-02-01")).unwrap();
        let id = l.transactions()[0].id.clone();
        assert_eq!(l.toggle_status(&id).unwrap(), Status::Paid);
        assert_eq!(l.toggle_status(&id).unwrap(), Status::Pending);
        assert_eq!(l.get(&id).unwrap().status, Status::Pending);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let mut l = ledger();
        assert!(matches!(l.toggle_status("nope"), Err(TallyError::UnknownTransaction(_))));
    }

    #[test]
    fn test_delete_does_not_cascade_to_siblings() {
        let mut l = ledger();
        l.add(&expense("Notebook", 3000.0, "2024-01-15").installments(3)).unwrap();
        let before: Vec<Transaction> = l.transactions().to_vec();
        let removed = l.delete(&before[1].id).unwrap();
        assert_eq!(removed.current_installment, 2);
        assert_eq!(l.transactions().len(), 2);
        assert_eq!(l.transactions()[0], before[0]);
        assert_eq!(l.transactions()[1], before[2]);
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let mut l = ledger();
        l.add(&expense("Curso", 100.0, "2024-01-01").installments(2)).unwrap();
        let full = l.transactions()[0].id.clone();
        let base = full.split('-').next().unwrap().to_string();
        assert_eq!(l.resolve_id(&full).unwrap(), full);
        assert!(matches!(l.resolve_id(&base), Err(TallyError::AmbiguousId(_, 2))));
        assert_eq!(l.resolve_id(&format!("{base}-1")).unwrap(), format!("{base}-1"));
        assert!(matches!(l.resolve_id("zzzz"), Err(TallyError::UnknownTransaction(_))));
        assert!(l.resolve_id("  ").is_err());
    }

    #[test]
    fn test_import_non_array_keeps_collection() {
        let mut l = ledger();
        l.add(&expense("Padaria", 15.0, "2024-01-01")).unwrap();
        let before = l.transactions().to_vec();

        let err = l.import_json(r#"{"id": "x"}"#).unwrap_err();
        assert!(matches!(err, TallyError::Import(_)));
        assert!(err.to_string().contains("an object"));
        assert_eq!(l.transactions(), before.as_slice());

        assert!(l.import_json("not json at all").is_err());
        assert_eq!(l.transactions(), before.as_slice());
    }

    #[test]
    fn test_import_bad_record_keeps_collection() {
        let mut l = ledger();
        l.add(&expense("Padaria", 15.0, "2024-01-01")).unwrap();
        let err = l.import_json(r#"[{"id": "x", "description": "sem valor"}]"#).unwrap_err();
        assert!(err.to_string().contains("record 0"));
        assert_eq!(l.transactions().len(), 1);
    }

    #[test]
    fn test_export_then_import_replaces_collection() {
        let mut source = ledger();
        source.add(&expense("Luz", 180.0, "2024-03-10").recurring()).unwrap();
        let backup = source.export_json().unwrap();

        let mut target = ledger();
        target.add(&expense("Outro", 1.0, "2024-01-01")).unwrap();
        assert_eq!(target.import_json(&backup).unwrap(), 12);
        assert_eq!(target.transactions(), source.transactions());
    }

    #[test]
    fn test_import_empty_array_clears() {
        let mut l = ledger();
        l.add(&expense("Padaria", 15.0, "2024-01-01")).unwrap();
        assert_eq!(l.import_json("[]").unwrap(), 0);
        assert!(l.is_empty());
    }

    #[test]
    fn test_goal_and_privacy_persist() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut l = Ledger::open(FileStore::in_dir(dir.path()).unwrap()).unwrap();
            l.set_goal(Some(2500.0)).unwrap();
            assert!(l.toggle_privacy().unwrap());
            l.add(&expense("Farmácia", 45.9, "2024-04-02")).unwrap();
        }
        let l = Ledger::open(FileStore::in_dir(dir.path()).unwrap()).unwrap();
        assert_eq!(l.goal(), Some(2500.0));
        assert!(l.privacy());
        assert_eq!(l.transactions().len(), 1);
        assert_eq!(l.transactions()[0].description, "Farmácia");
    }

    #[test]
    fn test_clear_goal() {
        let mut l = ledger();
        l.set_goal(Some(100.0)).unwrap();
        l.set_goal(None).unwrap();
        assert_eq!(l.goal(), None);
        assert_eq!(l.store.get(GOAL_KEY).unwrap(), None);
    }

    #[test]
    fn test_rejects_non_positive_goal() {
        let mut l = ledger();
        assert!(l.set_goal(Some(-5.0)).is_err());
        assert!(l.set_goal(Some(0.0)).is_err());
        assert_eq!(l.goal(), None);
    }

    #[test]
    fn test_unparsable_goal_is_ignored() {
        let mut store = MemoryStore::default();
        store.set(GOAL_KEY, "lots").unwrap();
        let l = Ledger::open(store).unwrap();
        assert_eq!(l.goal(), None);
    }

    #[test]
    fn test_quoted_goal_is_read() {
        let mut store = MemoryStore::default();
        store.set(GOAL_KEY, "\"1200\"").unwrap();
        let l = Ledger::open(store).unwrap();
        assert_eq!(l.goal(), Some(1200.0));
    }

    #[test]
    fn test_corrupt_transactions_refuse_to_open() {
        let mut store = MemoryStore::default();
        store.set(TRANSACTIONS_KEY, "{oops").unwrap();
        assert!(matches!(Ledger::open(store), Err(TallyError::Storage(_))));
    }
}
