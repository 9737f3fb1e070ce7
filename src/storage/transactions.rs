//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with a
//! per-user index so one user's queries never scan another's records.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{Transaction, TransactionId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: user_id -> transaction_ids
    by_user: RwLock<HashMap<UserId, Vec<TransactionId>>>,
}

/// Newest first; creation time then id keep equal dates in a fixed order
fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.date
        .cmp(&a.date)
        .then(b.created_at.cmp(&a.created_at))
        .then(a.id.cmp(&b.id))
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;
        data.clear();
        by_user.clear();

        for txn in file_data.transactions {
            by_user.entry(txn.user_id).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let data = self.data.read().map_err(lock_error)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All of a user's transactions, newest first
    pub fn for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, TallyError> {
        let data = self.data.read().map_err(lock_error)?;
        let by_user = self.by_user.read().map_err(lock_error)?;

        let ids = by_user.get(&user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), TallyError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_user.get_mut(&old.user_id) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_user.entry(txn.user_id).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    pub fn delete(&self, id: TransactionId) -> Result<bool, TallyError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_user = self.by_user.write().map_err(lock_error)?;

        match data.remove(&id) {
            Some(txn) => {
                if let Some(ids) = by_user.get_mut(&txn.user_id) {
                    ids.retain(|&tid| tid != id);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Money, TransactionKind};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn txn(user: UserId, day: u32) -> Transaction {
        Transaction::new(
            user,
            CategoryId::new(),
            TransactionKind::Expense,
            Money::from_units(5),
            Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap(),
            "Coffee",
        )
    }

    #[test]
    fn test_for_user_is_scoped_and_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        let alice = UserId::new();
        let bob = UserId::new();

        repo.upsert(txn(alice, 3)).unwrap();
        repo.upsert(txn(alice, 9)).unwrap();
        repo.upsert(txn(bob, 5)).unwrap();

        let list = repo.for_user(alice).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].date > list[1].date);
        assert_eq!(repo.for_user(bob).unwrap().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let user = UserId::new();

        let repo = TransactionRepository::new(path.clone());
        let stored = txn(user, 1).with_tags(["daily"]);
        repo.upsert(stored.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = TransactionRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(stored.id).unwrap(), Some(stored));
    }

    #[test]
    fn test_upsert_moves_between_users_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        let first = UserId::new();
        let second = UserId::new();

        let mut record = txn(first, 2);
        repo.upsert(record.clone()).unwrap();
        record.user_id = second;
        repo.upsert(record.clone()).unwrap();

        assert!(repo.for_user(first).unwrap().is_empty());
        assert_eq!(repo.for_user(second).unwrap().len(), 1);

        assert!(repo.delete(record.id).unwrap());
        assert!(!repo.delete(record.id).unwrap());
        assert!(repo.get(record.id).unwrap().is_none());
    }
}
