//! In-memory transaction store

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::info;

use super::{apply_update, insert_new, remove, TransactionStore};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Transaction, TransactionDraft, TransactionId, UserId};

/// Transaction store without persistence
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    data: RwLock<HashMap<UserId, Vec<Transaction>>>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's list, newest-added first
    pub fn with_transactions(user: UserId, transactions: Vec<Transaction>) -> Self {
        let store = Self::new();
        if let Ok(mut data) = store.data.write() {
            data.insert(user, transactions);
        }
        store
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn list(&self, user: &UserId) -> BudgetResult<Vec<Transaction>> {
        let data = self.data.read().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.get(user).cloned().unwrap_or_default())
    }

    fn add(&self, user: &UserId, draft: TransactionDraft) -> BudgetResult<Transaction> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let txn = insert_new(data.entry(user.clone()).or_default(), draft);
        info!(user = %user, id = %txn.id, "Added transaction");
        Ok(txn)
    }

    fn update(
        &self,
        user: &UserId,
        id: &TransactionId,
        draft: TransactionDraft,
    ) -> BudgetResult<Transaction> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let transactions = data
            .get_mut(user)
            .ok_or_else(|| BudgetError::transaction_not_found(id.as_str()))?;
        let txn = apply_update(transactions, id, draft)?;
        info!(user = %user, id = %txn.id, "Updated transaction");
        Ok(txn)
    }

    fn delete(&self, user: &UserId, id: &TransactionId) -> BudgetResult<bool> {
        let mut data = self.data.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let removed = data
            .get_mut(user)
            .map(|transactions| remove(transactions, id))
            .unwrap_or(false);
        if removed {
            info!(user = %user, id = %id, "Deleted transaction");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;

    fn user(name: &str) -> UserId {
        UserId::parse(name).unwrap()
    }

    fn draft(amount: f64, date: &str) -> TransactionDraft {
        TransactionDraft::new(amount, TransactionType::Expense, date).with_category("Groceries")
    }

    #[test]
    fn test_add_prepends_and_assigns_identity() {
        let store = MemoryTransactionStore::new();
        let alice = user("alice");

        let first = store.add(&alice, draft(10.0, "2024-01-01")).unwrap();
        let second = store.add(&alice, draft(20.0, "2024-01-02")).unwrap();
        assert_ne!(first.id, second.id);
        assert!(first.created_at.is_some());

        let list = store.list(&alice).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second.id);
        assert_eq!(list[1].id, first.id);
    }

    #[test]
    fn test_users_are_isolated() {
        let store = MemoryTransactionStore::new();
        store.add(&user("alice"), draft(10.0, "2024-01-01")).unwrap();

        assert!(store.list(&user("bob")).unwrap().is_empty());
        assert_eq!(store.list(&user("alice")).unwrap().len(), 1);
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let store = MemoryTransactionStore::new();
        let alice = user("alice");
        let original = store.add(&alice, draft(10.0, "2024-01-01")).unwrap();

        let updated = store
            .update(&alice, &original.id, draft(12.0, "2024-01-03"))
            .unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.amount_value(), 12.0);
        assert_eq!(store.get(&alice, &original.id).unwrap(), Some(updated));
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let store = MemoryTransactionStore::new();
        let alice = user("alice");
        store.add(&alice, draft(10.0, "2024-01-01")).unwrap();

        let err = store
            .update(&alice, &TransactionId::new("nope"), draft(1.0, "2024-01-01"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete() {
        let store = MemoryTransactionStore::new();
        let alice = user("alice");
        let txn = store.add(&alice, draft(10.0, "2024-01-01")).unwrap();

        assert!(store.delete(&alice, &txn.id).unwrap());
        assert!(!store.delete(&alice, &txn.id).unwrap());
        assert!(!store.delete(&user("bob"), &txn.id).unwrap());
        assert!(store.list(&alice).unwrap().is_empty());
    }

    #[test]
    fn test_with_transactions() {
        let seeded = vec![Transaction::expense(5.0, "Transport", "2024-02-01")];
        let store = MemoryTransactionStore::with_transactions(user("carol"), seeded.clone());
        assert_eq!(store.list(&user("carol")).unwrap(), seeded);
    }
}
