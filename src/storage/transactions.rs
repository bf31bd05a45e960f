//! JSON file transaction store
//!
//! Each user's transactions live in `data/transactions_<user>.json` as
//! `{ "transactions": [...] }`, newest-added first. A user's file is read on
//! first access and cached; every mutation is written through atomically
//! before the cache is updated.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::{debug, info};

use super::file_io::{read_json, write_json_atomic};
use super::{apply_update, insert_new, remove, TransactionStore};
use crate::config::paths::SpendcastPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Transaction, TransactionDraft, TransactionId, UserId};

/// Serializable transaction file
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

/// Transaction store backed by one JSON file per user
pub struct JsonTransactionStore {
    paths: SpendcastPaths,
    cache: RwLock<HashMap<UserId, Vec<Transaction>>>,
}

impl JsonTransactionStore {
    pub fn new(paths: SpendcastPaths) -> Self {
        Self {
            paths,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Path of a user's transaction file
    pub fn file_for(&self, user: &UserId) -> PathBuf {
        self.paths.transactions_file(user)
    }

    fn load_from_disk(&self, user: &UserId) -> BudgetResult<Vec<Transaction>> {
        let path = self.file_for(user);
        let data: TransactionData = read_json(&path)?;
        debug!(
            user = %user,
            count = data.transactions.len(),
            path = %path.display(),
            "Loaded transactions"
        );
        Ok(data.transactions)
    }

    /// Run `f` on a copy of the user's list, persist it, then commit to the cache
    fn mutate<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut Vec<Transaction>) -> BudgetResult<T>,
    ) -> BudgetResult<T> {
        let mut cache = self.cache.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let mut transactions = match cache.get(user) {
            Some(cached) => cached.clone(),
            None => self.load_from_disk(user)?,
        };

        let result = f(&mut transactions)?;

        write_json_atomic(
            self.file_for(user),
            &TransactionData {
                transactions: transactions.clone(),
            },
        )?;
        cache.insert(user.clone(), transactions);
        Ok(result)
    }
}

impl TransactionStore for JsonTransactionStore {
    fn list(&self, user: &UserId) -> BudgetResult<Vec<Transaction>> {
        {
            let cache = self.cache.read().map_err(|e| {
                BudgetError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            if let Some(transactions) = cache.get(user) {
                return Ok(transactions.clone());
            }
        }

        let transactions = self.load_from_disk(user)?;
        let mut cache = self.cache.write().map_err(|e| {
            BudgetError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        Ok(cache
            .entry(user.clone())
            .or_insert(transactions)
            .clone())
    }

    fn add(&self, user: &UserId, draft: TransactionDraft) -> BudgetResult<Transaction> {
        let txn = self.mutate(user, |transactions| Ok(insert_new(transactions, draft)))?;
        info!(user = %user, id = %txn.id, "Added transaction");
        Ok(txn)
    }

    fn add_many(
        &self,
        user: &UserId,
        drafts: Vec<TransactionDraft>,
    ) -> BudgetResult<Vec<Transaction>> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }
        let added = self.mutate(user, |transactions| {
            Ok(drafts
                .into_iter()
                .map(|draft| insert_new(transactions, draft))
                .collect::<Vec<_>>())
        })?;
        info!(user = %user, count = added.len(), "Added transactions");
        Ok(added)
    }

    fn update(
        &self,
        user: &UserId,
        id: &TransactionId,
        draft: TransactionDraft,
    ) -> BudgetResult<Transaction> {
        let txn = self.mutate(user, |transactions| apply_update(transactions, id, draft))?;
        info!(user = %user, id = %txn.id, "Updated transaction");
        Ok(txn)
    }

    fn delete(&self, user: &UserId, id: &TransactionId) -> BudgetResult<bool> {
        let removed = self.mutate(user, |transactions| Ok(remove(transactions, id)))?;
        if removed {
            info!(user = %user, id = %id, "Deleted transaction");
        }
        Ok(removed)
    }
}
