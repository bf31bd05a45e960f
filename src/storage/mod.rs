//! Storage layer for spendcast
//!
//! Transactions are kept per user. `TransactionStore` is the capability the
//! rest of the crate depends on; `JsonTransactionStore` persists each user's
//! list to its own JSON file and `MemoryTransactionStore` keeps everything
//! in memory.

pub mod file_io;
pub mod memory;
pub mod transactions;

pub use file_io::{read_json, write_json_atomic};
pub use memory::MemoryTransactionStore;
pub use transactions::JsonTransactionStore;

use chrono::Utc;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Transaction, TransactionDraft, TransactionId, UserId};

/// Per-user transaction persistence
///
/// Lists are ordered newest-added first.
pub trait TransactionStore: Send + Sync {
    /// All transactions of a user
    fn list(&self, user: &UserId) -> BudgetResult<Vec<Transaction>>;

    /// Store a new transaction, assigning its ID and creation time
    fn add(&self, user: &UserId, draft: TransactionDraft) -> BudgetResult<Transaction>;

    /// Store several new transactions as if added one after another
    fn add_many(
        &self,
        user: &UserId,
        drafts: Vec<TransactionDraft>,
    ) -> BudgetResult<Vec<Transaction>> {
        drafts
            .into_iter()
            .map(|draft| self.add(user, draft))
            .collect()
    }

    /// Replace the user-editable fields of an existing transaction
    fn update(
        &self,
        user: &UserId,
        id: &TransactionId,
        draft: TransactionDraft,
    ) -> BudgetResult<Transaction>;

    /// Remove a transaction, returning false if it did not exist
    fn delete(&self, user: &UserId, id: &TransactionId) -> BudgetResult<bool>;

    /// Look up a single transaction
    fn get(&self, user: &UserId, id: &TransactionId) -> BudgetResult<Option<Transaction>> {
        Ok(self.list(user)?.into_iter().find(|t| &t.id == id))
    }
}

/// Prepend a new transaction built from `draft`
fn insert_new(transactions: &mut Vec<Transaction>, draft: TransactionDraft) -> Transaction {
    let mut txn = Transaction::from_draft(TransactionId::generate(), draft);
    txn.created_at = Some(Utc::now());
    transactions.insert(0, txn.clone());
    txn
}

/// Apply `draft` to the transaction with `id`, keeping its position
fn apply_update(
    transactions: &mut [Transaction],
    id: &TransactionId,
    draft: TransactionDraft,
) -> BudgetResult<Transaction> {
    let txn = transactions
        .iter_mut()
        .find(|t| &t.id == id)
        .ok_or_else(|| BudgetError::transaction_not_found(id.as_str()))?;
    txn.apply_draft(draft);
    Ok(txn.clone())
}

/// Remove the transaction with `id`
fn remove(transactions: &mut Vec<Transaction>, id: &TransactionId) -> bool {
    let before = transactions.len();
    transactions.retain(|t| &t.id != id);
    transactions.len() != before
}
