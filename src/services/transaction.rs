//! Transaction service
//!
//! Validated create, update and delete on top of any `TransactionStore`,
//! plus filtered listing and the by-day grouping used by the list view.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{Transaction, TransactionDraft, TransactionId, TransactionType, UserId};
use crate::storage::TransactionStore;

/// Service for transaction management
pub struct TransactionService<'a> {
    store: &'a dyn TransactionStore,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only expenses or only income
    pub kind: Option<TransactionType>,
    /// Category label, compared case-insensitively after the "Other" fallback
    pub category: Option<String>,
    /// Earliest date, inclusive
    pub start_date: Option<NaiveDate>,
    /// Latest date, inclusive
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a transaction passes every criterion
    ///
    /// With a date bound set, transactions whose date does not parse never match.
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if txn.kind != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !txn.category_name().eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }
        if self.start_date.is_some() || self.end_date.is_some() {
            let Some(date) = txn.parsed_date() else {
                return false;
            };
            if self.start_date.is_some_and(|start| date < start) {
                return false;
            }
            if self.end_date.is_some_and(|end| date > end) {
                return false;
            }
        }
        true
    }
}

/// Transactions that share a calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    /// None collects transactions whose date does not parse
    pub date: Option<NaiveDate>,
    pub transactions: Vec<Transaction>,
}

impl DayGroup {
    /// Heading such as "Friday, January 5, 2024"
    pub fn label(&self) -> String {
        match self.date {
            Some(date) => date.format("%A, %B %-d, %Y").to_string(),
            None => "Unknown date".to_string(),
        }
    }
}

/// Group transactions by calendar day, newest day first
///
/// Order within a day is the input order. Unparseable dates form a final group.
pub fn group_by_date(transactions: &[Transaction]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for txn in transactions {
        let date = txn.parsed_date();
        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => group.transactions.push(txn.clone()),
            None => groups.push(DayGroup {
                date,
                transactions: vec![txn.clone()],
            }),
        }
    }

    // Some(_) sorts after None, so reversing puts the latest day first and None last
    groups.sort_by(|a, b| b.date.cmp(&a.date));
    groups
}

impl<'a> TransactionService<'a> {
    pub fn new(store: &'a dyn TransactionStore) -> Self {
        Self { store }
    }

    /// Validate and store a new transaction
    pub fn create(&self, user: &UserId, draft: TransactionDraft) -> BudgetResult<Transaction> {
        let draft = validate_draft(draft)?;
        self.store.add(user, draft)
    }

    /// Validate a batch of drafts and store them together
    ///
    /// Nothing is stored if any draft is invalid.
    pub fn create_many(
        &self,
        user: &UserId,
        drafts: Vec<TransactionDraft>,
    ) -> BudgetResult<Vec<Transaction>> {
        let drafts = drafts
            .into_iter()
            .map(validate_draft)
            .collect::<BudgetResult<Vec<_>>>()?;
        self.store.add_many(user, drafts)
    }

    /// Validate and apply new values to an existing transaction
    pub fn update(
        &self,
        user: &UserId,
        id: &TransactionId,
        draft: TransactionDraft,
    ) -> BudgetResult<Transaction> {
        let draft = validate_draft(draft)?;
        self.store.update(user, id, draft)
    }

    /// Delete a transaction, failing if it does not exist
    pub fn delete(&self, user: &UserId, id: &TransactionId) -> BudgetResult<()> {
        if self.store.delete(user, id)? {
            Ok(())
        } else {
            Err(BudgetError::transaction_not_found(id.as_str()))
        }
    }

    /// Get a transaction by ID
    pub fn get(&self, user: &UserId, id: &TransactionId) -> BudgetResult<Transaction> {
        self.store
            .get(user, id)?
            .ok_or_else(|| BudgetError::transaction_not_found(id.as_str()))
    }

    /// Resolve a full ID or a unique ID prefix (as shown in listings)
    pub fn find(&self, user: &UserId, id_or_prefix: &str) -> BudgetResult<Transaction> {
        let needle = id_or_prefix.trim();
        if needle.is_empty() {
            return Err(BudgetError::Validation("Transaction ID cannot be empty".into()));
        }

        let all = self.store.list(user)?;
        if let Some(exact) = all.iter().find(|t| t.id.as_str() == needle) {
            return Ok(exact.clone());
        }

        let mut matches = all.into_iter().filter(|t| t.id.as_str().starts_with(needle));
        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(txn),
            (Some(_), Some(_)) => Err(BudgetError::Validation(format!(
                "Transaction ID prefix '{}' is ambiguous",
                needle
            ))),
            (None, _) => Err(BudgetError::transaction_not_found(needle)),
        }
    }

    /// Every transaction of the user, newest-added first
    pub fn all(&self, user: &UserId) -> BudgetResult<Vec<Transaction>> {
        self.store.list(user)
    }

    /// Transactions passing `filter`
    pub fn list(&self, user: &UserId, filter: &TransactionFilter) -> BudgetResult<Vec<Transaction>> {
        let all = self.store.list(user)?;
        let total = all.len();
        let mut filtered: Vec<Transaction> =
            all.into_iter().filter(|t| filter.matches(t)).collect();
        if let Some(limit) = filter.limit {
            filtered.truncate(limit);
        }
        debug!(user = %user, total, shown = filtered.len(), "Listed transactions");
        Ok(filtered)
    }
}

/// Normalize a draft and check it can be stored
pub fn validate_draft(draft: TransactionDraft) -> BudgetResult<TransactionDraft> {
    let draft = draft.normalized();
    draft
        .validate()
        .map_err(|e| BudgetError::Validation(e.to_string()))?;
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTransactionStore;

    fn alice() -> UserId {
        UserId::parse("alice").unwrap()
    }

    fn expense(amount: &str, category: &str, date: &str) -> TransactionDraft {
        TransactionDraft::new(amount, TransactionType::Expense, date).with_category(category)
    }

    #[test]
    fn test_create_validates() {
        let store = MemoryTransactionStore::new();
        let service = TransactionService::new(&store);

        let txn = service
            .create(&alice(), expense(" 12.50 ", " Groceries ", "2024-01-03"))
            .unwrap();
        assert_eq!(txn.amount_value(), 12.5);
        assert_eq!(txn.category.as_deref(), Some("Groceries"));

        let err = service
            .create(&alice(), expense("-3", "Groceries", "2024-01-03"))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create(&alice(), expense("3", "Groceries", "01/03/2024"))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.list(&alice()).unwrap().len(), 1);
    }

    #[test]
    fn test_create_many_is_all_or_nothing() {
        let store = MemoryTransactionStore::new();
        let service = TransactionService::new(&store);

        let err = service
            .create_many(
                &alice(),
                vec![
                    expense("10", "Transport", "2024-01-03"),
                    expense("abc", "Transport", "2024-01-04"),
                ],
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.list(&alice()).unwrap().is_empty());

        let added = service
            .create_many(
                &alice(),
                vec![
                    expense("$1,250.00", "Rent", "2024-01-01"),
                    expense("10", "Transport", "2024-01-03"),
                ],
            )
            .unwrap();
        assert_eq!(added[0].amount_value(), 1250.0);
        let stored = store.list(&alice()).unwrap();
        assert_eq!(stored[0].category_name(), "Transport");
        assert_eq!(stored[1].category_name(), "Rent");
    }

    #[test]
    fn test_update_and_delete() {
        let store = MemoryTransactionStore::new();
        let service = TransactionService::new(&store);
        let txn = service
            .create(&alice(), expense("10", "Transport", "2024-01-03"))
            .unwrap();

        let updated = service
            .update(&alice(), &txn.id, expense("11", "Transport", "2024-01-04"))
            .unwrap();
        assert_eq!(updated.date, "2024-01-04");

        service.delete(&alice(), &txn.id).unwrap();
        assert!(service.delete(&alice(), &txn.id).unwrap_err().is_not_found());
        assert!(service.get(&alice(), &txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_by_prefix() {
        let seeded = vec![
            Transaction::from_draft(TransactionId::new("abc123"), expense("1", "Rent", "2024-01-01")),
            Transaction::from_draft(TransactionId::new("abd456"), expense("2", "Rent", "2024-01-01")),
        ];
        let store = MemoryTransactionStore::with_transactions(alice(), seeded);
        let service = TransactionService::new(&store);

        assert_eq!(service.find(&alice(), "abc").unwrap().id.as_str(), "abc123");
        assert_eq!(service.find(&alice(), "abd456").unwrap().id.as_str(), "abd456");
        assert!(service.find(&alice(), "ab").unwrap_err().is_validation());
        assert!(service.find(&alice(), "zzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_filter() {
        let store = MemoryTransactionStore::new();
        let service = TransactionService::new(&store);
        let user = alice();
        service.create(&user, expense("10", "Groceries", "2024-01-03")).unwrap();
        service.create(&user, expense("20", "Rent", "2024-02-01")).unwrap();
        service
            .create(
                &user,
                TransactionDraft::new("900", TransactionType::Income, "2024-02-01")
                    .with_category("Salary"),
            )
            .unwrap();

        let expenses = service
            .list(&user, &TransactionFilter::new().kind(TransactionType::Expense))
            .unwrap();
        assert_eq!(expenses.len(), 2);

        let groceries = service
            .list(&user, &TransactionFilter::new().category("groceries"))
            .unwrap();
        assert_eq!(groceries.len(), 1);

        let february = service
            .list(
                &user,
                &TransactionFilter::new().date_range(NaiveDate::from_ymd_opt(2024, 2, 1), None),
            )
            .unwrap();
        assert_eq!(february.len(), 2);

        let limited = service.list(&user, &TransactionFilter::new().limit(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert!(limited[0].is_income());
    }

    #[test]
    fn test_group_by_date_newest_first() {
        let txns = vec![
            Transaction::expense(1.0, "A", "2024-01-02"),
            Transaction::expense(2.0, "B", "2024-01-05"),
            Transaction::expense(3.0, "C", "garbage"),
            Transaction::expense(4.0, "D", "2024-01-02"),
        ];
        let groups = group_by_date(&txns);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(groups[1].transactions.len(), 2);
        assert_eq!(groups[1].transactions[0].category_name(), "A");
        assert_eq!(groups[2].date, None);
        assert_eq!(groups[0].label(), "Friday, January 5, 2024");
        assert_eq!(groups[2].label(), "Unknown date");
    }
}
