//! CSV import
//!
//! Reads transactions from a CSV file with a header row. Columns are matched
//! by name: `date` and `amount` are required, `type`, `category` and
//! `description` are optional. Rows that fail validation are reported and
//! skipped; valid rows are added through the transaction service.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use super::transaction::{validate_draft, TransactionService};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, TransactionDraft, TransactionId, TransactionType, UserId};

/// Column positions found in the header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub amount_column: usize,
    pub type_column: Option<usize>,
    pub category_column: Option<usize>,
    pub description_column: Option<usize>,
}

impl ColumnMapping {
    /// Locate columns by (case-insensitive) header name
    pub fn from_headers(headers: &StringRecord) -> BudgetResult<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
        };

        let date_column = find(&["date"])
            .ok_or_else(|| BudgetError::Import("CSV header has no 'date' column".into()))?;
        let amount_column = find(&["amount"])
            .ok_or_else(|| BudgetError::Import("CSV header has no 'amount' column".into()))?;

        Ok(Self {
            date_column,
            amount_column,
            type_column: find(&["type", "kind"]),
            category_column: find(&["category"]),
            description_column: find(&["description", "memo", "notes"]),
        })
    }
}

/// A CSV row turned into a validated draft
#[derive(Debug, Clone)]
pub struct ParsedRow {
    /// Line number in the file (the header is line 1)
    pub line: usize,
    pub draft: TransactionDraft,
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub errors: usize,
    pub imported_ids: Vec<TransactionId>,
    /// Error message by line number
    pub error_messages: HashMap<usize, String>,
}

/// Parse every data row of a CSV
pub fn parse_csv_from_reader<R: Read>(
    reader: R,
) -> BudgetResult<Vec<Result<ParsedRow, (usize, String)>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mapping = ColumnMapping::from_headers(reader.headers()?)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let row = match result {
            Ok(record) => parse_record(&record, &mapping)
                .map(|draft| ParsedRow { line, draft })
                .map_err(|msg| (line, msg)),
            Err(e) => Err((line, format!("Error reading CSV record: {}", e))),
        };
        rows.push(row);
    }
    Ok(rows)
}

fn parse_record(record: &StringRecord, mapping: &ColumnMapping) -> Result<TransactionDraft, String> {
    let field = |col: Option<usize>| {
        col.and_then(|c| record.get(c))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let date = field(Some(mapping.date_column)).ok_or("Missing date")?;
    let amount = field(Some(mapping.amount_column)).ok_or("Missing amount")?;
    let kind = match field(mapping.type_column) {
        Some(raw) => TransactionType::parse(raw)
            .ok_or_else(|| format!("Unknown transaction type: '{}'", raw))?,
        None => TransactionType::Expense,
    };

    let mut draft = TransactionDraft::new(Amount::from(amount), kind, date);
    draft.category = field(mapping.category_column).map(str::to_string);
    draft.description = field(mapping.description_column).map(str::to_string);

    let draft = draft.normalized();
    draft.validate().map_err(|e| e.to_string())?;
    Ok(draft)
}

/// Imports CSV rows for one user
pub struct ImportService<'a> {
    transactions: &'a TransactionService<'a>,
}

impl<'a> ImportService<'a> {
    pub fn new(transactions: &'a TransactionService<'a>) -> Self {
        Self { transactions }
    }

    /// Import every valid row from a reader
    ///
    /// Rows are checked one by one and the valid ones are stored in a single
    /// batch, in file order.
    pub fn import_from_reader<R: Read>(&self, user: &UserId, reader: R) -> BudgetResult<ImportResult> {
        let mut result = ImportResult::default();
        let mut drafts = Vec::new();

        for row in parse_csv_from_reader(reader)? {
            match row {
                Ok(parsed) => match validate_draft(parsed.draft) {
                    Ok(draft) => drafts.push(draft),
                    Err(e) => {
                        warn!(line = parsed.line, error = %e, "Skipping CSV row");
                        result.errors += 1;
                        result.error_messages.insert(parsed.line, e.to_string());
                    }
                },
                Err((line, msg)) => {
                    warn!(line, error = %msg, "Skipping CSV row");
                    result.errors += 1;
                    result.error_messages.insert(line, msg);
                }
            }
        }

        for txn in self.transactions.create_many(user, drafts)? {
            result.imported += 1;
            result.imported_ids.push(txn.id);
        }

        info!(
            user = %user,
            imported = result.imported,
            errors = result.errors,
            "Finished CSV import"
        );
        Ok(result)
    }

    /// Import every valid row from a CSV file
    pub fn import_file(&self, user: &UserId, path: &Path) -> BudgetResult<ImportResult> {
        let file = File::open(path).map_err(|e| {
            BudgetError::Import(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.import_from_reader(user, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryTransactionStore, TransactionStore};

    const SAMPLE: &str = "\
Date,Amount,Type,Category,Description
2024-01-05,1200,expense,Rent,January rent
2024-01-06,$45.10,,Groceries,
2024-01-07,2500,income,Salary,Payroll
not-a-date,10,expense,Other,
2024-01-08,ten,expense,Other,
2024-01-09,5,transfer,Other,
";

    #[test]
    fn test_column_mapping() {
        let headers = StringRecord::from(vec!["Notes", "amount", "DATE", "Category"]);
        let mapping = ColumnMapping::from_headers(&headers).unwrap();
        assert_eq!(mapping.date_column, 2);
        assert_eq!(mapping.amount_column, 1);
        assert_eq!(mapping.category_column, Some(3));
        assert_eq!(mapping.description_column, Some(0));
        assert_eq!(mapping.type_column, None);

        let missing = StringRecord::from(vec!["when", "amount"]);
        assert!(matches!(
            ColumnMapping::from_headers(&missing),
            Err(BudgetError::Import(_))
        ));
    }

    #[test]
    fn test_parse_rows() {
        let rows = parse_csv_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(rows.len(), 6);

        let rent = rows[0].as_ref().unwrap();
        assert_eq!(rent.line, 2);
        assert_eq!(rent.draft.category.as_deref(), Some("Rent"));
        assert_eq!(rent.draft.description.as_deref(), Some("January rent"));

        let groceries = rows[1].as_ref().unwrap();
        assert_eq!(groceries.draft.kind, TransactionType::Expense);
        assert_eq!(groceries.draft.description, None);

        assert!(rows[2].as_ref().unwrap().draft.kind == TransactionType::Income);
        assert_eq!(rows[3].as_ref().unwrap_err().0, 5);
        assert!(rows[4].is_err());
        assert!(rows[5].as_ref().unwrap_err().1.contains("transfer"));
    }

    #[test]
    fn test_import_adds_valid_rows() {
        let store = MemoryTransactionStore::new();
        let service = TransactionService::new(&store);
        let importer = ImportService::new(&service);
        let user = UserId::parse("alice").unwrap();

        let result = importer.import_from_reader(&user, SAMPLE.as_bytes()).unwrap();
        assert_eq!(result.imported, 3);
        assert_eq!(result.errors, 3);
        assert!(result.error_messages.contains_key(&5));
        assert!(result.error_messages.contains_key(&6));
        assert!(result.error_messages.contains_key(&7));

        let stored = store.list(&user).unwrap();
        assert_eq!(stored.len(), 3);
        // Each add prepends, so the last imported row comes first
        assert!(stored[0].is_income());
        assert_eq!(stored[2].category_name(), "Rent");
    }

    #[test]
    fn test_import_into_json_store() {
        use crate::config::paths::SpendcastPaths;
        use crate::storage::JsonTransactionStore;

        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = SpendcastPaths::with_base_dir(temp_dir.path().to_path_buf());
        let store = JsonTransactionStore::new(paths.clone());
        let service = TransactionService::new(&store);
        let user = UserId::parse("alice").unwrap();

        let result = ImportService::new(&service)
            .import_from_reader(&user, SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(result.imported, 3);

        let reopened = JsonTransactionStore::new(paths);
        let stored = reopened.list(&user).unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[2].category_name(), "Rent");
        assert_eq!(stored[1].amount_value(), 45.1);
    }

    #[test]
    fn test_missing_header_column_is_error() {
        let store = MemoryTransactionStore::new();
        let service = TransactionService::new(&store);
        let importer = ImportService::new(&service);
        let user = UserId::parse("alice").unwrap();

        let err = importer
            .import_from_reader(&user, "when,how much\n2024-01-01,5\n".as_bytes())
            .unwrap_err();
        assert!(matches!(err, BudgetError::Import(_)));
    }
}
