//! CLI command handler for CSV import

use std::path::Path;

use crate::error::{BudgetError, BudgetResult};
use crate::models::UserId;
use crate::services::{ImportService, TransactionService};

/// Handle the import command
pub fn handle_import_command(
    service: &TransactionService,
    user: &UserId,
    file: &Path,
) -> BudgetResult<()> {
    if !file.exists() {
        return Err(BudgetError::Import(format!(
            "File not found: {}",
            file.display()
        )));
    }

    let importer = ImportService::new(service);
    let result = importer.import_file(user, file)?;

    println!("Import from '{}'", file.display());
    println!("{}", "=".repeat(40));
    println!("  Imported:  {}", result.imported);
    println!("  Errors:    {}", result.errors);

    if !result.error_messages.is_empty() {
        println!();
        println!("Skipped rows:");
        let mut lines: Vec<_> = result.error_messages.iter().collect();
        lines.sort_by_key(|(line, _)| **line);
        for (line, message) in lines {
            println!("  line {}: {}", line, message);
        }
    }

    Ok(())
}
