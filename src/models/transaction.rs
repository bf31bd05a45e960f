//! Transaction model
//!
//! A transaction is stored the way the user entered it: the amount may be a
//! number or the raw text from a form field, and the date is the ISO 8601
//! string. Interpretation happens on read, and it never fails: amounts that
//! don't parse count as zero and dates that don't parse are reported as
//! `None` so each report can decide how to degrade.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::resolve_category;
use super::ids::TransactionId;
use super::money::Money;

/// Whether money left or entered the budget
///
/// Stored records only count as income when their type is exactly
/// `"income"`. Anything else, including a missing or null type, is an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Other(IgnoredAny),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Name(name) if name == "income" => Self::Income,
            _ => Self::Expense,
        })
    }
}

impl TransactionType {
    /// Parse from user input ("expense", "income", case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "e" => Some(Self::Expense),
            "income" | "i" => Some(Self::Income),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "Expense"),
            Self::Income => write!(f, "Income"),
        }
    }
}

/// A stored amount: either a JSON number or the text a form submitted
///
/// Any other JSON value (null, a bool, an object) loads as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
            Other(IgnoredAny),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Self::Number(n),
            Raw::Text(s) => Self::Text(s),
            Raw::Other(_) => Self::default(),
        })
    }
}

impl Amount {
    /// Numeric value of the amount, 0 when it cannot be interpreted
    ///
    /// Text is read like a lenient float parser: leading whitespace is
    /// skipped and the longest numeric prefix is used, so "12.5 USD" reads
    /// as 12.5 and "abc" as 0.
    pub fn value(&self) -> f64 {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => leading_number(s).unwrap_or(0.0),
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }

    /// The amount rounded to cents for display
    pub fn as_money(&self) -> Money {
        Money::from_decimal(self.value())
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl From<f64> for Amount {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for Amount {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Amount {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Longest prefix of `s` (after leading whitespace) that reads as a decimal number
fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Parse the calendar date written in an ISO 8601 string
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM` (first of month), local date-times and
/// RFC 3339 timestamps. For timestamps the date as written is used; no
/// timezone conversion is applied.
pub fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok()
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Magnitude of the transaction
    #[serde(default)]
    pub amount: Amount,

    /// Expense or income
    #[serde(rename = "type", default)]
    pub kind: TransactionType,

    /// Category label (None or empty means "Other")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// ISO 8601 date string
    #[serde(default, deserialize_with = "text_or_empty")]
    pub date: String,

    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// When the store first saved the transaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A string field that loads as empty when the stored value is not a string
fn text_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Other(_) => String::new(),
    })
}

impl Transaction {
    /// One-line summary: date, category and amount, income marked with "+"
    pub fn summary(&self, currency: &str) -> String {
        let sign = if self.is_income() { "+" } else { "" };
        format!(
            "{} {} {}{}",
            self.date,
            self.category_name(),
            sign,
            self.amount.as_money().format_with_symbol(currency)
        )
    }

    /// Build a transaction from a draft with an explicit ID
    pub fn from_draft(id: TransactionId, draft: TransactionDraft) -> Self {
        Self {
            id,
            amount: draft.amount,
            kind: draft.kind,
            category: draft.category,
            date: draft.date,
            description: draft.description,
            created_at: None,
        }
    }

    /// Shorthand for an expense, mostly useful in tests and examples
    pub fn expense(amount: impl Into<Amount>, category: &str, date: &str) -> Self {
        Self::from_draft(
            TransactionId::generate(),
            TransactionDraft::new(amount, TransactionType::Expense, date).with_category(category),
        )
    }

    /// Shorthand for an income entry
    pub fn income(amount: impl Into<Amount>, category: &str, date: &str) -> Self {
        Self::from_draft(
            TransactionId::generate(),
            TransactionDraft::new(amount, TransactionType::Income, date).with_category(category),
        )
    }

    /// Numeric amount, 0 when unparseable
    pub fn amount_value(&self) -> f64 {
        self.amount.value()
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    /// Category label with the "Other" fallback applied
    pub fn category_name(&self) -> &str {
        resolve_category(self.category.as_deref())
    }

    /// Calendar date, None when the stored string does not parse
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    /// Replace the user-editable fields, keeping ID and creation time
    pub fn apply_draft(&mut self, draft: TransactionDraft) {
        self.amount = draft.amount;
        self.kind = draft.kind;
        self.category = draft.category;
        self.date = draft.date;
        self.description = draft.description;
    }

    /// The user-editable fields as a draft
    pub fn to_draft(&self) -> TransactionDraft {
        TransactionDraft {
            amount: self.amount.clone(),
            kind: self.kind,
            category: self.category.clone(),
            date: self.date.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary("$"))
    }
}

/// The user-supplied fields of a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub amount: Amount,
    #[serde(rename = "type", default)]
    pub kind: TransactionType,
    #[serde(default)]
    pub category: Option<String>,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionDraft {
    /// Create a draft with no category or description
    pub fn new(amount: impl Into<Amount>, kind: TransactionType, date: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            kind,
            category: None,
            date: date.into(),
            description: None,
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Trim text fields, turn blank ones into None and read textual amounts
    pub fn normalized(mut self) -> Self {
        self.category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        self.description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self.date = self.date.trim().to_string();
        if let Amount::Text(text) = &self.amount {
            // Entered text like "$1,250.00" is stored as the number it denotes
            self.amount = match Money::parse(text) {
                Ok(money) => Amount::Number(money.as_decimal()),
                Err(_) => Amount::Text(text.trim().to_string()),
            };
        }
        self
    }

    /// Strict checks applied when a user creates or edits a transaction
    ///
    /// Stored data is never re-validated; the reports tolerate anything.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        let value = match &self.amount {
            Amount::Number(n) => *n,
            Amount::Text(s) => Money::parse(s)
                .map_err(|_| DraftValidationError::InvalidAmount(s.clone()))?
                .as_decimal(),
        };
        if !value.is_finite() {
            return Err(DraftValidationError::InvalidAmount(self.amount.to_string()));
        }
        if value < 0.0 {
            return Err(DraftValidationError::NegativeAmount(self.amount.to_string()));
        }
        if self.date.trim().is_empty() {
            return Err(DraftValidationError::MissingDate);
        }
        if parse_calendar_date(&self.date).is_none() {
            return Err(DraftValidationError::InvalidDate(self.date.clone()));
        }
        Ok(())
    }
}

/// Validation errors for transaction drafts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftValidationError {
    InvalidAmount(String),
    NegativeAmount(String),
    MissingDate,
    InvalidDate(String),
}

impl fmt::Display for DraftValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount(a) => write!(f, "Amount is not a number: '{}'", a),
            Self::NegativeAmount(a) => write!(
                f,
                "Amount must not be negative: '{}' (use the transaction type for direction)",
                a
            ),
            Self::MissingDate => write!(f, "Date is required"),
            Self::InvalidDate(d) => write!(f, "Invalid date: '{}'. Use YYYY-MM-DD", d),
        }
    }
}

impl std::error::Error for DraftValidationError {}
