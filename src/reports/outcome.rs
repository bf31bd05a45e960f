//! Outcome of an analysis that may lack enough data
//!
//! Not having enough transactions is an expected state, not a failure, so
//! it is a value the caller matches on rather than an error.

use serde::Serialize;
use std::fmt;

/// Why an analysis could not produce a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InsufficientData {
    /// The forecaster received no transactions at all
    NoTransactions,
    /// Fewer than two calendar months of expenses
    TooFewMonths { found: usize },
    /// Fewer transactions in total than the recurrence minimum
    TooFewTransactions { found: usize, required: usize },
    /// Fewer expense transactions than the recurrence minimum
    TooFewExpenses { found: usize, required: usize },
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTransactions => {
                write!(f, "No transaction data available for forecasting.")
            }
            Self::TooFewMonths { .. } => write!(
                f,
                "At least 2 months of transaction data are required for forecasting."
            ),
            Self::TooFewTransactions { required, .. } => write!(
                f,
                "At least {} transactions are required for recurring transaction analysis.",
                required
            ),
            Self::TooFewExpenses { required, .. } => write!(
                f,
                "At least {} expense transactions are required for recurring transaction analysis.",
                required
            ),
        }
    }
}

/// Either a computed result or the reason there is none
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Analysis<T> {
    Ready(T),
    InsufficientData(InsufficientData),
}

impl<T> Analysis<T> {
    /// The result, if one was computed
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::InsufficientData(_) => None,
        }
    }

    /// The reason no result was computed
    pub fn insufficient(&self) -> Option<InsufficientData> {
        match self {
            Self::Ready(_) => None,
            Self::InsufficientData(reason) => Some(*reason),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Analysis<U> {
        match self {
            Self::Ready(value) => Analysis::Ready(f(value)),
            Self::InsufficientData(reason) => Analysis::InsufficientData(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            InsufficientData::NoTransactions.to_string(),
            "No transaction data available for forecasting."
        );
        assert_eq!(
            InsufficientData::TooFewMonths { found: 1 }.to_string(),
            "At least 2 months of transaction data are required for forecasting."
        );
        assert_eq!(
            InsufficientData::TooFewTransactions {
                found: 2,
                required: 6
            }
            .to_string(),
            "At least 6 transactions are required for recurring transaction analysis."
        );
        assert_eq!(
            InsufficientData::TooFewExpenses {
                found: 5,
                required: 6
            }
            .to_string(),
            "At least 6 expense transactions are required for recurring transaction analysis."
        );
    }

    #[test]
    fn test_accessors() {
        let ready: Analysis<u32> = Analysis::Ready(3);
        assert_eq!(ready.ready(), Some(&3));
        assert!(ready.insufficient().is_none());
        assert_eq!(ready.map(|v| v * 2), Analysis::Ready(6));

        let missing: Analysis<u32> = Analysis::InsufficientData(InsufficientData::NoTransactions);
        assert!(!missing.is_ready());
        assert_eq!(missing.insufficient(), Some(InsufficientData::NoTransactions));
    }
}
