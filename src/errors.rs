use thiserror::Error;

use crate::decimal::Money;
use crate::loan::LoanId;

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("missing required field: {field}")]
    MissingField {
        field: &'static str,
    },

    #[error("invalid amount for {field}: {value}")]
    InvalidAmount {
        field: &'static str,
        value: Money,
    },

    #[error("invalid date range: first payment {first} is after last payment {last}")]
    InvalidDateRange {
        first: chrono::NaiveDate,
        last: chrono::NaiveDate,
    },

    #[error("loan description must not be empty")]
    EmptyDescription,

    #[error("platform name must not be empty")]
    EmptyPlatformName,

    #[error("platform already exists: {name}")]
    PlatformExists {
        name: String,
    },

    #[error("platform not found: {name}")]
    PlatformNotFound {
        name: String,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
