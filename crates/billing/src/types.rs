use thiserror::Error;

/// Errors emitted while fetching cost data.
#[derive(Debug, Error)]
pub enum BillingError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("billing API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("token acquisition failed with {status}: {body}")]
    Token { status: u16, body: String },
    #[error("malformed billing payload: {0}")]
    Shape(#[from] ShapeError),
}

/// A result row did not match the documented `[cost, date, resourceGroupName]`
/// column order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("row {index} has {len} cells, expected 3")]
    WrongArity { index: usize, len: usize },
    #[error("row {index}: cost cell is not a number")]
    BadCost { index: usize },
    #[error("row {index}: date cell {value:?} is not a YYYY-MM-DD date")]
    BadDate { index: usize, value: String },
    #[error("row {index}: resource group cell is not a string")]
    BadResourceGroup { index: usize },
    #[error("response body is missing properties.rows")]
    MissingRows,
}

pub type Result<T> = std::result::Result<T, BillingError>;
