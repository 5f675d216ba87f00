mod auth;
mod client;
mod reshape;
mod types;

pub use auth::{AccessToken, ClientSecretCredential, StaticCredential, TokenCredential};
pub use client::{CostClient, MANAGEMENT_AUDIENCE, RawRow};
pub use reshape::reshape_rows;
pub use types::{BillingError, Result, ShapeError};
