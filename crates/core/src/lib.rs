pub mod prompt;
pub mod range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use prompt::render_prompt;
pub use range::{DATE_FORMAT, RANGE_SEPARATOR, RangeParseError, parse_date_range};

/// Inclusive calendar-day range taken from one user message.
///
/// No ordering is enforced between `start` and `end`; a reversed range is
/// forwarded to the billing API as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// One aggregated (resource group, day) cost cell from the billing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRow {
    pub resource_group: String,
    pub date: NaiveDate,
    pub cost: f64,
}

/// Ordered cost rows for one date range, in API row order.
pub type CostReport = Vec<CostRow>;
