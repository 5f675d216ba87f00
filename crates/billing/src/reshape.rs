use chrono::NaiveDate;
use serde_json::Value;

use costbot_core::{CostReport, CostRow, range::DATE_FORMAT};

use crate::client::RawRow;
use crate::types::ShapeError;

/// Map raw `[cost, date, resourceGroupName]` rows to [`CostRow`] records,
/// preserving input order.
///
/// Pure and total over well-formed input; the billing API has already
/// aggregated by day and resource group, so no filtering or grouping happens
/// here. A malformed row fails the whole call rather than being dropped.
pub fn reshape_rows(rows: &[RawRow]) -> Result<CostReport, ShapeError> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| reshape_row(index, row))
        .collect()
}

fn reshape_row(index: usize, row: &RawRow) -> Result<CostRow, ShapeError> {
    let [cost, date, resource_group] = row.as_slice() else {
        return Err(ShapeError::WrongArity {
            index,
            len: row.len(),
        });
    };
    let cost = cost.as_f64().ok_or(ShapeError::BadCost { index })?;
    let date = parse_date_cell(index, date)?;
    let resource_group = resource_group
        .as_str()
        .ok_or(ShapeError::BadResourceGroup { index })?
        .to_string();
    Ok(CostRow {
        resource_group,
        date,
        cost,
    })
}

fn parse_date_cell(index: usize, cell: &Value) -> Result<NaiveDate, ShapeError> {
    let bad = || ShapeError::BadDate {
        index,
        value: cell.to_string(),
    };
    let text = cell.as_str().ok_or_else(bad)?;
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| bad())
}
