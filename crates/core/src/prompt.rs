use std::fmt::Write;

use crate::{CostReport, DateRange, range::DATE_FORMAT};

const COLUMNS: [&str; 3] = ["Resource Group", "Date", "Cost"];

/// Render the summarization prompt for one turn.
///
/// The prompt states the requested range, lists every cost row in a
/// column-aligned table, and ends with the summarize instruction. Costs are
/// fixed to two fractional digits so the rendering is deterministic. An empty
/// report renders the header line with no data rows.
pub fn render_prompt(range: &DateRange, report: &CostReport) -> String {
    let mut prompt = format!(
        "User asked about Azure costs from {} to {}. Here's the data:\n",
        range.start.format(DATE_FORMAT),
        range.end.format(DATE_FORMAT)
    );
    prompt.push_str(&render_table(report));
    prompt.push_str("\nSummarize the costs.");
    prompt
}

fn render_table(report: &CostReport) -> String {
    let cells: Vec<[String; 3]> = report
        .iter()
        .map(|row| {
            [
                row.resource_group.clone(),
                row.date.format(DATE_FORMAT).to_string(),
                format!("{:.2}", row.cost),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let mut table = String::new();
    write_row(&mut table, &COLUMNS.map(str::to_string), &widths);
    for row in &cells {
        table.push('\n');
        write_row(&mut table, row, &widths);
    }
    table
}

fn write_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    for (index, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            out.push_str("  ");
        }
        let _ = write!(out, "{cell:<width$}");
    }
    while out.ends_with(' ') {
        out.pop();
    }
}
