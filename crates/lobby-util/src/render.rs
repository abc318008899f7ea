use chrono::DateTime;
use comfy_table::{Cell, CellAlignment, Table as TermTable};
use lobby_lda::{Column, Row, Table};

/// Lay the search result out for the terminal.
pub fn render_table(table: &Table) -> TermTable {
    let mut term = TermTable::new();
    term.set_header(table.columns.iter().map(|col| match col {
        Column::Posted => "Date Posted",
        other => other.header(),
    }));

    for row in &table.rows {
        term.add_row(table.columns.iter().map(|col| cell(row, *col)));
    }
    term
}

fn cell(row: &Row, column: Column) -> Cell {
    match column {
        Column::AmountReported => {
            Cell::new(dollars(row.amount_reported)).set_alignment(CellAlignment::Right)
        }
        Column::Posted => Cell::new(row.posted.as_deref().map(posted).unwrap_or_default()),
        other => Cell::new(row.cell(other).unwrap_or_default()),
    }
}

/// `$12000`; cents are dropped.
pub fn dollars(amount: f64) -> String {
    format!("${}", amount.trunc() as i64)
}

/// `19 Apr 2024, 10:32 AM` for RFC 3339 timestamps; anything else is shown as-is.
pub fn posted(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%-d %b %Y, %-I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}
