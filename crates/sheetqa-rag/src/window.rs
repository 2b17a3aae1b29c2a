//! Row-window selection
//!
//! Positional truncation only: when the table is too long the header is kept
//! together with the trailing rows. Row order is assumed to track recency;
//! nothing here inspects dates.

use sheetqa_core::{Row, RowTable};

/// Select at most `max_rows` rows, header included.
///
/// Tables within the limit are returned unchanged. Longer tables keep row 0
/// plus the last `max_rows - 1` rows.
pub fn select_row_window(table: RowTable, max_rows: usize) -> RowTable {
    if table.len() <= max_rows {
        return table;
    }

    let mut rows = table.into_rows();
    let tail_len = max_rows.saturating_sub(1);
    let tail_start = rows.len() - tail_len;

    let mut window: Vec<Row> = Vec::with_capacity(tail_len + 1);
    window.extend(rows.drain(..1));
    window.extend(rows.drain(tail_start - 1..));

    RowTable::new(window)
}
