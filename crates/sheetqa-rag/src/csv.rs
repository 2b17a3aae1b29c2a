//! Plain CSV rendering of a row window
//!
//! Cells are joined with `,` and rows with `\n`. Nothing is quoted or
//! escaped, so cell text containing commas or newlines is ambiguous in the
//! output.

use sheetqa_core::{Row, RowTable};

/// Render every row of `table`
pub fn render_csv(table: &RowTable) -> String {
    table
        .rows()
        .iter()
        .map(render_row)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_row(row: &Row) -> String {
    row.iter()
        .map(|cell| cell.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_revenue_table() {
        let table = RowTable::from_text([
            vec!["Date", "Amount"],
            vec!["2024-03-01", "10"],
            vec!["2024-03-02", "15"],
        ]);
        assert_eq!(
            render_csv(&table),
            "Date,Amount\n2024-03-01,10\n2024-03-02,15"
        );
    }

    #[test]
    fn test_absent_cells_render_empty() {
        let table = RowTable::new(vec![
            vec![Some("a".into()), None, Some("c".into())],
            vec![None, None],
            vec![],
        ]);
        assert_eq!(render_csv(&table), "a,,c\n,\n");
    }

    #[test]
    fn test_empty_table_renders_empty_string() {
        assert_eq!(render_csv(&RowTable::default()), "");
    }

    #[test]
    fn test_delimiters_inside_cells_are_not_escaped() {
        let table = RowTable::from_text([vec!["Latte, large", "4.50"]]);
        assert_eq!(render_csv(&table), "Latte, large,4.50");
    }
}
