//! Tokenizer for the comma separated export of the sheet.
//!
//! The csv crate is strict about some of the quirks found in hand-edited
//! exports (stray quotes, empty documents), so the state machine is written
//! out here. It never fails: malformed quoting degrades into a longer field.

use log::debug;

use crate::config::{Cell, Matrix};

/// Splits the raw text into rows of trimmed cells.
///
/// - `,` separates fields and `"` quotes them, `""` inside quotes is a
/// literal quote.
/// - Quoted fields keep delimiters and line breaks as they are.
/// - Outside of quotes, `\r` is dropped and `\n` ends the row.
/// - The last row is always emitted, so the empty string gives one row
/// holding one empty cell.
/// - An unbalanced quote swallows the rest of the text into one field.
pub fn parse(raw: &str) -> Matrix {
    let mut rows: Matrix = Vec::new();
    let mut row: Vec<Cell> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => {
                in_quotes = !in_quotes;
            }
            ',' if !in_quotes => {
                row.push(finish_field(&mut field));
            }
            '\n' if !in_quotes => {
                row.push(finish_field(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            '\r' if !in_quotes => {}
            _ => field.push(c),
        }
    }
    if in_quotes {
        debug!("parse: unbalanced quote, last field runs to the end of the text");
    }
    row.push(finish_field(&mut field));
    rows.push(row);
    rows
}

fn finish_field(field: &mut String) -> Cell {
    let cell = field.trim().to_string();
    field.clear();
    cell
}

/// The cell at the given position, or `""` when the row is shorter or
/// missing.
pub fn cell(matrix: &Matrix, row: usize, column: usize) -> &str {
    matrix
        .get(row)
        .and_then(|r| r.get(column))
        .map(|s| s.as_str())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[&str]]) -> Matrix {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn simple_rows() {
        assert_eq!(
            parse("a,b,c\n1,2,3"),
            m(&[&["a", "b", "c"], &["1", "2", "3"]])
        );
    }

    #[test]
    fn quoted_fields_keep_delimiters_and_line_breaks() {
        let raw = "Metric,\"01/02, lunes\"\n\"Legajos\ninasistencia\",\"1001, 1002\nok\"\n";
        assert_eq!(
            parse(raw),
            m(&[
                &["Metric", "01/02, lunes"],
                &["Legajos\ninasistencia", "1001, 1002\nok"],
                &[""],
            ])
        );
    }

    #[test]
    fn escaped_quotes_decode_to_one_quote() {
        assert_eq!(
            parse("\"say \"\"hi\"\"\",x"),
            m(&[&["say \"hi\"", "x"]])
        );
    }

    #[test]
    fn carriage_returns_are_dropped_outside_quotes() {
        assert_eq!(
            parse("a,b\r\nc,d\r\n"),
            m(&[&["a", "b"], &["c", "d"], &[""]])
        );
        assert_eq!(parse("\"x\r\ny\""), m(&[&["x\r\ny"]]));
    }

    #[test]
    fn fields_are_trimmed() {
        assert_eq!(parse("  a ,\" b \" , c\t"), m(&[&["a", "b", "c"]]));
    }

    #[test]
    fn empty_input_is_one_empty_cell() {
        assert_eq!(parse(""), m(&[&[""]]));
    }

    #[test]
    fn unbalanced_quote_consumes_the_rest() {
        assert_eq!(
            parse("a,\"b,c\nd,e"),
            m(&[&["a", "b,c\nd,e"]])
        );
    }

    #[test]
    fn ragged_rows_read_as_empty_cells() {
        let matrix = parse("a,b,c\nx\n");
        assert_eq!(matrix[1].len(), 1);
        assert_eq!(cell(&matrix, 1, 0), "x");
        assert_eq!(cell(&matrix, 1, 2), "");
        assert_eq!(cell(&matrix, 7, 0), "");
    }
}
