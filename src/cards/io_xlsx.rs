// Reading the sheet straight from an Excel workbook.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use chrono::Days;

use crate::cards::*;

pub fn read_xlsx_sheet(path: &Path, worksheet: &Option<String>) -> CardsResult<Matrix> {
    let p = path.display().to_string();
    info!("Attempting to read workbook {:?}", p);
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path: p.clone() })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu {
                name: name.clone(),
                path: p.clone(),
            })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path: p.clone() })?,
    }
    .context(OpeningExcelSnafu { path: p })?;
    debug!(
        "read_xlsx_sheet: range start: {:?} end: {:?}",
        wrange.start(),
        wrange.end()
    );
    Ok(range_to_matrix(&wrange))
}

/// Lays the range out as the text export would: the cells keep their
/// position in the sheet even when the range does not start at A1.
fn range_to_matrix(range: &Range<DataType>) -> Matrix {
    let (row0, col0) = range.start().unwrap_or((0, 0));
    let mut matrix: Matrix = vec![vec![String::new()]; row0 as usize];
    for row in range.rows() {
        let mut cells: Vec<Cell> = vec![String::new(); col0 as usize];
        cells.extend(row.iter().map(cell_text));
        matrix.push(cells);
    }
    if matrix.is_empty() {
        matrix.push(vec![String::new()]);
    }
    matrix
}

fn cell_text(cell: &DataType) -> Cell {
    match cell {
        DataType::String(s) => s.trim().to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Float(f) => float_text(*f),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(serial) => excel_date_text(*serial),
        DataType::Empty => String::new(),
        other => {
            debug!("cell_text: could not understand cell {:?}", other);
            String::new()
        }
    }
}

fn float_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Excel stores days as a number of days since 1899-12-30.
fn excel_date_text(serial: f64) -> String {
    let day = if serial >= 0.0 {
        NaiveDate::from_ymd_opt(1899, 12, 30)
            .and_then(|origin| origin.checked_add_days(Days::new(serial.floor() as u64)))
    } else {
        None
    };
    match day {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => float_text(serial),
    }
}
