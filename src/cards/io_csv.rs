// Reading the comma separated export of the sheet.

use crate::cards::*;

pub fn read_csv_sheet(path: &Path) -> CardsResult<String> {
    let p = path.display().to_string();
    info!("Attempting to read sheet {:?}", p);
    let contents = fs::read_to_string(path).context(OpeningInputSnafu { path: p.clone() })?;
    debug!("read_csv_sheet: {:?}: {} bytes", p, contents.len());
    Ok(contents)
}
