//! Spreadsheet output.
//!
//! Writes export rows to a single-worksheet .xlsx file with a bolded
//! header row and auto-fitted columns.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::export::{ExportRow, COLUMNS};
use crate::fetch::FetchError;

/// Write rows to an .xlsx file at the given path.
pub fn write_spreadsheet(rows: &[ExportRow], path: impl AsRef<Path>) -> Result<(), FetchError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet().set_name("Ancestry")?;

    let header = Format::new().set_bold();
    for (col, title) in COLUMNS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *title, &header)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let r = (index + 1) as u32;
        let cells = [
            row.name.as_str(),
            row.relationship.as_str(),
            row.gender.as_str(),
            row.lifespan.as_str(),
            row.ascendancy_number.as_str(),
            row.id.as_str(),
            row.location_type.as_str(),
            row.location.as_str(),
            row.country.as_str(),
            row.date.as_str(),
            row.url.as_str(),
        ];
        for (col, cell) in cells.iter().enumerate() {
            worksheet.write(r, col as u16, *cell)?;
        }
    }

    worksheet.autofit();
    workbook.save(path.as_ref())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_spreadsheet_creates_file() {
        let row = ExportRow {
            name: "Alice Example".to_string(),
            relationship: "Self".to_string(),
            gender: "Female".to_string(),
            lifespan: "1900-1980".to_string(),
            ascendancy_number: "1".to_string(),
            id: "A-1".to_string(),
            location_type: "Birth".to_string(),
            location: "Provo, Utah, United States".to_string(),
            country: "United States".to_string(),
            date: "1 January 1900".to_string(),
            url: "https://www.familysearch.org/tree/person/details/A-1".to_string(),
        };

        let path = std::env::temp_dir().join(format!("kindred-sheet-test-{}.xlsx", std::process::id()));
        write_spreadsheet(&[row], &path).unwrap();
        assert!(path.exists());
        let size = std::fs::metadata(&path).unwrap().len();
        assert!(size > 0);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_write_spreadsheet_empty_rows() {
        let path = std::env::temp_dir().join(format!("kindred-sheet-empty-{}.xlsx", std::process::id()));
        write_spreadsheet(&[], &path).unwrap();
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }
}
