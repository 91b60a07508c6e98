use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use seizure_core::{CellValue, DashboardConfig, DashboardError, DashboardSnapshot, SourceTables};

use crate::{map_workbook, RawSheet, RawWorkbook};

/// MIME type of the exported workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The workbook file exactly as stored; nothing is parsed.
pub fn read_workbook_bytes(path: &Path) -> Result<Vec<u8>, DashboardError> {
    std::fs::read(path).map_err(|err| DashboardError::Io(format!("{}: {err}", path.display())))
}

/// Read the workbook at `path` and map its sheets.
pub fn load_workbook(path: &Path) -> Result<SourceTables, DashboardError> {
    let bytes = read_workbook_bytes(path)?;
    map_workbook(&read_xlsx(&bytes)?)
}

/// Summarize one patient straight from a workbook file.
pub fn summarize_path(
    path: &Path,
    patient_id: Option<&str>,
    config: &DashboardConfig,
) -> Result<DashboardSnapshot, DashboardError> {
    let tables = load_workbook(path)?;
    Ok(seizure_core::render(&tables, patient_id, config))
}

/// Decode every worksheet of an `.xlsx`/`.xls`/`.ods` payload.
pub fn read_xlsx(bytes: &[u8]) -> Result<RawWorkbook, DashboardError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| DashboardError::Parse(err.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|err| DashboardError::Parse(format!("sheet \"{name}\": {err}")))?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect())
            .collect();
        sheets.push(RawSheet::new(name, rows));
    }

    Ok(RawWorkbook { sheets })
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            CellValue::Text(text.clone())
        }
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let err = read_xlsx(b"definitely not a spreadsheet").unwrap_err();
        assert!(matches!(err, DashboardError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_workbook(Path::new("/nonexistent/sample.xlsx")).unwrap_err();
        assert!(matches!(err, DashboardError::Io(_)));
        let err = read_workbook_bytes(Path::new("/nonexistent/sample.xlsx")).unwrap_err();
        assert!(matches!(err, DashboardError::Io(_)));
    }

    #[test]
    fn calamine_cells_map_to_cell_values() {
        assert_eq!(cell_value(&Data::Float(3.25)), CellValue::Number(3.25));
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(cell_value(&Data::Int(47598)), CellValue::Number(47598.0));
        assert_eq!(
            cell_value(&Data::String("Focal".into())),
            CellValue::Text("Focal".into())
        );
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
    }
}
