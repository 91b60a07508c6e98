//! Spreadsheet to typed-record mapping for the seizure dashboard.
//!
//! Sheets are located by name and columns by their header text, so the rest
//! of the pipeline never touches raw tabular data.

mod raw;
#[cfg(feature = "xlsx")]
mod xlsx;

use std::collections::HashMap;

use seizure_core::{
    render, CellValue, DashboardConfig, DashboardError, DashboardSnapshot, RawPatientRecord,
    SeizureTypeEntry, SideEffectEntry, SourceTables,
};

pub use raw::{RawSheet, RawWorkbook};
#[cfg(feature = "xlsx")]
pub use xlsx::{load_workbook, read_workbook_bytes, read_xlsx, summarize_path, XLSX_MIME};

pub const PATIENT_DATA_SHEET: &str = "Patient Data";
pub const TYPE_DISTRIBUTION_SHEET: &str = "Type Distribution";
pub const SIDE_EFFECTS_SHEET: &str = "Side Effects";

const PATIENT_ID: &str = "Patient_ID";
const CONSULTATION_DATE: &str = "ConsultationDate";
const SEIZURE_COUNT: &str = "SeizureCount";
const AVG_DURATION: &str = "AvgDuration(min)";
const MEDICATION_ADHERENCE: &str = "MedicationAdherence(%)";
const SUDEP_RISK_SCORE: &str = "SUDEP_RiskScore";
const SEIZURE_TYPE: &str = "SeizureType";
const SIDE_EFFECT: &str = "SideEffect";
const COUNT: &str = "Count";

/// Summarize one patient from a workbook serialized as JSON.
pub fn summarize_str(
    workbook_json: &str,
    patient_id: Option<&str>,
    config: &DashboardConfig,
) -> Result<DashboardSnapshot, DashboardError> {
    let workbook: RawWorkbook = serde_json::from_str(workbook_json)
        .map_err(|err| DashboardError::Parse(err.to_string()))?;
    summarize_raw(&workbook, patient_id, config)
}

/// Summarize one patient from an in-memory workbook.
pub fn summarize_raw(
    workbook: &RawWorkbook,
    patient_id: Option<&str>,
    config: &DashboardConfig,
) -> Result<DashboardSnapshot, DashboardError> {
    let tables = map_workbook(workbook)?;
    Ok(render(&tables, patient_id, config))
}

/// Map the three dashboard sheets onto typed rows.
pub fn map_workbook(workbook: &RawWorkbook) -> Result<SourceTables, DashboardError> {
    let tables = SourceTables {
        patient_records: map_patient_data(required_sheet(workbook, PATIENT_DATA_SHEET)?)?,
        seizure_types: map_type_distribution(required_sheet(workbook, TYPE_DISTRIBUTION_SHEET)?)?,
        side_effects: map_side_effects(required_sheet(workbook, SIDE_EFFECTS_SHEET)?)?,
    };

    tracing::debug!(
        patient_records = tables.patient_records.len(),
        seizure_types = tables.seizure_types.len(),
        side_effects = tables.side_effects.len(),
        "workbook mapped"
    );

    Ok(tables)
}

fn required_sheet<'a>(workbook: &'a RawWorkbook, name: &str) -> Result<&'a RawSheet, DashboardError> {
    workbook
        .sheet(name)
        .ok_or_else(|| DashboardError::MissingSheet(name.to_string()))
}

fn map_patient_data(sheet: &RawSheet) -> Result<Vec<RawPatientRecord>, DashboardError> {
    let reader = SheetReader::new(sheet)?;
    let patient_id = reader.column(PATIENT_ID)?;
    let date = reader.column(CONSULTATION_DATE)?;
    let seizures = reader.column(SEIZURE_COUNT)?;
    let duration = reader.column(AVG_DURATION)?;
    let adherence = reader.column(MEDICATION_ADHERENCE)?;
    let risk = reader.column(SUDEP_RISK_SCORE)?;

    Ok(keep_valid_rows(reader.rows().map(
        |row| -> Result<RawPatientRecord, DashboardError> {
            Ok(RawPatientRecord {
                patient_id: row.key(&patient_id),
                consultation_date: row.cell(&date).clone(),
                seizure_count: row.count(&seizures)?,
                avg_duration_min: row.real(&duration)?,
                medication_adherence_pct: row.real(&adherence)?,
                sudep_risk_score: row.integer(&risk)?,
            })
        },
    )))
}

fn map_type_distribution(sheet: &RawSheet) -> Result<Vec<SeizureTypeEntry>, DashboardError> {
    let reader = SheetReader::new(sheet)?;
    let patient_id = reader.column(PATIENT_ID)?;
    let seizure_type = reader.column(SEIZURE_TYPE)?;
    let count = reader.column(COUNT)?;

    Ok(keep_valid_rows(reader.rows().map(
        |row| -> Result<SeizureTypeEntry, DashboardError> {
            Ok(SeizureTypeEntry {
                patient_id: row.key(&patient_id),
                seizure_type: row.cell(&seizure_type).as_label().unwrap_or_default(),
                count: row.count(&count)?,
            })
        },
    )))
}

fn map_side_effects(sheet: &RawSheet) -> Result<Vec<SideEffectEntry>, DashboardError> {
    let reader = SheetReader::new(sheet)?;
    let patient_id = reader.column(PATIENT_ID)?;
    let side_effect = reader.column(SIDE_EFFECT)?;
    let count = reader.column(COUNT)?;

    Ok(keep_valid_rows(reader.rows().map(
        |row| -> Result<SideEffectEntry, DashboardError> {
            Ok(SideEffectEntry {
                patient_id: row.key(&patient_id),
                side_effect: row.cell(&side_effect).as_label(),
                count: row.count(&count)?,
            })
        },
    )))
}

/// Drop rows with an unreadable count or metric; the rest of the sheet,
/// and every other patient, still renders.
fn keep_valid_rows<T>(rows: impl Iterator<Item = Result<T, DashboardError>>) -> Vec<T> {
    rows.filter_map(|row| match row {
        Ok(record) => Some(record),
        Err(err) => {
            tracing::warn!(error = %err, "skipping unreadable row");
            None
        }
    })
    .collect()
}

/// Column lookup over a sheet whose first row is the header.
struct SheetReader<'a> {
    sheet: &'a RawSheet,
    columns: HashMap<String, usize>,
}

impl<'a> SheetReader<'a> {
    fn new(sheet: &'a RawSheet) -> Result<Self, DashboardError> {
        let header = sheet.rows.first().ok_or_else(|| DashboardError::MissingColumn {
            sheet: sheet.name.clone(),
            column: PATIENT_ID.to_string(),
        })?;

        let mut columns = HashMap::new();
        for (index, cell) in header.iter().enumerate() {
            let name = cell.as_key();
            if !name.is_empty() {
                columns.entry(name).or_insert(index);
            }
        }

        Ok(Self { sheet, columns })
    }

    fn column(&self, name: &str) -> Result<Column, DashboardError> {
        self.columns
            .get(name)
            .map(|&index| Column { name: name.to_string(), index })
            .ok_or_else(|| DashboardError::MissingColumn {
                sheet: self.sheet.name.clone(),
                column: name.to_string(),
            })
    }

    /// Data rows with their 1-based sheet row number; blank rows are skipped.
    fn rows(&self) -> impl Iterator<Item = SheetRow<'a>> {
        let sheet: &'a RawSheet = self.sheet;
        sheet
            .rows
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, cells)| !cells.iter().all(CellValue::is_empty))
            .map(move |(index, cells)| SheetRow {
                sheet: &sheet.name,
                number: index + 1,
                cells,
            })
    }
}

struct Column {
    name: String,
    index: usize,
}

struct SheetRow<'a> {
    sheet: &'a str,
    number: usize,
    cells: &'a [CellValue],
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl<'a> SheetRow<'a> {
    fn cell(&self, column: &Column) -> &'a CellValue {
        self.cells.get(column.index).unwrap_or(&EMPTY_CELL)
    }

    fn key(&self, column: &Column) -> String {
        self.cell(column).as_key()
    }

    fn real(&self, column: &Column) -> Result<f64, DashboardError> {
        self.cell(column)
            .as_f64()
            .ok_or_else(|| self.invalid(column, "expected a number"))
    }

    fn integer(&self, column: &Column) -> Result<i64, DashboardError> {
        self.cell(column)
            .as_i64()
            .ok_or_else(|| self.invalid(column, "expected a whole number"))
    }

    fn count(&self, column: &Column) -> Result<u32, DashboardError> {
        self.cell(column)
            .as_i64()
            .and_then(|value| u32::try_from(value).ok())
            .ok_or_else(|| self.invalid(column, "expected a non-negative whole number"))
    }

    fn invalid(&self, column: &Column, detail: &str) -> DashboardError {
        DashboardError::InvalidCell {
            sheet: self.sheet.to_string(),
            row: self.number,
            column: column.name.clone(),
            detail: format!("{detail}, found {:?}", self.cell(column)),
        }
    }
}
