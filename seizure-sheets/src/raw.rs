use serde::{Deserialize, Serialize};
use seizure_core::CellValue;

/// One worksheet as rows of cells; the first row holds the column names.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawSheet {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

/// A workbook reduced to plain cell values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawWorkbook {
    #[serde(default)]
    pub sheets: Vec<RawSheet>,
}

impl RawWorkbook {
    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}
