//! Core logic for the single-patient seizure management dashboard.
//!
//! The crate holds the typed entities read from the source workbook, the
//! per-patient metrics pipeline and the view model handed to renderers.

mod cell;
mod chart;
mod config;
mod kpi;
mod pipeline;
mod record;
mod snapshot;

pub use cell::{parse_date, CellValue};
pub use chart::{
    group_categories, normalize_side_effect_label, trend_chart, CategoryCount, TrendChart,
    TrendPoint,
};
pub use config::{DashboardConfig, PatientProfile};
pub use kpi::{build_kpi_tile, DeltaTone, KpiPanel, KpiTile, Metric, MetricValue, Polarity};
pub use pipeline::{
    delta, latest_and_previous, normalize_dates, select, shared_date_domain, DateDomain,
};
pub use record::{
    PatientRecord, PatientScoped, RawPatientRecord, SeizureTypeEntry, SideEffectEntry,
    SourceTables,
};
pub use snapshot::{render, DashboardSnapshot, PatientHeader};

/// Errors raised while turning source tables into a dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Sheet \"{0}\" not found in workbook")]
    MissingSheet(String),
    #[error("Sheet \"{sheet}\" has no column \"{column}\"")]
    MissingColumn { sheet: String, column: String },
    #[error("Sheet \"{sheet}\", row {row}, column \"{column}\": {detail}")]
    InvalidCell {
        sheet: String,
        row: usize,
        column: String,
        detail: String,
    },
    #[error("Could not read workbook: {0}")]
    Parse(String),
    #[error("Could not access workbook: {0}")]
    Io(String),
}
