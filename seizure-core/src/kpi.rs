//! KPI tiles: current value, delta from the previous consultation and the
//! colour direction of that delta.

use std::ops::{Neg, Sub};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pipeline::delta;
use crate::record::PatientRecord;

/// Numeric series tracked on every consultation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SeizureCount,
    AvgDuration,
    MedicationAdherence,
    SudepRisk,
}

/// Which direction of change counts as an improvement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    LowerIsBetter,
    HigherIsBetter,
}

/// Colour class of a delta.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeltaTone {
    Improved,
    Worsened,
    Unchanged,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::SeizureCount,
        Metric::AvgDuration,
        Metric::MedicationAdherence,
        Metric::SudepRisk,
    ];

    /// Source column in the "Patient Data" sheet.
    pub fn column(self) -> &'static str {
        match self {
            Metric::SeizureCount => "SeizureCount",
            Metric::AvgDuration => "AvgDuration(min)",
            Metric::MedicationAdherence => "MedicationAdherence(%)",
            Metric::SudepRisk => "SUDEP_RiskScore",
        }
    }

    pub fn tile_label(self) -> &'static str {
        match self {
            Metric::SeizureCount => "Last Seizure Count",
            Metric::AvgDuration => "Avg Duration (min)",
            Metric::MedicationAdherence => "Medication Adherence (%)",
            Metric::SudepRisk => "SUDEP Risk Score",
        }
    }

    pub fn polarity(self) -> Polarity {
        match self {
            Metric::MedicationAdherence => Polarity::HigherIsBetter,
            _ => Polarity::LowerIsBetter,
        }
    }
}

/// A metric value in its native numeric type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Real(f64),
}

impl MetricValue {
    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Integer(value) => value as f64,
            MetricValue::Real(value) => value,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            MetricValue::Integer(value) => value == 0,
            MetricValue::Real(value) => value == 0.0,
        }
    }
}

impl Sub for MetricValue {
    type Output = MetricValue;

    fn sub(self, rhs: MetricValue) -> MetricValue {
        match (self, rhs) {
            (MetricValue::Integer(a), MetricValue::Integer(b)) => {
                MetricValue::Integer(a.saturating_sub(b))
            }
            (a, b) => MetricValue::Real(a.as_f64() - b.as_f64()),
        }
    }
}

impl Neg for MetricValue {
    type Output = MetricValue;

    fn neg(self) -> MetricValue {
        match self {
            MetricValue::Integer(value) => MetricValue::Integer(value.saturating_neg()),
            MetricValue::Real(value) => MetricValue::Real(-value),
        }
    }
}

/// One summary tile on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KpiTile {
    pub metric: Metric,
    pub label: String,
    pub value: MetricValue,
    pub delta: MetricValue,
    pub display_value: String,
    pub display_delta: String,
    pub polarity: Polarity,
    pub tone: DeltaTone,
}

/// KPI row of the dashboard, or the explicit empty state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KpiPanel {
    Ready {
        as_of: Option<NaiveDate>,
        tiles: Vec<KpiTile>,
    },
    NoData,
}

impl KpiPanel {
    pub fn tiles(&self) -> &[KpiTile] {
        match self {
            KpiPanel::Ready { tiles, .. } => tiles,
            KpiPanel::NoData => &[],
        }
    }

    pub fn tile(&self, metric: Metric) -> Option<&KpiTile> {
        self.tiles().iter().find(|tile| tile.metric == metric)
    }
}

pub fn build_kpi_tile(latest: &PatientRecord, previous: &PatientRecord, metric: Metric) -> KpiTile {
    let value = latest.metric(metric);
    let change = delta(latest, previous, metric);
    let polarity = metric.polarity();
    let shown = displayed_delta(metric, change);

    KpiTile {
        metric,
        label: metric.tile_label().to_string(),
        value,
        delta: change,
        display_value: display_value(metric, value),
        display_delta: display_delta(metric, shown),
        polarity,
        tone: tone_for(shown, polarity),
    }
}

/// The delta at the precision it is shown with.
fn displayed_delta(metric: Metric, change: MetricValue) -> f64 {
    match (metric, change) {
        (_, MetricValue::Integer(value)) => value as f64,
        (Metric::MedicationAdherence, change) => round_to(change.as_f64(), 1),
        (_, MetricValue::Real(value)) => round_to(value, 2),
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

fn tone_for(shown: f64, polarity: Polarity) -> DeltaTone {
    if shown == 0.0 || shown.is_nan() {
        return DeltaTone::Unchanged;
    }
    match (shown < 0.0, polarity) {
        (true, Polarity::LowerIsBetter) | (false, Polarity::HigherIsBetter) => DeltaTone::Improved,
        _ => DeltaTone::Worsened,
    }
}

fn display_value(metric: Metric, value: MetricValue) -> String {
    match (metric, value) {
        (Metric::MedicationAdherence, value) => format!("{}%", format_real(value.as_f64())),
        (_, MetricValue::Integer(value)) => value.to_string(),
        (_, MetricValue::Real(value)) => format_real(value),
    }
}

fn display_delta(metric: Metric, shown: f64) -> String {
    let sign = if shown > 0.0 { "+" } else { "" };
    match metric {
        Metric::MedicationAdherence if shown == 0.0 => "0.0%".to_string(),
        Metric::MedicationAdherence => format!("{sign}{shown:.1}%"),
        Metric::SeizureCount | Metric::SudepRisk => format!("{sign}{}", shown as i64),
        Metric::AvgDuration if shown == 0.0 => format_real(0.0),
        Metric::AvgDuration => format!("{sign}{}", format_real(shown)),
    }
}

/// Shortest round-trip form, always with a fractional part (`4.0`, `4.25`).
fn format_real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
