//! Per-patient metrics pipeline: filtering, date normalization, latest vs
//! previous selection and the shared chart date domain.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cell::parse_date;
use crate::kpi::{Metric, MetricValue};
use crate::record::{PatientRecord, PatientScoped, RawPatientRecord};

/// Date range shared by the aligned time-series charts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateDomain {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// Rows whose identifier equals `patient_id`, in input order.
pub fn select<'a, T: PatientScoped>(records: &'a [T], patient_id: &str) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| record.patient_id() == patient_id)
        .collect()
}

/// Parse every raw consultation date; failures become `None` for that row only.
pub fn normalize_dates<'a, I>(records: I) -> Vec<PatientRecord>
where
    I: IntoIterator<Item = &'a RawPatientRecord>,
{
    records
        .into_iter()
        .map(|raw| PatientRecord {
            patient_id: raw.patient_id.clone(),
            consultation_date: parse_date(&raw.consultation_date),
            seizure_count: raw.seizure_count,
            avg_duration_min: raw.avg_duration_min,
            medication_adherence_pct: raw.medication_adherence_pct,
            sudep_risk_score: raw.sudep_risk_score,
        })
        .collect()
}

/// Most recent record and the one before it.
///
/// Undated records sort first. With a single record both halves are the same
/// row, so every delta is zero. Returns `None` when there is nothing to show.
pub fn latest_and_previous(records: &[PatientRecord]) -> Option<(&PatientRecord, &PatientRecord)> {
    let mut ordered: Vec<&PatientRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.consultation_date);

    let latest = *ordered.last()?;
    let previous = ordered
        .len()
        .checked_sub(2)
        .map(|index| ordered[index])
        .unwrap_or(latest);
    Some((latest, previous))
}

/// `latest[metric] - previous[metric]` in the metric's native type.
pub fn delta(latest: &PatientRecord, previous: &PatientRecord, metric: Metric) -> MetricValue {
    latest.metric(metric) - previous.metric(metric)
}

/// Earliest and latest consultation date among dated records.
pub fn shared_date_domain(records: &[PatientRecord]) -> Option<DateDomain> {
    let mut dates = records.iter().filter_map(|record| record.consultation_date);
    let first = dates.next()?;
    let (min, max) = dates.fold((first, first), |(min, max), date| {
        (min.min(date), max.max(date))
    });
    Some(DateDomain { min, max })
}

impl PatientRecord {
    pub fn metric(&self, metric: Metric) -> MetricValue {
        match metric {
            Metric::SeizureCount => MetricValue::Integer(i64::from(self.seizure_count)),
            Metric::AvgDuration => MetricValue::Real(self.avg_duration_min),
            Metric::MedicationAdherence => MetricValue::Real(self.medication_adherence_pct),
            Metric::SudepRisk => MetricValue::Integer(self.sudep_risk_score),
        }
    }
}
