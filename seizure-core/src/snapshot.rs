use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::{
    group_categories, normalize_side_effect_label, trend_chart, CategoryCount, TrendChart,
};
use crate::config::DashboardConfig;
use crate::kpi::{build_kpi_tile, KpiPanel, Metric};
use crate::pipeline::{latest_and_previous, normalize_dates, select, shared_date_domain, DateDomain};
use crate::record::SourceTables;

const UNKNOWN_PATIENT: &str = "Unknown Patient";
const UNKNOWN_AGE: &str = "N/A";

/// Header text for the selected patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientHeader {
    pub patient_id: String,
    pub name: String,
    pub age: String,
}

impl PatientHeader {
    /// Look the patient up; unknown identifiers get placeholder text.
    pub fn resolve(config: &DashboardConfig, patient_id: &str) -> Self {
        let (name, age) = match config.profile(patient_id) {
            Some(profile) => (profile.name.clone(), profile.age.to_string()),
            None => (UNKNOWN_PATIENT.to_string(), UNKNOWN_AGE.to_string()),
        };
        Self {
            patient_id: patient_id.to_string(),
            name,
            age,
        }
    }

    pub fn export_file_name(&self) -> String {
        format!("{}_seizure_data.xlsx", self.name)
    }
}

/// Everything a renderer needs for one dashboard page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub patient: PatientHeader,
    pub export_file_name: String,
    pub record_count: usize,
    pub kpis: KpiPanel,
    pub date_domain: Option<DateDomain>,
    pub trends: Vec<TrendChart>,
    pub seizure_types: Vec<CategoryCount>,
    pub side_effects: Vec<CategoryCount>,
}

impl DashboardSnapshot {
    pub fn has_data(&self) -> bool {
        !matches!(self.kpis, KpiPanel::NoData)
    }

    pub fn trend(&self, metric: Metric) -> Option<&TrendChart> {
        self.trends.iter().find(|chart| chart.metric == metric)
    }
}

/// Build the dashboard for one request.
///
/// A blank or missing identifier falls back to the configured default. The
/// function reads nothing but its arguments, so each call starts fresh.
pub fn render(
    tables: &SourceTables,
    requested_patient: Option<&str>,
    config: &DashboardConfig,
) -> DashboardSnapshot {
    let patient_id = config.resolve_patient_id(requested_patient);
    let patient = PatientHeader::resolve(config, &patient_id);

    let records = normalize_dates(select(&tables.patient_records, &patient_id));
    let date_domain = shared_date_domain(&records);

    let kpis = match latest_and_previous(&records) {
        Some((latest, previous)) => KpiPanel::Ready {
            as_of: latest.consultation_date,
            tiles: Metric::ALL
                .into_iter()
                .map(|metric| build_kpi_tile(latest, previous, metric))
                .collect(),
        },
        None => {
            tracing::info!(patient_id = %patient_id, "no consultation records for patient");
            KpiPanel::NoData
        }
    };

    let trends = Metric::ALL
        .into_iter()
        .map(|metric| trend_chart(&records, metric, date_domain))
        .collect();

    let seizure_types = group_categories(
        select(&tables.seizure_types, &patient_id)
            .into_iter()
            .map(|entry| (entry.seizure_type.clone(), entry.count)),
    );

    let side_effects = group_categories(
        select(&tables.side_effects, &patient_id)
            .into_iter()
            .map(|entry| {
                (
                    normalize_side_effect_label(entry.side_effect.as_deref()),
                    entry.count,
                )
            }),
    );

    tracing::debug!(
        patient_id = %patient_id,
        records = records.len(),
        seizure_types = seizure_types.len(),
        side_effects = side_effects.len(),
        "dashboard rendered"
    );

    DashboardSnapshot {
        generated_at: Utc::now(),
        export_file_name: patient.export_file_name(),
        patient,
        record_count: records.len(),
        kpis,
        date_domain,
        trends,
        seizure_types,
        side_effects,
    }
}
