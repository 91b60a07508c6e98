//! Chart-ready series: one line per KPI metric plus the two categorical
//! breakdowns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::kpi::Metric;
use crate::pipeline::DateDomain;
use crate::record::PatientRecord;

/// Label used for side effects recorded without a name.
pub const MISSING_SIDE_EFFECT: &str = "None";

/// A single point on a trend line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Line chart of one metric over consultation dates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendChart {
    pub metric: Metric,
    pub title: String,
    pub y_label: String,
    pub color: String,
    /// Pinned horizontal range; `None` lets the renderer pick one.
    pub x_range: Option<DateDomain>,
    pub points: Vec<TrendPoint>,
}

/// Summed count for one label of a categorical chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub label: String,
    pub count: u64,
}

impl Metric {
    pub fn chart_title(self) -> &'static str {
        match self {
            Metric::SeizureCount => "Seizure Count Over Time",
            Metric::AvgDuration => "Seizure Duration Trend",
            Metric::MedicationAdherence => "Medication Adherence (%)",
            Metric::SudepRisk => "SUDEP Risk Score Trend",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Metric::SeizureCount => "Seizure Count",
            Metric::AvgDuration => "Avg Duration (min)",
            Metric::MedicationAdherence => "Adherence (%)",
            Metric::SudepRisk => "Risk Score",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Metric::SeizureCount => "#FF8800",
            Metric::AvgDuration => "#2ECC71",
            Metric::MedicationAdherence => "#3498DB",
            Metric::SudepRisk => "#E74C3C",
        }
    }

    /// Whether the chart shares the patient's date domain with its siblings.
    pub fn aligned(self) -> bool {
        !matches!(self, Metric::SudepRisk)
    }
}

/// Shape one metric into ascending `(date, value)` pairs.
///
/// Undated records cannot be placed on a date axis and are left out. No
/// resampling or gap filling happens here.
pub fn trend_chart(records: &[PatientRecord], metric: Metric, domain: Option<DateDomain>) -> TrendChart {
    let mut points: Vec<TrendPoint> = records
        .iter()
        .filter_map(|record| {
            record.consultation_date.map(|date| TrendPoint {
                date,
                value: record.metric(metric).as_f64(),
            })
        })
        .collect();
    points.sort_by_key(|point| point.date);

    TrendChart {
        metric,
        title: metric.chart_title().to_string(),
        y_label: metric.axis_label().to_string(),
        color: metric.color().to_string(),
        x_range: if metric.aligned() { domain } else { None },
        points,
    }
}

/// Trim a side-effect label; missing or blank labels become `"None"`.
pub fn normalize_side_effect_label(label: Option<&str>) -> String {
    match label.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => trimmed.to_string(),
        _ => MISSING_SIDE_EFFECT.to_string(),
    }
}

/// Sum counts per label, keeping the order in which labels first appear.
pub fn group_categories<I, S>(entries: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = (S, u32)>,
    S: Into<String>,
{
    let mut grouped: Vec<CategoryCount> = Vec::new();
    for (label, count) in entries {
        let label = label.into();
        match grouped.iter_mut().find(|entry| entry.label == label) {
            Some(entry) => entry.count += u64::from(count),
            None => grouped.push(CategoryCount {
                label,
                count: u64::from(count),
            }),
        }
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(date: Option<NaiveDate>, seizures: u32, adherence: f64) -> PatientRecord {
        PatientRecord {
            patient_id: "47598".into(),
            consultation_date: date,
            seizure_count: seizures,
            avg_duration_min: 1.5,
            medication_adherence_pct: adherence,
            sudep_risk_score: 4,
        }
    }

    #[test]
    fn trend_points_are_date_ordered_without_undated_rows() {
        let records = vec![
            record(Some(ymd(2024, 3, 1)), 4, 91.0),
            record(None, 8, 70.0),
            record(Some(ymd(2024, 1, 1)), 5, 88.5),
        ];
        let domain = DateDomain {
            min: ymd(2024, 1, 1),
            max: ymd(2024, 3, 1),
        };

        let chart = trend_chart(&records, Metric::MedicationAdherence, Some(domain));

        assert_eq!(
            chart.points,
            vec![
                TrendPoint {
                    date: ymd(2024, 1, 1),
                    value: 88.5
                },
                TrendPoint {
                    date: ymd(2024, 3, 1),
                    value: 91.0
                },
            ]
        );
        assert_eq!(chart.x_range, Some(domain));
        assert_eq!(chart.color, "#3498DB");
    }

    #[test]
    fn risk_chart_is_not_pinned() {
        let domain = DateDomain {
            min: ymd(2024, 1, 1),
            max: ymd(2024, 3, 1),
        };
        let chart = trend_chart(&[], Metric::SudepRisk, Some(domain));
        assert!(chart.x_range.is_none());
        assert!(chart.points.is_empty());
    }

    #[test]
    fn side_effect_labels_are_trimmed_or_defaulted() {
        assert_eq!(normalize_side_effect_label(Some("  Fatigue ")), "Fatigue");
        assert_eq!(normalize_side_effect_label(Some("   ")), "None");
        assert_eq!(normalize_side_effect_label(None), "None");
    }

    #[test]
    fn side_effect_normalization_is_idempotent() {
        let labels = [Some(" Nausea"), None, Some(""), Some("Rash "), Some("None")];
        let once: Vec<String> = labels
            .iter()
            .map(|label| normalize_side_effect_label(*label))
            .collect();
        let twice: Vec<String> = once
            .iter()
            .map(|label| normalize_side_effect_label(Some(label.as_str())))
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_label_groups_under_none() {
        let grouped = group_categories(vec![
            (normalize_side_effect_label(None), 7),
            (normalize_side_effect_label(Some("Dizziness")), 2),
        ]);

        assert_eq!(
            grouped,
            vec![
                CategoryCount {
                    label: "None".into(),
                    count: 7
                },
                CategoryCount {
                    label: "Dizziness".into(),
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn grouping_sums_repeated_labels_in_first_seen_order() {
        let grouped = group_categories(vec![("Focal", 3), ("Absence", 1), ("Focal", 2)]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].label, "Focal");
        assert_eq!(grouped[0].count, 5);
        assert_eq!(grouped[1].count, 1);
    }
}
