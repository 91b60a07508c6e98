use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cell::CellValue;

/// Rows that belong to exactly one patient.
pub trait PatientScoped {
    fn patient_id(&self) -> &str;
}

/// A "Patient Data" row before its consultation date is parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawPatientRecord {
    pub patient_id: String,
    pub consultation_date: CellValue,
    pub seizure_count: u32,
    pub avg_duration_min: f64,
    pub medication_adherence_pct: f64,
    pub sudep_risk_score: i64,
}

/// One consultation with its date normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    pub patient_id: String,
    pub consultation_date: Option<NaiveDate>,
    pub seizure_count: u32,
    pub avg_duration_min: f64,
    pub medication_adherence_pct: f64,
    pub sudep_risk_score: i64,
}

/// Seizures of one type observed for a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeizureTypeEntry {
    pub patient_id: String,
    pub seizure_type: String,
    pub count: u32,
}

/// Reported side effect; the label is kept as read until charted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SideEffectEntry {
    pub patient_id: String,
    pub side_effect: Option<String>,
    pub count: u32,
}

/// Everything one render reads from the source, already typed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceTables {
    pub patient_records: Vec<RawPatientRecord>,
    pub seizure_types: Vec<SeizureTypeEntry>,
    pub side_effects: Vec<SideEffectEntry>,
}

impl PatientScoped for RawPatientRecord {
    fn patient_id(&self) -> &str {
        &self.patient_id
    }
}

impl PatientScoped for PatientRecord {
    fn patient_id(&self) -> &str {
        &self.patient_id
    }
}

impl PatientScoped for SeizureTypeEntry {
    fn patient_id(&self) -> &str {
        &self.patient_id
    }
}

impl PatientScoped for SideEffectEntry {
    fn patient_id(&self) -> &str {
        &self.patient_id
    }
}
