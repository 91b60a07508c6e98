use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identifier shown when the request names no patient.
pub const DEFAULT_PATIENT_ID: &str = "47598";

/// Display details for a known patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientProfile {
    pub name: String,
    pub age: u32,
}

/// Settings that shape a render.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Patient rendered when the request carries no identifier.
    pub default_patient_id: String,
    /// Lookup table for header text and export file names.
    pub patients: BTreeMap<String, PatientProfile>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let patients = [("47597", "Surya Prakash", 56), ("47598", "Sri Latha", 45)]
            .into_iter()
            .map(|(id, name, age)| {
                (
                    id.to_string(),
                    PatientProfile {
                        name: name.to_string(),
                        age,
                    },
                )
            })
            .collect();

        Self {
            default_patient_id: DEFAULT_PATIENT_ID.to_string(),
            patients,
        }
    }
}

impl DashboardConfig {
    /// Identifier to render for a raw request value; blank falls back to the default.
    pub fn resolve_patient_id(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.default_patient_id.clone(),
        }
    }

    pub fn profile(&self, patient_id: &str) -> Option<&PatientProfile> {
        self.patients.get(patient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_request_uses_default_patient() {
        let config = DashboardConfig::default();
        assert_eq!(config.resolve_patient_id(None), "47598");
        assert_eq!(config.resolve_patient_id(Some("  ")), "47598");
        assert_eq!(config.resolve_patient_id(Some("47597")), "47597");
    }

    #[test]
    fn default_lookup_table_knows_both_patients() {
        let config = DashboardConfig::default();
        assert_eq!(config.profile("47597").map(|p| p.age), Some(56));
        assert_eq!(
            config.profile("47598").map(|p| p.name.as_str()),
            Some("Sri Latha")
        );
        assert!(config.profile("1").is_none());
    }
}
