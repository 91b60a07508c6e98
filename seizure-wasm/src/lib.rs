//! Framework-neutral WASM <-> JavaScript bridge for the dashboard pipeline.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use seizure_core::{DashboardConfig, DashboardError, PatientProfile};
use seizure_sheets::{summarize_raw, RawWorkbook};
use wasm_bindgen::prelude::*;

#[derive(Deserialize)]
struct JsDashboardConfig {
    #[serde(default)]
    default_patient_id: Option<String>,
    #[serde(default)]
    patients: Option<BTreeMap<String, PatientProfile>>,
}

impl From<JsDashboardConfig> for DashboardConfig {
    fn from(cfg: JsDashboardConfig) -> Self {
        let mut base = DashboardConfig::default();
        if let Some(id) = cfg.default_patient_id {
            base.default_patient_id = id;
        }
        if let Some(patients) = cfg.patients {
            base.patients.extend(patients);
        }
        base
    }
}

/// Build the dashboard snapshot for one patient from a JSON workbook
/// (`{ sheets: [{ name, rows }] }`).
#[wasm_bindgen]
pub fn summarize_workbook(
    workbook: JsValue,
    patient_id: Option<String>,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let workbook: RawWorkbook = from_value(workbook)
        .map_err(|err| JsValue::from_str(&format!("Could not read workbook JSON: {err}")))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsDashboardConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Could not read config: {err}")))?;
            DashboardConfig::from(cfg)
        }
        None => DashboardConfig::default(),
    };

    let snapshot = summarize_raw(&workbook, patient_id.as_deref(), &cfg)
        .map_err(|err| JsValue::from_str(&format_dashboard_error(err)))?;

    to_value(&snapshot)
        .map_err(|err| JsValue::from_str(&format!("Could not serialize snapshot: {err}")))
}

fn format_dashboard_error(err: DashboardError) -> String {
    format!("Dashboard error: {err}")
}
