//! HTTP front end for the seizure management dashboard.
//!
//! Every request re-reads the workbook and runs the pipeline from scratch;
//! nothing but settings and the source handle is shared between requests.

mod error;
mod figures;
mod page;
pub mod settings;
mod styles;

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use seizure_core::{
    render, DashboardConfig, DashboardError, DashboardSnapshot, PatientHeader, SourceTables,
};
use seizure_sheets::{load_workbook, read_workbook_bytes, XLSX_MIME};
use tower_http::trace::TraceLayer;

pub use error::WebError;
pub use settings::Settings;

/// Where the dashboard reads its workbook from.
pub trait WorkbookSource: Send + Sync + 'static {
    /// Decode and map the dashboard sheets.
    fn load(&self) -> Result<SourceTables, DashboardError>;

    /// The stored workbook, untouched, for download.
    fn read_bytes(&self) -> Result<Vec<u8>, DashboardError>;
}

/// A workbook file on disk.
#[derive(Debug, Clone)]
pub struct XlsxFileSource {
    path: PathBuf,
}

impl XlsxFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WorkbookSource for XlsxFileSource {
    fn load(&self) -> Result<SourceTables, DashboardError> {
        load_workbook(&self.path)
    }

    fn read_bytes(&self) -> Result<Vec<u8>, DashboardError> {
        read_workbook_bytes(&self.path)
    }
}

#[derive(Clone)]
pub struct AppState {
    source: Arc<dyn WorkbookSource>,
    config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(source: impl WorkbookSource, config: DashboardConfig) -> Self {
        Self {
            source: Arc::new(source),
            config: Arc::new(config),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            XlsxFileSource::new(settings.workbook_path.clone()),
            settings.dashboard.clone(),
        )
    }

    async fn load(&self) -> Result<SourceTables, WebError> {
        self.with_source(|source| source.load()).await
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, WebError> {
        self.with_source(|source| source.read_bytes()).await
    }

    /// Run blocking source IO off the async workers.
    async fn with_source<T, F>(&self, job: F) -> Result<T, WebError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn WorkbookSource) -> Result<T, DashboardError> + Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let value = tokio::task::spawn_blocking(move || job(source.as_ref()))
            .await
            .map_err(|err| WebError::Internal(format!("workbook task failed: {err}")))??;
        Ok(value)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PatientQuery {
    pub patient_id: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Build the dashboard router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(dashboard_page))
        .route("/api/dashboard", get(dashboard_json))
        .route("/export", get(export_workbook))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the dashboard until Ctrl-C.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await
}

async fn snapshot_for(state: &AppState, query: &PatientQuery) -> Result<DashboardSnapshot, WebError> {
    let tables = state.load().await?;
    let snapshot = render(&tables, query.patient_id.as_deref(), &state.config);
    tracing::info!(
        patient_id = %snapshot.patient.patient_id,
        records = snapshot.record_count,
        has_data = snapshot.has_data(),
        "dashboard rendered"
    );
    Ok(snapshot)
}

/// `GET /`: the HTML dashboard.
async fn dashboard_page(State(state): State<AppState>, Query(query): Query<PatientQuery>) -> Response {
    match snapshot_for(&state, &query).await {
        Ok(snapshot) => Html(page::render_dashboard(&snapshot)).into_response(),
        Err(err) => err.into_html_response(),
    }
}

/// `GET /api/dashboard`: the view model as JSON.
async fn dashboard_json(
    State(state): State<AppState>,
    Query(query): Query<PatientQuery>,
) -> Result<Json<DashboardSnapshot>, WebError> {
    Ok(Json(snapshot_for(&state, &query).await?))
}

/// `GET /export`: the unmodified workbook, named after the patient. The
/// sheets are not mapped, so a workbook the dashboard rejects still downloads.
async fn export_workbook(
    State(state): State<AppState>,
    Query(query): Query<PatientQuery>,
) -> Result<Response, WebError> {
    let patient_id = state.config.resolve_patient_id(query.patient_id.as_deref());
    let patient = PatientHeader::resolve(&state.config, &patient_id);
    let bytes = state.read_bytes().await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe_file_name(&patient.export_file_name())
    );
    let disposition = HeaderValue::from_str(&disposition)
        .map_err(|err| WebError::Internal(format!("invalid export file name: {err}")))?;

    tracing::info!(patient_id = %patient_id, bytes = bytes.len(), "workbook exported");

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Keep printable ASCII only; quotes and backslashes would break the header.
fn header_safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use seizure_core::{
        CellValue, RawPatientRecord, SeizureTypeEntry, SideEffectEntry, SourceTables,
    };
    use tower::ServiceExt;

    struct StaticSource {
        tables: SourceTables,
    }

    impl WorkbookSource for StaticSource {
        fn load(&self) -> Result<SourceTables, DashboardError> {
            Ok(self.tables.clone())
        }

        fn read_bytes(&self) -> Result<Vec<u8>, DashboardError> {
            Ok(b"PK-sample-bytes".to_vec())
        }
    }

    /// Readable file whose sheets do not map.
    struct UnmappableSource;

    impl WorkbookSource for UnmappableSource {
        fn load(&self) -> Result<SourceTables, DashboardError> {
            Err(DashboardError::MissingSheet("Side Effects".into()))
        }

        fn read_bytes(&self) -> Result<Vec<u8>, DashboardError> {
            Ok(b"PK-unmappable".to_vec())
        }
    }

    struct MissingFileSource;

    impl WorkbookSource for MissingFileSource {
        fn load(&self) -> Result<SourceTables, DashboardError> {
            Err(DashboardError::Io("sample.xlsx: not found".into()))
        }

        fn read_bytes(&self) -> Result<Vec<u8>, DashboardError> {
            Err(DashboardError::Io("sample.xlsx: not found".into()))
        }
    }

    fn record(id: &str, date: &str, seizures: u32) -> RawPatientRecord {
        RawPatientRecord {
            patient_id: id.into(),
            consultation_date: CellValue::Text(date.into()),
            seizure_count: seizures,
            avg_duration_min: 2.5,
            medication_adherence_pct: 91.0,
            sudep_risk_score: 4,
        }
    }

    fn app() -> Router {
        let tables = SourceTables {
            patient_records: vec![
                record("47598", "2024-01-01", 5),
                record("47598", "2024-02-01", 3),
                record("47598", "2024-03-01", 4),
            ],
            seizure_types: vec![SeizureTypeEntry {
                patient_id: "47598".into(),
                seizure_type: "Focal".into(),
                count: 4,
            }],
            side_effects: vec![SideEffectEntry {
                patient_id: "47598".into(),
                side_effect: None,
                count: 7,
            }],
        };
        router(AppState::new(StaticSource { tables }, DashboardConfig::default()))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn page_renders_tiles_for_default_patient() {
        let response = app().oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Sri Latha"));
        assert!(html.contains("Age: 45"));
        assert!(html.contains(r#"data-metric="seizure_count""#));
        assert!(html.contains(r#"<span class="kpi-delta" data-tone="worsened">"#));
        assert!(html.contains("Seizure Type Distribution"));
    }

    #[tokio::test]
    async fn page_shows_no_data_for_unknown_patient() {
        let response = app().oneshot(get("/?patient_id=12345")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Unknown Patient"));
        assert!(html.contains("Age: N/A"));
        assert!(html.contains("No data available for this patient"));
        assert!(!html.contains(r#"<article class="kpi-tile""#));
    }

    #[tokio::test]
    async fn json_endpoint_returns_snapshot() {
        let response = app()
            .oneshot(get("/api/dashboard?patient_id=47598"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["kpis"]["status"], "ready");
        assert_eq!(value["kpis"]["tiles"][0]["delta"], 1);
        assert_eq!(value["side_effects"][0]["label"], "None");
        assert_eq!(value["side_effects"][0]["count"], 7);
    }

    #[tokio::test]
    async fn export_returns_source_bytes_named_after_patient() {
        let response = app()
            .oneshot(get("/export?patient_id=47597"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), XLSX_MIME);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"Surya Prakash_seizure_data.xlsx\""
        );
        assert_eq!(body_text(response).await, "PK-sample-bytes");
    }

    #[tokio::test]
    async fn unmappable_source_is_reported_gracefully() {
        let app = router(AppState::new(UnmappableSource, DashboardConfig::default()));

        let response = app.clone().oneshot(get("/api/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let value: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["error"]["code"], "SOURCE_INVALID");

        let response = app.oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Side Effects"));
    }

    #[tokio::test]
    async fn export_skips_sheet_mapping() {
        let app = router(AppState::new(UnmappableSource, DashboardConfig::default()));

        let response = app.oneshot(get("/export?patient_id=47598")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"Sri Latha_seizure_data.xlsx\""
        );
        assert_eq!(body_text(response).await, "PK-unmappable");
    }

    #[tokio::test]
    async fn missing_file_is_service_unavailable() {
        let app = router(AppState::new(MissingFileSource, DashboardConfig::default()));

        let response = app.clone().oneshot(get("/export")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app.oneshot(get("/api/dashboard")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let value: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(value["error"]["code"], "SOURCE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn file_names_are_header_safe() {
        assert_eq!(
            header_safe_file_name("Zoë \"Q\"_seizure_data.xlsx"),
            "Zo_ _Q__seizure_data.xlsx"
        );
    }
}
