//! Server-rendered HTML for the dashboard page.

use std::fmt::Write;

use serde_json::Value;
use seizure_core::{DashboardSnapshot, DeltaTone, KpiPanel, KpiTile, Metric};

use crate::figures::{bar_figure, line_figure, pie_figure};
use crate::styles::{DEFAULT_STYLES, STYLE_TAG_ATTRIBUTE};

const PAGE_TITLE: &str = "Seizure Management Dashboard";
const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const PLOT_SCRIPT: &str = r#"
document.querySelectorAll('[data-figure]').forEach(function (el) {
  var source = document.getElementById(el.getAttribute('data-figure'));
  if (!source || !window.Plotly) { return; }
  var figure = JSON.parse(source.textContent);
  Plotly.newPlot(el, figure.data, figure.layout, { responsive: true, displayModeBar: false });
});
"#;

pub fn render_dashboard(snapshot: &DashboardSnapshot) -> String {
    let mut body = String::new();
    push_header(&mut body, snapshot);

    match &snapshot.kpis {
        KpiPanel::Ready { tiles, .. } => {
            body.push_str(r#"<section class="kpi-row">"#);
            for tile in tiles {
                push_tile(&mut body, tile);
            }
            body.push_str("</section>");
        }
        KpiPanel::NoData => {
            let _ = write!(
                body,
                r#"<section class="dashboard-empty"><p>No data available for this patient ({}).</p></section>"#,
                escape_html(&snapshot.patient.patient_id)
            );
        }
    }

    body.push_str(r#"<section class="chart-row" data-columns="3">"#);
    for metric in [
        Metric::SeizureCount,
        Metric::AvgDuration,
        Metric::MedicationAdherence,
    ] {
        if let Some(chart) = snapshot.trend(metric) {
            push_chart(&mut body, &chart.title, &line_figure(chart));
        }
    }
    body.push_str("</section>");

    body.push_str(r#"<section class="chart-row" data-columns="2">"#);
    if let Some(chart) = snapshot.trend(Metric::SudepRisk) {
        push_chart(&mut body, &chart.title, &line_figure(chart));
    }
    push_chart(
        &mut body,
        "Seizure Type Distribution",
        &pie_figure(&snapshot.seizure_types),
    );
    body.push_str("</section>");

    body.push_str(r#"<section class="chart-row" data-columns="1">"#);
    push_chart(
        &mut body,
        "Reported Side Effects",
        &bar_figure(&snapshot.side_effects),
    );
    body.push_str("</section>");

    document(&body, true)
}

pub fn render_error(message: &str) -> String {
    let body = format!(
        r#"<header class="dashboard-title"><h1>&#9889; {PAGE_TITLE}</h1></header><section class="dashboard-error"><p>{}</p></section>"#,
        escape_html(message)
    );
    document(&body, false)
}

fn document(body: &str, with_charts: bool) -> String {
    let scripts = if with_charts {
        format!(r#"<script src="{PLOTLY_SRC}"></script><script>{PLOT_SCRIPT}</script>"#)
    } else {
        String::new()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{PAGE_TITLE}</title>
<style {STYLE_TAG_ATTRIBUTE}>{DEFAULT_STYLES}</style>
</head>
<body>
<main class="dashboard-root">{body}</main>
{scripts}
</body>
</html>
"#
    )
}

fn push_header(out: &mut String, snapshot: &DashboardSnapshot) {
    let _ = write!(
        out,
        r#"<header class="dashboard-header"><div class="dashboard-title"><h1>&#9889; {PAGE_TITLE}</h1><h3>{} &nbsp; | &nbsp; Age: {}</h3></div><a class="export-button" href="/export?patient_id={}" download="{}">Export Data</a></header>"#,
        escape_html(&snapshot.patient.name),
        escape_html(&snapshot.patient.age),
        encode_query_value(&snapshot.patient.patient_id),
        escape_html(&snapshot.export_file_name),
    );
}

fn push_tile(out: &mut String, tile: &KpiTile) {
    let _ = write!(
        out,
        r#"<article class="kpi-tile" data-metric="{}"><span class="kpi-label">{}</span><span class="kpi-value">{}</span><span class="kpi-delta" data-tone="{}">{} {}</span></article>"#,
        metric_slug(tile.metric),
        escape_html(&tile.label),
        escape_html(&tile.display_value),
        tone_slug(tile.tone),
        tone_arrow(tile),
        escape_html(&tile.display_delta),
    );
}

fn push_chart(out: &mut String, title: &str, figure: &Value) {
    let id = format!("figure-{}", slug(title));
    let _ = write!(
        out,
        r#"<section class="chart-card"><h2>{}</h2><div class="chart-plot" data-figure="{id}-data"></div><script type="application/json" id="{id}-data">{}</script></section>"#,
        escape_html(title),
        script_safe_json(figure),
    );
}

fn metric_slug(metric: Metric) -> &'static str {
    match metric {
        Metric::SeizureCount => "seizure_count",
        Metric::AvgDuration => "avg_duration",
        Metric::MedicationAdherence => "medication_adherence",
        Metric::SudepRisk => "sudep_risk",
    }
}

fn tone_slug(tone: DeltaTone) -> &'static str {
    match tone {
        DeltaTone::Improved => "improved",
        DeltaTone::Worsened => "worsened",
        DeltaTone::Unchanged => "unchanged",
    }
}

/// A delta that displays as zero gets a flat mark, whatever its raw sign.
fn tone_arrow(tile: &KpiTile) -> &'static str {
    if tile.tone == DeltaTone::Unchanged {
        "&#8722;"
    } else if tile.delta.as_f64() > 0.0 {
        "&#8593;"
    } else {
        "&#8595;"
    }
}

fn slug(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

/// JSON that cannot close the surrounding `<script>` element.
fn script_safe_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn encode_query_value(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            other => {
                let _ = write!(encoded, "%{other:02X}");
            }
        }
    }
    encoded
}
