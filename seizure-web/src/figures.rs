//! Plotly figure JSON for the dashboard charts.

use serde_json::{json, Value};
use seizure_core::{CategoryCount, TrendChart};

/// Plotly's qualitative "Set3" palette.
const SET3: [&str; 12] = [
    "rgb(141,211,199)",
    "rgb(255,255,179)",
    "rgb(190,186,218)",
    "rgb(251,128,114)",
    "rgb(128,177,211)",
    "rgb(253,180,98)",
    "rgb(179,222,105)",
    "rgb(252,205,229)",
    "rgb(217,217,217)",
    "rgb(188,128,189)",
    "rgb(204,235,197)",
    "rgb(255,237,111)",
];

/// Plotly's qualitative "Set2" palette.
const SET2: [&str; 8] = [
    "rgb(102,194,165)",
    "rgb(252,141,98)",
    "rgb(141,160,203)",
    "rgb(231,138,195)",
    "rgb(166,216,84)",
    "rgb(255,217,47)",
    "rgb(229,196,148)",
    "rgb(179,179,179)",
];

pub fn line_figure(chart: &TrendChart) -> Value {
    let dates: Vec<String> = chart
        .points
        .iter()
        .map(|point| point.date.format("%Y-%m-%d").to_string())
        .collect();
    let values: Vec<f64> = chart.points.iter().map(|point| point.value).collect();

    let mut xaxis = json!({ "title": { "text": "Date" }, "type": "date" });
    if let Some(domain) = chart.x_range {
        xaxis["range"] = json!([
            domain.min.format("%Y-%m-%d").to_string(),
            domain.max.format("%Y-%m-%d").to_string(),
        ]);
    }

    json!({
        "data": [{
            "type": "scatter",
            "mode": "lines+markers",
            "name": chart.y_label,
            "x": dates,
            "y": values,
            "line": { "color": chart.color, "width": 3 },
            "marker": { "color": chart.color, "size": 8 },
        }],
        "layout": {
            "xaxis": xaxis,
            "yaxis": { "title": { "text": chart.y_label } },
            "showlegend": false,
            "margin": { "l": 48, "r": 16, "t": 16, "b": 48 },
        },
    })
}

pub fn pie_figure(entries: &[CategoryCount]) -> Value {
    let labels: Vec<&str> = entries.iter().map(|entry| entry.label.as_str()).collect();
    let values: Vec<u64> = entries.iter().map(|entry| entry.count).collect();

    json!({
        "data": [{
            "type": "pie",
            "labels": labels,
            "values": values,
            "hole": 0.3,
            "textinfo": "percent+label",
            "marker": { "colors": palette(&SET3, entries.len()) },
        }],
        "layout": {
            "margin": { "l": 16, "r": 16, "t": 16, "b": 16 },
        },
    })
}

pub fn bar_figure(entries: &[CategoryCount]) -> Value {
    let labels: Vec<&str> = entries.iter().map(|entry| entry.label.as_str()).collect();
    let values: Vec<u64> = entries.iter().map(|entry| entry.count).collect();

    json!({
        "data": [{
            "type": "bar",
            "x": labels,
            "y": values,
            "text": values,
            "textposition": "outside",
            "marker": { "color": palette(&SET2, entries.len()) },
        }],
        "layout": {
            "xaxis": { "title": { "text": "" } },
            "yaxis": { "title": { "text": "Count" } },
            "showlegend": false,
            "margin": { "l": 48, "r": 16, "t": 24, "b": 48 },
        },
    })
}

fn palette(colors: &[&'static str], len: usize) -> Vec<&'static str> {
    colors.iter().copied().cycle().take(len).collect()
}
