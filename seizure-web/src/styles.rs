/// Marker attribute on the injected `<style>` element.
pub const STYLE_TAG_ATTRIBUTE: &str = "data-seizure-dashboard";

/// Default CSS for the dashboard along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --dashboard-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --dashboard-bg: #f8fafc;
  --dashboard-card-bg: #ffffff;
  --dashboard-card-border: rgba(148, 163, 184, 0.28);
  --dashboard-radius: 16px;
  --dashboard-text: #1f2933;
  --dashboard-muted: #555555;
  --dashboard-heading: #11181c;
  --dashboard-accent: #2563eb;
  --dashboard-improved: #09ab3b;
  --dashboard-improved-bg: rgba(9, 171, 59, 0.12);
  --dashboard-worsened: #ff2b2b;
  --dashboard-worsened-bg: rgba(255, 43, 43, 0.12);
  --dashboard-unchanged: #475467;
  --dashboard-unchanged-bg: rgba(71, 84, 103, 0.12);
}

body {
  margin: 0;
  background: var(--dashboard-bg);
}

.dashboard-root {
  font-family: var(--dashboard-font-family);
  color: var(--dashboard-text);
  display: flex;
  flex-direction: column;
  gap: 24px;
  padding: 28px;
  max-width: 1440px;
  margin: 0 auto;
}

.dashboard-header {
  display: grid;
  grid-template-columns: 4fr 1fr;
  align-items: end;
  gap: 18px;
}

.dashboard-title {
  text-align: center;
}

.dashboard-title h1 {
  margin-bottom: 0;
  color: var(--dashboard-heading);
}

.dashboard-title h3 {
  color: var(--dashboard-muted);
  margin-top: 5px;
  font-weight: 500;
}

.export-button {
  justify-self: end;
  display: inline-block;
  padding: 10px 18px;
  border-radius: 10px;
  border: 1px solid var(--dashboard-card-border);
  background: var(--dashboard-card-bg);
  color: var(--dashboard-heading);
  font-weight: 600;
  text-decoration: none;
}

.export-button:hover {
  border-color: var(--dashboard-accent);
  color: var(--dashboard-accent);
}

.kpi-row {
  display: grid;
  grid-template-columns: repeat(4, minmax(0, 1fr));
  gap: 18px;
}

.kpi-tile {
  background: var(--dashboard-card-bg);
  border: 1px solid var(--dashboard-card-border);
  border-radius: var(--dashboard-radius);
  padding: 18px 20px;
  display: flex;
  flex-direction: column;
  gap: 6px;
}

.kpi-label {
  font-size: 0.9rem;
  color: var(--dashboard-muted);
}

.kpi-value {
  font-size: 2rem;
  font-weight: 600;
  font-variant-numeric: tabular-nums;
}

.kpi-delta {
  align-self: flex-start;
  border-radius: 999px;
  padding: 2px 10px;
  font-size: 0.85rem;
  font-weight: 600;
  font-variant-numeric: tabular-nums;
}

.kpi-delta[data-tone="improved"] {
  color: var(--dashboard-improved);
  background: var(--dashboard-improved-bg);
}

.kpi-delta[data-tone="worsened"] {
  color: var(--dashboard-worsened);
  background: var(--dashboard-worsened-bg);
}

.kpi-delta[data-tone="unchanged"] {
  color: var(--dashboard-unchanged);
  background: var(--dashboard-unchanged-bg);
}

.dashboard-empty,
.dashboard-error {
  background: var(--dashboard-card-bg);
  border: 1px dashed var(--dashboard-card-border);
  border-radius: var(--dashboard-radius);
  padding: 28px;
  text-align: center;
  color: var(--dashboard-muted);
}

.dashboard-error {
  border-color: var(--dashboard-worsened);
  color: var(--dashboard-worsened);
}

.chart-row {
  display: grid;
  gap: 18px;
}

.chart-row[data-columns="3"] {
  grid-template-columns: repeat(3, minmax(0, 1fr));
}

.chart-row[data-columns="2"] {
  grid-template-columns: repeat(2, minmax(0, 1fr));
}

.chart-card {
  background: var(--dashboard-card-bg);
  border: 1px solid var(--dashboard-card-border);
  border-radius: var(--dashboard-radius);
  padding: 16px;
}

.chart-card h2 {
  margin: 0 0 8px;
  font-size: 1.1rem;
  color: var(--dashboard-heading);
}

.chart-plot {
  width: 100%;
  min-height: 320px;
}

@media (max-width: 1080px) {
  .kpi-row,
  .chart-row[data-columns="3"],
  .chart-row[data-columns="2"] {
    grid-template-columns: repeat(2, minmax(0, 1fr));
  }
}

@media (max-width: 640px) {
  .dashboard-root {
    padding: 18px;
  }

  .dashboard-header,
  .kpi-row,
  .chart-row[data-columns="3"],
  .chart-row[data-columns="2"] {
    grid-template-columns: 1fr;
  }

  .export-button {
    justify-self: stretch;
    text-align: center;
  }
}
"#;
