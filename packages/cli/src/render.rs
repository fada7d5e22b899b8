//! Terminal and JSON output for derived views.

use comfy_table::{ContentArrangement, Table};
use crime_dash_views_models::{
    ArrestBreakdown, ChartData, CrossCityTable, DerivedView, HotspotMap, TemporalTrend,
};
use serde::Serialize;

/// Markers listed in text output; the full set is available with `--json`.
pub const MAX_LISTED_MARKERS: usize = 25;

/// Plain-text rendering of a derived view.
pub trait RenderText {
    /// Heading printed above the view.
    fn heading(&self) -> String;

    /// Body printed when the view has data.
    fn body(&self) -> String;
}

/// Renders `derived` as pretty JSON, or as text with a "no data" message
/// when there is nothing to show.
///
/// # Errors
///
/// Returns [`serde_json::Error`] if JSON serialization fails.
pub fn render<D>(derived: &D, json: bool) -> Result<String, serde_json::Error>
where
    D: RenderText + DerivedView + Serialize,
{
    if json {
        return serde_json::to_string_pretty(derived);
    }

    let body = if derived.is_empty() {
        derived.empty_message().to_string()
    } else {
        derived.body()
    };
    Ok(format!("{}\n\n{body}", derived.heading()))
}

/// Lays out `rows` under `headers` as a terminal table.
fn table_text<S: ToString>(headers: &[S], rows: &[Vec<String>]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.iter().map(ToString::to_string));
    for row in rows {
        table.add_row(row);
    }
    table.to_string()
}

/// Renders the first dataset of `chart` as a two-column table.
fn chart_table(axis: &str, chart: &ChartData) -> String {
    let Some(dataset) = chart.datasets.first() else {
        return String::new();
    };
    let rows: Vec<Vec<String>> = chart
        .labels
        .iter()
        .zip(&dataset.data)
        .map(|(label, value)| vec![label.clone(), value.to_string()])
        .collect();
    table_text(&[axis, dataset.label.as_str()], &rows)
}

impl RenderText for HotspotMap {
    fn heading(&self) -> String {
        format!(
            "Crime Location Map (center {:.4}, {:.4})",
            self.center.0, self.center.1
        )
    }

    fn body(&self) -> String {
        let rows: Vec<Vec<String>> = self
            .markers
            .iter()
            .take(MAX_LISTED_MARKERS)
            .map(|m| {
                vec![
                    m.location.clone(),
                    m.descr.clone(),
                    format!("{:.5}", m.lat),
                    format!("{:.5}", m.lng),
                ]
            })
            .collect();

        let mut out = format!(
            "{} crime locations ({} without coordinates)\n\n",
            self.markers.len(),
            self.unplottable
        );
        out.push_str(&table_text(
            &["Location", "Crime Description", "Latitude", "Longitude"],
            &rows,
        ));
        if self.markers.len() > MAX_LISTED_MARKERS {
            out.push_str(&format!(
                "\n... and {} more (use --json for all)",
                self.markers.len() - MAX_LISTED_MARKERS
            ));
        }
        out
    }
}

impl RenderText for CrossCityTable {
    fn heading(&self) -> String {
        let selection = if self.selected.is_empty() {
            "All"
        } else {
            self.selected.as_str()
        };
        format!("Cross-City Crime Comparison ({selection})")
    }

    fn body(&self) -> String {
        table_text(&self.table.headers, &self.table.rows)
    }
}

impl RenderText for TemporalTrend {
    fn heading(&self) -> String {
        format!("Crime Trend: {}", self.title)
    }

    fn body(&self) -> String {
        let mut out = String::new();
        if !self.chart.is_empty() {
            out.push_str(&chart_table("Year", &self.chart));
            out.push_str("\n\n");
        }
        out.push_str(&table_text(&self.table.headers, &self.table.rows));
        out
    }
}

impl RenderText for ArrestBreakdown {
    fn heading(&self) -> String {
        self.title.clone()
    }

    fn body(&self) -> String {
        table_text(&self.table.headers, &self.table.rows)
    }
}
