//! Temporal analysis: yearly counts for one crime description.
//!
//! It first loads the default description and queries again whenever the
//! user submits a new one. The description is uppercased and bound into
//! the query as an IRI in the ontology namespace.

use crime_dash_sparql::QueryError;
use crime_dash_sparql::config::EndpointConfig;
use crime_dash_sparql::query::Parameter;
use crime_dash_views_models::{
    ChartData, Dataset, FieldSpec, NormalizedRecord, Table, TemporalFilter, TemporalTrend,
    ViewKind,
};

use crate::View;
use crate::aggregate::{project, year_bounded_sorted};
use crate::queries;

/// Earliest year plotted on the trend chart.
pub const MIN_YEAR: i64 = 2010;

/// The temporal analysis view.
#[derive(Debug, Clone, Copy)]
pub struct Temporal;

impl Temporal {
    /// The description as it is bound into the query: trimmed, uppercased,
    /// and falling back to the default when blank.
    #[must_use]
    pub fn query_description(filter: &TemporalFilter) -> String {
        let trimmed = filter.description.trim();
        if trimmed.is_empty() {
            TemporalFilter::DEFAULT_DESCRIPTION.to_string()
        } else {
            trimmed.to_uppercase()
        }
    }
}

impl View for Temporal {
    const KIND: ViewKind = ViewKind::Temporal;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("description", "crm_cd_desc"),
        // Kept as text: the chart reads the leading integer, the table the raw value.
        FieldSpec::text("year", "crime_year"),
        FieldSpec::integer("crime_count", "crimeCount"),
    ];

    type Filter = TemporalFilter;
    type Derived = TemporalTrend;

    fn query(endpoint: &EndpointConfig, filter: &TemporalFilter) -> Result<String, QueryError> {
        let description = Self::query_description(filter);
        queries::template(queries::TEMPORAL, endpoint)
            .bind(
                "description",
                Parameter::namespaced(&endpoint.namespace, &description),
            )
            .render()
    }

    fn derive(records: &[NormalizedRecord], filter: &TemporalFilter) -> TemporalTrend {
        let trend = project(
            year_bounded_sorted(records, "year", MIN_YEAR),
            "year",
            "crime_count",
        );

        let mut table = Table::new(&["Description", "Year", "Crime Count"]);
        for record in records {
            table.push_row(vec![
                record.text("description").to_string(),
                record.text("year").to_string(),
                record.text("crime_count").to_string(),
            ]);
        }

        TemporalTrend {
            title: Self::query_description(filter),
            chart: ChartData {
                labels: trend.labels,
                datasets: vec![Dataset {
                    label: "Number of Crimes".to_string(),
                    data: trend.values,
                    border_color: "rgba(75, 192, 192, 1)".to_string(),
                    background_color: "rgba(75, 192, 192, 0.2)".to_string(),
                    border_width: None,
                    tension: Some(0.4),
                }],
            },
            table,
        }
    }
}
