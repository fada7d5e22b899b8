//! Police impact: arrest counts per crime description for a chosen year.

use crime_dash_sparql::QueryError;
use crime_dash_sparql::config::EndpointConfig;
use crime_dash_sparql::query::Parameter;
use crime_dash_views_models::{
    ArrestBreakdown, ChartData, Dataset, FieldSpec, NormalizedRecord, PoliceImpactFilter, Table,
    ViewKind,
};

use crate::View;
use crate::aggregate::{chart_for_year, records_for_year};
use crate::queries;

/// Arrest status literal counted as an arrest.
pub const ARREST_STATUS: &str = "True";

/// The police impact view.
#[derive(Debug, Clone, Copy)]
pub struct PoliceImpact;

impl View for PoliceImpact {
    const KIND: ViewKind = ViewKind::PoliceImpact;

    // `year` stays text: the year filter is an exact string match.
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("year", "year"),
        FieldSpec::text("code", "crm_cd"),
        FieldSpec::text("description", "crm_cd_desc"),
        FieldSpec::integer("crime_count", "crimeCount"),
        FieldSpec::integer("arrest_count", "arrestCount"),
    ];

    type Filter = PoliceImpactFilter;
    type Derived = ArrestBreakdown;

    fn query(
        endpoint: &EndpointConfig,
        _filter: &PoliceImpactFilter,
    ) -> Result<String, QueryError> {
        queries::template(queries::POLICE_IMPACT, endpoint)
            .bind("arrest_status", Parameter::literal(ARREST_STATUS))
            .render()
    }

    fn derive(records: &[NormalizedRecord], filter: &PoliceImpactFilter) -> ArrestBreakdown {
        let mut table = Table::new(&["Crime Description", "Arrest Count"]);
        for record in records_for_year(records, "year", &filter.year) {
            table.push_row(vec![
                record.text("description").to_string(),
                record.text("arrest_count").to_string(),
            ]);
        }

        let projection = chart_for_year(
            records,
            "year",
            &filter.year,
            "description",
            "arrest_count",
        );

        ArrestBreakdown {
            title: format!(
                "Arrest Counts by Crime Description for Year {}",
                filter.year
            ),
            chart: ChartData {
                labels: projection.labels,
                datasets: vec![Dataset {
                    label: "Arrest Count".to_string(),
                    data: projection.values,
                    border_color: "rgba(75, 192, 192, 1)".to_string(),
                    background_color: "rgba(75, 192, 192, 0.2)".to_string(),
                    border_width: Some(1),
                    tension: None,
                }],
            },
            table,
        }
    }
}
