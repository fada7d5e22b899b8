//! Cross-city comparison: crime counts per city and description, filterable
//! by description.

use crime_dash_sparql::QueryError;
use crime_dash_sparql::config::EndpointConfig;
use crime_dash_views_models::{
    CrossCityFilter, CrossCityTable, FieldSpec, NormalizedRecord, Table, ViewKind,
};

use crate::View;
use crate::aggregate::{distinct_values, filter_eq};
use crate::queries;

/// The cross-city comparison view.
#[derive(Debug, Clone, Copy)]
pub struct CrossCity;

impl View for CrossCity {
    const KIND: ViewKind = ViewKind::CrossCity;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("city", "city"),
        FieldSpec::text("description", "crm_cd_desc"),
        FieldSpec::integer("crime_count", "crimeCount"),
    ];

    type Filter = CrossCityFilter;
    type Derived = CrossCityTable;

    fn query(endpoint: &EndpointConfig, _filter: &CrossCityFilter) -> Result<String, QueryError> {
        queries::template(queries::CROSS_CITY, endpoint).render()
    }

    fn derive(records: &[NormalizedRecord], filter: &CrossCityFilter) -> CrossCityTable {
        let mut table = Table::new(&["City", "Crime Description", "Crime Count"]);
        for record in filter_eq(records, "description", &filter.description) {
            table.push_row(vec![
                record.text("city").to_string(),
                record.text("description").to_string(),
                record.text("crime_count").to_string(),
            ]);
        }

        CrossCityTable {
            descriptions: distinct_values(records, "description"),
            selected: filter.description.clone(),
            table,
        }
    }
}

#[cfg(test)]
mod tests {
    use crime_dash_sparql_models::{Binding, Term};

    use super::*;
    use crate::normalize::normalize;

    fn records() -> Vec<NormalizedRecord> {
        let rows: Vec<Binding> = [
            ("http://x/ns#Chicago", "http://x/ns#THEFT", "120"),
            ("http://x/ns#Los%20Angeles", "http://x/ns#THEFT", "95"),
            ("http://x/ns#Chicago", "http://x/ns#VEHICLE%20-%20STOLEN", "60"),
            ("http://x/ns#Boston", "http://x/ns#ARSON", "n/a"),
        ]
        .iter()
        .map(|(city, desc, count)| {
            Binding::new()
                .with("city", Term::uri(*city))
                .with("crm_cd_desc", Term::uri(*desc))
                .with("crimeCount", Term::literal(*count))
        })
        .collect();
        normalize(&rows, CrossCity::FIELDS).records
    }

    #[test]
    fn dropdown_lists_distinct_descriptions() {
        let derived = CrossCity::derive(&records(), &CrossCityFilter::default());
        assert_eq!(
            derived.descriptions,
            vec!["THEFT", "VEHICLE - STOLEN", "ARSON"]
        );
    }

    #[test]
    fn empty_selection_shows_everything() {
        let derived = CrossCity::derive(&records(), &CrossCityFilter::default());
        assert_eq!(derived.table.rows.len(), 4);
        assert_eq!(derived.table.rows[1], vec!["Los Angeles", "THEFT", "95"]);
        // Unparseable counts stay in the table as text.
        assert_eq!(derived.table.rows[3], vec!["Boston", "ARSON", "n/a"]);
    }

    #[test]
    fn selection_filters_rows() {
        let filter = CrossCityFilter {
            description: "THEFT".to_string(),
        };
        let derived = CrossCity::derive(&records(), &filter);
        let cities: Vec<&str> = derived.table.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(cities, vec!["Chicago", "Los Angeles"]);
        assert_eq!(derived.selected, "THEFT");
        // Dropdown is always built from the full set.
        assert_eq!(derived.descriptions.len(), 3);
    }

    #[test]
    fn unknown_selection_is_empty_not_an_error() {
        let filter = CrossCityFilter {
            description: "JAYWALKING".to_string(),
        };
        let derived = CrossCity::derive(&records(), &filter);
        assert!(derived.table.is_empty());
    }
}
