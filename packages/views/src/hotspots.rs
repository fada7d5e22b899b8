//! Crime hotspots: every crime location with its description, for a map.

use crime_dash_sparql::QueryError;
use crime_dash_sparql::config::EndpointConfig;
use crime_dash_views_models::{
    FieldSpec, HotspotMap, HotspotMarker, NoFilter, NormalizedRecord, ViewKind,
};

use crate::View;
use crate::queries;

/// Map center used when no record has usable coordinates (Chicago).
pub const DEFAULT_CENTER: (f64, f64) = (41.85, -87.65);

/// The crime hotspots view.
#[derive(Debug, Clone, Copy)]
pub struct Hotspots;

impl View for Hotspots {
    const KIND: ViewKind = ViewKind::Hotspots;

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("location", "location"),
        FieldSpec::float("lat", "latitude"),
        FieldSpec::float("lng", "longitude"),
        FieldSpec::text("descr", "crm_cd_desc"),
    ];

    type Filter = NoFilter;
    type Derived = HotspotMap;

    fn query(endpoint: &EndpointConfig, _filter: &NoFilter) -> Result<String, QueryError> {
        queries::template(queries::HOTSPOTS, endpoint).render()
    }

    fn derive(records: &[NormalizedRecord], _filter: &NoFilter) -> HotspotMap {
        let markers: Vec<HotspotMarker> = records.iter().filter_map(marker).collect();
        let unplottable = records.len() - markers.len();
        if unplottable > 0 {
            log::debug!("{unplottable} hotspot record(s) lack finite coordinates");
        }

        let center = markers
            .first()
            .map_or(DEFAULT_CENTER, |first| (first.lat, first.lng));

        HotspotMap {
            center,
            markers,
            unplottable,
        }
    }
}

fn marker(record: &NormalizedRecord) -> Option<HotspotMarker> {
    let lat = record.number("lat");
    let lng = record.number("lng");
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    Some(HotspotMarker {
        lat,
        lng,
        location: record.text("location").to_string(),
        descr: record.text("descr").to_string(),
    })
}
