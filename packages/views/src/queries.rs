//! Query templates for each view.
//!
//! Each `.rq` file in `packages/views/queries/` is baked into the binary at
//! compile time via [`include_str!`]. Every template declares the ontology
//! prefix through a `{{namespace}}` placeholder, bound from the endpoint
//! config.

use crime_dash_sparql::config::EndpointConfig;
use crime_dash_sparql::query::{Parameter, QueryTemplate};

/// Crime descriptions with location coordinates.
pub const HOTSPOTS: &str = include_str!("../queries/hotspots.rq");
/// Crime counts grouped by city and description.
pub const CROSS_CITY: &str = include_str!("../queries/cross_city.rq");
/// Yearly crime counts for one `{{description}}` IRI.
pub const TEMPORAL: &str = include_str!("../queries/temporal.rq");
/// Crime and arrest counts by year and description, for arrests whose status
/// is `{{arrest_status}}`.
pub const POLICE_IMPACT: &str = include_str!("../queries/police_impact.rq");

/// Wraps `text` with the endpoint's namespace already bound.
#[must_use]
pub fn template<'a>(text: &'a str, endpoint: &EndpointConfig) -> QueryTemplate<'a> {
    QueryTemplate::new(text).bind("namespace", Parameter::iri(&endpoint.namespace))
}
