#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The four crime dashboard views and the logic they share.
//!
//! Each view implements [`View`]: it names its query template, the fields
//! it reads from each result row, and how to derive presentation data from
//! the normalized records plus the user's filter. [`session::ViewSession`]
//! drives the fetch lifecycle and guards against stale responses.
//!
//! Derivation is a pure function of `(records, filter)` and is recomputed
//! in full whenever either changes.

pub mod aggregate;
pub mod cross_city;
pub mod hotspots;
pub mod normalize;
pub mod police_impact;
pub mod queries;
pub mod session;
pub mod temporal;

use crime_dash_sparql::config::EndpointConfig;
use crime_dash_sparql::{FetchError, QueryError};
use crime_dash_views_models::{DerivedView, FieldSpec, NormalizedRecord, ViewKind};

pub use cross_city::CrossCity;
pub use hotspots::Hotspots;
pub use police_impact::PoliceImpact;
pub use temporal::Temporal;

/// Errors from loading a view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The query template could not be rendered.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The endpoint request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A dashboard view.
pub trait View {
    /// Which view this is.
    const KIND: ViewKind;

    /// Fields read from each result row.
    const FIELDS: &'static [FieldSpec];

    /// User-controlled filter state.
    type Filter: Clone + Default + std::fmt::Debug;

    /// Presentation data derived from records and filter.
    type Derived: DerivedView;

    /// Renders the query to run for `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the template cannot be rendered.
    fn query(endpoint: &EndpointConfig, filter: &Self::Filter) -> Result<String, QueryError>;

    /// Derives presentation data. Must not depend on anything but its
    /// arguments.
    fn derive(records: &[NormalizedRecord], filter: &Self::Filter) -> Self::Derived;
}
