#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Types shared by the crime dashboard views.
//!
//! A view turns raw SPARQL rows into [`NormalizedRecord`]s (via a
//! [`FieldSpec`] list), then derives presentation data from those records
//! and the user's filter selection. Everything here is plain data; the
//! logic lives in `crime_dash_views`.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The four dashboard views.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ViewKind {
    /// Crime locations on a map.
    Hotspots,
    /// Crime counts per city and description.
    CrossCity,
    /// Yearly counts for one crime description.
    Temporal,
    /// Arrest counts per description for one year.
    PoliceImpact,
}

impl ViewKind {
    /// All views in menu order.
    pub const ALL: &[Self] = &[
        Self::Hotspots,
        Self::CrossCity,
        Self::Temporal,
        Self::PoliceImpact,
    ];

    /// Heading shown above the view.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Hotspots => "Crime Location Map",
            Self::CrossCity => "Cross-City Crime Comparison",
            Self::Temporal => "Crime Trends Over Time",
            Self::PoliceImpact => "Crime Arrest Count by Description",
        }
    }
}

// ── Normalization ────────────────────────────────────────────────────────

/// How a normalized field is interpreted after decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Kept as decoded text.
    Text,
    /// Decoded text parsed as an integer.
    Integer,
    /// Decoded text parsed as a float.
    Float,
}

/// Maps one output key to the SPARQL variable it is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the normalized record.
    pub key: &'static str,
    /// Source variable name in the result binding (without `?`).
    pub variable: &'static str,
    /// Interpretation of the decoded value.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// A text field.
    #[must_use]
    pub const fn text(key: &'static str, variable: &'static str) -> Self {
        Self {
            key,
            variable,
            kind: FieldKind::Text,
        }
    }

    /// An integer field.
    #[must_use]
    pub const fn integer(key: &'static str, variable: &'static str) -> Self {
        Self {
            key,
            variable,
            kind: FieldKind::Integer,
        }
    }

    /// A float field.
    #[must_use]
    pub const fn float(key: &'static str, variable: &'static str) -> Self {
        Self {
            key,
            variable,
            kind: FieldKind::Float,
        }
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Decoded text.
    Text(String),
    /// Decoded text plus its parsed value. `value` is `NaN` when the text
    /// did not parse.
    Number {
        /// The decoded text the number was parsed from.
        text: String,
        /// Parsed value, or `NaN`.
        value: f64,
    },
}

impl FieldValue {
    /// The decoded text, regardless of kind.
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Number { text, .. } => text,
        }
    }

    /// The parsed number, or `NaN` for text fields.
    #[must_use]
    pub const fn as_number(&self) -> f64 {
        match self {
            Self::Text(_) => f64::NAN,
            Self::Number { value, .. } => *value,
        }
    }
}

/// One result row after decoding, keyed by output key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    fields: Vec<(&'static str, FieldValue)>,
}

impl NormalizedRecord {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Sets `key` to `value`, replacing any earlier value.
    pub fn insert(&mut self, key: &'static str, value: FieldValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    /// Builder-style [`Self::insert`] of a text value.
    #[must_use]
    pub fn with_text(mut self, key: &'static str, text: impl Into<String>) -> Self {
        self.insert(key, FieldValue::Text(text.into()));
        self
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Decoded text for `key`, or `""` if absent.
    #[must_use]
    pub fn text(&self, key: &str) -> &str {
        self.get(key).map_or("", FieldValue::as_text)
    }

    /// Parsed number for `key`, or `NaN` if absent or not numeric.
    #[must_use]
    pub fn number(&self, key: &str) -> f64 {
        self.get(key).map_or(f64::NAN, FieldValue::as_number)
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (*k, v))
    }
}

/// A field that failed numeric parsing. Non-fatal: the field becomes `NaN`
/// and is left out of charts but stays in tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Index of the row in the result set.
    pub row: usize,
    /// Output key of the field.
    pub key: &'static str,
    /// The decoded text that failed to parse.
    pub raw: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: field {:?} is not numeric ({:?})",
            self.row, self.key, self.raw
        )
    }
}

/// The output of normalizing one result set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Records in result-set order.
    pub records: Vec<NormalizedRecord>,
    /// Numeric parse failures encountered along the way.
    pub warnings: Vec<ParseWarning>,
}

// ── View state ───────────────────────────────────────────────────────────

/// Load state of a single view.
///
/// `Idle → Loading → Ready | Failed`. Only an explicit fetch moves a view
/// out of `Ready` or `Failed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState<T> {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Ready(T),
    /// The last fetch failed; holds the user-facing message.
    Failed(String),
}

impl<T> ViewState<T> {
    /// Returns `true` while a fetch is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded value, if ready.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ── Filters ──────────────────────────────────────────────────────────────

/// Cross-city filter: the selected crime description. Empty means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossCityFilter {
    /// Selected crime description, or `""` for all.
    pub description: String,
}

/// Temporal filter: the crime description the query is run for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalFilter {
    /// Free-text description; uppercased before it is bound into the query.
    pub description: String,
}

impl TemporalFilter {
    /// Description used when the user has not typed one.
    pub const DEFAULT_DESCRIPTION: &'static str = "THEFT";
}

impl Default for TemporalFilter {
    fn default() -> Self {
        Self {
            description: Self::DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Police impact filter: the year to chart, matched as an exact string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoliceImpactFilter {
    /// Year text as typed by the user.
    pub year: String,
}

/// Hotspots have no user filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoFilter;

// ── Presentation shapes ──────────────────────────────────────────────────

/// A plain-string table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Column headings.
    pub headers: Vec<String>,
    /// Row cells, one `Vec` per row, same length as `headers`.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a table with the given headings and no rows.
    #[must_use]
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Returns `true` if there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One series in a chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Legend label.
    pub label: String,
    /// Values, parallel to [`ChartData::labels`].
    pub data: Vec<f64>,
    /// Line / bar outline color.
    pub border_color: String,
    /// Fill color.
    pub background_color: String,
    /// Bar outline width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    /// Line curve tension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

/// Chart-ready labels and series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    /// Category axis labels.
    pub labels: Vec<String>,
    /// Series plotted against `labels`.
    pub datasets: Vec<Dataset>,
}

impl ChartData {
    /// Returns `true` if there is nothing to plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A crime location marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotMarker {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lng: f64,
    /// Location name.
    pub location: String,
    /// Crime description.
    pub descr: String,
}

/// Derived hotspot map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotMap {
    /// Map center as `(lat, lng)`.
    pub center: (f64, f64),
    /// Plottable markers.
    pub markers: Vec<HotspotMarker>,
    /// Number of records dropped for lacking finite coordinates.
    pub unplottable: usize,
}

/// Derived cross-city comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossCityTable {
    /// Dropdown choices: distinct descriptions in first-seen order.
    pub descriptions: Vec<String>,
    /// The active selection (`""` for all).
    pub selected: String,
    /// City / description / count rows matching the selection.
    pub table: Table,
}

/// Derived temporal trend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalTrend {
    /// Chart title (the queried description).
    pub title: String,
    /// Counts per year, years at or after the cutoff, ascending.
    pub chart: ChartData,
    /// Every fetched row.
    pub table: Table,
}

/// Derived police impact breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrestBreakdown {
    /// Chart and table title.
    pub title: String,
    /// Arrest counts per description for the selected year.
    pub chart: ChartData,
    /// Description / arrest count rows for the selected year.
    pub table: Table,
}

/// Anything a view derives, so callers can show "no data" messaging.
pub trait DerivedView {
    /// Returns `true` if there is nothing to show for the current filter.
    fn is_empty(&self) -> bool;

    /// Message shown when [`Self::is_empty`] is `true`.
    fn empty_message(&self) -> &'static str {
        "No data available for the current selection."
    }
}

impl DerivedView for HotspotMap {
    fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn empty_message(&self) -> &'static str {
        "No crime locations to show."
    }
}

impl DerivedView for CrossCityTable {
    fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl DerivedView for TemporalTrend {
    fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn empty_message(&self) -> &'static str {
        "No data available for this crime description."
    }
}

impl DerivedView for ArrestBreakdown {
    fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn empty_message(&self) -> &'static str {
        "No data available for the selected year."
    }
}
