//! Client-side filtering and chart projection.
//!
//! All functions are pure: they borrow the full record set and return new
//! collections without touching the input.

use std::collections::BTreeSet;

use crime_dash_views_models::NormalizedRecord;

/// Parallel label / value arrays ready for a chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Projection {
    /// Category labels.
    pub labels: Vec<String>,
    /// Values, one per label.
    pub values: Vec<f64>,
}

impl Projection {
    /// Returns `true` if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Distinct non-empty values of `key`, in first-seen order.
#[must_use]
pub fn distinct_values(records: &[NormalizedRecord], key: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .map(|record| record.text(key))
        .filter(|value| !value.is_empty() && seen.insert(*value))
        .map(ToString::to_string)
        .collect()
}

/// Records whose `key` equals `target`. An empty `target` keeps every
/// record.
#[must_use]
pub fn filter_eq<'a>(
    records: &'a [NormalizedRecord],
    key: &str,
    target: &str,
) -> Vec<&'a NormalizedRecord> {
    records
        .iter()
        .filter(|record| target.is_empty() || record.text(key) == target)
        .collect()
}

/// Reads the year from the leading integer of `text`: optional sign, then
/// digits, ignoring whatever follows. `"2012"`, `"2012.0"` and
/// `"2012-05-01"` all give 2012; text with no leading digits gives `None`.
#[must_use]
pub fn parse_year(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let year: i64 = unsigned[..end].parse().ok()?;
    Some(if negative { -year } else { year })
}

/// Records whose `year_key` parses to a year `>= min_year`, sorted
/// ascending by year. Records with the same year keep their input order.
#[must_use]
pub fn year_bounded_sorted<'a>(
    records: &'a [NormalizedRecord],
    year_key: &str,
    min_year: i64,
) -> Vec<&'a NormalizedRecord> {
    let mut kept: Vec<(i64, &NormalizedRecord)> = records
        .iter()
        .filter_map(|record| {
            parse_year(record.text(year_key))
                .filter(|year| *year >= min_year)
                .map(|year| (year, record))
        })
        .collect();

    // `sort_by_key` is stable.
    kept.sort_by_key(|(year, _)| *year);

    kept.into_iter().map(|(_, record)| record).collect()
}

/// Records whose `year_key` text is exactly `year`.
///
/// No numeric normalization happens: `"2020.0"` does not match `"2020"`.
/// An empty `year` selects nothing.
#[must_use]
pub fn records_for_year<'a>(
    records: &'a [NormalizedRecord],
    year_key: &str,
    year: &str,
) -> Vec<&'a NormalizedRecord> {
    if year.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|record| record.text(year_key) == year)
        .collect()
}

/// Projects records onto `label_key` / `value_key`. Points whose value is
/// not a finite number are left out.
#[must_use]
pub fn project<'a>(
    records: impl IntoIterator<Item = &'a NormalizedRecord>,
    label_key: &str,
    value_key: &str,
) -> Projection {
    let mut projection = Projection::default();
    for record in records {
        let value = record.number(value_key);
        if !value.is_finite() {
            log::debug!(
                "Skipping unplottable point {:?} ({value_key} = {:?})",
                record.text(label_key),
                record.text(value_key)
            );
            continue;
        }
        projection.labels.push(record.text(label_key).to_string());
        projection.values.push(value);
    }
    projection
}

/// Chart projection of the records whose `year_key` is exactly `year`.
#[must_use]
pub fn chart_for_year(
    records: &[NormalizedRecord],
    year_key: &str,
    year: &str,
    label_key: &str,
    value_key: &str,
) -> Projection {
    project(
        records_for_year(records, year_key, year),
        label_key,
        value_key,
    )
}
