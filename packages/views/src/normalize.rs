//! Row normalization.
//!
//! Maps raw result rows through [`decode`] into [`NormalizedRecord`]s.
//! Numeric fields that fail to parse become `NaN` and are reported as
//! [`ParseWarning`]s; nothing here aborts on bad data.

use crime_dash_sparql::decode::decode;
use crime_dash_sparql_models::Binding;
use crime_dash_views_models::{
    FieldKind, FieldSpec, FieldValue, Normalized, NormalizedRecord, ParseWarning,
};

/// Normalizes `bindings` according to `fields`, preserving row order.
///
/// Unbound variables decode to `""` (and `NaN` for numeric fields).
#[must_use]
pub fn normalize(bindings: &[Binding], fields: &[FieldSpec]) -> Normalized {
    let mut warnings = Vec::new();

    let records = bindings
        .iter()
        .enumerate()
        .map(|(row, binding)| {
            let mut record = NormalizedRecord::new();
            for spec in fields {
                let text = decode(binding.value(spec.variable));
                let value = match spec.kind {
                    FieldKind::Text => FieldValue::Text(text),
                    FieldKind::Integer | FieldKind::Float => {
                        let parsed = parse_number(&text, spec.kind);
                        if parsed.is_none() {
                            warnings.push(ParseWarning {
                                row,
                                key: spec.key,
                                raw: text.clone(),
                            });
                        }
                        FieldValue::Number {
                            text,
                            value: parsed.unwrap_or(f64::NAN),
                        }
                    }
                };
                record.insert(spec.key, value);
            }
            record
        })
        .collect::<Vec<_>>();

    if let Some(first) = warnings.first() {
        log::warn!(
            "{} numeric field(s) could not be parsed across {} rows (first: {first})",
            warnings.len(),
            records.len()
        );
    }

    Normalized { records, warnings }
}

#[allow(clippy::cast_precision_loss)]
fn parse_number(text: &str, kind: FieldKind) -> Option<f64> {
    let trimmed = text.trim();
    match kind {
        FieldKind::Integer => trimmed.parse::<i64>().ok().map(|v| v as f64),
        FieldKind::Float => trimmed.parse::<f64>().ok().filter(|v| v.is_finite()),
        FieldKind::Text => None,
    }
}

#[cfg(test)]
mod tests {
    use crime_dash_sparql_models::Term;

    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("location", "location"),
        FieldSpec::float("lat", "latitude"),
        FieldSpec::integer("count", "crimeCount"),
    ];

    #[test]
    fn decodes_every_declared_field() {
        let rows = vec![
            Binding::new()
                .with("location", Term::uri("http://example.org/ns#Main%20St"))
                .with("latitude", Term::literal("34.05"))
                .with("crimeCount", Term::literal("12"))
                .with("ignored", Term::literal("x")),
        ];

        let normalized = normalize(&rows, FIELDS);
        assert!(normalized.warnings.is_empty());

        let record = &normalized.records[0];
        assert_eq!(record.text("location"), "Main St");
        assert!((record.number("lat") - 34.05).abs() < f64::EPSILON);
        assert!((record.number("count") - 12.0).abs() < f64::EPSILON);
        assert_eq!(record.text("count"), "12");
        assert!(record.get("ignored").is_none());
    }

    #[test]
    fn missing_variables_become_empty_and_nan() {
        let normalized = normalize(&[Binding::new()], FIELDS);
        let record = &normalized.records[0];
        assert_eq!(record.text("location"), "");
        assert!(record.number("lat").is_nan());
        assert!(record.number("count").is_nan());
        assert_eq!(normalized.warnings.len(), 2);
    }

    #[test]
    fn bad_numbers_produce_warnings_not_errors() {
        let rows = vec![
            Binding::new().with("crimeCount", Term::literal("7")),
            Binding::new().with("crimeCount", Term::literal("seven")),
            Binding::new().with("crimeCount", Term::literal("2020.0")),
        ];
        let normalized = normalize(&rows, &[FieldSpec::integer("count", "crimeCount")]);

        assert_eq!(normalized.records.len(), 3);
        assert!((normalized.records[0].number("count") - 7.0).abs() < f64::EPSILON);
        assert!(normalized.records[1].number("count").is_nan());
        assert_eq!(normalized.records[1].text("count"), "seven");
        assert!(normalized.records[2].number("count").is_nan());

        let rows_warned: Vec<usize> = normalized.warnings.iter().map(|w| w.row).collect();
        assert_eq!(rows_warned, vec![1, 2]);
        assert_eq!(normalized.warnings[0].key, "count");
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let rows = vec![Binding::new().with("latitude", Term::literal("inf"))];
        let normalized = normalize(&rows, &[FieldSpec::float("lat", "latitude")]);
        assert!(normalized.records[0].number("lat").is_nan());
        assert_eq!(normalized.warnings.len(), 1);
    }

    #[test]
    fn preserves_input_order() {
        let rows: Vec<Binding> = ["c", "a", "b"]
            .iter()
            .map(|v| Binding::new().with("location", Term::literal(*v)))
            .collect();
        let normalized = normalize(&rows, &[FieldSpec::text("location", "location")]);
        let order: Vec<&str> = normalized
            .records
            .iter()
            .map(|r| r.text("location"))
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn empty_result_set_normalizes_to_nothing() {
        let normalized = normalize(&[], FIELDS);
        assert!(normalized.records.is_empty());
        assert!(normalized.warnings.is_empty());
    }
}
