//! Term value decoding.
//!
//! Endpoint values come back either as full IRIs
//! (`http://example.org/ontology#ASSAULT%20WITH%20DEADLY%20WEAPON`) or as
//! percent-encoded literals. [`decode`] reduces both to the text a person
//! would read. Decoding never fails: anything that cannot be decoded is
//! returned as-is.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Prefixes that mark a value as an IRI rather than a literal.
const URI_SCHEMES: &[&str] = &["http://", "https://"];

/// Decodes a raw term value into its human-readable form.
///
/// - `None` and `""` become `""`.
/// - IRIs keep only their local name (after the last `#`, otherwise after
///   the last `/`), which is then percent-decoded.
/// - Anything else is treated as a literal and percent-decoded.
#[must_use]
pub fn decode(value: Option<&str>) -> String {
    match value {
        None | Some("") => String::new(),
        Some(raw) if is_uri(raw) => percent_decode_tolerant(local_name(raw)),
        Some(raw) => percent_decode_tolerant(raw),
    }
}

/// Returns `true` if `value` starts with a recognized IRI scheme.
#[must_use]
pub fn is_uri(value: &str) -> bool {
    URI_SCHEMES.iter().any(|scheme| value.starts_with(scheme))
}

/// Returns the local name of an IRI: the fragment after the last `#`, or
/// the final `/` segment when there is no fragment.
#[must_use]
pub fn local_name(uri: &str) -> &str {
    uri.rsplit_once('#')
        .or_else(|| uri.rsplit_once('/'))
        .map_or(uri, |(_, tail)| tail)
}

/// Percent-decodes `raw`, returning it unchanged if it contains a
/// malformed escape or decodes to invalid UTF-8.
#[must_use]
pub fn percent_decode_tolerant(raw: &str) -> String {
    if !has_well_formed_escapes(raw) {
        log::trace!("Leaving malformed percent-encoding as-is: {raw}");
        return raw.to_string();
    }
    percent_decode_str(raw)
        .decode_utf8()
        .map_or_else(|_| raw.to_string(), Cow::into_owned)
}

/// Every `%` must be followed by two hex digits.
fn has_well_formed_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    i += 3;
                }
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

    use super::*;

    #[test]
    fn empty_and_missing_decode_to_empty() {
        assert_eq!(decode(None), "");
        assert_eq!(decode(Some("")), "");
    }

    #[test]
    fn uri_with_fragment_keeps_suffix_after_last_hash() {
        assert_eq!(
            decode(Some(
                "http://www.semanticweb.org/ontology#BURGLARY%20FROM%20VEHICLE"
            )),
            "BURGLARY FROM VEHICLE"
        );
        assert_eq!(decode(Some("http://example.org/a#b#c%2Fd")), "c/d");
    }

    #[test]
    fn uri_without_fragment_keeps_last_path_segment() {
        assert_eq!(
            decode(Some("https://example.org/cities/Los%20Angeles")),
            "Los Angeles"
        );
    }

    #[test]
    fn uri_with_trailing_slash_has_empty_local_name() {
        assert_eq!(decode(Some("http://example.org/cities/")), "");
    }

    #[test]
    fn literals_are_percent_decoded() {
        assert_eq!(decode(Some("VEHICLE%20-%20STOLEN")), "VEHICLE - STOLEN");
        assert_eq!(decode(Some("2015")), "2015");
    }

    #[test]
    fn plus_is_not_a_space() {
        assert_eq!(decode(Some("A+B")), "A+B");
    }

    #[test]
    fn malformed_escapes_return_original() {
        assert_eq!(decode(Some("100%")), "100%");
        assert_eq!(decode(Some("a%20b%zz")), "a%20b%zz");
        assert_eq!(decode(Some("http://example.org/x#50%")), "50%");
    }

    #[test]
    fn invalid_utf8_returns_original() {
        assert_eq!(decode(Some("%FF%FE")), "%FF%FE");
    }

    #[test]
    fn literal_round_trip() {
        for s in [
            "THEFT OF IDENTITY",
            "ASSAULT WITH DEADLY WEAPON, AGGRAVATED ASSAULT",
            "100% legit",
            "Ünïcödé & symbols #/?",
            "http://looks-like-a-uri.example/path#frag",
        ] {
            let encoded = utf8_percent_encode(s, NON_ALPHANUMERIC).to_string();
            assert_eq!(decode(Some(&encoded)), s, "round trip failed for {s:?}");
        }
    }

    #[test]
    fn local_name_without_separators_is_whole_value() {
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn non_http_schemes_are_literals() {
        assert_eq!(decode(Some("urn:isbn:0451450523")), "urn:isbn:0451450523");
    }
}
