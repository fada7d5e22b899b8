#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SPARQL 1.1 JSON result set types.
//!
//! These mirror the `application/sparql-results+json` document shape:
//!
//! ```json
//! { "head": { "vars": ["city"] },
//!   "results": { "bindings": [ { "city": { "type": "uri", "value": "..." } } ] } }
//! ```
//!
//! Only `SELECT` result sets are modelled. A [`Binding`] is one result row,
//! immutable once decoded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The kind of an RDF term as reported by the endpoint.
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
pub enum TermKind {
    /// An IRI (`"type": "uri"`).
    Uri,
    /// A plain or language-tagged literal.
    Literal,
    /// A datatyped literal as emitted by SPARQL 1.0-era endpoints.
    TypedLiteral,
    /// A blank node.
    Bnode,
}

/// A single term bound to a variable in a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// What kind of term this is.
    #[serde(rename = "type")]
    pub kind: TermKind,
    /// Lexical value (IRI text, literal text, or blank node label).
    pub value: String,
    /// Datatype IRI for typed literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    /// Language tag for language-tagged literals.
    #[serde(
        default,
        rename = "xml:lang",
        skip_serializing_if = "Option::is_none"
    )]
    pub lang: Option<String>,
}

impl Term {
    /// Creates an IRI term.
    #[must_use]
    pub fn uri(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Uri,
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    /// Creates a plain literal term.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Literal,
            value: value.into(),
            datatype: None,
            lang: None,
        }
    }

    /// Returns `true` if this term is an IRI.
    #[must_use]
    pub fn is_uri(&self) -> bool {
        self.kind == TermKind::Uri
    }
}

/// One result row: variable name to bound term.
///
/// Unbound variables are simply absent from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Binding(BTreeMap<String, Term>);

impl Binding {
    /// Creates an empty binding.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style helper that binds `variable` to `term`.
    #[must_use]
    pub fn with(mut self, variable: impl Into<String>, term: Term) -> Self {
        self.0.insert(variable.into(), term);
        self
    }

    /// Returns the term bound to `variable`, if any.
    #[must_use]
    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.0.get(variable)
    }

    /// Returns the lexical value bound to `variable`, if any.
    #[must_use]
    pub fn value(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(|t| t.value.as_str())
    }

    /// Number of bound variables in this row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no variable is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Term)> for Binding {
    fn from_iter<I: IntoIterator<Item = (String, Term)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The `head` section of a result document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsHead {
    /// Projected variable names, in projection order.
    #[serde(default)]
    pub vars: Vec<String>,
}

/// The `results` section of a result document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsBody {
    /// Result rows in the order the endpoint returned them.
    pub bindings: Vec<Binding>,
}

/// A complete SPARQL JSON `SELECT` result document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparqlResults {
    /// Variable list. Some endpoints omit it, so it defaults to empty.
    #[serde(default)]
    pub head: ResultsHead,
    /// The result rows.
    pub results: ResultsBody,
}

impl SparqlResults {
    /// Consumes the document and returns its rows.
    #[must_use]
    pub fn into_bindings(self) -> Vec<Binding> {
        self.results.bindings
    }
}
