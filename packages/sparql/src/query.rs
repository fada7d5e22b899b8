//! Parameterized SPARQL query templates.
//!
//! Templates are plain SPARQL text with `{{name}}` placeholders. Values are
//! bound as typed [`Parameter`]s and escaped on render, so user input never
//! lands in the query as raw text.
//!
//! ```
//! use crime_dash_sparql::query::{Parameter, QueryTemplate};
//!
//! let query = QueryTemplate::new("SELECT * WHERE { ?s ?p {{value}} }")
//!     .bind("value", Parameter::literal("say \"hi\""))
//!     .render()
//!     .unwrap();
//! assert_eq!(query, r#"SELECT * WHERE { ?s ?p "say \"hi\"" }"#);
//! ```

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::QueryError;

/// Characters left unescaped in IRI local names, matching the
/// `encodeURIComponent` unreserved set so that encoded names line up with
/// how the dataset's IRIs were minted.
const LOCAL_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A value bound into a query template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parameter {
    /// An absolute IRI, rendered as `<iri>`.
    Iri(String),
    /// A plain string literal, rendered as `"..."` with escapes.
    Literal(String),
}

impl Parameter {
    /// An IRI parameter.
    #[must_use]
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    /// A string literal parameter.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// An IRI formed by appending the percent-encoded `local` name to
    /// `namespace`.
    #[must_use]
    pub fn namespaced(namespace: &str, local: &str) -> Self {
        Self::Iri(format!(
            "{namespace}{}",
            utf8_percent_encode(local, LOCAL_NAME)
        ))
    }

    /// Renders the parameter as SPARQL syntax.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidIri`] if an IRI contains characters
    /// that are not allowed in an `IRIREF`.
    pub fn render(&self) -> Result<String, QueryError> {
        match self {
            Self::Iri(iri) => {
                if iri.is_empty() || iri.chars().any(is_forbidden_in_iri) {
                    return Err(QueryError::InvalidIri(iri.clone()));
                }
                Ok(format!("<{iri}>"))
            }
            Self::Literal(value) => Ok(escape_literal(value)),
        }
    }
}

/// `IRIREF ::= '<' ([^<>"{}|^`\]-[#x00-#x20])* '>'`
const fn is_forbidden_in_iri(c: char) -> bool {
    matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') || c <= ' '
}

fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// A query template with its bound parameters.
#[derive(Debug, Clone)]
pub struct QueryTemplate<'a> {
    text: &'a str,
    params: BTreeMap<String, Parameter>,
}

impl<'a> QueryTemplate<'a> {
    /// Wraps template text. Nothing is validated until [`Self::render`].
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self {
            text,
            params: BTreeMap::new(),
        }
    }

    /// Binds `name` to `value`, replacing any earlier binding.
    #[must_use]
    pub fn bind(mut self, name: impl Into<String>, value: Parameter) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Substitutes every placeholder and returns the final query text.
    ///
    /// # Errors
    ///
    /// * [`QueryError::Unbound`] if a placeholder has no parameter
    /// * [`QueryError::Unterminated`] if a `{{` has no matching `}}`
    /// * [`QueryError::InvalidIri`] if an IRI parameter is malformed
    pub fn render(&self) -> Result<String, QueryError> {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or(QueryError::Unterminated(offset + start))?;
            let name = after[..end].trim();
            let param = self
                .params
                .get(name)
                .ok_or_else(|| QueryError::Unbound(name.to_string()))?;
            out.push_str(&param.render()?);

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        out.push_str(rest);

        Ok(out)
    }
}
