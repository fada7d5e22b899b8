#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SPARQL endpoint access for the crime dashboard.
//!
//! Provides the pieces every view shares:
//!
//! - [`decode`] turns raw term values into human-readable local names.
//! - [`query`] renders query templates with escaped, typed parameters.
//! - [`client`] posts a query to the configured repository and decodes the
//!   JSON result set into [`Binding`]s.
//! - [`config`] resolves the endpoint location from defaults, a TOML file,
//!   and environment variables.

pub mod client;
pub mod config;
pub mod decode;
pub mod query;

pub use crime_dash_sparql_models::{Binding, SparqlResults, Term, TermKind};

/// Errors that end a single fetch.
///
/// None of these are retried; the caller decides whether to trigger a new
/// fetch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, refused connection,
    /// aborted transfer).
    #[error("Network error: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {0}: {1}")]
    HttpStatus(u16, String),

    /// The response body was not a SPARQL JSON result set.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Errors from rendering a query template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A `{{name}}` placeholder had no bound parameter.
    #[error("Unbound query parameter: {0}")]
    Unbound(String),

    /// A `{{` was never closed.
    #[error("Unterminated placeholder at byte {0}")]
    Unterminated(usize),

    /// An IRI parameter contained characters that cannot appear in an
    /// `IRIREF`.
    #[error("Invalid IRI parameter: {0}")]
    InvalidIri(String),
}

/// Errors from loading endpoint configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`config::EndpointConfig`].
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds an unusable value.
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}
