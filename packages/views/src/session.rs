//! View session: filter state plus the fetch lifecycle for one view.
//!
//! A session moves `Idle → Loading → Ready | Failed`. Every fetch starts
//! with [`ViewSession::begin_fetch`], which hands out a [`FetchTicket`].
//! Completing with a ticket that is no longer the latest one is a no-op,
//! so a slow response can never overwrite a newer one.

use crime_dash_sparql::FetchError;
use crime_dash_sparql::client::{SparqlClient, Transport};
use crime_dash_sparql::config::EndpointConfig;
use crime_dash_sparql_models::Binding;
use crime_dash_views_models::{Normalized, ViewState};

use crate::normalize::normalize;
use crate::{View, ViewError};

/// Proof that a fetch was started, carrying the query to run.
#[derive(Debug)]
pub struct FetchTicket {
    generation: u64,
    query: String,
}

impl FetchTicket {
    /// The rendered query for this fetch.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Sequence number of this fetch within its session.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// State owned by one open view.
#[derive(Debug)]
pub struct ViewSession<V: View> {
    filter: V::Filter,
    state: ViewState<Normalized>,
    generation: u64,
}

impl<V: View> Default for ViewSession<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: View> ViewSession<V> {
    /// An idle session with the default filter.
    #[must_use]
    pub fn new() -> Self {
        Self::with_filter(V::Filter::default())
    }

    /// An idle session with `filter`.
    #[must_use]
    pub const fn with_filter(filter: V::Filter) -> Self {
        Self {
            filter,
            state: ViewState::Idle,
            generation: 0,
        }
    }

    /// Current filter.
    #[must_use]
    pub const fn filter(&self) -> &V::Filter {
        &self.filter
    }

    /// Replaces the filter. Call [`Self::derive`] afterwards to get the
    /// recomputed view; no fetch is triggered.
    pub fn set_filter(&mut self, filter: V::Filter) {
        log::debug!("{}: filter changed to {filter:?}", V::KIND);
        self.filter = filter;
    }

    /// Current load state.
    #[must_use]
    pub const fn state(&self) -> &ViewState<Normalized> {
        &self.state
    }

    /// Starts a fetch: renders the query and enters `Loading`.
    ///
    /// Any ticket handed out earlier becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Query`] (and enters `Failed`) if the query
    /// cannot be rendered.
    pub fn begin_fetch(&mut self, endpoint: &EndpointConfig) -> Result<FetchTicket, ViewError> {
        self.generation += 1;
        match V::query(endpoint, &self.filter) {
            Ok(query) => {
                log::debug!("{}: fetch #{} started", V::KIND, self.generation);
                self.state = ViewState::Loading;
                Ok(FetchTicket {
                    generation: self.generation,
                    query,
                })
            }
            Err(e) => {
                log::error!("{}: could not build query: {e}", V::KIND);
                self.state = ViewState::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    ///
    /// Returns `false` (leaving the state untouched) if a newer fetch has
    /// started since.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Binding>, FetchError>,
    ) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "{}: dropping stale response for fetch #{} (latest is #{})",
                V::KIND,
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(bindings) => {
                let normalized = normalize(&bindings, V::FIELDS);
                log::info!(
                    "{}: loaded {} records",
                    V::KIND,
                    normalized.records.len()
                );
                ViewState::Ready(normalized)
            }
            Err(e) => {
                log::error!("{}: fetch failed: {e}", V::KIND);
                ViewState::Failed(e.to_string())
            }
        };
        true
    }

    /// Runs a complete fetch cycle against `client`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the query could not be built or the fetch
    /// failed. The session is left in `Failed` either way.
    pub async fn refresh<T: Transport>(
        &mut self,
        client: &SparqlClient<T>,
        endpoint: &EndpointConfig,
    ) -> Result<(), ViewError> {
        let ticket = self.begin_fetch(endpoint)?;
        let result = client.fetch_results(ticket.query()).await;
        let outcome = result.as_ref().map(|_| ()).map_err(|e| e.clone().into());
        self.complete(ticket, result);
        outcome
    }

    /// Derives the view from the loaded records and the current filter, or
    /// `None` unless the session is `Ready`.
    #[must_use]
    pub fn derive(&self) -> Option<V::Derived> {
        self.state
            .ready()
            .map(|normalized| V::derive(&normalized.records, &self.filter))
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use crime_dash_sparql::client::TransportResponse;
    use crime_dash_sparql_models::Term;
    use crime_dash_views_models::{CrossCityFilter, DerivedView};

    use super::*;
    use crate::{CrossCity, Temporal};

    struct StaticTransport {
        status: u16,
        body: &'static str,
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn post_query(
            &self,
            _url: &str,
            _query: &str,
        ) -> Result<TransportResponse, FetchError> {
            Ok(TransportResponse {
                status: self.status,
                body: self.body.to_string(),
            })
        }
    }

    fn client(status: u16, body: &'static str) -> SparqlClient<StaticTransport> {
        SparqlClient::with_transport(
            &EndpointConfig::default(),
            StaticTransport { status, body },
        )
    }

    fn city_row(city: &str, desc: &str, count: &str) -> Binding {
        Binding::new()
            .with("city", Term::literal(city))
            .with("crm_cd_desc", Term::literal(desc))
            .with("crimeCount", Term::literal(count))
    }

    #[test]
    fn starts_idle() {
        let session = ViewSession::<CrossCity>::new();
        assert_eq!(session.state(), &ViewState::Idle);
        assert!(session.derive().is_none());
    }

    #[test]
    fn begin_fetch_enters_loading() {
        let mut session = ViewSession::<CrossCity>::new();
        let ticket = session.begin_fetch(&EndpointConfig::default()).unwrap();
        assert!(session.state().is_loading());
        assert!(ticket.query().contains("GROUP BY ?city ?crm_cd_desc"));
    }

    #[test]
    fn stale_response_is_ignored() {
        let endpoint = EndpointConfig::default();
        let mut session = ViewSession::<CrossCity>::new();

        let first = session.begin_fetch(&endpoint).unwrap();
        let second = session.begin_fetch(&endpoint).unwrap();
        assert!(second.generation() > first.generation());

        assert!(session.complete(second, Ok(vec![city_row("Chicago", "THEFT", "9")])));
        assert!(!session.complete(first, Ok(vec![city_row("Boston", "ARSON", "1")])));

        let records = &session.state().ready().unwrap().records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text("city"), "Chicago");
    }

    #[test]
    fn stale_failure_does_not_clobber_fresh_data() {
        let endpoint = EndpointConfig::default();
        let mut session = ViewSession::<CrossCity>::new();
        let old = session.begin_fetch(&endpoint).unwrap();
        let new = session.begin_fetch(&endpoint).unwrap();
        session.complete(new, Ok(vec![]));
        session.complete(old, Err(FetchError::Network("late".to_string())));
        assert!(session.state().ready().is_some());
    }

    #[test]
    fn refetch_replaces_records_wholesale() {
        let endpoint = EndpointConfig::default();
        let mut session = ViewSession::<CrossCity>::new();

        let t = session.begin_fetch(&endpoint).unwrap();
        session.complete(t, Ok(vec![city_row("A", "X", "1"), city_row("B", "Y", "2")]));
        let t = session.begin_fetch(&endpoint).unwrap();
        session.complete(t, Ok(vec![city_row("C", "Z", "3")]));

        let records = &session.state().ready().unwrap().records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text("city"), "C");
    }

    #[test]
    fn filter_change_rederives_without_refetch() {
        let endpoint = EndpointConfig::default();
        let mut session = ViewSession::<CrossCity>::new();
        let t = session.begin_fetch(&endpoint).unwrap();
        session.complete(
            t,
            Ok(vec![
                city_row("Chicago", "THEFT", "9"),
                city_row("Boston", "ARSON", "1"),
            ]),
        );
        assert_eq!(session.derive().unwrap().table.rows.len(), 2);

        session.set_filter(CrossCityFilter {
            description: "ARSON".to_string(),
        });
        let derived = session.derive().unwrap();
        assert_eq!(derived.table.rows, vec![vec!["Boston", "ARSON", "1"]]);
    }

    #[tokio::test]
    async fn http_500_fails_the_session() {
        let mut session = ViewSession::<Temporal>::new();
        let err = session
            .refresh(&client(500, "server error"), &EndpointConfig::default())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ViewError::Fetch(FetchError::HttpStatus(500, "server error".to_string()))
        );
        assert_eq!(session.state().error(), Some("HTTP 500: server error"));
        assert!(session.derive().is_none());
    }

    #[tokio::test]
    async fn empty_result_set_is_ready_and_empty() {
        let mut session = ViewSession::<Temporal>::new();
        session
            .refresh(
                &client(200, r#"{"results":{"bindings":[]}}"#),
                &EndpointConfig::default(),
            )
            .await
            .unwrap();

        assert!(session.state().ready().unwrap().records.is_empty());
        let derived = session.derive().unwrap();
        assert!(derived.chart.labels.is_empty());
        assert!(derived.chart.datasets.iter().all(|d| d.data.is_empty()));
        assert!(derived.table.rows.is_empty());
        assert!(derived.is_empty());
    }

    #[tokio::test]
    async fn failed_session_recovers_only_on_explicit_refresh() {
        let endpoint = EndpointConfig::default();
        let mut session = ViewSession::<CrossCity>::new();
        let _ = session.refresh(&client(502, "bad gateway"), &endpoint).await;
        assert!(session.state().error().is_some());

        session.set_filter(CrossCityFilter::default());
        assert!(session.state().error().is_some());

        session
            .refresh(&client(200, r#"{"results":{"bindings":[]}}"#), &endpoint)
            .await
            .unwrap();
        assert!(session.state().ready().is_some());
    }
}
