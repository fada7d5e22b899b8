//! Shared state for one CLI run and the load-then-print cycle every view
//! goes through.

use crime_dash_cli_utils::{MultiProgress, Spinner};
use crime_dash_sparql::client::{HttpTransport, SparqlClient, Transport};
use crime_dash_sparql::config::EndpointConfig;
use crime_dash_views::session::ViewSession;
use crime_dash_views::{View, ViewError};
use crime_dash_views_models::ViewState;
use serde::Serialize;

use crate::render::{RenderText, render};

/// Everything a view needs to load and print itself.
pub struct Context<T: Transport = HttpTransport> {
    pub endpoint: EndpointConfig,
    pub client: SparqlClient<T>,
    pub multi: MultiProgress,
    pub json: bool,
}

impl Context {
    #[must_use]
    pub fn new(endpoint: EndpointConfig, multi: MultiProgress, json: bool) -> Self {
        let client = SparqlClient::new(&endpoint);
        Self::with_client(endpoint, client, multi, json)
    }
}

impl<T: Transport> Context<T> {
    #[must_use]
    pub const fn with_client(
        endpoint: EndpointConfig,
        client: SparqlClient<T>,
        multi: MultiProgress,
        json: bool,
    ) -> Self {
        Self {
            endpoint,
            client,
            multi,
            json,
        }
    }

    /// Runs one fetch for `session` behind a loading spinner.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] if the query could not be built or the fetch
    /// failed.
    pub async fn load<V: View>(&self, session: &mut ViewSession<V>) -> Result<(), ViewError> {
        let spinner = Spinner::start(&self.multi, &format!("Loading {}...", V::KIND.title()));
        let result = session.refresh(&self.client, &self.endpoint).await;
        match &result {
            Ok(()) => spinner.finish_and_clear(),
            Err(_) => spinner.finish(format!("Failed to load {}", V::KIND.title())),
        }
        result
    }

    /// Prints the session's current view: the derived data when ready, the
    /// error when failed.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if JSON output was requested and
    /// serialization fails.
    pub fn show<V>(&self, session: &ViewSession<V>) -> Result<(), serde_json::Error>
    where
        V: View,
        V::Derived: RenderText + Serialize,
    {
        match session.state() {
            ViewState::Idle => println!("{}: nothing loaded yet.", V::KIND.title()),
            ViewState::Loading => println!("Loading {}...", V::KIND.title()),
            ViewState::Failed(message) => eprintln!("Error: {message}"),
            ViewState::Ready(_) => {
                if let Some(derived) = session.derive() {
                    println!("{}", render(&derived, self.json)?);
                }
            }
        }
        Ok(())
    }

    /// Loads a view once with `filter` and prints it, or prints why it
    /// failed. Returns whether the load succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if JSON output was requested and
    /// serialization fails.
    pub async fn run_once<V>(&self, filter: V::Filter) -> Result<bool, serde_json::Error>
    where
        V: View,
        V::Derived: RenderText + Serialize,
    {
        let mut session = ViewSession::<V>::with_filter(filter);
        let loaded = self.load(&mut session).await.is_ok();
        self.show(&session)?;
        Ok(loaded)
    }
}
