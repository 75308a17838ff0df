//! Debounced stop search.
//!
//! A session owns a background task that watches the current query and
//! searches only once the query has been stable for the debounce delay.
//! An in-flight search is not cancelled by later keystrokes; its results
//! are published and then superseded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::Stop;
use crate::provider::TransitProvider;
use crate::rank::{RankConfig, search_stops};

/// What the search box should show.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// Query too short; nothing to show.
    Idle,
    /// A search is in flight; previous results are cleared.
    Searching,
    /// Ranked results for `query`. Empty on no match or provider failure.
    Results { query: String, stops: Vec<Stop> },
}

/// Handle to a running search session. Dropping it ends the session.
pub struct StopSearchSession {
    query: watch::Sender<String>,
    state: watch::Receiver<SearchState>,
    task: JoinHandle<()>,
}

impl StopSearchSession {
    /// Start a session searching through `provider`.
    pub fn spawn<P: TransitProvider + 'static>(
        provider: Arc<P>,
        config: RankConfig,
        delay: Duration,
    ) -> Self {
        let (query_tx, query_rx) = watch::channel(String::new());
        let (state_tx, state_rx) = watch::channel(SearchState::Idle);
        let task = tokio::spawn(run(provider, config, delay, query_rx, state_tx));

        Self {
            query: query_tx,
            state: state_rx,
            task,
        }
    }

    /// Replace the current query, as on every keystroke.
    pub fn set_query(&self, query: impl Into<String>) {
        self.query.send_replace(query.into());
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.clone()
    }
}

impl Drop for StopSearchSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<P: TransitProvider>(
    provider: Arc<P>,
    config: RankConfig,
    delay: Duration,
    mut queries: watch::Receiver<String>,
    state: watch::Sender<SearchState>,
) {
    while queries.changed().await.is_ok() {
        // Restart the quiet period on every change.
        loop {
            match tokio::time::timeout(delay, queries.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return,
                Err(_) => break,
            }
        }

        let query = queries.borrow_and_update().clone();
        if !config.accepts_query(&query) {
            state.send_replace(SearchState::Idle);
            continue;
        }

        debug!(query, "debounced stop search");
        state.send_replace(SearchState::Searching);
        let stops = search_stops(provider.as_ref(), &query, &config)
            .await
            .into_vec();
        state.send_replace(SearchState::Results { query, stops });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coords;
    use crate::provider::{MockCall, MockProvider};

    const DELAY: Duration = Duration::from_millis(300);

    fn provider() -> Arc<MockProvider> {
        Arc::new(MockProvider::new().with_stops(
            "Postplatz",
            vec![Stop::new("33000037", "Postplatz", "Dresden", Coords::default())],
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_keystrokes_searches_once() {
        let provider = provider();
        let session = StopSearchSession::spawn(provider.clone(), RankConfig::default(), DELAY);
        let mut states = session.subscribe();

        for query in ["Po", "Pos", "Post", "Postp", "Postplatz"] {
            session.set_query(query);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        let state = states
            .wait_for(|s| matches!(s, SearchState::Results { .. }))
            .await
            .unwrap()
            .clone();

        match state {
            SearchState::Results { query, stops } => {
                assert_eq!(query, "Postplatz");
                assert_eq!(stops.len(), 1);
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(
            provider.calls(),
            vec![MockCall::SearchStops("Postplatz".into())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn short_query_stays_idle() {
        let provider = provider();
        let session = StopSearchSession::spawn(provider.clone(), RankConfig::default(), DELAY);

        session.set_query("P");
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(session.state(), SearchState::Idle);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_delay() {
        let provider = provider();
        let session = StopSearchSession::spawn(provider.clone(), RankConfig::default(), DELAY);

        session.set_query("Postplatz");
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(provider.call_count(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(provider.call_count(), 1);
        assert!(matches!(session.state(), SearchState::Results { .. }));
    }
}
