//! Debounced, cancellable catalog text search.
//!
//! Each [`CatalogSearch::issue`] call supersedes the previous one: the older
//! query's task is cancelled, and a result is only published if it belongs to
//! the newest generation. Subscribers therefore never observe results out of
//! order or for a query that has since been replaced.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use handymenu_core::{InstalledPlugin, filter_plugins};
use handymenu_settings::CatalogSettings;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A published result set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Generation of the query that produced these results.
    pub generation: u64,
    /// The query text.
    pub query: String,
    /// Matching plugins.
    pub plugins: Arc<Vec<InstalledPlugin>>,
}

#[derive(Debug, Default)]
struct InFlight {
    token: Option<CancellationToken>,
    query: String,
}

/// Search over a catalog snapshot, publishing through a `watch` channel.
#[derive(Debug)]
pub struct CatalogSearch {
    catalog: Arc<RwLock<Arc<Vec<InstalledPlugin>>>>,
    results: Arc<watch::Sender<SearchResults>>,
    latest: Arc<AtomicU64>,
    in_flight: Mutex<InFlight>,
    debounce: Duration,
}

impl CatalogSearch {
    /// Search over `plugins`, waiting `debounce` before filtering.
    pub fn new(plugins: Arc<Vec<InstalledPlugin>>, debounce: Duration) -> Self {
        let (tx, _) = watch::channel(SearchResults {
            generation: 0,
            query: String::new(),
            plugins: Arc::clone(&plugins),
        });
        Self {
            catalog: Arc::new(RwLock::new(plugins)),
            results: Arc::new(tx),
            latest: Arc::new(AtomicU64::new(0)),
            in_flight: Mutex::new(InFlight::default()),
            debounce,
        }
    }

    /// [`CatalogSearch::new`] with the configured debounce.
    pub fn from_settings(plugins: Arc<Vec<InstalledPlugin>>, settings: &CatalogSettings) -> Self {
        Self::new(plugins, Duration::from_millis(settings.search_debounce_ms))
    }

    /// Receiver of published result sets.
    pub fn subscribe(&self) -> watch::Receiver<SearchResults> {
        self.results.subscribe()
    }

    /// The most recently published result set.
    pub fn current(&self) -> SearchResults {
        self.results.borrow().clone()
    }

    /// Swap in a new catalog snapshot and re-run the current query against it.
    pub fn set_catalog(&self, plugins: Arc<Vec<InstalledPlugin>>) -> u64 {
        *self.catalog.write() = plugins;
        let query = self.in_flight.lock().query.clone();
        self.issue(query)
    }

    /// Start a search for `query`, cancelling any search still in flight.
    ///
    /// An empty query publishes the whole catalog immediately. Anything else
    /// is filtered on a spawned task after the debounce, so this must be
    /// called from within a Tokio runtime. Returns the query's generation.
    pub fn issue(&self, query: impl Into<String>) -> u64 {
        let query = query.into();
        let token = CancellationToken::new();
        let generation = {
            let mut in_flight = self.in_flight.lock();
            if let Some(previous) = in_flight.token.replace(token.clone()) {
                previous.cancel();
            }
            in_flight.query.clone_from(&query);
            self.reserve_generation()
        };

        if query.is_empty() {
            let plugins = Arc::clone(&self.catalog.read());
            let _ = publish(&self.results, &self.latest, generation, query, plugins);
            return generation;
        }

        let catalog = Arc::clone(&self.catalog);
        let results = Arc::clone(&self.results);
        let latest = Arc::clone(&self.latest);
        let debounce = self.debounce;
        drop(tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    debug!(generation, "search superseded before it ran");
                    return;
                }
                () = tokio::time::sleep(debounce) => {}
            }
            let plugins = filter_plugins(&catalog.read(), &query);
            if token.is_cancelled() {
                debug!(generation, "search superseded, dropping results");
                return;
            }
            let _ = publish(&results, &latest, generation, query, Arc::new(plugins));
        }));
        generation
    }

    /// Bump the newest generation while holding the results lock, so no
    /// publish can interleave between the bump and its own staleness check.
    fn reserve_generation(&self) -> u64 {
        let mut generation = 0;
        let _ = self.results.send_if_modified(|_| {
            generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
            false
        });
        generation
    }

    /// Cancel whatever search is in flight without starting another.
    pub fn cancel(&self) {
        if let Some(token) = self.in_flight.lock().token.take() {
            token.cancel();
        }
    }
}

impl Drop for CatalogSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn publish(
    results: &watch::Sender<SearchResults>,
    latest: &AtomicU64,
    generation: u64,
    query: String,
    plugins: Arc<Vec<InstalledPlugin>>,
) -> bool {
    let count = plugins.len();
    let published = results.send_if_modified(|current| {
        if generation == latest.load(Ordering::SeqCst) && generation > current.generation {
            *current = SearchResults {
                generation,
                query,
                plugins,
            };
            true
        } else {
            false
        }
    });
    if published {
        debug!(generation, matches = count, "search results published");
    } else {
        debug!(generation, "search superseded, dropping results");
    }
    published
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use handymenu_core::CommandRef;

    use super::*;

    fn plugin(name: &str, commands: &[&str]) -> InstalledPlugin {
        InstalledPlugin {
            plugin_name: name.into(),
            icon: None,
            commands: commands
                .iter()
                .map(|c| CommandRef::new(name, *c, *c, name))
                .collect(),
        }
    }

    fn catalog() -> Arc<Vec<InstalledPlugin>> {
        Arc::new(vec![
            plugin("Alpha", &["Rename Layers"]),
            plugin("Zeta", &["Align"]),
        ])
    }

    fn names(results: &SearchResults) -> Vec<String> {
        results.plugins.iter().map(|p| p.plugin_name.clone()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_query_never_publishes() {
        let search = CatalogSearch::new(catalog(), Duration::from_millis(120));
        let mut rx = search.subscribe();

        let _stale = search.issue("alp");
        let fresh = search.issue("zet");

        rx.changed().await.unwrap();
        let results = rx.borrow_and_update().clone();
        assert_eq!(results.generation, fresh);
        assert_eq!(results.query, "zet");
        assert_eq!(names(&results), vec!["Zeta"]);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn results_wait_for_debounce() {
        let search = CatalogSearch::new(catalog(), Duration::from_millis(120));
        let generation = search.issue("align");

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(search.current().generation, 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let results = search.current();
        assert_eq!(results.generation, generation);
        assert_eq!(names(&results), vec!["Zeta"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_query_publishes_immediately_and_cancels_pending() {
        let search = CatalogSearch::new(catalog(), Duration::from_millis(120));
        let _ = search.issue("alp");
        let generation = search.issue("");

        let results = search.current();
        assert_eq!(results.generation, generation);
        assert_eq!(names(&results), vec!["Alpha", "Zeta"]);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(search.current().generation, generation);
    }

    #[tokio::test(start_paused = true)]
    async fn new_catalog_reruns_current_query() {
        let search = CatalogSearch::new(catalog(), Duration::from_millis(10));
        let _ = search.issue("a");
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(search.current().plugins.len(), 2);

        let _ = search.set_catalog(Arc::new(vec![plugin("Beta", &["Paste"])]));
        tokio::time::sleep(Duration::from_millis(20)).await;
        let results = search.current();
        assert_eq!(results.query, "a");
        assert_eq!(names(&results), vec!["Beta"]);
    }

    #[test]
    fn publish_rejects_generation_replaced_after_filtering() {
        let search = CatalogSearch::new(catalog(), Duration::from_millis(120));
        let first = search.reserve_generation();
        // a newer query is issued after the first finished filtering
        let _second = search.reserve_generation();

        let published = publish(
            &search.results,
            &search.latest,
            first,
            "alp".into(),
            Arc::new(Vec::new()),
        );
        assert!(!published);
        assert_eq!(search.current().generation, 0);
    }

    #[test]
    fn publish_accepts_newest_generation() {
        let search = CatalogSearch::new(catalog(), Duration::from_millis(120));
        let generation = search.reserve_generation();
        assert!(publish(
            &search.results,
            &search.latest,
            generation,
            "alp".into(),
            catalog(),
        ));
        assert_eq!(search.current().generation, generation);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_pending_search() {
        let search = CatalogSearch::new(catalog(), Duration::from_millis(50));
        let _ = search.issue("zeta");
        search.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(search.current().generation, 0);
    }
}
