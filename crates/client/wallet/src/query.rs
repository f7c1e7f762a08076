//! Small keyed query cache for chain reads.

use std::fmt::Display;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

use crate::config::QueryConfig;

/// Cached result of one query key.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState<T> {
    pub data: T,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Time of the last successful fetch
    pub updated_at: Option<Instant>,
}

impl<T> QueryState<T> {
    /// State holding `data` that was never fetched.
    pub fn initial(data: T) -> Self {
        Self {
            data,
            is_loading: false,
            error: None,
            updated_at: None,
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        self.error.is_none()
            && self
                .updated_at
                .is_some_and(|updated_at| updated_at.elapsed() < stale_time)
    }
}

/// LRU-bounded cache of query states sharing one initial value.
pub struct QueryClient<T> {
    cache: Mutex<LruCache<String, QueryState<T>>>,
    initial: T,
    stale_time: Duration,
}

impl<T: Clone> QueryClient<T> {
    pub fn new(initial: T, config: &QueryConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
            initial,
            stale_time: config.stale_time,
        }
    }

    /// Current state of `key`, the initial value if never fetched.
    pub fn get(&self, key: &str) -> QueryState<T> {
        self.lock()
            .get(key)
            .cloned()
            .unwrap_or_else(|| QueryState::initial(self.initial.clone()))
    }

    /// Serve `key` from cache while fresh, otherwise run `fetcher`.
    ///
    /// A failed fetch keeps the previous data and records the error.
    pub async fn fetch<F, Fut, E>(&self, key: &str, fetcher: F) -> QueryState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let previous = {
            let mut cache = self.lock();
            if let Some(state) = cache.get(key) {
                if state.is_fresh(self.stale_time) {
                    return state.clone();
                }
            }

            let mut state = cache
                .get(key)
                .cloned()
                .unwrap_or_else(|| QueryState::initial(self.initial.clone()));
            state.is_loading = true;
            cache.put(key.to_string(), state.clone());
            state
        };

        let state = match fetcher().await {
            Ok(data) => QueryState {
                data,
                is_loading: false,
                error: None,
                updated_at: Some(Instant::now()),
            },
            Err(e) => {
                tracing::warn!(target: "query", key, "Query failed: {}", e);
                QueryState {
                    is_loading: false,
                    error: Some(e.to_string()),
                    ..previous
                }
            }
        };

        self.lock().put(key.to_string(), state.clone());
        state
    }

    pub fn invalidate(&self, key: &str) {
        self.lock().pop(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, QueryState<T>>> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// `NAME?k=v&...` cache key; absent values are skipped.
pub fn query_key(name: &str, params: &[(&str, Option<&str>)]) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        if let Some(value) = value {
            serializer.append_pair(key, value);
        }
    }

    let query = serializer.finish();
    if query.is_empty() {
        name.to_string()
    } else {
        format!("{}?{}", name, query)
    }
}
