//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tokio::sync::Mutex;

use crate::account::{AccountClient, AccountError};
use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::config::QuickbiteConfig;
use crate::flows::{AuthFlow, RecoveryFlow};

/// How long an idle browsing session (cart + wizards) is kept before it
/// is evicted whole. Eviction is what destroys abandoned wizard state.
const BROWSING_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

/// Upper bound on simultaneously tracked browsing sessions.
const BROWSING_CAPACITY: u64 = 10_000;

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("account client error: {0}")]
    Account(#[from] AccountError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the Account Service client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: QuickbiteConfig,
    accounts: AccountClient,
    catalog: Catalog,
    sessions: BrowsingSessions,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Account Service client cannot be built.
    pub fn new(config: QuickbiteConfig, catalog: Catalog) -> Result<Self, StateError> {
        let accounts = AccountClient::new(&config.account)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                accounts,
                catalog,
                sessions: BrowsingSessions::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &QuickbiteConfig {
        &self.inner.config
    }

    /// Get a reference to the Account Service client.
    #[must_use]
    pub fn accounts(&self) -> &AccountClient {
        &self.inner.accounts
    }

    /// Get a reference to the catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the browsing-session registry.
    #[must_use]
    pub fn sessions(&self) -> &BrowsingSessions {
        &self.inner.sessions
    }
}

/// Per-browsing-session mutable state.
///
/// Exactly one of these exists per session, so every surface that shows
/// the cart (dashboard badge, cart page) observes the same lines and
/// totals, and every wizard has a single home.
#[derive(Debug, Default)]
pub struct BrowsingState {
    pub cart: Cart,
    pub auth: AuthFlow,
    pub recovery: RecoveryFlow,
}

/// Registry of live browsing sessions.
///
/// Each entry sits behind a `tokio::sync::Mutex`, which is also the
/// single-flight guard: a submission holds the lock across its service
/// call, and a concurrent submission fails `try_lock` and is rejected
/// instead of being double-sent.
#[derive(Clone)]
pub struct BrowsingSessions {
    cache: Cache<String, Arc<Mutex<BrowsingState>>>,
}

impl BrowsingSessions {
    fn new() -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(BROWSING_CAPACITY)
                .time_to_idle(BROWSING_IDLE_TTL)
                .build(),
        }
    }

    /// Get the state for a browsing session, creating it on first touch.
    pub async fn get(&self, key: &str) -> Arc<Mutex<BrowsingState>> {
        self.cache
            .get_with(key.to_owned(), async {
                Arc::new(Mutex::new(BrowsingState::default()))
            })
            .await
    }

    /// Drop a browsing session outright (sign-out, wizard teardown).
    pub async fn evict(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use quickbite_core::ItemId;

    #[tokio::test]
    async fn test_same_key_yields_same_state() {
        let sessions = BrowsingSessions::new();

        let first = sessions.get("s1").await;
        first
            .lock()
            .await
            .cart
            .add_or_increment(Catalog::sample_menu().get(ItemId::new(1)).unwrap(), 1);

        // A second surface fetching the same key sees the mutation
        let second = sessions.get("s1").await;
        assert_eq!(second.lock().await.cart.total_items(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_distinct_keys_are_isolated() {
        let sessions = BrowsingSessions::new();
        let first = sessions.get("s1").await;
        let second = sessions.get("s2").await;
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_concurrent_submission_is_rejected_by_the_lock() {
        let sessions = BrowsingSessions::new();
        let handle = sessions.get("s1").await;

        // First submission holds the lock across its service call
        let guard = handle.lock().await;

        // A second submission arriving meanwhile cannot acquire it
        assert!(handle.try_lock().is_err());
        drop(guard);
        assert!(handle.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_evict_destroys_state() {
        let sessions = BrowsingSessions::new();
        {
            let handle = sessions.get("s1").await;
            handle
                .lock()
                .await
                .recovery
                .set_email("asha@example.com");
        }

        sessions.evict("s1").await;

        let fresh = sessions.get("s1").await;
        assert!(fresh.lock().await.recovery.email().is_empty());
    }
}
