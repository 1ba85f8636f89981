//! Session middleware configuration.
//!
//! Carts live in the session, so sessions are kept in process memory in a
//! bounded `moka` cache. Each record is evicted once its expiry date passes,
//! and the least useful records are dropped when the cache is full. A restart
//! empties every cart.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry as CacheExpiry;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::{self, SessionStore};
use tower_sessions::{Expiry, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "icedelights_session";

/// Session expiry time in seconds (7 days of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Most sessions held at once.
pub const SESSION_STORE_CAPACITY: u64 = 100_000;

// =============================================================================
// Session Store
// =============================================================================

/// Evicts each record when its session expiry date is reached.
struct RecordExpiry;

fn time_left(record: &Record) -> Duration {
    Duration::try_from(record.expiry_date - OffsetDateTime::now_utc()).unwrap_or(Duration::ZERO)
}

impl CacheExpiry<Id, Record> for RecordExpiry {
    fn expire_after_create(
        &self,
        _id: &Id,
        record: &Record,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(time_left(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(time_left(record))
    }
}

/// In-memory session store with a capacity limit and per-record expiry.
#[derive(Debug, Clone)]
pub struct CartSessionStore {
    cache: Cache<Id, Record>,
}

impl CartSessionStore {
    /// Create a store holding at most `max_capacity` sessions.
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(RecordExpiry)
            .build();
        Self { cache }
    }

    /// Number of sessions currently held, after pending evictions run.
    pub async fn session_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

impl Default for CartSessionStore {
    fn default() -> Self {
        Self::new(SESSION_STORE_CAPACITY)
    }
}

#[async_trait]
impl SessionStore for CartSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.save(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .cache
            .get(id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(id).await;
        Ok(())
    }
}

// =============================================================================
// Session Layer
// =============================================================================

/// Create the session layer backed by [`CartSessionStore`].
///
/// Cookies are marked `Secure` when the public base URL is HTTPS.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<CartSessionStore> {
    SessionManagerLayer::new(CartSessionStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.secure_cookies())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
