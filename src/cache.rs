//! In-memory caching using moka
//!
//! Holds the directory listings and the quotation list that the back office
//! reloads on every screen. Writes invalidate the affected listing.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::db::queries;
use crate::models::{School, Supplier, Trip};
use crate::pricing::models::QuotationRow;
use crate::pricing::queries as quotation_queries;

/// Key under which each full listing is stored
const LIST_KEY: &str = "all";

/// One cached listing plus a counter bumped by every write.
///
/// A fill records the counter before it queries; if a write lands before the
/// rows are stored, the stored entry is dropped again.
pub struct Listing<T> {
    entries: Cache<String, Arc<Vec<T>>>,
    generation: Arc<AtomicU64>,
}

impl<T> Clone for Listing<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            generation: self.generation.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> Listing<T> {
    fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn get(&self) -> Option<Arc<Vec<T>>> {
        self.entries.get(LIST_KEY).await
    }

    /// Current write counter; read it before loading rows for [`fill`](Self::fill).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store rows loaded at `generation`, unless a write has happened since.
    pub async fn fill(&self, generation: u64, rows: Vec<T>) -> Arc<Vec<T>> {
        let rows = Arc::new(rows);
        self.entries.insert(LIST_KEY.to_string(), rows.clone()).await;
        if self.generation() != generation {
            self.entries.invalidate(LIST_KEY).await;
        }
        rows
    }

    pub async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.invalidate(LIST_KEY).await;
    }

    pub fn is_cached(&self) -> bool {
        self.entries.entry_count() > 0
    }
}

/// Application cache holding listings
#[derive(Clone)]
pub struct AppCache {
    /// Schools, alphabetical
    pub schools: Listing<School>,
    /// Trips, by departure
    pub trips: Listing<Trip>,
    /// Suppliers, alphabetical
    pub suppliers: Listing<Supplier>,
    /// Quotations, newest first
    pub quotations: Listing<QuotationRow>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Directory listings change rarely: 30 min TTL
            schools: Listing::new(Duration::from_secs(30 * 60)),
            trips: Listing::new(Duration::from_secs(30 * 60)),
            suppliers: Listing::new(Duration::from_secs(30 * 60)),
            // Quotations are edited throughout the day: 5 min TTL
            quotations: Listing::new(Duration::from_secs(5 * 60)),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            schools_cached: self.schools.is_cached(),
            trips_cached: self.trips.is_cached(),
            suppliers_cached: self.suppliers.is_cached(),
            quotations_cached: self.quotations.is_cached(),
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub schools_cached: bool,
    pub trips_cached: bool,
    pub suppliers_cached: bool,
    pub quotations_cached: bool,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes on every `refresh` tick.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool, refresh: Duration) {
    let mut interval = interval(refresh);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with the listings every screen needs
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    let generation = cache.schools.generation();
    match queries::list_schools(db).await {
        Ok(schools) => {
            cache.schools.fill(generation, schools).await;
        }
        Err(e) => warn!("Failed to warm schools cache: {}", e),
    }

    let generation = cache.trips.generation();
    match queries::list_trips(db).await {
        Ok(trips) => {
            cache.trips.fill(generation, trips).await;
        }
        Err(e) => warn!("Failed to warm trips cache: {}", e),
    }

    let generation = cache.suppliers.generation();
    match queries::list_suppliers(db).await {
        Ok(suppliers) => {
            cache.suppliers.fill(generation, suppliers).await;
        }
        Err(e) => warn!("Failed to warm suppliers cache: {}", e),
    }

    let generation = cache.quotations.generation();
    match quotation_queries::list_quotations(db).await {
        Ok(rows) => {
            cache.quotations.fill(generation, rows).await;
        }
        Err(e) => warn!("Failed to warm quotations cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
