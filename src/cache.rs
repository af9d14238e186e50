//! In-memory caching using moka
//!
//! Provides application-level caching for the service catalog. Services
//! change rarely compared to how often the booking form asks for estimates,
//! so every estimate reads its service from here.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::api::BookingApi;
use crate::models::{Service, ServiceSummary};

const SERVICE_LISTING_KEY: &str = "services:all";

/// Application cache holding catalog data
#[derive(Clone)]
pub struct AppCache {
    /// Service details (service id -> Service with options and extras)
    pub services: Cache<i64, Arc<Service>>,
    /// Service listings (cache_key -> Vec<ServiceSummary>)
    pub service_listings: Cache<String, Arc<Vec<ServiceSummary>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Service details: 200 entries, 15 min TTL, 5 min idle
            services: Cache::builder()
                .max_capacity(200)
                .time_to_live(Duration::from_secs(15 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),

            // Listings: 1 entry, 10 min TTL
            service_listings: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            services_size: self.services.entry_count(),
            listing_cached: self.service_listings.entry_count() > 0,
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.services.invalidate_all();
        self.service_listings.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate a single service and the listing that may contain it
    pub async fn invalidate_service(&self, service_id: i64) {
        self.services.invalidate(&service_id).await;
        self.service_listings.invalidate_all();
        info!("Cache invalidated for service: {}", service_id);
    }

    pub async fn listing(&self) -> Option<Arc<Vec<ServiceSummary>>> {
        self.service_listings.get(SERVICE_LISTING_KEY).await
    }

    pub async fn store_listing(&self, services: Vec<ServiceSummary>) -> Arc<Vec<ServiceSummary>> {
        let services = Arc::new(services);
        self.service_listings
            .insert(SERVICE_LISTING_KEY.to_string(), services.clone())
            .await;
        services
    }

    pub async fn store_service(&self, service: Service) -> Arc<Service> {
        let service = Arc::new(service);
        self.services.insert(service.id, service.clone()).await;
        service
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub services_size: u64,
    pub listing_cached: bool,
}

/// Start background cache warmer
///
/// Warms the catalog on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, api: BookingApi) {
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &api).await;
    }
}

/// Warm the cache with the listing and every listed service
async fn warm_cache(cache: &AppCache, api: &BookingApi) {
    info!("Starting catalog warm-up...");

    let listing = match api.list_services().await {
        Ok(services) => cache.store_listing(services).await,
        Err(e) => {
            warn!("Failed to warm service listing: {}", e);
            return;
        }
    };

    for summary in listing.iter() {
        match api.fetch_service(summary.id).await {
            Ok(Some(service)) => {
                cache.store_service(service).await;
            }
            Ok(None) => warn!("Listed service {} not found", summary.id),
            Err(e) => warn!("Failed to warm service {}: {}", summary.id, e),
        }
    }

    info!("Catalog warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn service(id: i64) -> Service {
        Service {
            id,
            name: format!("Service {}", id),
            description: String::new(),
            base_price: dec!(40),
            base_duration_minutes: 60,
            options: vec![],
            extras: vec![],
        }
    }

    #[tokio::test]
    async fn test_store_and_invalidate_service() {
        let cache = AppCache::new();
        cache.store_service(service(1)).await;
        cache.store_listing(vec![service(1).summary()]).await;

        assert!(cache.services.get(&1).await.is_some());
        assert_eq!(cache.listing().await.map(|l| l.len()), Some(1));

        cache.invalidate_service(1).await;
        assert!(cache.services.get(&1).await.is_none());
        assert!(cache.listing().await.is_none());
    }
}
