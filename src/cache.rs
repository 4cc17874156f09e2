//! In-memory caching using moka
//!
//! Holds dentist profiles looked up by id and the simulated payment intents,
//! plus the background task that refreshes site content.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::info;
use uuid::Uuid;

use crate::content::ContentSource;
use crate::countdown::Countdown;
use crate::models::Dentist;
use crate::payments::PaymentIntent;

/// Application cache
#[derive(Clone)]
pub struct AppCache {
    /// Dentist profiles (id -> Dentist)
    pub dentists: Cache<Uuid, Arc<Dentist>>,
    /// Payment intents (id -> PaymentIntent)
    pub payment_intents: Cache<Uuid, Arc<PaymentIntent>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Dentist profiles: 200 entries, 30 min TTL, 10 min idle
            dentists: Cache::builder()
                .max_capacity(200)
                .time_to_live(Duration::from_secs(30 * 60))
                .time_to_idle(Duration::from_secs(10 * 60))
                .build(),

            // Payment intents: abandoned checkouts expire after 30 min
            payment_intents: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            dentists_size: self.dentists.entry_count(),
            payment_intents_size: self.payment_intents.entry_count(),
        }
    }

    /// Replace cached dentist profiles with a fresh list
    pub async fn warm_dentists(&self, dentists: &[Dentist]) {
        self.dentists.invalidate_all();
        for dentist in dentists {
            self.dentists
                .insert(dentist.id, Arc::new(dentist.clone()))
                .await;
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
    pub dentists_size: u64,
    pub payment_intents_size: u64,
}

/// Owned handle to the content refresh loop; aborts the loop on drop
pub struct CacheWarmer {
    task: JoinHandle<()>,
}

impl CacheWarmer {
    /// Warm caches once the initial content fetch settles, then refresh
    /// content every `period`.
    pub fn spawn(
        cache: AppCache,
        content: Arc<ContentSource>,
        countdown: Arc<Countdown>,
        period: Duration,
    ) -> Self {
        let task = tokio::spawn(async move {
            content.settled().await;
            sync(&cache, &content, &countdown).await;

            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                content.refresh();
                content.settled().await;
                sync(&cache, &content, &countdown).await;
            }
        });

        Self { task }
    }
}

impl Drop for CacheWarmer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Push freshly loaded content into the caches and countdown
async fn sync(cache: &AppCache, content: &ContentSource, countdown: &Countdown) {
    cache.warm_dentists(&content.speakers()).await;
    if let Some(event) = content.event() {
        countdown.retarget(event.starts_at);
    }
    info!("Content refresh complete. Stats: {:?}", cache.stats());
}
