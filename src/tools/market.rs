//! Market figures computed from the active listings.

use super::display::{compact_price, format_percent, format_price};
use crate::cache::TimedCache;
use crate::error::BackendResult;
use crate::models::Property;
use crate::repositories::PropertyRepository;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Listings read when computing a snapshot.
pub const MARKET_SAMPLE_SIZE: usize = 1000;

/// Price buckets as `(label, inclusive lower bound)`, ascending.
pub const PRICE_BUCKETS: [(&str, f64); 6] = [
    ("Under 500k", 0.0),
    ("500k-750k", 500_000.0),
    ("750k-1M", 750_000.0),
    ("1M-1.5M", 1_000_000.0),
    ("1.5M-2M", 1_500_000.0),
    ("Over 2M", 2_000_000.0),
];

#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
pub struct PriceBucket {
    pub range: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
pub struct TypeShare {
    pub property_type: String,
    pub count: usize,
    /// Share of all listings, in percent
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
pub struct CityStats {
    pub city: String,
    pub listings: usize,
    pub average_price: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
pub struct MarketSnapshot {
    pub total_listings: usize,
    pub average_price: f64,
    pub median_price: f64,
    pub price_distribution: Vec<PriceBucket>,
    pub type_breakdown: Vec<TypeShare>,
    /// Cities by listing count, busiest first
    pub cities: Vec<CityStats>,
}

fn bucket_index(price: f64) -> usize {
    PRICE_BUCKETS
        .iter()
        .rposition(|(_, floor)| price >= *floor)
        .unwrap_or(0)
}

fn median(sorted: &[f64]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
    }
}

impl MarketSnapshot {
    pub fn from_listings(listings: &[Property]) -> Self {
        let mut prices: Vec<f64> = listings
            .iter()
            .map(|p| p.price)
            .filter(|p| p.is_finite())
            .collect();
        prices.sort_by(f64::total_cmp);

        let average_price = if prices.is_empty() {
            0.0
        } else {
            prices.iter().sum::<f64>() / prices.len() as f64
        };

        let mut buckets = [0usize; PRICE_BUCKETS.len()];
        for price in &prices {
            buckets[bucket_index(*price)] += 1;
        }
        let price_distribution = PRICE_BUCKETS
            .iter()
            .zip(buckets)
            .map(|((label, _), count)| PriceBucket {
                range: label.to_string(),
                count,
            })
            .collect();

        let mut types: BTreeMap<String, usize> = BTreeMap::new();
        for listing in listings {
            *types.entry(listing.type_label().to_lowercase()).or_default() += 1;
        }
        let total = listings.len();
        let mut type_breakdown: Vec<TypeShare> = types
            .into_iter()
            .map(|(property_type, count)| TypeShare {
                property_type,
                count,
                percent: count as f64 * 100.0 / total as f64,
            })
            .collect();
        type_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

        let mut by_city: BTreeMap<String, (usize, f64)> = BTreeMap::new();
        for listing in listings {
            let Some(city) = listing.city.as_deref().map(str::trim).filter(|c| !c.is_empty())
            else {
                continue;
            };
            let entry = by_city.entry(city.to_string()).or_default();
            entry.0 += 1;
            entry.1 += listing.price;
        }
        let mut cities: Vec<CityStats> = by_city
            .into_iter()
            .map(|(city, (listings, sum))| CityStats {
                city,
                listings,
                average_price: sum / listings as f64,
            })
            .collect();
        cities.sort_by(|a, b| b.listings.cmp(&a.listings));

        Self {
            total_listings: total,
            average_price,
            median_price: median(&prices),
            price_distribution,
            type_breakdown,
            cities,
        }
    }

    /// Human-readable report.
    pub fn describe(&self) -> String {
        let mut out = format!(
            "{} active listings. Average {} | median {}\n",
            self.total_listings,
            format_price(self.average_price),
            format_price(self.median_price)
        );
        out.push_str("\nPrice distribution:\n");
        for bucket in &self.price_distribution {
            out.push_str(&format!("  {:<11} {}\n", bucket.range, bucket.count));
        }
        if !self.type_breakdown.is_empty() {
            out.push_str("\nBy type:\n");
            for share in &self.type_breakdown {
                out.push_str(&format!(
                    "  {:<11} {} ({})\n",
                    share.property_type,
                    share.count,
                    format_percent(share.percent, 1)
                ));
            }
        }
        if !self.cities.is_empty() {
            out.push_str("\nBy city:\n");
            for city in &self.cities {
                out.push_str(&format!(
                    "  {}: {} listings, avg {}\n",
                    city.city,
                    city.listings,
                    compact_price(city.average_price)
                ));
            }
        }
        out
    }
}

/// Market snapshot plus whether it came from the cache.
#[derive(Debug, Clone)]
pub struct MarketOverview {
    pub snapshot: Arc<MarketSnapshot>,
    pub from_cache: bool,
}

#[derive(Clone)]
pub struct MarketTools {
    repo: Arc<dyn PropertyRepository>,
    cache: TimedCache<&'static str, Arc<MarketSnapshot>>,
    /// Bumped on every invalidation; a snapshot computed across a bump is
    /// returned but not cached.
    generation: Arc<AtomicU64>,
}

const SNAPSHOT_KEY: &str = "active";

impl MarketTools {
    pub fn new(repo: Arc<dyn PropertyRepository>, ttl_minutes: u64) -> Self {
        Self {
            repo,
            cache: TimedCache::with_ttl_minutes(ttl_minutes),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The cached snapshot, recomputed once it goes stale or on `refresh`.
    pub async fn overview(&self, refresh: bool) -> BackendResult<MarketOverview> {
        if refresh {
            self.cache.invalidate(&SNAPSHOT_KEY);
        } else if let Some(snapshot) = self.cache.get(&SNAPSHOT_KEY) {
            tracing::debug!("Using cached market snapshot");
            return Ok(MarketOverview {
                snapshot,
                from_cache: true,
            });
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let start = std::time::Instant::now();
        let listings = self.repo.list_active(MARKET_SAMPLE_SIZE).await?;
        let snapshot = Arc::new(MarketSnapshot::from_listings(&listings));
        tracing::info!(
            "Market snapshot computed from {} listings in {}ms",
            listings.len(),
            start.elapsed().as_millis()
        );

        if self.generation.load(Ordering::SeqCst) == generation {
            self.cache.insert(SNAPSHOT_KEY, snapshot.clone());
        } else {
            tracing::debug!("Listings changed during snapshot, not caching it");
        }
        Ok(MarketOverview {
            snapshot,
            from_cache: false,
        })
    }

    /// Drop the cached snapshot, e.g. after a listing changes.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cache.invalidate(&SNAPSHOT_KEY);
    }
}
