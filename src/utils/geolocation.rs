use chrono::{DateTime, Duration, Utc};
use gloo_net::http::Request;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::utils::analytics::LocationData;
use crate::utils::storage::{self, BrowserStorage, KeyValueStore};

pub const LOCATION_CACHE_KEY: &str = "visitor_location";
pub const VISITOR_POOL_KEY: &str = "visitor_pool";
pub const MAX_POOL_SIZE: usize = 50;
pub const CACHE_TTL_HOURS: i64 = 24;

const FALLBACK_CITY: &str = "São Paulo";
const FALLBACK_REGION: &str = "SP";
const FALLBACK_COUNTRY: &str = "Brasil";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CachedLocation {
    pub city: String,
    pub region: String,
    pub country: String,
    pub timestamp: i64,
}

impl CachedLocation {
    pub fn location(&self) -> LocationData {
        LocationData {
            city: self.city.clone(),
            region: self.region.clone(),
            country: self.country.clone(),
        }
    }
}

/// Subset of the ipapi.co payload we care about.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct IpApiResponse {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

/// A recent visitor or signup shown to later visitors of the same browser.
/// `location` is the `"city, region"` label.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PoolVisitor {
    pub name: String,
    pub location: String,
    pub timestamp: i64,
}

pub fn fallback_location() -> LocationData {
    LocationData {
        city: FALLBACK_CITY.to_string(),
        region: FALLBACK_REGION.to_string(),
        country: FALLBACK_COUNTRY.to_string(),
    }
}

fn non_empty(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

pub fn location_from_response(response: IpApiResponse) -> LocationData {
    LocationData {
        city: non_empty(response.city, FALLBACK_CITY),
        region: non_empty(response.region_code, FALLBACK_REGION),
        country: non_empty(response.country_name, FALLBACK_COUNTRY),
    }
}

pub struct LocationCache<'a> {
    store: &'a dyn KeyValueStore,
}

impl LocationCache<'static> {
    pub fn browser() -> Self {
        LocationCache {
            store: &BrowserStorage::Local,
        }
    }
}

impl<'a> LocationCache<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        LocationCache { store }
    }

    /// The cached entry if younger than a day. Stale entries are removed.
    pub fn cached(&self, now: DateTime<Utc>) -> Option<CachedLocation> {
        let entry: CachedLocation = match storage::load_json(self.store, LOCATION_CACHE_KEY) {
            Ok(entry) => entry?,
            Err(e) => {
                warn!("Discarding unreadable location cache: {}", e);
                let _ = self.store.remove_item(LOCATION_CACHE_KEY);
                return None;
            }
        };
        let age = now.timestamp_millis() - entry.timestamp;
        if age > Duration::hours(CACHE_TTL_HOURS).num_milliseconds() {
            let _ = self.store.remove_item(LOCATION_CACHE_KEY);
            return None;
        }
        Some(entry)
    }

    pub fn store(&self, location: &LocationData, now: DateTime<Utc>) {
        let entry = CachedLocation {
            city: location.city.clone(),
            region: location.region.clone(),
            country: location.country.clone(),
            timestamp: now.timestamp_millis(),
        };
        if let Err(e) = storage::save_json(self.store, LOCATION_CACHE_KEY, &entry) {
            error!("Failed to cache visitor location: {}", e);
        }
    }

    pub fn visitor_pool(&self) -> Vec<PoolVisitor> {
        match storage::load_json(self.store, VISITOR_POOL_KEY) {
            Ok(pool) => pool.unwrap_or_default(),
            Err(e) => {
                error!("Failed to read visitor pool: {}", e);
                Vec::new()
            }
        }
    }

    /// Adds the visitor to the front of the pool using the cached location.
    /// Does nothing when no location has been cached yet.
    pub fn add_to_pool(&self, name: Option<&str>, now: DateTime<Utc>) {
        let Some(location) = self.cached(now) else {
            return;
        };
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Visitante");

        let mut pool = self.visitor_pool();
        pool.insert(
            0,
            PoolVisitor {
                name: name.to_string(),
                location: location.location().display(),
                timestamp: now.timestamp_millis(),
            },
        );
        pool.truncate(MAX_POOL_SIZE);
        if let Err(e) = storage::save_json(self.store, VISITOR_POOL_KEY, &pool) {
            error!("Failed to save visitor pool: {}", e);
        }
    }
}

/// Looks up the visitor's city by IP, going to the network at most once a
/// day. Any failure yields the São Paulo fallback, which is not cached.
pub async fn fetch_visitor_location() -> LocationData {
    let cache = LocationCache::browser();
    let now = Utc::now();
    if let Some(entry) = cache.cached(now) {
        return entry.location();
    }

    match Request::get(config::get_geolocation_url()).send().await {
        Ok(response) if response.ok() => match response.json::<IpApiResponse>().await {
            Ok(body) => {
                let location = location_from_response(body);
                info!("Visitor located in {}", location.display());
                cache.store(&location, now);
                location
            }
            Err(e) => {
                warn!("Unexpected geolocation payload: {}", e);
                fallback_location()
            }
        },
        Ok(response) => {
            warn!("Geolocation lookup returned status {}", response.status());
            fallback_location()
        }
        Err(e) => {
            warn!("Geolocation lookup failed: {}", e);
            fallback_location()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::memory::MemoryStore;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_763_000_000, 0).unwrap()
    }

    fn curitiba() -> LocationData {
        LocationData {
            city: "Curitiba".into(),
            region: "PR".into(),
            country: "Brasil".into(),
        }
    }

    #[test]
    fn empty_fields_fall_back_individually() {
        let location = location_from_response(IpApiResponse {
            city: Some("Recife".into()),
            region_code: Some("  ".into()),
            country_name: None,
        });
        assert_eq!(location.city, "Recife");
        assert_eq!(location.region, "SP");
        assert_eq!(location.country, "Brasil");
    }

    #[test]
    fn cache_expires_after_a_day() {
        let store = MemoryStore::default();
        let cache = LocationCache::new(&store);
        cache.store(&curitiba(), now());

        assert_eq!(cache.cached(now() + Duration::hours(23)).unwrap().city, "Curitiba");
        assert!(cache.cached(now() + Duration::hours(25)).is_none());
        assert!(store.get_item(LOCATION_CACHE_KEY).unwrap().is_none());
    }

    #[test]
    fn pool_needs_a_cached_location() {
        let store = MemoryStore::default();
        let cache = LocationCache::new(&store);
        cache.add_to_pool(Some("Ana"), now());
        assert!(cache.visitor_pool().is_empty());
    }

    #[test]
    fn pool_is_newest_first_and_capped() {
        let store = MemoryStore::default();
        let cache = LocationCache::new(&store);
        cache.store(&curitiba(), now());

        for i in 0..(MAX_POOL_SIZE + 3) {
            cache.add_to_pool(Some(&format!("Pessoa {}", i)), now());
        }
        cache.add_to_pool(Some("   "), now());

        let pool = cache.visitor_pool();
        assert_eq!(pool.len(), MAX_POOL_SIZE);
        assert_eq!(pool[0].name, "Visitante");
        assert_eq!(pool[1].name, format!("Pessoa {}", MAX_POOL_SIZE + 2));
        assert_eq!(pool[0].location, "Curitiba, PR");
    }

    #[test]
    fn anonymous_visitors_join_as_visitante() {
        let store = MemoryStore::default();
        let cache = LocationCache::new(&store);
        cache.store(&curitiba(), now());
        cache.add_to_pool(None, now());

        let pool = cache.visitor_pool();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].name, "Visitante");
        assert_eq!(pool[0].location, "Curitiba, PR");
        assert_eq!(pool[0].timestamp, now().timestamp_millis());
    }

    #[test]
    fn pool_is_stored_as_name_location_timestamp() {
        let store = MemoryStore::default();
        store
            .set_item(VISITOR_POOL_KEY, r#"[{"name":"Ana","location":"Recife, PE","timestamp":1}]"#)
            .unwrap();
        let cache = LocationCache::new(&store);

        let pool = cache.visitor_pool();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].name, "Ana");
        assert_eq!(pool[0].location, "Recife, PE");

        cache.store(&curitiba(), now());
        cache.add_to_pool(Some("Bia"), now());
        let raw: serde_json::Value =
            serde_json::from_str(&store.get_item(VISITOR_POOL_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(raw[0]["location"], "Curitiba, PR");
        assert!(raw[0].get("city").is_none());
        assert_eq!(raw[1]["name"], "Ana");
    }
}
