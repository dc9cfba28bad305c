use async_trait::async_trait;
use tracing::trace;

use super::{CacheResult, GeoCache};
use crate::services::geoip::GeoRecord;

/// 无缓存实现
///
/// Redis 不可用或未配置时使用，所有查询透明直达外部 API
pub struct NullGeoCache;

#[async_trait]
impl GeoCache for NullGeoCache {
    async fn get(&self, key: &str) -> CacheResult {
        trace!("NullGeoCache.get called for key: {}", key);
        CacheResult::Miss
    }

    async fn insert(&self, key: &str, _value: &GeoRecord, _ttl_secs: u64) {
        trace!("NullGeoCache.insert called for key: {}", key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_record() -> GeoRecord {
        GeoRecord {
            country: "Testland".to_string(),
            country_code: "TT".to_string(),
        }
    }

    #[tokio::test]
    async fn test_null_cache_get_always_returns_miss() {
        let cache = NullGeoCache;

        // 任何 key 都应该返回 Miss
        assert!(matches!(cache.get("203.0.113.5").await, CacheResult::Miss));
        assert!(matches!(cache.get("").await, CacheResult::Miss));
    }

    #[tokio::test]
    async fn test_null_cache_insert_is_noop() {
        let cache = NullGeoCache;

        cache.insert("203.0.113.5", &test_record(), 86400).await;

        // 插入后 get 仍然返回 Miss
        assert!(matches!(cache.get("203.0.113.5").await, CacheResult::Miss));
    }
}
