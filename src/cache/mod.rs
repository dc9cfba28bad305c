//! 缓存适配层
//!
//! GeoRecord 的可选 KV 缓存，带过期时间。启动时做一次连通性检查，
//! 失败则整个进程生命周期内降级为 NullGeoCache，调用方无感知。

mod null;
mod redis;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::CacheConfig;
use crate::services::geoip::GeoRecord;

pub use null::NullGeoCache;
pub use redis::RedisGeoCache;

/// 缓存查询结果
#[derive(Debug, Clone)]
pub enum CacheResult {
    /// 成功获取到缓存值
    Found(GeoRecord),
    /// 未命中（包括解码失败、连接失败等一律视为未命中）
    Miss,
}

#[async_trait]
pub trait GeoCache: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult;

    /// 写入缓存，带 TTL（秒）。best-effort：失败只记日志，不向上传播
    async fn insert(&self, key: &str, value: &GeoRecord, ttl_secs: u64);
}

/// 根据配置创建缓存实例
///
/// Redis 连通性检查失败时降级为 NullGeoCache，不重试
pub fn create_cache(config: &CacheConfig) -> Arc<dyn GeoCache> {
    match RedisGeoCache::new(config) {
        Ok(cache) => {
            info!("Cache: using Redis at {}", config.redis_url);
            Arc::new(cache)
        }
        Err(e) => {
            warn!("Cache: Redis unavailable ({}), running without cache", e);
            Arc::new(NullGeoCache)
        }
    }
}
