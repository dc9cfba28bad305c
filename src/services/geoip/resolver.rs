//! 缓存式 GeoIP 解析器
//!
//! 查询顺序：缓存 → 外部 API → 回写缓存。
//! 缓存命中时绝不触发外部请求；回写为 best-effort，失败不影响查询结果。

use std::sync::Arc;

use tracing::{debug, trace};

use super::provider::{GeoLookup, GeoRecord};
use crate::cache::{CacheResult, GeoCache};
use crate::errors::Result;

#[derive(Clone)]
pub struct GeoResolver {
    provider: Arc<dyn GeoLookup>,
    cache: Arc<dyn GeoCache>,
    ttl_secs: u64,
}

impl GeoResolver {
    pub fn new(provider: Arc<dyn GeoLookup>, cache: Arc<dyn GeoCache>, ttl_secs: u64) -> Self {
        Self {
            provider,
            cache,
            ttl_secs,
        }
    }

    /// 查询 IP 的国家信息
    ///
    /// 缓存记录一旦写入不会被修改，过期后由存储端自行淘汰，
    /// 下一次未命中时以新查询结果替换。
    pub async fn resolve(&self, ip: &str) -> Result<GeoRecord> {
        if let CacheResult::Found(record) = self.cache.get(ip).await {
            trace!("GeoIP cache hit for {}", ip);
            return Ok(record);
        }

        debug!(
            "GeoIP cache miss for {}, querying {} provider",
            ip,
            self.provider.name()
        );
        let record = self.provider.lookup(ip).await?;

        self.cache.insert(ip, &record, self.ttl_secs).await;

        Ok(record)
    }
}
