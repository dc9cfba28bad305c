use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::RwLock;
use tracing::{debug, error, trace};

use super::{CacheResult, GeoCache};
use crate::config::CacheConfig;
use crate::errors::{IpEchoError, Result};
use crate::services::geoip::GeoRecord;

pub struct RedisGeoCache {
    client: redis::Client,
    /// 持久化连接，使用 RwLock 保护
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    key_prefix: String,
}

impl RedisGeoCache {
    /// 创建 Redis 缓存并做一次同步 PING 连通性检查
    ///
    /// 检查失败返回错误，由工厂降级为 NullGeoCache；之后不再重试
    pub fn new(config: &CacheConfig) -> Result<Self> {
        debug!(
            "RedisGeoCache created with prefix: '{}', TTL: {}s",
            config.key_prefix, config.ttl_secs
        );

        let client = redis::Client::open(config.redis_url.as_str())
            .map_err(|e| IpEchoError::cache_connection(format!("invalid Redis URL: {e}")))?;

        // 启动时一次性连通性检查
        let mut conn = client
            .get_connection()
            .map_err(|e| IpEchoError::cache_connection(format!("Redis connect failed: {e}")))?;
        redis::cmd("PING")
            .query::<String>(&mut conn)
            .map_err(|e| IpEchoError::cache_connection(format!("Redis ping failed: {e}")))?;

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// 获取或建立持久连接
    async fn get_connection(&self) -> std::result::Result<MultiplexedConnection, redis::RedisError> {
        // 首先尝试读取现有连接
        {
            let conn_guard = self.connection.read().await;
            if let Some(ref conn) = *conn_guard {
                return Ok(conn.clone());
            }
        }

        // 需要建立新连接
        let mut conn_guard = self.connection.write().await;

        // 双重检查，避免竞态条件
        if let Some(ref conn) = *conn_guard {
            return Ok(conn.clone());
        }

        let new_conn = self.client.get_multiplexed_async_connection().await?;
        *conn_guard = Some(new_conn.clone());
        debug!("Redis connection established and cached");

        Ok(new_conn)
    }

    /// 重置连接（在连接错误时调用）
    async fn reset_connection(&self) {
        let mut conn_guard = self.connection.write().await;
        *conn_guard = None;
        debug!("Redis connection reset due to error");
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl GeoCache for RedisGeoCache {
    async fn get(&self, key: &str) -> CacheResult {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                return CacheResult::Miss;
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(&redis_key).await;

        match result {
            Ok(Some(data)) => match serde_json::from_str::<GeoRecord>(&data) {
                Ok(record) => {
                    trace!("Successfully retrieved key: {}", redis_key);
                    CacheResult::Found(record)
                }
                Err(e) => {
                    // 解码失败视为未命中，交由解析器重新查询并覆盖
                    error!("Failed to deserialize GeoRecord for key '{}': {}", redis_key, e);
                    CacheResult::Miss
                }
            },
            Ok(None) => {
                trace!("Key not found in cache: {}", redis_key);
                CacheResult::Miss
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", redis_key, e);
                // 连接可能已断开，重置连接
                self.reset_connection().await;
                CacheResult::Miss
            }
        }
    }

    async fn insert(&self, key: &str, value: &GeoRecord, ttl_secs: u64) {
        let redis_key = self.make_key(key);

        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                self.reset_connection().await;
                return;
            }
        };

        let serialized = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                error!("Failed to serialize GeoRecord for key '{}': {}", redis_key, e);
                return;
            }
        };

        match conn
            .set_ex::<String, String, ()>(redis_key.clone(), serialized, ttl_secs)
            .await
        {
            Ok(_) => {
                trace!("Successfully inserted key into cache: {}", redis_key);
            }
            Err(e) => {
                error!("Failed to insert key '{}' into cache: {}", redis_key, e);
                self.reset_connection().await;
            }
        }
    }
}
