//! GeoIP Provider 抽象层

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// 地理位置记录
///
/// 缓存值的 JSON 形式为 `{"country": ..., "code": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoRecord {
    /// 国家名称 (e.g., "Germany")
    pub country: String,
    /// ISO 3166-1 alpha-2 国家代码 (e.g., "DE")
    #[serde(rename = "code")]
    pub country_code: String,
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// 查询 IP 地址的国家信息
    async fn lookup(&self, ip: &str) -> Result<GeoRecord>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_record_cache_wire_format() {
        let record = GeoRecord {
            country: "Testland".to_string(),
            country_code: "TT".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"country":"Testland","code":"TT"}"#);

        let parsed: GeoRecord = serde_json::from_str(r#"{"country":"Testland","code":"TT"}"#).unwrap();
        assert_eq!(parsed, record);
    }
}
