//! 外部 GeoIP API 实现
//!
//! 通过外部 HTTP API 进行 IP 地理位置查询（如 ip-api.com）。
//! 免费版限速约 45 次/分钟，缓存层的存在就是为了不触顶。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{trace, warn};

use super::provider::{GeoLookup, GeoRecord};
use crate::config::GeoIpConfig;
use crate::errors::{IpEchoError, Result};

/// ip-api.com 响应格式
///
/// 成功: `{"status":"success","country":"Germany","countryCode":"DE"}`
/// 失败: `{"status":"fail","message":"invalid query"}`
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    country: String,
    #[serde(default, rename = "countryCode")]
    country_code: String,
    #[serde(default)]
    message: String,
}

impl IpApiResponse {
    fn into_record(self) -> Result<GeoRecord> {
        if self.status != "success" {
            return Err(IpEchoError::geolocation(format!(
                "ip-api error: {}",
                self.message
            )));
        }
        Ok(GeoRecord {
            country: self.country,
            country_code: self.country_code,
        })
    }
}

/// 外部 API GeoIP Provider
pub struct IpApiProvider {
    client: reqwest::Client,
    /// URL 模板，`{ip}` 为占位符
    api_url_template: String,
}

impl IpApiProvider {
    /// 创建 Provider，出站请求带统一超时，超时视为普通查询失败
    pub fn new(config: &GeoIpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IpEchoError::geolocation(format!("http client init failed: {e}")))?;

        Ok(Self {
            client,
            api_url_template: config.api_url.clone(),
        })
    }
}

#[async_trait]
impl GeoLookup for IpApiProvider {
    async fn lookup(&self, ip: &str) -> Result<GeoRecord> {
        let url = self.api_url_template.replace("{ip}", ip);
        trace!("GeoIP API request: {}", url);

        let resp = self.client.get(&url).send().await.map_err(|e| {
            warn!("GeoIP API request to \"{}\" failed: {}", url, e);
            IpEchoError::geolocation(e.to_string())
        })?;

        let body: IpApiResponse = resp.json().await.map_err(|e| {
            warn!("GeoIP API response from \"{}\" parse failed: {}", url, e);
            IpEchoError::geolocation(e.to_string())
        })?;

        body.into_record()
    }

    fn name(&self) -> &'static str {
        "ip-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_decodes_to_record() {
        let body = r#"{"status":"success","country":"Testland","countryCode":"TT"}"#;
        let resp: IpApiResponse = serde_json::from_str(body).unwrap();
        let record = resp.into_record().unwrap();
        assert_eq!(record.country, "Testland");
        assert_eq!(record.country_code, "TT");
    }

    #[test]
    fn test_fail_status_surfaces_provider_message() {
        let body = r#"{"status":"fail","message":"invalid query"}"#;
        let resp: IpApiResponse = serde_json::from_str(body).unwrap();
        let err = resp.into_record().unwrap_err();
        assert!(matches!(err, IpEchoError::Geolocation(_)));
        assert!(err.message().contains("invalid query"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        // 部分字段缺失不应导致解码失败
        let body = r#"{"status":"success"}"#;
        let resp: IpApiResponse = serde_json::from_str(body).unwrap();
        let record = resp.into_record().unwrap();
        assert_eq!(record.country, "");
        assert_eq!(record.country_code, "");
    }
}
