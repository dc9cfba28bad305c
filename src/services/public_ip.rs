//! 服务器公网 IP 探测
//!
//! 启动时调用一次 "what is my IP" 服务，响应体整体作为服务器公网地址。
//! 失败时返回错误，由调用方降级为空串，不影响启动。

use std::net::IpAddr;
use std::time::Duration;

use crate::errors::{IpEchoError, Result};

pub async fn discover_public_ip(api_url: &str, timeout_secs: u64) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| IpEchoError::public_ip_discovery(format!("http client init failed: {e}")))?;

    let resp = client
        .get(api_url)
        .send()
        .await
        .map_err(|e| IpEchoError::public_ip_discovery(e.to_string()))?;

    let body = resp
        .text()
        .await
        .map_err(|e| IpEchoError::public_ip_discovery(e.to_string()))?;

    let ip = body.trim();
    if ip.parse::<IpAddr>().is_err() {
        let preview: String = ip.chars().take(64).collect();
        return Err(IpEchoError::public_ip_discovery(format!(
            "discovery service returned non-IP body: {preview:?}"
        )));
    }

    Ok(ip.to_string())
}
