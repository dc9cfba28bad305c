//! 配置管理
//!
//! 所有配置项从环境变量读取，带默认值，启动时载入一次后只读。

use std::env;

/// HTTP 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 缓存配置
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    pub key_prefix: String,
    /// GeoRecord 缓存 TTL（秒）
    pub ttl_secs: u64,
}

/// GeoIP 查询配置
#[derive(Debug, Clone)]
pub struct GeoIpConfig {
    /// API URL 模板，使用 `{ip}` 作为占位符
    pub api_url: String,
    /// 出站 HTTP 请求超时（秒）
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub geoip: GeoIpConfig,
    /// 启动时探测服务器公网 IP 的服务地址
    pub public_ip_api_url: String,
    /// VPN 隧道网段（CIDR），来自该网段的客户端显示服务器公网 IP
    pub vpn_subnet: String,
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量载入配置，缺省值复现原始部署行为
    pub fn from_env() -> Self {
        Config {
            server: ServerConfig {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parse_or("SERVER_PORT", 8080),
            },
            cache: CacheConfig {
                redis_url: env_or("REDIS_URL", "redis://127.0.0.1:6379/"),
                key_prefix: env_or("CACHE_KEY_PREFIX", "ip:"),
                ttl_secs: env_parse_or("CACHE_TTL", 24 * 60 * 60),
            },
            geoip: GeoIpConfig {
                api_url: env_or("GEOIP_API_URL", "http://ip-api.com/json/{ip}"),
                timeout_secs: env_parse_or("HTTP_TIMEOUT", 3),
            },
            public_ip_api_url: env_or("PUBLIC_IP_API_URL", "https://api.ipify.org"),
            vpn_subnet: env_or("VPN_SUBNET", "10.7.0.0/24"),
        }
    }
}
