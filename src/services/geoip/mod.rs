//! GeoIP 服务模块
//!
//! 提供 IP 地址到国家的查询功能：
//! - 外部 API 查询（ip-api.com）
//! - 可选缓存层，命中时不触发外部请求

mod ip_api;
mod provider;
mod resolver;

pub use ip_api::IpApiProvider;
pub use provider::{GeoLookup, GeoRecord};
pub use resolver::GeoResolver;
