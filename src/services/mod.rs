//! Service layer for business logic

pub mod geoip;
mod ip_info;
mod public_ip;

pub use geoip::{GeoLookup, GeoRecord, GeoResolver, IpApiProvider};
pub use ip_info::{AppContext, IpInfo, IpInfoService, ip_routes};
pub use public_ip::discover_public_ip;
