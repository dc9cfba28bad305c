use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ipecho::cache::create_cache;
use ipecho::config::Config;
use ipecho::services::{AppContext, GeoResolver, IpApiProvider, discover_public_ip, ip_routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    // 缓存：Redis 不可用时降级为 NullGeoCache
    let cache = create_cache(&config.cache);

    // 启动时探测一次服务器公网 IP，失败不阻止启动
    let server_public_ip =
        match discover_public_ip(&config.public_ip_api_url, config.geoip.timeout_secs).await {
            Ok(ip) => {
                info!("Server public IP: {}", ip);
                ip
            }
            Err(e) => {
                warn!(
                    "Public IP discovery failed ({}), substitution will yield empty IP",
                    e
                );
                String::new()
            }
        };

    let provider = IpApiProvider::new(&config.geoip)
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let resolver = GeoResolver::new(Arc::new(provider), cache, config.cache.ttl_secs);

    let ctx = web::Data::new(AppContext {
        resolver,
        server_public_ip,
        vpn_subnet: config.vpn_subnet.clone(),
    });

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || App::new().app_data(ctx.clone()).configure(ip_routes))
        .bind(bind_address)?
        .run()
        .await
}
