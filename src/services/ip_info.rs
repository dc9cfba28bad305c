//! IP 信息服务
//!
//! 唯一对外路由的编排层：提取客户端 IP → 判断是否替换为服务器公网 IP →
//! 查询国家信息 → 输出 JSON。辅助查询失败绝不导致主请求失败。

use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Serialize;
use tracing::{debug, warn};

use super::geoip::GeoResolver;
use crate::utils::ip::{extract_client_ip, should_use_server_ip};

/// 注入 handler 的进程级只读状态，启动时构造一次
#[derive(Clone)]
pub struct AppContext {
    pub resolver: GeoResolver,
    /// 启动时探测到的服务器公网 IP；探测失败时为空串
    pub server_public_ip: String,
    /// VPN 隧道网段（CIDR）
    pub vpn_subnet: String,
}

/// 响应体
#[derive(Debug, Serialize)]
pub struct IpInfo {
    pub ip: String,
    pub country: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
}

pub struct IpInfoService;

impl IpInfoService {
    pub async fn handle_ip(req: HttpRequest, ctx: web::Data<AppContext>) -> impl Responder {
        let Some(client_ip) = extract_client_ip(&req) else {
            return HttpResponse::InternalServerError()
                .insert_header(("Content-Type", "text/plain; charset=utf-8"))
                .body("Unable to determine client IP");
        };

        // 私有/隧道地址对外无意义，替换为服务器公网 IP
        let display_ip = if should_use_server_ip(&client_ip, &ctx.vpn_subnet) {
            debug!(
                "Client IP {} is private/tunnel, substituting server public IP",
                client_ip
            );
            ctx.server_public_ip.clone()
        } else {
            client_ip
        };

        let (country, country_code) = match ctx.resolver.resolve(&display_ip).await {
            Ok(record) => (record.country, record.country_code),
            Err(e) => {
                warn!("Country lookup failed for {}: {}", display_ip, e);
                (String::new(), String::new())
            }
        };

        HttpResponse::Ok()
            .insert_header(("Access-Control-Allow-Origin", "*"))
            .json(IpInfo {
                ip: display_ip,
                country,
                country_code,
            })
    }

    pub async fn not_found() -> impl Responder {
        HttpResponse::NotFound()
            .insert_header(("Content-Type", "text/plain; charset=utf-8"))
            .body("Not Found")
    }
}

/// 路由注册，便于测试与 main 挂载同一套路由
pub fn ip_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ip", web::get().to(IpInfoService::handle_ip))
        .route("/", web::get().to(IpInfoService::handle_ip))
        .default_service(web::route().to(IpInfoService::not_found));
}
