//! IP 地址处理工具
//!
//! 提供统一的客户端 IP 提取与分类功能：
//! - 反向代理头解析（X-Forwarded-For / X-Real-IP）
//! - 私有 / 回环 / 链路本地地址检测
//! - VPN 网段 CIDR 匹配

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 从 HttpRequest 提取客户端 IP
///
/// 策略（按优先级）：
/// 1. X-Forwarded-For 第一个条目（原始客户端 IP）
/// 2. X-Real-IP
/// 3. 连接层 peer 地址
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    extract_client_ip_from_parts(req.headers(), req.connection_info().peer_addr())
}

/// 核心提取逻辑，便于单元测试
pub fn extract_client_ip_from_parts(headers: &HeaderMap, peer_addr: Option<&str>) -> Option<String> {
    // 优先 X-Forwarded-For，取第一个逗号分隔的条目
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|h| h.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let candidate = first.trim();
            if candidate.parse::<IpAddr>().is_ok() {
                return Some(candidate.to_string());
            }
        }
    }

    // 其次 X-Real-IP
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|h| h.to_str().ok()) {
        let candidate = real_ip.trim();
        if candidate.parse::<IpAddr>().is_ok() {
            return Some(candidate.to_string());
        }
    }

    // 回退到连接地址：先按 host:port 解析，失败后再按纯 IP 解析
    let peer = peer_addr?;
    if let Ok(socket_addr) = peer.parse::<SocketAddr>() {
        return Some(socket_addr.ip().to_string());
    }
    if peer.parse::<IpAddr>().is_ok() {
        return Some(peer.to_string());
    }

    None
}

/// 判断客户端 IP 是否应替换为服务器公网 IP
///
/// 命中条件：私有地址、回环、链路本地，或落在 VPN 隧道网段内。
/// 无法解析的输入返回 false。
pub fn should_use_server_ip(client_ip: &str, vpn_subnet: &str) -> bool {
    let Ok(ip) = client_ip.parse::<IpAddr>() else {
        return false;
    };

    if ip_in_cidr(&ip, vpn_subnet) {
        return true;
    }

    is_private_or_local(&ip)
}

/// 检查 IP 是否为私有地址、回环或链路本地
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
        IpAddr::V6(v6) => {
            // IPv6 私有地址：
            // - fc00::/7 (ULA, RFC 4193)
            // - fe80::/10 (Link-local)
            // - ::1 (Loopback)
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u32::from_be_bytes(ip.octets());
            let net_bits = u32::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u128::from_be_bytes(ip.octets());
            let net_bits = u128::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    const VPN_SUBNET: &str = "10.7.0.0/24";

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_forwarded_for_first_entry_wins() {
        let map = headers(&[("x-forwarded-for", "203.0.113.5, 10.0.0.1")]);
        assert_eq!(
            extract_client_ip_from_parts(&map, Some("198.51.100.7:443")),
            Some("203.0.113.5".to_string())
        );
    }

    #[test]
    fn test_invalid_forwarded_for_falls_back_to_real_ip() {
        let map = headers(&[
            ("x-forwarded-for", "not-an-ip"),
            ("x-real-ip", "203.0.113.9"),
        ]);
        assert_eq!(
            extract_client_ip_from_parts(&map, None),
            Some("203.0.113.9".to_string())
        );
    }

    #[test]
    fn test_peer_addr_host_port_split() {
        let map = HeaderMap::new();
        assert_eq!(
            extract_client_ip_from_parts(&map, Some("198.51.100.7:54321")),
            Some("198.51.100.7".to_string())
        );
    }

    #[test]
    fn test_peer_addr_bare_ip() {
        let map = HeaderMap::new();
        assert_eq!(
            extract_client_ip_from_parts(&map, Some("198.51.100.7")),
            Some("198.51.100.7".to_string())
        );
    }

    #[test]
    fn test_extraction_failure() {
        let map = HeaderMap::new();
        assert_eq!(extract_client_ip_from_parts(&map, Some("garbage")), None);
        assert_eq!(extract_client_ip_from_parts(&map, None), None);
    }

    #[test]
    fn test_should_use_server_ip_private_ranges() {
        // 私有地址
        assert!(should_use_server_ip("10.0.0.1", VPN_SUBNET));
        assert!(should_use_server_ip("172.16.0.1", VPN_SUBNET));
        assert!(should_use_server_ip("192.168.1.50", VPN_SUBNET));
        // 回环
        assert!(should_use_server_ip("127.0.0.1", VPN_SUBNET));
        assert!(should_use_server_ip("::1", VPN_SUBNET));
        // 链路本地
        assert!(should_use_server_ip("169.254.1.1", VPN_SUBNET));
        assert!(should_use_server_ip("fe80::1", VPN_SUBNET));
        // ULA
        assert!(should_use_server_ip("fd00::1", VPN_SUBNET));
    }

    #[test]
    fn test_should_use_server_ip_vpn_subnet() {
        assert!(should_use_server_ip("10.7.0.1", VPN_SUBNET));
        assert!(should_use_server_ip("10.7.0.254", VPN_SUBNET));
        // 10.7.1.x 落在 /24 之外，但仍是 10.0.0.0/8 私有网段
        assert!(should_use_server_ip("10.7.1.1", VPN_SUBNET));
    }

    #[test]
    fn test_should_use_server_ip_public_addresses() {
        assert!(!should_use_server_ip("8.8.8.8", VPN_SUBNET));
        assert!(!should_use_server_ip("203.0.113.5", VPN_SUBNET));
        assert!(!should_use_server_ip("2001:4860:4860::8888", VPN_SUBNET));
    }

    #[test]
    fn test_should_use_server_ip_invalid_input() {
        assert!(!should_use_server_ip("", VPN_SUBNET));
        assert!(!should_use_server_ip("not-an-ip", VPN_SUBNET));
    }

    #[test]
    fn test_ip_in_cidr_ipv4() {
        let ip: IpAddr = "10.7.0.100".parse().unwrap();
        assert!(ip_in_cidr(&ip, "10.7.0.0/24"));
        assert!(ip_in_cidr(&ip, "10.0.0.0/8"));
        assert!(!ip_in_cidr(&ip, "10.7.1.0/24"));
        assert!(!ip_in_cidr(&ip, "192.168.0.0/16"));
    }

    #[test]
    fn test_ip_in_cidr_ipv6() {
        let ip: IpAddr = "2001:db8::1".parse().unwrap();
        assert!(ip_in_cidr(&ip, "2001:db8::/32"));
        assert!(!ip_in_cidr(&ip, "2001:db9::/32"));
    }

    #[test]
    fn test_ip_in_cidr_malformed() {
        let ip: IpAddr = "10.7.0.1".parse().unwrap();
        assert!(!ip_in_cidr(&ip, "10.7.0.0"));
        assert!(!ip_in_cidr(&ip, "10.7.0.0/abc"));
        assert!(!ip_in_cidr(&ip, "2001:db8::/32")); // 协议族不匹配
    }
}
