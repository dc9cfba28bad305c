use std::fmt;

#[derive(Debug, Clone)]
pub enum IpEchoError {
    AddressUndetermined(String),
    Geolocation(String),
    CacheConnection(String),
    PublicIpDiscovery(String),
    Serialization(String),
}

impl IpEchoError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            IpEchoError::AddressUndetermined(_) => "E001",
            IpEchoError::Geolocation(_) => "E002",
            IpEchoError::CacheConnection(_) => "E003",
            IpEchoError::PublicIpDiscovery(_) => "E004",
            IpEchoError::Serialization(_) => "E005",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            IpEchoError::AddressUndetermined(_) => "Address Undetermined",
            IpEchoError::Geolocation(_) => "Geolocation Error",
            IpEchoError::CacheConnection(_) => "Cache Connection Error",
            IpEchoError::PublicIpDiscovery(_) => "Public IP Discovery Error",
            IpEchoError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            IpEchoError::AddressUndetermined(msg) => msg,
            IpEchoError::Geolocation(msg) => msg,
            IpEchoError::CacheConnection(msg) => msg,
            IpEchoError::PublicIpDiscovery(msg) => msg,
            IpEchoError::Serialization(msg) => msg,
        }
    }
}

impl fmt::Display for IpEchoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for IpEchoError {}

// 便捷的构造函数
impl IpEchoError {
    pub fn address_undetermined<T: Into<String>>(msg: T) -> Self {
        IpEchoError::AddressUndetermined(msg.into())
    }

    pub fn geolocation<T: Into<String>>(msg: T) -> Self {
        IpEchoError::Geolocation(msg.into())
    }

    pub fn cache_connection<T: Into<String>>(msg: T) -> Self {
        IpEchoError::CacheConnection(msg.into())
    }

    pub fn public_ip_discovery<T: Into<String>>(msg: T) -> Self {
        IpEchoError::PublicIpDiscovery(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        IpEchoError::Serialization(msg.into())
    }
}

impl From<serde_json::Error> for IpEchoError {
    fn from(err: serde_json::Error) -> Self {
        IpEchoError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IpEchoError>;
