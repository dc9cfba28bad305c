pub mod ip;

pub use ip::{extract_client_ip, ip_in_cidr, should_use_server_ip};
