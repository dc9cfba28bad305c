//! ipecho - A tiny "what is my IP" service
//!
//! Reports the caller's IP address and the country associated with it,
//! resolving geolocation through an external API behind an optional
//! Redis cache.
//!
//! # Architecture
//! - `cache`: optional GeoRecord cache (Redis or no-op)
//! - `config`: environment-based configuration
//! - `services`: geolocation resolution, public-IP discovery, HTTP handlers
//! - `utils`: client IP extraction and classification

pub mod cache;
pub mod config;
pub mod errors;
pub mod services;
pub mod utils;
