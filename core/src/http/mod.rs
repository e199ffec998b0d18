pub mod client;

pub use client::HttpClient;

/// User-Agent sent when the caller does not configure one.
pub const DEFAULT_USER_AGENT: &str = concat!("sitecheck/", env!("CARGO_PKG_VERSION"));
