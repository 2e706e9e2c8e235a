// Build-time package identity, reported by GET /version and the upstream user agent

pub const NAME: &str = env!("CARGO_PKG_NAME");

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
