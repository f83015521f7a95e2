pub const DEFAULT_PORT: u16 = 5555;
pub const DEFAULT_TRANSPORT: &str = "udp";
pub const DEFAULT_TTL: u64 = 86400;

/// Reported when a sample carries no `host` metadata.
pub const DEFAULT_HOST: &str = "openstack";

// metadata keys consumed while building an event, never copied into attributes
pub const HOST_METADATA_KEY: &str = "host";
pub const TTL_METADATA_KEY: &str = "ttl";
pub const CONSUMED_METADATA_KEYS: [&str; 2] = [HOST_METADATA_KEY, TTL_METADATA_KEY];

pub const TRANSPORT_QUERY_KEY: &str = "transport";
