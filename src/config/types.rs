use serde::Deserialize;

/// Main configuration structure for favicon-scout
///
/// Every section has working defaults, so a missing or empty configuration
/// file still yields a usable setup (http driver, in-memory cache).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub cache: CacheConfig,
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            cache: CacheConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

/// Driver selection configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Name of the driver used when none is requested explicitly
    #[serde(rename = "default-driver")]
    pub default_driver: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            default_driver: "http".to_string(),
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Prefix prepended to every cache key
    pub prefix: String,

    /// Time-to-live applied when the CLI writes resolved favicons back
    #[serde(rename = "ttl-seconds")]
    pub ttl_seconds: u64,

    /// Path to a SQLite cache database. When absent, an in-memory store
    /// is used and cached entries do not survive the process.
    #[serde(rename = "database-path")]
    pub database_path: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            prefix: "favicon-scout".to_string(),
            ttl_seconds: 86_400,
            database_path: None,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds (0 = no timeout)
    pub timeout: u64,

    /// Connect timeout in seconds (0 = no timeout)
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,

    /// Fixed user agent header for outgoing requests
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: 0,
            connect_timeout: 0,
            user_agent: None,
        }
    }
}
