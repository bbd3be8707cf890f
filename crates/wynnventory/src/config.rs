/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.wynnventory.com/api";

/// Upstream client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct WynnventoryConfig {
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Sent as `Authorization: Api-Key {key}`. Requests fail fast without it.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl WynnventoryConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                            |
    /// |----------------------------|------------------------------------|
    /// | `WYNNVENTORY_BASE_URL`     | `https://www.wynnventory.com/api`  |
    /// | `WYNNVENTORY_API_KEY`      | unset                              |
    /// | `WYNNVENTORY_TIMEOUT_SECS` | `15`                               |
    pub fn from_env() -> Self {
        let base_url = std::env::var("WYNNVENTORY_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let api_key = std::env::var("WYNNVENTORY_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let timeout_secs: u64 = std::env::var("WYNNVENTORY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "15".into())
            .parse()
            .expect("WYNNVENTORY_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            api_key,
            timeout_secs,
        }
    }
}
