#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Origin of the scouting service, without the `/api/v1/scout` path.
    pub api_base_url: String,
    pub log_level: String,
    /// Upper bound on a whole search, including the time spent streaming.
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub rate_limit_cooldown_secs: u64,
}
