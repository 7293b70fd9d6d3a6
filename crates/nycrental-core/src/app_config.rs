use std::path::PathBuf;

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Parent directory for per-run output folders.
    pub output_dir: PathBuf,
    pub source_url: String,
    pub source_base_url: String,
    pub search_base_url: String,
    pub boroughs: Vec<String>,
    /// `host:port` of the forward proxy.
    pub proxy_host: String,
    pub proxy_username: String,
    pub proxy_password: String,
    /// PEM trust anchor used instead of the system roots for proxied requests.
    pub proxy_cert_path: PathBuf,
    pub user_agent: String,
    pub max_workers: usize,
    pub request_timeout_secs: u64,
    /// Additional attempts after the first on a transient fetch failure.
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    /// Consecutive item failures (in completion order) that abort the run.
    pub abort_threshold: u32,
    pub no_listing_phrases: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("output_dir", &self.output_dir)
            .field("source_url", &self.source_url)
            .field("source_base_url", &self.source_base_url)
            .field("search_base_url", &self.search_base_url)
            .field("boroughs", &self.boroughs)
            .field("proxy_host", &self.proxy_host)
            .field("proxy_username", &"[redacted]")
            .field("proxy_password", &"[redacted]")
            .field("proxy_cert_path", &self.proxy_cert_path)
            .field("user_agent", &self.user_agent)
            .field("max_workers", &self.max_workers)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("abort_threshold", &self.abort_threshold)
            .field("no_listing_phrases", &self.no_listing_phrases)
            .finish()
    }
}
