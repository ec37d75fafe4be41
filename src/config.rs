use std::time::Duration;

use tracing::warn;

use crate::cli::ApiArgs;

pub const API_BASE_URL_ENV: &str = "MLGUIDE_API_BASE_URL";
pub const HTTP_TIMEOUT_ENV: &str = "MLGUIDE_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn from_args(args: &ApiArgs) -> Self {
        let base_url = normalize_base_url(args.api_base_url.as_deref());
        if base_url.is_empty() {
            warn!(
                env = API_BASE_URL_ENV,
                "API base URL is not set; pass --api-base-url or export the variable"
            );
        }

        Self {
            base_url,
            timeout: args
                .timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn normalize_base_url(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string()
}
