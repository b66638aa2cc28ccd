use std::env;
use std::time::Duration;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub engine_url: String,
    pub project: String,
    /// Interval between export task status probes
    pub poll_interval: Duration,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("COASTAL_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

        let cors_origin =
            env::var("COASTAL_CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let engine_url =
            env::var("COASTAL_ENGINE_URL").unwrap_or_else(|_| "http://localhost:8085".to_string());

        let project =
            env::var("COASTAL_PROJECT").unwrap_or_else(|_| "coastal-analysis-2k25".to_string());

        let poll_secs: u64 = env::var("COASTAL_POLL_INTERVAL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        Self {
            port,
            cors_origin,
            engine_url,
            project,
            poll_interval: Duration::from_secs(poll_secs.max(1)),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // Only checks the fallback values; env vars are absent in CI
        let config = ApiConfig {
            port: 3001,
            cors_origin: "http://localhost:3000".to_string(),
            engine_url: "http://localhost:8085".to_string(),
            project: "coastal-analysis-2k25".to_string(),
            poll_interval: Duration::from_secs(10),
        };
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
    }
}
