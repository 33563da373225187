use std::time::Duration;

use quizimg_workers::WorkerConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Bearer token required on the control-plane routes. With no token
    /// configured the control surface is open (local development only).
    pub api_token: Option<String>,
    /// Base URL of the link-finder worker.
    pub link_finder_url: String,
    /// Base URL of the compressor worker. Defaults to the link-finder URL
    /// since the two services usually ship in one process locally.
    pub compressor_url: String,
    /// Bearer credential for the link-finder worker.
    pub link_finder_api_key: String,
    /// Bearer credential for the compressor worker.
    pub compressor_api_key: String,
    /// Deadline for the startup readiness probe of each worker, in seconds.
    pub worker_connect_timeout_secs: u64,
    /// Concurrency ceiling for batch dispatch (default: `5`).
    pub batch_concurrency: usize,
    /// Seconds between WebSocket keepalive pings (default: `30`).
    pub ws_ping_interval_secs: u64,
    /// Bind address of the ingest listener (default: `0.0.0.0:50041`).
    pub ingest_addr: String,
    /// Shared secret the workers present on ingest calls.
    pub ingest_secret: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                    |
    /// |-------------------------|----------------------------|
    /// | `HOST`                  | `0.0.0.0`                  |
    /// | `PORT`                  | `3000`                     |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                       |
    /// | `API_TOKEN`             | unset (gate open)          |
    /// | `LINK_FINDER_URL`       | `http://localhost:50031`   |
    /// | `COMPRESSOR_URL`        | value of `LINK_FINDER_URL` |
    /// | `WORKER_API_KEY`        | empty                      |
    /// | `LINK_FINDER_API_KEY`   | value of `WORKER_API_KEY`  |
    /// | `COMPRESSOR_API_KEY`    | value of `WORKER_API_KEY`  |
    /// | `WORKER_CONNECT_TIMEOUT_SECS` | `5`                  |
    /// | `BATCH_CONCURRENCY`     | `5`                        |
    /// | `WS_PING_INTERVAL_SECS` | `30`                       |
    /// | `INGEST_ADDR`           | `0.0.0.0:50041`            |
    /// | `INGEST_SECRET`         | unset (gate open)          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let api_token = std::env::var("API_TOKEN").ok().filter(|s| !s.is_empty());

        let link_finder_url =
            std::env::var("LINK_FINDER_URL").unwrap_or_else(|_| "http://localhost:50031".into());
        let compressor_url =
            std::env::var("COMPRESSOR_URL").unwrap_or_else(|_| link_finder_url.clone());

        let worker_api_key = std::env::var("WORKER_API_KEY").unwrap_or_default();
        let link_finder_api_key =
            std::env::var("LINK_FINDER_API_KEY").unwrap_or_else(|_| worker_api_key.clone());
        let compressor_api_key =
            std::env::var("COMPRESSOR_API_KEY").unwrap_or_else(|_| worker_api_key.clone());

        let worker_connect_timeout_secs: u64 = std::env::var("WORKER_CONNECT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("WORKER_CONNECT_TIMEOUT_SECS must be a valid u64");

        let batch_concurrency: usize = std::env::var("BATCH_CONCURRENCY")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("BATCH_CONCURRENCY must be a valid usize");

        let ws_ping_interval_secs: u64 = std::env::var("WS_PING_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("WS_PING_INTERVAL_SECS must be a valid u64");

        let ingest_addr =
            std::env::var("INGEST_ADDR").unwrap_or_else(|_| "0.0.0.0:50041".into());
        let ingest_secret = std::env::var("INGEST_SECRET").ok().filter(|s| !s.is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            api_token,
            link_finder_url,
            compressor_url,
            link_finder_api_key,
            compressor_api_key,
            worker_connect_timeout_secs,
            batch_concurrency,
            ws_ping_interval_secs,
            ingest_addr,
            ingest_secret,
        }
    }

    /// Connection settings for the link-finder worker.
    pub fn link_finder(&self) -> WorkerConfig {
        WorkerConfig {
            base_url: self.link_finder_url.clone(),
            api_key: self.link_finder_api_key.clone(),
            connect_timeout: Duration::from_secs(self.worker_connect_timeout_secs),
        }
    }

    /// Connection settings for the compressor worker.
    pub fn compressor(&self) -> WorkerConfig {
        WorkerConfig {
            base_url: self.compressor_url.clone(),
            api_key: self.compressor_api_key.clone(),
            connect_timeout: Duration::from_secs(self.worker_connect_timeout_secs),
        }
    }
}
