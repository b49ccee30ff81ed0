/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `9080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Full TorchServe prediction URL for the SD3 model.
    pub torchserve_url: String,
    /// S3 bucket holding generated results.
    pub s3_bucket: String,
    /// Key prefix all result objects live under.
    pub s3_prefix: String,
    /// Address the bucket by path rather than virtual host
    /// (required by most S3-compatible stores).
    pub s3_force_path_style: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                  |
    /// |------------------------|------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                |
    /// | `PORT`                 | `9080`                                   |
    /// | `CORS_ORIGINS`         | `*`                                      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                     |
    /// | `TORCHSERVE_URL`       | `http://localhost:8080/predictions/sd3`  |
    /// | `S3_BUCKET`            | `cr-sd3-torchserve`                      |
    /// | `S3_PREFIX`            | `sd3-outputs`                            |
    /// | `S3_FORCE_PATH_STYLE`  | `true`                                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "9080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let torchserve_url = std::env::var("TORCHSERVE_URL")
            .unwrap_or_else(|_| "http://localhost:8080/predictions/sd3".into());

        let s3_bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "cr-sd3-torchserve".into());

        let s3_prefix = std::env::var("S3_PREFIX").unwrap_or_else(|_| "sd3-outputs".into());

        let s3_force_path_style: bool = std::env::var("S3_FORCE_PATH_STYLE")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("S3_FORCE_PATH_STYLE must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            torchserve_url,
            s3_bucket,
            s3_prefix,
            s3_force_path_style,
        }
    }
}
