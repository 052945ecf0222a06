use std::time::Duration;

use mediagen_jobs::poller::PollConfig;

/// Environment variable holding the Text-Completion Backend key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the Job Backend token.
pub const REPLICATE_API_TOKEN: &str = "REPLICATE_API_TOKEN";

/// Default Job Backend model version (zeroscope-v2-xl text-to-video).
pub const DEFAULT_VIDEO_MODEL_VERSION: &str =
    "a0f98598516e476eeede63342445409f345726a8fcf28de39793c60c0fdd0292";

/// Text-Completion Backend settings.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_url: String,
    /// `None` when the credential is absent or blank.
    pub api_key: Option<String>,
    pub model: String,
}

/// Job Backend settings.
#[derive(Debug, Clone)]
pub struct JobBackendConfig {
    pub api_url: String,
    /// `None` when the credential is absent or blank.
    pub api_token: Option<String>,
    pub model_version: String,
    pub poll: PollConfig,
}

/// Server configuration loaded from environment variables.
///
/// Everything except the two backend credentials has a default suitable
/// for local development. A missing credential does not stop the server;
/// the flow that needs it answers 500 until it is configured.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    pub completion: CompletionConfig,
    pub jobs: JobBackendConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                        |
    /// |-----------------------|--------------------------------|
    /// | `HOST`                | `0.0.0.0`                      |
    /// | `PORT`                | `3000`                         |
    /// | `CORS_ORIGINS`        | `http://localhost:3000`        |
    /// | `OPENAI_API_KEY`      | (none)                         |
    /// | `COMPLETION_API_URL`  | `https://api.openai.com/v1`    |
    /// | `COMPLETION_MODEL`    | `gpt-4.1-mini`                 |
    /// | `REPLICATE_API_TOKEN` | (none)                         |
    /// | `JOB_API_URL`         | `https://api.replicate.com/v1` |
    /// | `VIDEO_MODEL_VERSION` | zeroscope-v2-xl                |
    /// | `POLL_INTERVAL_SECS`  | `5`                            |
    /// | `POLL_MAX_ATTEMPTS`   | `60`                           |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let secret = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST", "0.0.0.0");

        let port: u16 = var("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let poll_interval_secs: u64 = var("POLL_INTERVAL_SECS", "5")
            .parse()
            .expect("POLL_INTERVAL_SECS must be a valid u64");

        let poll_max_attempts: u32 = var("POLL_MAX_ATTEMPTS", "60")
            .parse()
            .expect("POLL_MAX_ATTEMPTS must be a valid u32");

        let completion = CompletionConfig {
            api_url: var("COMPLETION_API_URL", "https://api.openai.com/v1"),
            api_key: secret(OPENAI_API_KEY),
            model: var("COMPLETION_MODEL", "gpt-4.1-mini"),
        };

        let jobs = JobBackendConfig {
            api_url: var("JOB_API_URL", "https://api.replicate.com/v1"),
            api_token: secret(REPLICATE_API_TOKEN),
            model_version: var("VIDEO_MODEL_VERSION", DEFAULT_VIDEO_MODEL_VERSION),
            poll: PollConfig {
                interval: Duration::from_secs(poll_interval_secs),
                max_attempts: poll_max_attempts,
            },
        };

        Self {
            host,
            port,
            cors_origins,
            completion,
            jobs,
        }
    }

    /// Names of the backend credentials that are not configured.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.completion.api_key.is_none() {
            missing.push(OPENAI_API_KEY);
        }
        if self.jobs.api_token.is_none() {
            missing.push(REPLICATE_API_TOKEN);
        }
        missing
    }
}
