use std::sync::Arc;

use mediagen_completion::{CompletionApi, CompletionBackend};
use mediagen_core::error::CoreError;
use mediagen_jobs::api::JobBackendApi;
use mediagen_jobs::poller::JobPoller;
use mediagen_jobs::JobBackend;

use crate::config::{ServerConfig, OPENAI_API_KEY, REPLICATE_API_TOKEN};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable. Backends are `None` when their credential is not
/// configured; each request checks for the one it needs.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Text-Completion Backend (Q&A flow).
    pub completion: Option<Arc<dyn CompletionBackend>>,
    /// Job Backend (video flow).
    pub jobs: Option<Arc<dyn JobBackend>>,
    /// Poll cadence for video jobs.
    pub poller: JobPoller,
}

impl AppState {
    /// Build the HTTP backends from configuration.
    pub fn from_config(config: ServerConfig) -> Self {
        let completion = config.completion.api_key.as_ref().map(|key| {
            Arc::new(CompletionApi::new(
                config.completion.api_url.clone(),
                key.clone(),
                config.completion.model.clone(),
            )) as Arc<dyn CompletionBackend>
        });

        let jobs = config.jobs.api_token.as_ref().map(|token| {
            Arc::new(JobBackendApi::new(
                config.jobs.api_url.clone(),
                token.clone(),
                config.jobs.model_version.clone(),
            )) as Arc<dyn JobBackend>
        });

        let poller = JobPoller::new(config.jobs.poll);

        Self {
            config: Arc::new(config),
            completion,
            jobs,
            poller,
        }
    }

    /// The completion backend, or a configuration error naming its credential.
    pub fn completion_backend(&self) -> Result<&dyn CompletionBackend, CoreError> {
        self.completion
            .as_deref()
            .ok_or(CoreError::MissingCredential(OPENAI_API_KEY))
    }

    /// The job backend, or a configuration error naming its credential.
    pub fn job_backend(&self) -> Result<&dyn JobBackend, CoreError> {
        self.jobs
            .as_deref()
            .ok_or(CoreError::MissingCredential(REPLICATE_API_TOKEN))
    }
}
