use std::future::Future;

use mindspace_core::error::BackendError;
use mindspace_core::models::credentials::Credentials;
use mindspace_core::models::submission::{ScanReceipt, SubmissionPayload};
use mindspace_screening::backend::ScanBackend;
use tracing::{info, warn};
use ureq::Agent;

use crate::client::{ApiConfig, build_agent};

/// Path of the depression-scan endpoint, relative to the API base URL.
pub const SCAN_PATH: &str = "/api/depression-scan/";

/// POST a finished screening and parse the backend's confirmation.
///
/// Blocking. Any non-2xx status, transport failure, or body without a
/// `total_score` is an error.
pub fn submit_scan(
    agent: &Agent,
    endpoint: &str,
    credentials: &Credentials,
    payload: &SubmissionPayload,
) -> Result<ScanReceipt, BackendError> {
    let body = serde_json::to_string(payload)
        .map_err(|e| BackendError::Transport(format!("failed to encode scan: {e}")))?;

    info!(endpoint, user = %payload.user, "posting depression scan");

    let mut response = agent
        .post(endpoint)
        .header("Content-Type", "application/json")
        .header("Authorization", credentials.bearer())
        .send(body)
        .map_err(map_transport_error)?;

    let status = response.status().as_u16();
    if !response.status().is_success() {
        warn!(status, "scan endpoint rejected submission");
        return Err(BackendError::Status(status));
    }

    let text = response
        .body_mut()
        .read_to_string()
        .map_err(|e| BackendError::MalformedBody(e.to_string()))?;
    let receipt: ScanReceipt =
        serde_json::from_str(&text).map_err(|e| BackendError::MalformedBody(e.to_string()))?;

    info!(status, total_score = receipt.total_score, "scan stored");
    Ok(receipt)
}

fn map_transport_error(e: ureq::Error) -> BackendError {
    match e {
        ureq::Error::StatusCode(status) => {
            warn!(status, "scan endpoint rejected submission");
            BackendError::Status(status)
        }
        other => BackendError::Transport(other.to_string()),
    }
}

/// [`ScanBackend`] over HTTP. Requests run on Tokio's blocking pool.
#[derive(Clone)]
pub struct HttpScanBackend {
    agent: Agent,
    endpoint: String,
}

impl HttpScanBackend {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            agent: build_agent(config),
            endpoint: config.url(SCAN_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ScanBackend for HttpScanBackend {
    fn submit_scan(
        &self,
        credentials: &Credentials,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<ScanReceipt, BackendError>> + Send {
        let agent = self.agent.clone();
        let endpoint = self.endpoint.clone();
        let credentials = credentials.clone();
        let payload = payload.clone();
        async move {
            tokio::task::spawn_blocking(move || {
                submit_scan(&agent, &endpoint, &credentials, &payload)
            })
            .await
            .map_err(|e| BackendError::Transport(format!("submission task failed: {e}")))?
        }
    }
}
