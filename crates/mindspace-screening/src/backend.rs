use std::future::Future;

use mindspace_core::error::BackendError;
use mindspace_core::models::credentials::Credentials;
use mindspace_core::models::submission::{ScanReceipt, SubmissionPayload};

/// The persistence collaborator that stores a finished screening.
///
/// Implementations must treat any non-success answer from the remote side
/// as an error; the session relies on `Ok` meaning the scan was stored.
pub trait ScanBackend: Send + Sync + 'static {
    fn submit_scan(
        &self,
        credentials: &Credentials,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<ScanReceipt, BackendError>> + Send;
}
