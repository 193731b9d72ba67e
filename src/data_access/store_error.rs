use crate::data_access::record_service::{BackendError, MutationResponse, Record};
use crate::description::DescriptionError;

/// Failure of a hard-fail store operation (create, update, generate).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The record service refused the request or one of its records.
    #[error("{0}")]
    Rejected(String),

    /// The service answered without a single successful record.
    #[error("Failed to {action} {entity}")]
    NoResult { action: &'static str, entity: &'static str },

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Description(#[from] DescriptionError),
}

/// The first successful record of a single-record mutation.
///
/// A failed response is rejected with its message; otherwise the first
/// failed record that carries a message wins.
pub(crate) fn single_result(
    response: MutationResponse,
    action: &'static str,
    entity: &'static str,
) -> Result<Record, StoreError> {
    if !response.success {
        let message = response.message.unwrap_or_else(|| format!("Failed to {action} {entity}"));
        tracing::error!(%message, action, entity, "record service rejected request");
        return Err(StoreError::Rejected(message));
    }

    let results = response.results.unwrap_or_default();
    let failed: Vec<_> = results.iter().filter(|r| !r.success).collect();
    if !failed.is_empty() {
        tracing::error!(count = failed.len(), action, entity, "records failed");
        if let Some(message) = failed.iter().find_map(|r| r.message.clone()) {
            return Err(StoreError::Rejected(message));
        }
    }

    results
        .into_iter()
        .filter(|r| r.success)
        .find_map(|r| r.data)
        .ok_or(StoreError::NoResult { action, entity })
}

/// Whether a delete went through: the response succeeded and no record
/// reported a failure.
pub(crate) fn deleted(response: &MutationResponse, entity: &'static str) -> bool {
    if !response.success {
        tracing::error!(message = ?response.message, entity, "delete rejected");
        return false;
    }
    let failed = response
        .results
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|r| !r.success)
        .count();
    if failed > 0 {
        tracing::error!(failed, entity, "delete failed");
        return false;
    }
    true
}
