pub mod category_controller;
pub mod health_controller;
pub mod task_controller;
pub mod user_controller;

use axum::http::StatusCode;

use crate::data_access::record_service::BackendError;
use crate::data_access::store_error::StoreError;
use crate::description::DescriptionError;

/// Status and message for a failed hard-fail store call.
pub fn store_error_response(e: StoreError) -> (StatusCode, String) {
    let status = match &e {
        StoreError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::NoResult { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        StoreError::Backend(BackendError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Backend(BackendError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        StoreError::Description(DescriptionError::NotConfigured) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Description(_) => StatusCode::BAD_GATEWAY,
    };
    (status, e.to_string())
}
