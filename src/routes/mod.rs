//! HTTP handlers of the development payout API.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use crate::dto::api::ApiResponse;
use crate::services::ServiceError;

pub mod api;

/// Maps a service error onto the `{"success": false}` envelope.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    let status = match err {
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Form(_) | ServiceError::TypeConstraint(_) => StatusCode::BAD_REQUEST,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match err {
        ServiceError::Internal(_) => "internal server error".to_string(),
        other => other.to_string(),
    };
    HttpResponse::build(status).json(ApiResponse::error(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_status_mappings() {
        assert_eq!(
            error_response(&ServiceError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&ServiceError::Form("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&ServiceError::Conflict("dup".into())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_response(&ServiceError::Internal("db".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
