//! JSON API handlers.

use actix_web::HttpResponse;
use serde_json::json;

use crate::services::ServiceError;

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod coupons;
pub mod orders;
pub mod shipping;

/// Map a service error to a JSON error response. Unexpected failures are
/// logged with `context` and answered with a generic message.
pub(crate) fn service_error_response(err: ServiceError, context: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        ServiceError::Conflict => HttpResponse::Conflict().json(json!({ "error": "conflict" })),
        ServiceError::Form(message) => HttpResponse::BadRequest().json(json!({ "error": message })),
        err => {
            log::error!("{context}: {err}");
            HttpResponse::InternalServerError().json(json!({ "error": "internal error" }))
        }
    }
}
