use actix_web::{HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::ServiceError;
use crate::services::coupons::{CouponCheckQuery, check_coupon};

#[get("/v1/coupons/check")]
/// Details of the coupon named by `coupon_name`.
pub async fn api_v1_coupon_check(
    params: web::Query<CouponCheckQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match check_coupon(repo.get_ref(), &user, params.into_inner()) {
        Ok(coupon) => HttpResponse::Ok().json(json!({ "coupon": coupon })),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(json!({ "error": "Coupon code not found" }))
        }
        Err(err) => service_error_response(err, "Failed to check coupon"),
    }
}
