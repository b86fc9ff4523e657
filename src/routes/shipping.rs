use actix_web::{HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::shipping::list_shipping_options;

#[get("/v1/shipping")]
pub async fn api_v1_shipping(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_shipping_options(repo.get_ref(), &user) {
        Ok(options) => HttpResponse::Ok().json(options),
        Err(err) => service_error_response(err, "Failed to list shipping options"),
    }
}
