use actix_web::{HttpResponse, Responder, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::config::CheckoutSettings;
use crate::notifier::Notifier;
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::follow_up::resend_pending_confirmations;

#[post("/v1/admin/orders/resend-confirmations")]
/// Re-send order confirmations that were never delivered.
///
/// Users without the role stored in `crate::SERVICE_ACCESS_ROLE` receive a `401 Unauthorized` response.
pub async fn api_v1_resend_confirmations(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<CheckoutSettings>,
    notifier: web::Data<dyn Notifier>,
) -> impl Responder {
    match resend_pending_confirmations(
        repo.get_ref(),
        notifier.into_inner(),
        &user,
        settings.get_ref(),
    )
    .await
    {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(err) => service_error_response(err, "Failed to resend confirmations"),
    }
}
