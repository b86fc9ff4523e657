use actix_web::http::header::HeaderMap;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde_json::json;

use crate::config::CheckoutSettings;
use crate::forms::checkout::{CheckoutForm, QuoteQuery};
use crate::notifier::Notifier;
use crate::repository::DieselRepository;
use crate::services::checkout::{CheckoutReceipt, checkout};
use crate::services::errors::{CheckoutError, ErrorKind};
use crate::services::pricing::{QuoteView, quote_checkout};

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

fn checkout_error_response(err: &CheckoutError) -> HttpResponse {
    let kind = err.kind();
    let body = |message: String| json!({ "error": message, "kind": kind });

    match kind {
        ErrorKind::Validation => HttpResponse::BadRequest().json(body(err.to_string())),
        ErrorKind::NotFound => HttpResponse::NotFound().json(body(err.to_string())),
        ErrorKind::Conflict => HttpResponse::Conflict().json(body(err.to_string())),
        ErrorKind::PartialCommit | ErrorKind::Internal => {
            log::error!("Checkout failed: {err}");
            HttpResponse::InternalServerError().json(body("internal error".to_string()))
        }
    }
}

fn receipt_response(receipt: CheckoutReceipt) -> HttpResponse {
    let transaction_id = receipt.order.transaction_id.as_str();

    if receipt.is_partial() {
        return HttpResponse::Accepted().json(json!({
            "status": "partial_commit",
            "kind": ErrorKind::PartialCommit,
            "transaction_id": transaction_id,
            "replayed": receipt.replayed,
            "failed_steps": receipt.follow_up_failures,
        }));
    }

    let body = json!({
        "status": "success",
        "transaction_id": transaction_id,
        "replayed": receipt.replayed,
    });
    if receipt.replayed {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::Created().json(body)
    }
}

fn idempotency_key(headers: &HeaderMap) -> Result<Option<String>, CheckoutError> {
    match headers.get(IDEMPOTENCY_KEY_HEADER) {
        None => Ok(None),
        Some(value) => value.to_str().map(|key| Some(key.to_string())).map_err(|_| {
            CheckoutError::Validation("idempotency key must be visible ASCII".to_string())
        }),
    }
}

#[get("/v1/checkout/quote")]
/// Price the caller's cart for a shipping option and optional coupon.
pub async fn api_v1_checkout_quote(
    params: web::Query<QuoteQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<CheckoutSettings>,
) -> impl Responder {
    let request = match params.into_inner().into_quote_request() {
        Ok(request) => request,
        Err(err) => return checkout_error_response(&CheckoutError::Validation(err.to_string())),
    };

    match quote_checkout(repo.get_ref(), &user, &request, settings.get_ref()) {
        Ok(quote) => HttpResponse::Ok().json(QuoteView::from(quote)),
        Err(err) => checkout_error_response(&err),
    }
}

#[post("/v1/checkout")]
/// Turn the caller's cart into an order.
///
/// Responds `201` for a new order, `200` when the `Idempotency-Key` matched an
/// existing order and `202` when the order is stored but notification or cart
/// clearing failed.
pub async fn api_v1_checkout(
    req: HttpRequest,
    form: web::Json<CheckoutForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    settings: web::Data<CheckoutSettings>,
    notifier: web::Data<dyn Notifier>,
) -> impl Responder {
    let key = match idempotency_key(req.headers()) {
        Ok(key) => key,
        Err(err) => return checkout_error_response(&err),
    };

    let request = match form.into_inner().into_checkout_request(key) {
        Ok(request) => request,
        Err(err) => return checkout_error_response(&CheckoutError::Validation(err.to_string())),
    };

    match checkout(
        repo.get_ref(),
        notifier.into_inner(),
        &user,
        &request,
        settings.get_ref(),
    )
    .await
    {
        Ok(receipt) => receipt_response(receipt),
        Err(err) => checkout_error_response(&err),
    }
}
