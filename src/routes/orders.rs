use actix_web::{HttpResponse, Responder, get, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::orders::{OrdersQuery, get_order, list_orders};

#[get("/v1/orders")]
/// The caller's orders, newest first, paginated.
pub async fn api_v1_orders(
    params: web::Query<OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match list_orders(repo.get_ref(), &user, params.into_inner()) {
        Ok(orders) => HttpResponse::Ok().json(orders),
        Err(err) => service_error_response(err, "Failed to list orders"),
    }
}

#[get("/v1/orders/{transaction_id}")]
pub async fn api_v1_order_detail(
    transaction_id: web::Path<String>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match get_order(repo.get_ref(), &user, &transaction_id) {
        Ok(order) => HttpResponse::Ok().json(order),
        Err(err) => service_error_response(err, "Failed to load order"),
    }
}
