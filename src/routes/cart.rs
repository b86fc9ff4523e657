use actix_web::{HttpResponse, Responder, delete, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::cart::AddCartItemForm;
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::cart::{add_to_cart, empty_cart, load_cart, remove_from_cart};

#[get("/v1/cart")]
pub async fn api_v1_cart(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match load_cart(repo.get_ref(), &user) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(err) => service_error_response(err, "Failed to load cart"),
    }
}

#[post("/v1/cart/items")]
pub async fn api_v1_cart_add_item(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    form: web::Json<AddCartItemForm>,
) -> impl Responder {
    match add_to_cart(repo.get_ref(), &user, form.into_inner()) {
        Ok(cart) => HttpResponse::Created().json(cart),
        Err(err) => service_error_response(err, "Failed to add cart item"),
    }
}

#[delete("/v1/cart/items/{product_id}")]
pub async fn api_v1_cart_remove_item(
    product_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match remove_from_cart(repo.get_ref(), &user, product_id.into_inner()) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(err) => service_error_response(err, "Failed to remove cart item"),
    }
}

#[delete("/v1/cart")]
pub async fn api_v1_cart_clear(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match empty_cart(repo.get_ref(), &user) {
        Ok(cart) => HttpResponse::Ok().json(cart),
        Err(err) => service_error_response(err, "Failed to clear cart"),
    }
}
