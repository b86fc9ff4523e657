use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::cart::CartView;
use crate::forms::cart::AddCartItemForm;
use crate::repository::{CartReader, CartWriter, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Returns the caller's cart.
pub fn load_cart<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<CartView>
where
    R: CartReader + ?Sized,
{
    let items = repo
        .list_cart_items(user.hub_id, &user.sub)
        .map_err(ServiceError::from)?;
    Ok(CartView::from(items))
}

/// Adds a product to the caller's cart.
///
/// Fails with `NotFound` for unknown products and `Conflict` when the product is
/// already in the cart or the requested count exceeds available stock.
pub fn add_to_cart<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCartItemForm,
) -> ServiceResult<CartView>
where
    R: CartReader + CartWriter + ProductReader + ?Sized,
{
    let new_item = form
        .into_new_cart_item(user.hub_id, &user.sub)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let product = repo
        .get_product_by_id(new_item.product_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let items = repo
        .list_cart_items(user.hub_id, &user.sub)
        .map_err(ServiceError::from)?;
    if items.iter().any(|item| item.product_id == product.id) {
        return Err(ServiceError::Conflict);
    }

    if !product.has_stock_for(new_item.count) {
        return Err(ServiceError::Conflict);
    }

    repo.add_cart_item(&new_item).map_err(ServiceError::from)?;
    load_cart(repo, user)
}

/// Removes a product from the caller's cart.
pub fn remove_from_cart<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<CartView>
where
    R: CartReader + CartWriter + ?Sized,
{
    repo.remove_cart_item(user.hub_id, &user.sub, product_id)
        .map_err(ServiceError::from)?;
    load_cart(repo, user)
}

/// Removes every item; an already empty cart is a conflict.
pub fn empty_cart<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<CartView>
where
    R: CartWriter + ?Sized,
{
    let removed = repo
        .clear_cart(user.hub_id, &user.sub)
        .map_err(ServiceError::from)?;
    if removed == 0 {
        return Err(ServiceError::Conflict);
    }
    Ok(CartView::from(Vec::new()))
}
