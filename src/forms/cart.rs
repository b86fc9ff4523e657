use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::domain::cart::NewCartItem;

/// Largest quantity of one product a cart line may hold.
const MAX_COUNT: i32 = 1_000;

fn default_count() -> i32 {
    1
}

/// Payload for adding a product to the cart.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCartItemForm {
    #[validate(range(min = 1))]
    pub product_id: i32,
    #[serde(default = "default_count")]
    #[validate(range(min = 1, max = MAX_COUNT))]
    pub count: i32,
}

impl AddCartItemForm {
    pub fn into_new_cart_item(
        self,
        hub_id: i32,
        user_sub: &str,
    ) -> Result<NewCartItem, ValidationErrors> {
        self.validate()?;
        Ok(NewCartItem::new(hub_id, user_sub, self.product_id, self.count))
    }
}
