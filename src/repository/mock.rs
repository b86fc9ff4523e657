use mockall::mock;

use super::{
    CartReader, CartWriter, CommitError, CouponReader, CouponWriter, OrderReader, OrderWriter,
    ProductReader, ProductWriter, ShippingReader, ShippingWriter,
};
use crate::domain::{
    cart::{CartItem, NewCartItem},
    coupon::{CouponRule, NewCoupon},
    order::{CommittedOrder, NewOrder, Order, OrderListQuery},
    product::{NewProduct, Product},
    shipping::{NewShippingOption, ShippingOption},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products_by_ids(&self, hub_id: i32, ids: &[i32]) -> RepositoryResult<Vec<Product>>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    }
}

mock! {
    pub CartReader {}

    impl CartReader for CartReader {
        fn list_cart_items(&self, hub_id: i32, user_sub: &str) -> RepositoryResult<Vec<CartItem>>;
    }
}

mock! {
    pub CartWriter {}

    impl CartWriter for CartWriter {
        fn add_cart_item(&self, new_item: &NewCartItem) -> RepositoryResult<CartItem>;
        fn remove_cart_item(&self, hub_id: i32, user_sub: &str, product_id: i32) -> RepositoryResult<()>;
        fn clear_cart(&self, hub_id: i32, user_sub: &str) -> RepositoryResult<usize>;
    }
}

mock! {
    pub CouponReader {}

    impl CouponReader for CouponReader {
        fn find_coupon_by_code(&self, hub_id: i32, code: &str) -> RepositoryResult<Option<CouponRule>>;
    }
}

mock! {
    pub CouponWriter {}

    impl CouponWriter for CouponWriter {
        fn create_coupon(&self, new_coupon: &NewCoupon) -> RepositoryResult<CouponRule>;
    }
}

mock! {
    pub ShippingReader {}

    impl ShippingReader for ShippingReader {
        fn get_shipping_option(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<ShippingOption>>;
        fn list_shipping_options(&self, hub_id: i32) -> RepositoryResult<Vec<ShippingOption>>;
    }
}

mock! {
    pub ShippingWriter {}

    impl ShippingWriter for ShippingWriter {
        fn create_shipping_option(&self, new_option: &NewShippingOption) -> RepositoryResult<ShippingOption>;
    }
}

mock! {
    pub OrderReader {}

    impl OrderReader for OrderReader {
        fn get_order_by_transaction_id(&self, hub_id: i32, user_sub: &str, transaction_id: &str) -> RepositoryResult<Option<Order>>;
        fn find_order_by_idempotency_key(&self, hub_id: i32, user_sub: &str, key: &str) -> RepositoryResult<Option<Order>>;
        fn list_orders(&self, query: OrderListQuery) -> RepositoryResult<(usize, Vec<Order>)>;
        fn list_unconfirmed_orders(&self, hub_id: i32, limit: usize) -> RepositoryResult<Vec<Order>>;
    }
}

mock! {
    pub OrderWriter {}

    impl OrderWriter for OrderWriter {
        fn commit_checkout(&self, new_order: &NewOrder) -> Result<CommittedOrder, CommitError>;
        fn mark_confirmation_sent(&self, order_id: i32) -> RepositoryResult<()>;
    }
}
