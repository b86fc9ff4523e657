pub mod cart;
pub mod checkout;
pub mod coupon;
pub mod money;
pub mod order;
pub mod product;
pub mod shipping;
