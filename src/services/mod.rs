pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod cart;
pub mod checkout;
pub mod coupons;
pub mod errors;
pub mod follow_up;
pub mod inventory;
pub mod orders;
pub mod pricing;
pub mod shipping;
