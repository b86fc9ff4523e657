use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::checkout::{CheckoutRequest, QuoteRequest, ShippingAddress};

const FIELD_MAX_LEN: u64 = 255;
const COUPON_MAX_LEN: u64 = 64;
const PHONE_MAX_LEN: u64 = 32;

pub type CheckoutFormResult<T> = Result<T, CheckoutFormError>;

#[derive(Debug, Error)]
pub enum CheckoutFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// `shipping_id` is not a positive integer.
    #[error("shipping id must be a positive integer")]
    InvalidShippingId,
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
}

/// Query string of the quote endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct QuoteQuery {
    #[validate(length(min = 1, max = 32))]
    pub shipping_id: String,
    #[validate(length(max = COUPON_MAX_LEN))]
    pub coupon_code: Option<String>,
}

impl QuoteQuery {
    pub fn into_quote_request(self) -> CheckoutFormResult<QuoteRequest> {
        self.validate()?;
        build_quote_request(&self.shipping_id, self.coupon_code)
    }
}

/// JSON body of the checkout endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutForm {
    #[validate(length(min = 1, max = 32))]
    pub shipping_id: String,
    #[validate(length(max = COUPON_MAX_LEN))]
    pub coupon_code: Option<String>,
    #[validate(length(min = 1, max = FIELD_MAX_LEN))]
    pub full_name: String,
    #[validate(length(min = 1, max = FIELD_MAX_LEN))]
    pub address_line_1: String,
    #[validate(length(max = FIELD_MAX_LEN))]
    pub address_line_2: Option<String>,
    #[validate(length(min = 1, max = FIELD_MAX_LEN))]
    pub city: String,
    #[validate(length(min = 1, max = FIELD_MAX_LEN))]
    pub state_province_region: String,
    #[validate(length(min = 1, max = FIELD_MAX_LEN))]
    pub postal_zip_code: String,
    #[validate(length(min = 1, max = FIELD_MAX_LEN))]
    pub country_region: String,
    #[validate(length(min = 1, max = PHONE_MAX_LEN))]
    pub telephone_number: String,
}

impl CheckoutForm {
    /// Validate the body and attach the optional idempotency key from the request
    /// headers.
    pub fn into_checkout_request(
        self,
        idempotency_key: Option<String>,
    ) -> CheckoutFormResult<CheckoutRequest> {
        self.validate()?;

        let quote = build_quote_request(&self.shipping_id, self.coupon_code)?;
        let address = ShippingAddress {
            full_name: required("full_name", &self.full_name)?,
            address_line_1: required("address_line_1", &self.address_line_1)?,
            address_line_2: self
                .address_line_2
                .map(|line| line.trim().to_string())
                .filter(|line| !line.is_empty()),
            city: required("city", &self.city)?,
            state_province_region: required("state_province_region", &self.state_province_region)?,
            postal_zip_code: required("postal_zip_code", &self.postal_zip_code)?,
            country_region: required("country_region", &self.country_region)?,
            telephone_number: required("telephone_number", &self.telephone_number)?,
        };

        Ok(CheckoutRequest {
            quote,
            address,
            idempotency_key,
        })
    }
}

fn build_quote_request(
    shipping_id: &str,
    coupon_code: Option<String>,
) -> CheckoutFormResult<QuoteRequest> {
    let shipping_id = shipping_id
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(CheckoutFormError::InvalidShippingId)?;

    let mut request = QuoteRequest::new(shipping_id);
    if let Some(code) = coupon_code {
        request = request.with_coupon(code);
    }
    Ok(request)
}

fn required(field: &'static str, value: &str) -> CheckoutFormResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CheckoutFormError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}
