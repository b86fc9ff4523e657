use pushkind_common::repository::errors::RepositoryError;
use serde::Serialize;
use thiserror::Error;

use crate::repository::CommitError;

/// Classification of checkout failures, used to pick a response and decide
/// whether anything has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input. Nothing was written.
    Validation,
    /// A referenced record is missing. Nothing was written.
    NotFound,
    /// The request conflicts with current state. Nothing was written.
    Conflict,
    /// The order is committed but a follow-up step failed.
    PartialCommit,
    /// Unexpected store failure.
    Internal,
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;

/// Errors returned by quoting and checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("shipping option {0} does not exist")]
    InvalidShipping(i32),
    #[error("cart is empty")]
    EmptyCart,
    #[error("product {0} does not exist")]
    UnknownProduct(i32),
    #[error("not enough {product_name} in stock")]
    OutOfStock { product_name: String },
    #[error("internal error: {0}")]
    Internal(String),
}

impl CheckoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CheckoutError::Validation(_) => ErrorKind::Validation,
            CheckoutError::InvalidShipping(_) | CheckoutError::UnknownProduct(_) => {
                ErrorKind::NotFound
            }
            CheckoutError::EmptyCart | CheckoutError::OutOfStock { .. } => ErrorKind::Conflict,
            CheckoutError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<RepositoryError> for CheckoutError {
    fn from(value: RepositoryError) -> Self {
        CheckoutError::Internal(value.to_string())
    }
}

impl From<CommitError> for CheckoutError {
    fn from(value: CommitError) -> Self {
        match value {
            CommitError::InsufficientStock { product_name } => {
                CheckoutError::OutOfStock { product_name }
            }
            CommitError::UnknownProduct { product_id } => CheckoutError::UnknownProduct(product_id),
            other => CheckoutError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_kinds() {
        assert_eq!(
            CheckoutError::Validation("x".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(CheckoutError::InvalidShipping(1).kind(), ErrorKind::NotFound);
        assert_eq!(CheckoutError::UnknownProduct(1).kind(), ErrorKind::NotFound);
        assert_eq!(CheckoutError::EmptyCart.kind(), ErrorKind::Conflict);
        assert_eq!(
            CheckoutError::OutOfStock {
                product_name: "Shirt".into()
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(CheckoutError::Internal("db".into()).kind(), ErrorKind::Internal);
    }

    #[test]
    fn stock_shortfall_in_commit_is_a_conflict() {
        let err = CheckoutError::from(CommitError::InsufficientStock {
            product_name: "Shirt".into(),
        });

        assert!(matches!(err, CheckoutError::OutOfStock { ref product_name } if product_name == "Shirt"));
        assert_eq!(
            CheckoutError::from(CommitError::Repository(RepositoryError::NotFound)).kind(),
            ErrorKind::Internal
        );
    }
}
