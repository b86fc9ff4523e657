//! Work that runs after the checkout transaction has committed: buyer
//! notification and cart clearing. Failures here never undo the order.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::repository::errors::RepositoryError;
use pushkind_common::routes::check_role;
use pushkind_common::services::errors::{ServiceError, ServiceResult};
use serde::Serialize;
use thiserror::Error;
use tokio::time::{sleep, timeout};

use crate::SERVICE_ACCESS_ROLE;
use crate::config::{CheckoutSettings, FollowUpPolicy};
use crate::domain::checkout::{CheckoutStep, FollowUpFailure};
use crate::domain::order::{CommittedOrder, Order};
use crate::notifier::{Notifier, NotifyError, OrderConfirmation};
use crate::repository::{CartWriter, OrderReader, OrderWriter};

/// Most orders handled by one reconciliation run.
pub const RESEND_BATCH_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum FollowUpError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("notifier task failed: {0}")]
    Task(String),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// The buyer got the message but the order still reads as unconfirmed.
    #[error("confirmation delivered but not recorded: {0}")]
    Unrecorded(RepositoryError),
}

impl FollowUpError {
    /// A timed-out send may still complete in the background, so it is not repeated.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FollowUpError::Timeout(_))
    }
}

/// Run `operation` until it succeeds or `policy.max_attempts` is exhausted,
/// sleeping with exponential backoff between attempts.
pub async fn with_retry<F, Fut, T, E>(
    policy: &FollowUpPolicy,
    label: &str,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    with_retry_if(policy, label, |_: &E| true, operation).await
}

/// Like [`with_retry`], but gives up at once on errors `retryable` rejects.
pub async fn with_retry_if<F, Fut, T, E, P>(
    policy: &FollowUpPolicy,
    label: &str,
    retryable: P,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    P: Fn(&E) -> bool,
{
    let mut delay = policy.initial_backoff;
    let mut attempts = 0;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => {
                if attempts > 1 {
                    log::debug!("{label} succeeded after {attempts} attempts");
                }
                return Ok(result);
            }
            Err(error) => {
                if !retryable(&error) {
                    log::warn!("{label} failed and will not be retried: {error}");
                    return Err(error);
                }
                if attempts >= policy.max_attempts {
                    log::warn!("{label} failed after {attempts} attempts: {error}");
                    return Err(error);
                }

                log::warn!("{label} attempt {attempts} failed: {error}. Retrying in {delay:?}");
                sleep(delay).await;
                delay = policy.next_backoff(delay);
            }
        }
    }
}

/// One delivery attempt. The notifier may block, so it runs on the blocking
/// pool and is abandoned once `limit` elapses.
async fn deliver_once(
    notifier: Arc<dyn Notifier>,
    message: OrderConfirmation,
    limit: Duration,
) -> Result<(), FollowUpError> {
    let task = tokio::task::spawn_blocking(move || notifier.send(&message));

    match timeout(limit, task).await {
        Err(_) => Err(FollowUpError::Timeout(limit)),
        Ok(Err(join_err)) => Err(FollowUpError::Task(join_err.to_string())),
        Ok(Ok(result)) => result.map_err(FollowUpError::from),
    }
}

/// Deliver the confirmation for `order` and record that it was sent.
pub async fn send_confirmation<R>(
    repo: &R,
    notifier: Arc<dyn Notifier>,
    order: &Order,
    settings: &CheckoutSettings,
) -> Result<(), FollowUpError>
where
    R: OrderWriter + ?Sized,
{
    let policy = &settings.follow_up;
    let message = OrderConfirmation::for_order(order, &settings.store_name);

    with_retry_if(
        policy,
        "order confirmation",
        FollowUpError::is_retryable,
        || deliver_once(Arc::clone(&notifier), message.clone(), policy.notify_timeout),
    )
    .await?;

    let order_id = order.id;
    with_retry(policy, "confirmation bookkeeping", || async move {
        repo.mark_confirmation_sent(order_id)
    })
    .await
    .map_err(FollowUpError::Unrecorded)
}

/// Empty the buyer's cart, retrying transient store failures.
pub async fn clear_cart_with_retry<R>(
    repo: &R,
    hub_id: i32,
    user_sub: &str,
    policy: &FollowUpPolicy,
) -> Result<usize, FollowUpError>
where
    R: CartWriter + ?Sized,
{
    with_retry(policy, "cart clearing", || async move {
        repo.clear_cart(hub_id, user_sub)
            .map_err(FollowUpError::from)
    })
    .await
}

/// Run the post-commit steps for a checkout and collect the ones that failed.
///
/// A replayed order only gets its confirmation retried when it was never
/// delivered; the cart is left alone since it may hold new items.
pub async fn run_follow_ups<R>(
    repo: &R,
    notifier: Arc<dyn Notifier>,
    committed: &CommittedOrder,
    settings: &CheckoutSettings,
) -> Vec<FollowUpFailure>
where
    R: CartWriter + OrderWriter + ?Sized,
{
    let order = &committed.order;
    let mut failures = Vec::new();

    if !committed.replayed || order.confirmation_pending() {
        match send_confirmation(repo, notifier, order, settings).await {
            Ok(()) => log::debug!("checkout {}: {}", order.transaction_id, CheckoutStep::Notified),
            Err(err) => failures.push(FollowUpFailure {
                step: CheckoutStep::Notified,
                reason: err.to_string(),
            }),
        }
    }

    if !committed.replayed {
        match clear_cart_with_retry(repo, order.hub_id, &order.user_sub, &settings.follow_up).await
        {
            Ok(removed) => log::debug!(
                "checkout {}: {} ({removed} items)",
                order.transaction_id,
                CheckoutStep::CartCleared
            ),
            Err(err) => failures.push(FollowUpFailure {
                step: CheckoutStep::CartCleared,
                reason: err.to_string(),
            }),
        }
    }

    for failure in &failures {
        log::error!(
            "Order {} committed but {} failed: {}",
            order.transaction_id,
            failure.step,
            failure.reason
        );
    }

    failures
}

/// Outcome of a confirmation reconciliation run.
#[derive(Debug, Serialize, Default, PartialEq, Eq)]
pub struct ResendSummary {
    pub attempted: usize,
    pub sent: usize,
    /// Transaction ids whose confirmation still could not be delivered.
    pub failed: Vec<String>,
}

/// Re-send confirmations that were never delivered for the operator's store.
pub async fn resend_pending_confirmations<R>(
    repo: &R,
    notifier: Arc<dyn Notifier>,
    user: &AuthenticatedUser,
    settings: &CheckoutSettings,
) -> ServiceResult<ResendSummary>
where
    R: OrderReader + OrderWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let pending = repo
        .list_unconfirmed_orders(user.hub_id, RESEND_BATCH_LIMIT)
        .map_err(ServiceError::from)?;

    let mut summary = ResendSummary {
        attempted: pending.len(),
        ..ResendSummary::default()
    };

    for order in &pending {
        match send_confirmation(repo, Arc::clone(&notifier), order, settings).await {
            Ok(()) => summary.sent += 1,
            Err(err) => {
                log::error!(
                    "Confirmation for order {} still undelivered: {err}",
                    order.transaction_id
                );
                summary.failed.push(order.transaction_id.clone());
            }
        }
    }

    log::info!(
        "Resent {} of {} pending confirmations in hub {}",
        summary.sent,
        summary.attempted,
        user.hub_id
    );

    Ok(summary)
}
