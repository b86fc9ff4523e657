//! Runtime settings read from the environment.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

pub const DEFAULT_TAX_RATE: &str = "0.19";
pub const DEFAULT_STORE_NAME: &str = "Shop Time";
pub const DEFAULT_IDEMPOTENCY_WINDOW_SECS: u64 = 300;
pub const DEFAULT_NOTIFY_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_FOLLOW_UP_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_FOLLOW_UP_INITIAL_BACKOFF_MS: u64 = 200;
pub const DEFAULT_FOLLOW_UP_MAX_BACKOFF_MS: u64 = 5_000;

/// Retry and timeout rules for the steps that run after an order is committed.
#[derive(Debug, Clone)]
pub struct FollowUpPolicy {
    /// Attempts per step, including the first one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_factor: f64,
    /// Upper bound for a single notification attempt.
    pub notify_timeout: Duration,
}

impl Default for FollowUpPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_FOLLOW_UP_MAX_ATTEMPTS,
            initial_backoff: Duration::from_millis(DEFAULT_FOLLOW_UP_INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(DEFAULT_FOLLOW_UP_MAX_BACKOFF_MS),
            backoff_factor: 2.0,
            notify_timeout: Duration::from_millis(DEFAULT_NOTIFY_TIMEOUT_MS),
        }
    }
}

impl FollowUpPolicy {
    /// Delay before the attempt following one that waited `current`.
    pub fn next_backoff(&self, current: Duration) -> Duration {
        current.mul_f64(self.backoff_factor).min(self.max_backoff)
    }
}

/// Pricing and checkout settings shared by the quote and checkout handlers.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub tax_rate: Decimal,
    /// Signature used in buyer notifications.
    pub store_name: String,
    /// Width of the time bucket used for server-derived idempotency keys.
    pub idempotency_window: Duration,
    pub follow_up: FollowUpPolicy,
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(19, 2),
            store_name: DEFAULT_STORE_NAME.to_string(),
            idempotency_window: Duration::from_secs(DEFAULT_IDEMPOTENCY_WINDOW_SECS),
            follow_up: FollowUpPolicy::default(),
        }
    }
}

impl CheckoutSettings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source. Missing variables use
    /// defaults; malformed ones are logged and replaced by defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let tax_rate = parse_or("TAX_RATE", lookup("TAX_RATE"), defaults.tax_rate);
        let tax_rate = if tax_rate.is_sign_negative() {
            log::warn!("TAX_RATE must not be negative, using {DEFAULT_TAX_RATE}");
            defaults.tax_rate
        } else {
            tax_rate
        };

        let store_name = lookup("STORE_NAME")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.store_name);

        let window_secs = parse_or(
            "IDEMPOTENCY_WINDOW_SECS",
            lookup("IDEMPOTENCY_WINDOW_SECS"),
            DEFAULT_IDEMPOTENCY_WINDOW_SECS,
        )
        .max(1);

        let max_attempts = parse_or(
            "FOLLOW_UP_MAX_ATTEMPTS",
            lookup("FOLLOW_UP_MAX_ATTEMPTS"),
            DEFAULT_FOLLOW_UP_MAX_ATTEMPTS,
        )
        .max(1);

        let initial_backoff_ms = parse_or(
            "FOLLOW_UP_INITIAL_BACKOFF_MS",
            lookup("FOLLOW_UP_INITIAL_BACKOFF_MS"),
            DEFAULT_FOLLOW_UP_INITIAL_BACKOFF_MS,
        );
        let max_backoff_ms = parse_or(
            "FOLLOW_UP_MAX_BACKOFF_MS",
            lookup("FOLLOW_UP_MAX_BACKOFF_MS"),
            DEFAULT_FOLLOW_UP_MAX_BACKOFF_MS,
        )
        .max(initial_backoff_ms);
        let notify_timeout_ms = parse_or(
            "NOTIFY_TIMEOUT_MS",
            lookup("NOTIFY_TIMEOUT_MS"),
            DEFAULT_NOTIFY_TIMEOUT_MS,
        );

        Self {
            tax_rate,
            store_name,
            idempotency_window: Duration::from_secs(window_secs),
            follow_up: FollowUpPolicy {
                max_attempts,
                initial_backoff: Duration::from_millis(initial_backoff_ms),
                max_backoff: Duration::from_millis(max_backoff_ms),
                notify_timeout: Duration::from_millis(notify_timeout_ms),
                ..defaults.follow_up
            },
        }
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = raw else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(err) => {
            log::warn!("Ignoring malformed {name}={raw:?} ({err}), using {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> CheckoutSettings {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CheckoutSettings::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = settings(&[]);

        assert_eq!(settings.tax_rate, dec!(0.19));
        assert_eq!(settings.store_name, "Shop Time");
        assert_eq!(settings.idempotency_window, Duration::from_secs(300));
        assert_eq!(settings.follow_up.max_attempts, 3);
        assert_eq!(settings.follow_up.notify_timeout, Duration::from_secs(10));
    }

    #[test]
    fn values_are_read_from_lookup() {
        let settings = settings(&[
            ("TAX_RATE", "0.07"),
            ("STORE_NAME", "Corner Shop"),
            ("FOLLOW_UP_MAX_ATTEMPTS", "5"),
            ("NOTIFY_TIMEOUT_MS", "250"),
        ]);

        assert_eq!(settings.tax_rate, dec!(0.07));
        assert_eq!(settings.store_name, "Corner Shop");
        assert_eq!(settings.follow_up.max_attempts, 5);
        assert_eq!(settings.follow_up.notify_timeout, Duration::from_millis(250));
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let settings = settings(&[
            ("TAX_RATE", "nineteen"),
            ("IDEMPOTENCY_WINDOW_SECS", "-1"),
            ("FOLLOW_UP_MAX_ATTEMPTS", "0"),
        ]);

        assert_eq!(settings.tax_rate, dec!(0.19));
        assert_eq!(settings.idempotency_window, Duration::from_secs(300));
        assert_eq!(settings.follow_up.max_attempts, 1);
    }

    #[test]
    fn backoff_grows_until_capped() {
        let policy = FollowUpPolicy {
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(300),
            ..FollowUpPolicy::default()
        };

        assert_eq!(
            policy.next_backoff(Duration::from_millis(100)),
            Duration::from_millis(200)
        );
        assert_eq!(
            policy.next_backoff(Duration::from_millis(200)),
            Duration::from_millis(300)
        );
    }
}
