//! Delivery strategy abstraction.
//!
//! A delivery takes the serialized payload and the webhook URL and performs
//! the actual POST. The crate ships two strategies (native HTTP and an
//! external binary); callers may plug in their own through
//! [`DeliveryResolver::set_override`](super::DeliveryResolver::set_override).

use crate::error::AppResult;
use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// What a delivery reports back after posting
///
/// Nothing here is interpreted by the notifier: a 4xx response or a non-zero
/// exit code is still a completed delivery attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    /// Name of the strategy that performed the post
    pub strategy: String,
    /// HTTP status code, when the strategy talks HTTP itself
    pub status_code: Option<u16>,
    /// Process exit code, when the strategy runs a subprocess
    pub exit_code: Option<i32>,
    /// Response body or subprocess stdout
    pub response: Option<String>,
    /// Time taken for the operation in milliseconds
    pub duration_ms: u64,
}

impl DeliveryOutcome {
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            ..Default::default()
        }
    }
}

/// Milliseconds in `elapsed`, saturating at `u64::MAX`
pub(crate) fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Mechanism used to POST a serialized payload to a webhook
///
/// # Example Implementation
/// ```ignore
/// struct Stdout;
///
/// #[async_trait]
/// impl Delivery for Stdout {
///     async fn post(&self, json: &str, endpoint: &str) -> AppResult<DeliveryOutcome> {
///         println!("{endpoint} <- {json}");
///         Ok(DeliveryOutcome::new(self.name()))
///     }
///
///     fn name(&self) -> &'static str {
///         "stdout"
///     }
/// }
/// ```
#[async_trait]
pub trait Delivery: Send + Sync {
    /// Posts `json` to `endpoint`
    async fn post(&self, json: &str, endpoint: &str) -> AppResult<DeliveryOutcome>;

    /// Short identifier used in logs and outcomes
    fn name(&self) -> &'static str;
}

/// Adapts an async closure taking `(json, endpoint)` into a [`Delivery`]
pub struct FnDelivery<F> {
    callback: F,
}

impl<F> FnDelivery<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F, Fut> Delivery for FnDelivery<F>
where
    F: Fn(String, String) -> Fut + Send + Sync,
    Fut: Future<Output = AppResult<DeliveryOutcome>> + Send,
{
    async fn post(&self, json: &str, endpoint: &str) -> AppResult<DeliveryOutcome> {
        (self.callback)(json.to_string(), endpoint.to_string()).await
    }

    fn name(&self) -> &'static str {
        "callback"
    }
}

/// Wraps an async closure as a shareable delivery
pub fn delivery_fn<F, Fut>(callback: F) -> Arc<dyn Delivery>
where
    F: Fn(String, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = AppResult<DeliveryOutcome>> + Send + 'static,
{
    Arc::new(FnDelivery::new(callback))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_duration_ms_saturates() {
        assert_eq!(duration_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn test_fn_delivery_receives_arguments_verbatim() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let delivery = delivery_fn(move |json, endpoint| {
            let sink = sink.clone();
            async move {
                sink.lock().unwrap().push((json, endpoint));
                Ok(DeliveryOutcome::new("callback"))
            }
        });

        let outcome = delivery
            .post(r#"{"text":"hi"}"#, "https://hooks.slack.com/services/T/B/X")
            .await
            .unwrap();

        assert_eq!(outcome.strategy, "callback");
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[(
                r#"{"text":"hi"}"#.to_string(),
                "https://hooks.slack.com/services/T/B/X".to_string()
            )]
        );
    }
}
