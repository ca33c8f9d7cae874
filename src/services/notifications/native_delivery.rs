//! Delivery through the in-process HTTP client.

use super::delivery::{Delivery, DeliveryOutcome, duration_ms};
use crate::config::DeliverySettings;
use crate::error::{AppError, AppResult};
use crate::external::client::build_http_client;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Instant;
use tracing::debug;

/// Posts `payload=<json>` with reqwest
///
/// The JSON is embedded in the form body as-is. It is deliberately not
/// URL-encoded here, unlike [`BinaryShimDelivery`](super::BinaryShimDelivery)
/// which has curl encode it.
#[derive(Clone)]
pub struct NativeHttpDelivery {
    client: reqwest::Client,
}

impl NativeHttpDelivery {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Builds a delivery with a client configured from delivery settings
    pub fn from_settings(settings: &DeliverySettings) -> AppResult<Self> {
        Ok(Self::new(build_http_client(settings)?))
    }

    /// Request body sent for a serialized payload
    pub fn form_body(json: &str) -> String {
        format!("payload={json}")
    }
}

#[async_trait]
impl Delivery for NativeHttpDelivery {
    async fn post(&self, json: &str, endpoint: &str) -> AppResult<DeliveryOutcome> {
        let start = Instant::now();
        let body = Self::form_body(json);
        debug!(endpoint, bytes = body.len(), "Posting payload over HTTP");

        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|source| AppError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status_code = response.status().as_u16();
        let response_text = response.text().await.ok();

        Ok(DeliveryOutcome {
            strategy: self.name().to_string(),
            status_code: Some(status_code),
            exit_code: None,
            response: response_text,
            duration_ms: duration_ms(start.elapsed()),
        })
    }

    fn name(&self) -> &'static str {
        "native"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn delivery() -> NativeHttpDelivery {
        NativeHttpDelivery::from_settings(&DeliverySettings::default()).unwrap()
    }

    #[test]
    fn test_form_body_embeds_json_verbatim() {
        let json = r#"{"text":"a & b = c?"}"#;
        assert_eq!(
            NativeHttpDelivery::form_body(json),
            r#"payload={"text":"a & b = c?"}"#
        );
    }

    #[tokio::test]
    async fn test_post_sends_unencoded_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/services/T000/B000/XXXX"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string(r#"payload={"text":"100% done & shipped"}"#))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = format!("{}/services/T000/B000/XXXX", server.uri());
        let outcome = delivery()
            .post(r#"{"text":"100% done & shipped"}"#, &endpoint)
            .await
            .unwrap();

        assert_eq!(outcome.strategy, "native");
        assert_eq!(outcome.status_code, Some(200));
        assert_eq!(outcome.response.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_error_status_is_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no_team"))
            .mount(&server)
            .await;

        let outcome = delivery()
            .post(r#"{"text":"x"}"#, &format!("{}/services/T/B/X", server.uri()))
            .await
            .unwrap();

        assert_eq!(outcome.status_code, Some(404));
        assert_eq!(outcome.response.as_deref(), Some("no_team"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let result = delivery()
            .post(r#"{"text":"x"}"#, "http://127.0.0.1:1/services/T/B/X")
            .await;

        match result {
            Err(AppError::Transport { endpoint, .. }) => {
                assert_eq!(endpoint, "http://127.0.0.1:1/services/T/B/X");
            }
            other => panic!("Expected Transport error, got {other:?}"),
        }
    }
}
