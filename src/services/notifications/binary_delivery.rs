//! Delivery by running an external HTTP client (curl).

use super::delivery::{Delivery, DeliveryOutcome, duration_ms};
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Runs `<binary> -X POST --data-urlencode payload=<json> <endpoint>`
///
/// Arguments go straight to the process without a shell in between, so
/// neither the payload nor the endpoint can be interpreted as shell syntax.
/// `--data-urlencode` makes curl URL-encode the field value.
///
/// The exit status is reported in the outcome but never checked.
#[derive(Debug, Clone)]
pub struct BinaryShimDelivery {
    binary: PathBuf,
}

impl BinaryShimDelivery {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Arguments passed to the binary for one post
    pub fn command_args(json: &str, endpoint: &str) -> Vec<String> {
        vec![
            "-X".to_string(),
            "POST".to_string(),
            "--data-urlencode".to_string(),
            format!("payload={json}"),
            endpoint.to_string(),
        ]
    }
}

#[async_trait]
impl Delivery for BinaryShimDelivery {
    async fn post(&self, json: &str, endpoint: &str) -> AppResult<DeliveryOutcome> {
        let start = Instant::now();
        let args = Self::command_args(json, endpoint);
        let binary = self.binary.display().to_string();

        debug!(
            command = %shell_words::join(std::iter::once(binary.as_str()).chain(args.iter().map(String::as_str))),
            "Posting payload through external binary"
        );

        let output = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| AppError::Subprocess {
                binary: binary.clone(),
                source,
            })?;

        Ok(DeliveryOutcome {
            strategy: self.name().to_string(),
            status_code: None,
            exit_code: output.status.code(),
            response: Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            duration_ms: duration_ms(start.elapsed()),
        })
    }

    fn name(&self) -> &'static str {
        "binary"
    }
}
