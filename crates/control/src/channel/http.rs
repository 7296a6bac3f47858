//! HTTP long-polling channel
//!
//! | Request                          | Meaning                                |
//! |----------------------------------|----------------------------------------|
//! | `GET current`                    | 200 + Emulation if active, 204 if not  |
//! | `GET next/{id}`                  | 200 + Emulation = start, 204 = stop    |
//! | `POST state/{id}/running`        | body: EmulationInfo                    |
//! | `GET state/{id}/stopped`         |                                        |
//! | `POST intermediate/{id}`         | body: Intermediate                     |
//!
//! `next` has no timeout: the controller holds it until a command exists.

use std::time::Duration;

use async_trait::async_trait;
use drift_config::ControlConfig;
use drift_model::{Emulation, EmulationInfo, Intermediate};
use reqwest::{Client, Response, StatusCode};
use tracing::trace;

use super::{Command, ControlChannel};
use crate::error::{ControlError, Result};
use crate::session_id::SessionId;

/// Channel to an HTTP controller
#[derive(Debug, Clone)]
pub struct HttpChannel {
    client: Client,
    /// Base URL with a trailing slash
    base: String,
    id: SessionId,
    request_timeout: Duration,
}

impl HttpChannel {
    /// Create a channel from the control config
    ///
    /// With `tls` enabled, self-signed certificates are accepted: the
    /// controller is a local companion process.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ControlConfig, id: SessionId) -> Result<Self> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.tls)
            .build()?;

        Ok(Self {
            client,
            base: config.base_url(),
            id,
            request_timeout: config.request_timeout,
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Decode a 200/204 response into an optional emulation
    async fn emulation_or_none(endpoint: &str, response: Response) -> Result<Option<Emulation>> {
        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await?;
                Ok(Some(serde_json::from_slice(&body)?))
            }
            StatusCode::NO_CONTENT => Ok(None),
            status => Err(ControlError::unexpected_status(endpoint, status.as_u16())),
        }
    }

    fn ensure_success(endpoint: &str, response: &Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ControlError::unexpected_status(
                endpoint,
                response.status().as_u16(),
            ))
        }
    }
}

#[async_trait]
impl ControlChannel for HttpChannel {
    fn name(&self) -> &'static str {
        "http"
    }

    fn target(&self) -> &str {
        &self.base
    }

    async fn open(&self) -> Result<()> {
        Ok(())
    }

    async fn current(&self) -> Result<Option<Emulation>> {
        let response = self
            .client
            .get(self.url("current"))
            .timeout(self.request_timeout)
            .send()
            .await?;
        Self::emulation_or_none("current", response).await
    }

    async fn next(&self) -> Result<Command> {
        let endpoint = format!("next/{}", self.id);
        let response = self.client.get(self.url(&endpoint)).send().await?;

        let command = match Self::emulation_or_none(&endpoint, response).await? {
            Some(emulation) => Command::Start(Box::new(emulation)),
            None => Command::Stop,
        };
        trace!(?command, "command received");
        Ok(command)
    }

    async fn report_running(&self, info: &EmulationInfo) -> Result<()> {
        let endpoint = format!("state/{}/running", self.id);
        let response = self
            .client
            .post(self.url(&endpoint))
            .timeout(self.request_timeout)
            .json(info)
            .send()
            .await?;
        Self::ensure_success(&endpoint, &response)
    }

    async fn report_stopped(&self) -> Result<()> {
        let endpoint = format!("state/{}/stopped", self.id);
        let response = self
            .client
            .get(self.url(&endpoint))
            .timeout(self.request_timeout)
            .send()
            .await?;
        Self::ensure_success(&endpoint, &response)
    }

    async fn report_intermediate(&self, report: &Intermediate) -> Result<()> {
        let endpoint = format!("intermediate/{}", self.id);
        let response = self
            .client
            .post(self.url(&endpoint))
            .timeout(self.request_timeout)
            .json(report)
            .send()
            .await?;
        Self::ensure_success(&endpoint, &response)
    }
}
