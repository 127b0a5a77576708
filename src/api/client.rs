use anyhow::Context;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server returned an error: {status}")]
    Status { status: u16 },

    #[error("no subject identifier in session, sign in first")]
    MissingSession,
}

pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Blocking JSON client for the Coursebook backend. One logical flow runs
/// its calls in sequence; no cancellation, transport-default timeouts.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            agent: ureq::Agent::new(),
            base_url: config.base_url.clone(),
            token: None,
        }
    }

    pub fn with_token(config: &Config, token: String) -> Self {
        let mut client = Self::new(config);
        client.token = Some(token);
        client
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: &str, path: &str) -> ureq::Request {
        let mut request = self
            .agent
            .request(method, &format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }
        request
    }

    pub(crate) fn get_json(&self, path: &str) -> anyhow::Result<Value> {
        let response = self
            .request("GET", path)
            .call()
            .map_err(map_error)
            .with_context(|| format!("GET {} failed", path))?;

        response.into_json().context("Failed to read response body")
    }

    pub(crate) fn send_json(
        &self,
        method: &str,
        path: &str,
        body: &impl Serialize,
    ) -> anyhow::Result<Value> {
        let response = self
            .request(method, path)
            .send_json(body)
            .map_err(map_error)
            .with_context(|| format!("{} {} failed", method, path))?;

        response.into_json().context("Failed to read response body")
    }

    /// For endpoints whose response body carries nothing we use.
    pub(crate) fn call_no_body(&self, method: &str, path: &str) -> anyhow::Result<()> {
        self.request(method, path)
            .call()
            .map_err(map_error)
            .with_context(|| format!("{} {} failed", method, path))?;
        Ok(())
    }

    /// Multipart upload, every file under the same form field. ureq has no
    /// multipart support, so the body is assembled by hand.
    pub(crate) fn upload(
        &self,
        path: &str,
        field: &str,
        files: &[UploadFile],
    ) -> anyhow::Result<()> {
        let boundary = "------coursebook-multipart";
        let mut body = Vec::new();
        for file in files {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    boundary, field, file.name
                )
                .as_bytes(),
            );
            body.extend_from_slice(&file.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

        self.request("POST", path)
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={}", boundary),
            )
            .send_bytes(&body)
            .map_err(map_error)
            .with_context(|| format!("POST {} failed", path))?;
        Ok(())
    }

    /// Raw call for the caller to inspect the status itself (token checks).
    pub(crate) fn status_of(&self, method: &str, path: &str) -> anyhow::Result<u16> {
        match self.request(method, path).call() {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(code, _)) => Ok(code),
            Err(other) => Err(ApiError::Http(other))
                .with_context(|| format!("{} {} failed", method, path)),
        }
    }
}

fn map_error(e: ureq::Error) -> ApiError {
    match e {
        ureq::Error::Status(code, _) => ApiError::Status { status: code },
        other => ApiError::Http(other),
    }
}
