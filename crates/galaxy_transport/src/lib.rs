//! HTTP transport for the `galaxy` interaction loop's alien-proxy round
//! trips: modulate the outgoing value, `POST` it as the request body,
//! demodulate the response body as the next event.

use galaxy_core::{demodulate, modulate, AlienProxy, CodecError, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to alien proxy failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("alien proxy returned HTTP {status}: {body}")]
    BadStatus { status: u16, body: String },
    #[error("alien proxy reply was not a valid modulated value: {0}")]
    Codec(#[from] CodecError),
}

/// Sends modulated `galaxy` values to a remote alien proxy over HTTP and
/// demodulates its replies.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        HttpTransport {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn send_inner(&self, request: &Value) -> Result<Value, TransportError> {
        let body = modulate(request);
        let url = format!("{}/aliens/send", self.base_url.trim_end_matches('/'));
        log::debug!("sending {} bits to {url}", body.len());

        let mut req = self.client.post(&url).body(body);
        if let Some(key) = &self.api_key {
            req = req.query(&[("apiKey", key)]);
        }
        let resp = req.send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(TransportError::BadStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        log::debug!("alien proxy replied with {} bits", text.len());
        Ok(demodulate(&text)?)
    }
}

impl AlienProxy for HttpTransport {
    fn send(&mut self, request: &Value) -> Result<Value, String> {
        self.send_inner(request).map_err(|e| e.to_string())
    }
}

/// An [`AlienProxy`] that never actually sends anything, for galaxy
/// programs whose interaction loop never sets `flag = 1`, or for tests.
pub use galaxy_core::NullProxy as NullTransport;
