//! HTTP reachability probe.
//!
//! Uses the curl crate (libcurl) with fixed connect/total timeouts. Failures
//! are classified so that the backoff loop retries connection-level trouble
//! and gives up on anything terminal (e.g. HTTP 404).

use anyhow::{Context, Result};
use std::time::Duration;

use crate::retry::{classify_curl_error, classify_http_status, transient};

/// Plain HTTP GET with a fixed per-call timeout.
pub trait HttpGet {
    /// Fetches `url` and returns the response body as text.
    fn get(&self, url: &str) -> Result<String>;
}

/// libcurl-backed [`HttpGet`].
pub struct CurlHttpGet {
    timeout: Duration,
}

impl CurlHttpGet {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl HttpGet for CurlHttpGet {
    fn get(&self, url: &str) -> Result<String> {
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url).context("invalid URL")?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.timeout)?;
        easy.timeout(self.timeout)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            if let Err(e) = transfer.perform() {
                let kind = classify_curl_error(&e);
                let err = anyhow::Error::new(e).context(format!("GET {}", url));
                return Err(if kind.is_transient() { transient(err) } else { err });
            }
        }

        let code = easy.response_code().context("no response code")?;
        if !(200..300).contains(&code) {
            let err = anyhow::anyhow!("GET {} returned HTTP {}", url, code);
            return Err(if classify_http_status(code).is_transient() {
                transient(err)
            } else {
                err
            });
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
