//! Classify curl and HTTP failures for transient/terminal marking.

/// High-level classification of a transport failure.
///
/// This intentionally stays generic; callers map curl errors, HTTP status
/// codes, or IO failures into these kinds and then ask [`ErrorKind::is_transient`]
/// whether the failure is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operation timed out (connect/read).
    Timeout,
    /// Server asked us to slow down (e.g. 429, 503).
    Throttled,
    /// Network-level failure (connection refused, DNS, reset).
    Connection,
    /// Retryable HTTP status that is not throttling (5xx).
    Http5xx(u16),
    /// Any other failure (malformed request, 4xx, programmer error). Not retried.
    Other,
}

impl ErrorKind {
    /// True for kinds that a retry can plausibly outlast.
    pub fn is_transient(self) -> bool {
        !matches!(self, ErrorKind::Other)
    }
}

/// Classify an HTTP status code.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
        assert!(classify_http_status(503).is_transient());
    }

    #[test]
    fn http_5xx_transient() {
        assert!(matches!(classify_http_status(500), ErrorKind::Http5xx(500)));
        assert!(matches!(classify_http_status(502), ErrorKind::Http5xx(502)));
        assert!(classify_http_status(502).is_transient());
    }

    #[test]
    fn http_4xx_terminal() {
        assert_eq!(classify_http_status(404), ErrorKind::Other);
        assert_eq!(classify_http_status(403), ErrorKind::Other);
        assert!(!classify_http_status(404).is_transient());
    }

    #[test]
    fn success_codes_are_not_kinds_we_retry() {
        assert_eq!(classify_http_status(200), ErrorKind::Other);
        assert_eq!(classify_http_status(301), ErrorKind::Other);
    }
}
