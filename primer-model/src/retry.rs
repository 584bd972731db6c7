//! Backoff for Gemini calls that fail transiently.
//!
//! Both the chat client and the embedding client report HTTP failures as
//! `PrimerError::Model("HTTP <status>: <body>")`. [`is_transient`] reads the
//! status back out of that text, so a 429 or 503 is retried while a 400 for a
//! bad API key fails at once.

use primer_core::{PrimerError, Result};
use std::future::Future;
use std::time::Duration;

/// How often and how patiently a request is repeated.
///
/// The wait starts at `initial_delay` and doubles after every failed attempt,
/// never exceeding `max_delay`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self { max_retries: 0, ..Self::default() }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Wait before retry number `retry` (0-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Runs `request` until it succeeds, fails with a permanent error, or the
    /// retries are used up. The last error is returned as is.
    pub async fn run<T, F, Fut>(&self, mut request: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry = 0;
        loop {
            let error = match request().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };
            if retry >= self.max_retries || !is_transient(&error) {
                return Err(error);
            }

            let delay = self.delay_for(retry);
            retry += 1;
            primer_telemetry::warn!(
                retry,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Gemini request failed, backing off"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Status code of an `HTTP <status>: ...` model error.
fn http_status(message: &str) -> Option<u16> {
    let rest = message.strip_prefix("HTTP ")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Whether a failed model call may succeed when repeated.
///
/// Timeouts, rate limiting and server-side failures qualify. So do transport
/// errors that mention a timeout or a dropped connection.
pub fn is_transient(error: &PrimerError) -> bool {
    let PrimerError::Model(message) = error else {
        return false;
    };

    if let Some(status) = http_status(message) {
        return matches!(status, 408 | 429 | 500..=599);
    }

    let lower = message.to_lowercase();
    ["rate limit", "resource_exhausted", "timed out", "timeout", "connection"]
        .iter()
        .any(|hint| lower.contains(hint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn instant(max_retries: u32) -> RetryConfig {
        RetryConfig::default()
            .with_max_retries(max_retries)
            .with_initial_delay(Duration::ZERO)
            .with_max_delay(Duration::ZERO)
    }

    #[test]
    fn test_delay_doubles_up_to_cap() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(0), Duration::from_millis(250));
        assert_eq!(config.delay_for(1), Duration::from_millis(500));
        assert_eq!(config.delay_for(4), Duration::from_secs(4));
        assert_eq!(config.delay_for(5), Duration::from_secs(5));
        assert_eq!(config.delay_for(40), Duration::from_secs(5));
    }

    #[test]
    fn test_transient_classification() {
        let model = |m: &str| PrimerError::Model(m.to_string());

        assert!(is_transient(&model("HTTP 429: quota exceeded")));
        assert!(is_transient(&model("HTTP 503: model overloaded")));
        assert!(is_transient(&model("HTTP 408: ")));
        assert!(is_transient(&model("request failed: operation timed out")));

        assert!(!is_transient(&model("HTTP 400: API key not valid")));
        assert!(!is_transient(&model("HTTP 404: 5000 models searched")));
        assert!(!is_transient(&model("invalid Gemini response: missing field")));
        assert!(!is_transient(&PrimerError::Tool("HTTP 503".to_string())));
    }

    #[tokio::test]
    async fn test_run_retries_transient_errors() {
        let calls = Mutex::new(0);
        let result = instant(2)
            .run(|| {
                let mut n = calls.lock().unwrap();
                *n += 1;
                let attempt = *n;
                async move {
                    if attempt < 3 {
                        Err(PrimerError::Model("HTTP 429: slow down".to_string()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, 3);
    }

    #[tokio::test]
    async fn test_run_gives_up_after_max_retries() {
        let calls = Mutex::new(0);
        let err = instant(1)
            .run(|| {
                *calls.lock().unwrap() += 1;
                async { Err::<(), _>(PrimerError::Model("HTTP 500: boom".to_string())) }
            })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), PrimerError::Model("HTTP 500: boom".to_string()).to_string());
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let calls = Mutex::new(0);
        let _ = RetryConfig::default()
            .run(|| {
                *calls.lock().unwrap() += 1;
                async { Err::<(), _>(PrimerError::Model("HTTP 401: unauthorized".to_string())) }
            })
            .await;

        assert_eq!(*calls.lock().unwrap(), 1);
    }
}
