//! A single retry policy type covering both retry tiers of [`crate::RetryClient`]:
//! the adapter tier (transport failures and retryable statuses, exponential
//! backoff) and the manual tier (timeouts and connection failures only,
//! linear backoff).

use crate::http::error::TransportError;
use log::warn;
use std::future::Future;
use std::time::Duration;

/// HTTP statuses retried by the adapter tier.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// One HTTP exchange that reached the server, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Delay before a retry, as a function of the zero-based retry number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Retry immediately.
    None,
    /// No delay before the first retry, then `factor * 2^retry`, capped at `max`.
    Exponential { factor: Duration, max: Duration },
    /// `step * (retry + 1)`.
    Linear { step: Duration },
}

impl Backoff {
    pub fn delay(&self, retry: u32) -> Duration {
        match *self {
            Backoff::None => Duration::ZERO,
            Backoff::Exponential { factor, max } => {
                if retry == 0 {
                    Duration::ZERO
                } else {
                    factor
                        .saturating_mul(2u32.saturating_pow(retry))
                        .min(max)
                }
            }
            Backoff::Linear { step } => step.saturating_mul(retry.saturating_add(1)),
        }
    }
}

/// Which transport failures a policy retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportRetry {
    Never,
    TimeoutOrConnect,
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; `max_retries + 1` attempts in total.
    pub max_retries: u32,
    pub backoff: Backoff,
    /// Statuses that trigger a retry. Once retries are exhausted the last
    /// response is returned as-is rather than turned into an error.
    pub retry_statuses: Vec<u16>,
    pub retry_transport: TransportRetry,
}

impl RetryPolicy {
    /// Connection-level policy: 5 retries, exponential backoff with a 1 s
    /// factor, retrying any transport failure and 429/500/502/503/504.
    pub fn adapter_default() -> Self {
        Self {
            max_retries: 5,
            backoff: Backoff::Exponential {
                factor: Duration::from_secs(1),
                max: Duration::from_secs(120),
            },
            retry_statuses: RETRYABLE_STATUSES.to_vec(),
            retry_transport: TransportRetry::Any,
        }
    }

    /// Manual policy: 2 more attempts on timeouts and connection failures,
    /// sleeping `2 * (attempt + 1)` seconds in between.
    pub fn timeout_default() -> Self {
        Self {
            max_retries: 2,
            backoff: Backoff::Linear {
                step: Duration::from_secs(2),
            },
            retry_statuses: Vec::new(),
            retry_transport: TransportRetry::TimeoutOrConnect,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Backoff::None,
            retry_statuses: Vec::new(),
            retry_transport: TransportRetry::Never,
        }
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn retries_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    pub fn retries_transport(&self, error: &TransportError) -> bool {
        match self.retry_transport {
            TransportRetry::Never => false,
            TransportRetry::TimeoutOrConnect => error.is_timeout_or_connect(),
            TransportRetry::Any => true,
        }
    }

    /// Runs `send` until it yields a non-retryable outcome or retries run out,
    /// sleeping per [`Backoff`] between attempts.
    ///
    /// Returns the outcome of the last attempt: a retryable status that never
    /// cleared comes back as `Ok(response)`, a retryable transport failure that
    /// never cleared as `Err`.
    pub async fn run<F, Fut>(&self, url: &str, mut send: F) -> Result<RawResponse, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RawResponse, TransportError>>,
    {
        let mut retry = 0;
        loop {
            let outcome = send().await;
            let reason = match &outcome {
                Ok(response) if self.retries_status(response.status) => {
                    format!("HTTP {}", response.status)
                }
                Err(e) if self.retries_transport(e) => e.to_string(),
                _ => return outcome,
            };
            if retry >= self.max_retries {
                return outcome;
            }
            let delay = self.backoff.delay(retry);
            warn!(
                "Retrying {} in {:?} after {} (retry {}/{})",
                url,
                delay,
                reason,
                retry + 1,
                self.max_retries
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            retry += 1;
        }
    }
}
