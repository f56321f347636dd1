//! Exponential-backoff retry policy for rate-limited calls.

use std::fmt::Display;
use std::time::Duration;

use backoff::backoff::Backoff;

const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_FACTOR: f64 = 2.0;
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// How often and how long to wait before retrying a failed call.
///
/// The n-th retry (starting at zero) waits `base_delay * factor^n`, capped
/// at `max_delay`. After `max_retries` retries the last error is returned.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    factor: f64,
    max_delay: Duration,
    retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            factor: DEFAULT_FACTOR,
            max_delay: DEFAULT_MAX_DELAY,
            retryable_statuses: vec![STATUS_TOO_MANY_REQUESTS],
        }
    }
}

impl RetryPolicy {
    /// Creates a policy that never retries.
    #[inline]
    pub fn none() -> Self {
        Self::default().with_max_retries(0)
    }

    /// Sets the number of retries after the first attempt.
    #[inline]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    #[inline]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sets the multiplier applied to the delay after each retry.
    ///
    /// Factors below `1.0`, and non-finite ones, fall back to `1.0`.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = if factor.is_finite() && factor >= 1.0 {
            factor
        } else {
            warn!("invalid backoff factor {factor}, using 1.0");
            1.0
        };
        self
    }

    /// Sets the upper bound of a single delay.
    #[inline]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Sets the HTTP statuses that are worth retrying.
    #[inline]
    pub fn with_retryable_statuses(
        mut self,
        statuses: impl Into<Vec<u16>>,
    ) -> Self {
        self.retryable_statuses = statuses.into();
        self
    }

    /// Returns the number of retries after the first attempt.
    #[inline]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns `true` if a response with this status should be retried.
    #[inline]
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Returns the sleep before each retry, in order.
    ///
    /// Delays are computed lazily.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        self.schedule()
    }

    fn schedule(&self) -> Schedule {
        Schedule {
            remaining: self.max_retries,
            next: self.base_delay.min(self.max_delay),
            factor: self.factor,
            max_delay: self.max_delay,
        }
    }

    /// Runs `op` until it succeeds, fails with an error `is_retryable`
    /// rejects, or the retries are used up.
    ///
    /// Returns the result of the last attempt.
    pub async fn run<T, E, F, Fut>(
        &self,
        is_retryable: impl Fn(&E) -> bool,
        mut op: F,
    ) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let schedule = self.schedule();
        let is_retryable = &is_retryable;
        let operation = move || {
            let fut = op();
            async move {
                fut.await.map_err(|err| {
                    if is_retryable(&err) {
                        backoff::Error::transient(err)
                    } else {
                        backoff::Error::permanent(err)
                    }
                })
            }
        };
        let notify = |err: E, delay: Duration| {
            warn!("attempt failed ({err}), retrying in {delay:?}");
        };
        backoff::future::retry_notify(schedule, operation, notify).await
    }
}

struct Schedule {
    remaining: u32,
    next: Duration,
    factor: f64,
    max_delay: Duration,
}

impl Iterator for Schedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let delay = self.next;
        let scaled = delay.as_secs_f64() * self.factor;
        // Overflow saturates at the cap.
        self.next = Duration::try_from_secs_f64(scaled)
            .map_or(self.max_delay, |next| next.min(self.max_delay));
        Some(delay)
    }
}

impl Backoff for Schedule {
    #[inline]
    fn next_backoff(&mut self) -> Option<Duration> {
        self.next()
    }
}
