//! Wait engine.
//!
//! Polls a condition until it yields a truthy value, fails, or runs out of
//! time. Promise conditions are awaited once and raced against the timeout
//! instead.
//!
//! ## Timing
//!
//! - `timeout` 0 means no deadline
//! - poll iterations never overlap: the next evaluation is scheduled only
//!   after the previous one settled unsatisfied
//! - all delays are `tokio::time` sleeps, so nothing blocks the thread

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace, warn};

use crate::condition::{Condition, ElementCondition, Evaluator, FnCondition, PromiseCondition};
use crate::config::WaitConfig;
use crate::promise::{ElementPromise, WaitPromise};
use crate::result::{BoxError, WaitError, WaitResult};
use crate::value::{PageValue, Truthy};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default timeout (0 = wait forever)
pub const DEFAULT_WAIT_TIMEOUT_MS: f64 = 0.0;

/// Default polling interval (200ms)
pub const DEFAULT_POLL_TIMEOUT_MS: f64 = 200.0;

// =============================================================================
// TIMEOUT MESSAGES
// =============================================================================

/// Custom text prepended to a timeout error
#[derive(Clone)]
pub enum WaitMessage {
    /// Fixed text
    Text(String),
    /// Computed when the timeout fires
    Deferred(Arc<dyn Fn() -> Result<String, BoxError> + Send + Sync>),
}

impl WaitMessage {
    /// Fixed message
    pub fn text(message: impl Into<String>) -> Self {
        Self::Text(message.into())
    }

    /// Message computed only if the wait times out
    pub fn deferred<F>(func: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(move || Ok(func())))
    }

    /// Fallible deferred message. A failure's own text replaces the message.
    pub fn try_deferred<F, E>(func: F) -> Self
    where
        F: Fn() -> Result<String, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self::Deferred(Arc::new(move || func().map_err(Into::into)))
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    /// Prefix for the timeout error: the message plus a newline, or nothing
    /// for an empty fixed message.
    pub(crate) fn resolve(&self) -> String {
        match self {
            Self::Text(text) if text.is_empty() => String::new(),
            Self::Text(text) => format!("{text}\n"),
            Self::Deferred(func) => match func() {
                Ok(text) => format!("{text}\n"),
                Err(err) => {
                    warn!(error = %err, "wait message could not be resolved");
                    format!("{err}\n")
                }
            },
        }
    }
}

impl std::fmt::Debug for WaitMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<&str> for WaitMessage {
    fn from(message: &str) -> Self {
        Self::text(message)
    }
}

impl From<String> for WaitMessage {
    fn from(message: String) -> Self {
        Self::Text(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeoutMode {
    Promise,
    Poll,
}

impl TimeoutMode {
    fn suffix(self, elapsed: Duration) -> String {
        let ms = elapsed.as_millis();
        match self {
            Self::Promise => format!("Timed out waiting for promise to resolve after {ms}ms"),
            Self::Poll => format!("Wait timed out after {ms}ms"),
        }
    }
}

// =============================================================================
// WAIT REQUEST
// =============================================================================

/// Everything one call to [`wait`] needs
#[derive(Debug)]
pub struct WaitRequest<C, T = ()> {
    condition: C,
    input: T,
    timeout_ms: Option<f64>,
    poll_timeout_ms: Option<f64>,
    message: Option<WaitMessage>,
}

impl<C> WaitRequest<C, ()> {
    /// Request for `condition` with no input and default timing
    pub fn new(condition: C) -> Self {
        Self {
            condition,
            input: (),
            timeout_ms: None,
            poll_timeout_ms: None,
            message: None,
        }
    }
}

impl<C, T> WaitRequest<C, T> {
    /// Value handed to the condition on every evaluation
    pub fn with_input<U>(self, input: U) -> WaitRequest<C, U> {
        WaitRequest {
            condition: self.condition,
            input,
            timeout_ms: self.timeout_ms,
            poll_timeout_ms: self.poll_timeout_ms,
            message: self.message,
        }
    }

    /// Set timeout in milliseconds (0 = no deadline)
    pub fn with_timeout_ms(mut self, timeout_ms: impl Into<f64>) -> Self {
        self.timeout_ms = Some(timeout_ms.into());
        self
    }

    /// Set timeout as a Duration
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_timeout_ms(timeout.as_secs_f64() * 1000.0)
    }

    /// Set polling interval in milliseconds
    pub fn with_poll_timeout_ms(mut self, poll_timeout_ms: impl Into<f64>) -> Self {
        self.poll_timeout_ms = Some(poll_timeout_ms.into());
        self
    }

    /// Set polling interval as a Duration
    pub fn with_poll_timeout(self, poll_timeout: Duration) -> Self {
        self.with_poll_timeout_ms(poll_timeout.as_secs_f64() * 1000.0)
    }

    /// Message used if the wait times out
    pub fn with_message(mut self, message: impl Into<WaitMessage>) -> Self {
        self.message = Some(message.into());
        self
    }
}

// =============================================================================
// WAIT PLAN
// =============================================================================

/// Validated timing and message for a single wait
#[derive(Debug, Clone)]
pub struct WaitPlan {
    timeout: Option<Duration>,
    poll_interval: Duration,
    message: Option<WaitMessage>,
}

impl WaitPlan {
    /// Deadline, `None` when waiting forever
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Delay between evaluations
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Fall back to `description` when no usable message was given
    fn or_message(mut self, description: String) -> Self {
        if self.message.as_ref().map_or(true, WaitMessage::is_blank) {
            self.message = Some(WaitMessage::Text(description));
        }
        self
    }

    fn timed_out(&self, mode: TimeoutMode, elapsed: Duration) -> WaitError {
        let prefix = self
            .message
            .as_ref()
            .map(WaitMessage::resolve)
            .unwrap_or_default();
        debug!(elapsed_ms = elapsed.as_millis() as u64, ?mode, "wait timed out");
        WaitError::Timeout {
            message: format!("{prefix}{}", mode.suffix(elapsed)),
        }
    }
}

/// Check a millisecond value and turn it into a Duration
pub(crate) fn validate_ms(field: &str, ms: f64) -> WaitResult<Duration> {
    if !ms.is_finite() || ms < 0.0 {
        return Err(WaitError::invalid_argument(format!(
            "{field} must be a number >= 0: {ms}"
        )));
    }
    Duration::try_from_secs_f64(ms / 1000.0).map_err(|_| {
        WaitError::invalid_argument(format!("{field} must be a number >= 0: {ms}"))
    })
}

// =============================================================================
// DISPATCH
// =============================================================================

/// A condition shape the engine knows how to wait on.
///
/// Implemented for [`Condition`], [`ElementCondition`], [`FnCondition`] and
/// [`PromiseCondition`]; the implementation decides the awaitable returned.
pub trait IntoWait<T>: Sized {
    /// Awaitable handed back to the caller
    type Promise;

    /// Start waiting (lazily) with an already validated plan
    fn into_wait(self, input: T, plan: WaitPlan) -> Self::Promise;
}

impl<T, V> IntoWait<T> for Condition<T, V>
where
    T: Send + Sync + 'static,
    V: Truthy + Send + 'static,
    V::Output: Send + 'static,
{
    type Promise = WaitPromise<V::Output>;

    fn into_wait(self, input: T, plan: WaitPlan) -> Self::Promise {
        let plan = plan.or_message(self.description());
        WaitPromise::new(poll_until(self.into_evaluator(), input, plan))
    }
}

impl<T, E> IntoWait<T> for ElementCondition<T, E>
where
    T: Send + Sync + 'static,
    E: Send + 'static,
{
    type Promise = ElementPromise<E>;

    fn into_wait(self, input: T, plan: WaitPlan) -> Self::Promise {
        let plan = plan.or_message(self.description());
        let evaluator = self.into_condition().into_evaluator();
        ElementPromise::new(async move {
            let value: PageValue<E> = poll_until(evaluator, input, plan).await?;
            value.into_element().map_err(|other| WaitError::InvalidResult {
                observed: other.type_tag().to_string(),
            })
        })
    }
}

impl<T, V> IntoWait<T> for FnCondition<T, V>
where
    T: Send + Sync + 'static,
    V: Truthy + Send + 'static,
    V::Output: Send + 'static,
{
    type Promise = WaitPromise<V::Output>;

    fn into_wait(self, input: T, plan: WaitPlan) -> Self::Promise {
        WaitPromise::new(poll_until(self.into_evaluator(), input, plan))
    }
}

impl<T, V> IntoWait<T> for PromiseCondition<V>
where
    V: Send + 'static,
{
    type Promise = WaitPromise<V>;

    fn into_wait(self, _input: T, plan: WaitPlan) -> Self::Promise {
        let future = self.into_boxed();
        WaitPromise::new(async move {
            let Some(timeout) = plan.timeout() else {
                return future.await;
            };
            let start = Instant::now();
            match tokio::time::timeout(timeout, future).await {
                Ok(settled) => settled,
                // the original future is dropped here, its outcome is never observed
                Err(_) => Err(plan.timed_out(TimeoutMode::Promise, start.elapsed())),
            }
        })
    }
}

async fn poll_until<T, V>(
    evaluator: Evaluator<T, V>,
    input: T,
    plan: WaitPlan,
) -> WaitResult<V::Output>
where
    V: Truthy,
{
    let start = Instant::now();
    let mut attempts: u64 = 0;

    loop {
        attempts += 1;
        let value = match evaluator.evaluate(&input).await {
            Ok(value) => value,
            Err(err) => {
                debug!(attempts, error = %err, "wait condition failed");
                return Err(err);
            }
        };

        let elapsed = start.elapsed();
        if let Some(satisfied) = value.into_truthy() {
            debug!(
                attempts,
                elapsed_ms = elapsed.as_millis() as u64,
                "wait condition satisfied"
            );
            return Ok(satisfied);
        }

        if let Some(timeout) = plan.timeout() {
            if elapsed >= timeout {
                return Err(plan.timed_out(TimeoutMode::Poll, elapsed));
            }
        }

        trace!(attempts, elapsed_ms = elapsed.as_millis() as u64, "condition not yet satisfied");
        let interval = plan.poll_interval();
        if interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(interval).await;
        }
    }
}

// =============================================================================
// WAITER
// =============================================================================

/// Wait engine carrying the defaults applied to requests that leave timing
/// unspecified
#[derive(Debug, Clone, Default)]
pub struct Waiter {
    config: WaitConfig,
}

impl Waiter {
    /// Waiter with the standard defaults (no deadline, 200ms polling)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waiter with custom defaults
    pub fn with_config(config: WaitConfig) -> WaitResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Current defaults
    #[must_use]
    pub const fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Validate the request and return the awaitable for it.
    ///
    /// Malformed timing fails here, before any timer exists. Everything
    /// else (evaluator errors, timeouts, non-element results) surfaces
    /// through the returned awaitable.
    pub fn wait<C, T>(&self, request: WaitRequest<C, T>) -> WaitResult<C::Promise>
    where
        C: IntoWait<T>,
    {
        let plan = self.plan(request.timeout_ms, request.poll_timeout_ms, request.message)?;
        Ok(request.condition.into_wait(request.input, plan))
    }

    /// Resolve request timing against the defaults
    fn plan(
        &self,
        timeout_ms: Option<f64>,
        poll_ms: Option<f64>,
        message: Option<WaitMessage>,
    ) -> WaitResult<WaitPlan> {
        let timeout_ms = timeout_ms.unwrap_or(self.config.timeout_ms);
        let poll_ms = poll_ms.unwrap_or(self.config.poll_timeout_ms);
        let timeout = validate_ms("timeout", timeout_ms)?;
        let poll_interval = validate_ms("pollTimeout", poll_ms)?;

        debug!(timeout_ms, poll_ms, "starting wait");
        Ok(WaitPlan {
            timeout: (!timeout.is_zero()).then_some(timeout),
            poll_interval,
            message,
        })
    }
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Wait with the standard defaults
pub fn wait<C, T>(request: WaitRequest<C, T>) -> WaitResult<C::Promise>
where
    C: IntoWait<T>,
{
    Waiter::new().wait(request)
}

/// Poll a predicate until it returns true or `timeout` elapses
pub async fn wait_until<F>(predicate: F, timeout: Duration) -> WaitResult<()>
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    let condition = FnCondition::new(move |_: &()| predicate());
    wait(WaitRequest::new(condition).with_timeout(timeout))?.await?;
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
