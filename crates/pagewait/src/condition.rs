//! Conditions driving the wait loop.
//!
//! Every shape the engine accepts is its own type, so the kind of wait is
//! known at the call boundary:
//!
//! - [`Condition`]: a message plus an evaluator, polled until truthy
//! - [`ElementCondition`]: a condition expected to yield a single element
//! - [`FnCondition`]: a bare evaluator without a message
//! - [`PromiseCondition`]: an awaitable that is raced against the timeout

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::result::{BoxError, WaitError, WaitResult};
use crate::value::PageValue;

/// One evaluation of a condition against the wait input.
pub trait Evaluate<T>: Send + Sync {
    /// Raw value produced by an evaluation
    type Value;

    /// Evaluate once. The input is only borrowed for the duration of the
    /// returned future.
    fn evaluate<'a>(&'a self, input: &'a T) -> BoxFuture<'a, WaitResult<Self::Value>>;
}

struct SyncFn<F, V> {
    func: F,
    _value: PhantomData<fn() -> V>,
}

impl<T, V, F> Evaluate<T> for SyncFn<F, V>
where
    F: Fn(&T) -> V + Send + Sync,
    V: Send + 'static,
{
    type Value = V;

    fn evaluate<'a>(&'a self, input: &'a T) -> BoxFuture<'a, WaitResult<V>> {
        future::ready(Ok((self.func)(input))).boxed()
    }
}

struct TryFn<F, V, E> {
    func: F,
    _value: PhantomData<fn() -> (V, E)>,
}

impl<T, V, E, F> Evaluate<T> for TryFn<F, V, E>
where
    F: Fn(&T) -> Result<V, E> + Send + Sync,
    E: Into<BoxError>,
    V: Send + 'static,
{
    type Value = V;

    fn evaluate<'a>(&'a self, input: &'a T) -> BoxFuture<'a, WaitResult<V>> {
        future::ready((self.func)(input).map_err(WaitError::condition)).boxed()
    }
}

struct AsyncFn<F, V> {
    func: F,
    _value: PhantomData<fn() -> V>,
}

impl<T, V, F> Evaluate<T> for AsyncFn<F, V>
where
    F: for<'a> Fn(&'a T) -> BoxFuture<'a, WaitResult<V>> + Send + Sync,
{
    type Value = V;

    fn evaluate<'a>(&'a self, input: &'a T) -> BoxFuture<'a, WaitResult<V>> {
        (self.func)(input)
    }
}

/// Shared, type-erased evaluator
pub struct Evaluator<T, V> {
    inner: Arc<dyn Evaluate<T, Value = V>>,
}

impl<T, V> Clone for Evaluator<T, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, V> std::fmt::Debug for Evaluator<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator").finish_non_exhaustive()
    }
}

impl<T: 'static, V: Send + 'static> Evaluator<T, V> {
    /// Evaluator from an infallible synchronous closure
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self::from_evaluate(SyncFn {
            func,
            _value: PhantomData,
        })
    }

    /// Evaluator from a fallible synchronous closure. An error ends the wait.
    pub fn try_from_fn<F, E>(func: F) -> Self
    where
        F: Fn(&T) -> Result<V, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::from_evaluate(TryFn {
            func,
            _value: PhantomData,
        })
    }

    /// Evaluator from a closure returning a boxed future
    pub fn from_async<F>(func: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> BoxFuture<'a, WaitResult<V>> + Send + Sync + 'static,
    {
        Self::from_evaluate(AsyncFn {
            func,
            _value: PhantomData,
        })
    }

    /// Wrap any [`Evaluate`] implementation
    pub fn from_evaluate(evaluate: impl Evaluate<T, Value = V> + 'static) -> Self {
        Self {
            inner: Arc::new(evaluate),
        }
    }
}

impl<T, V> Evaluator<T, V> {
    /// Run one evaluation
    pub fn evaluate<'a>(&'a self, input: &'a T) -> BoxFuture<'a, WaitResult<V>> {
        self.inner.evaluate(input)
    }
}

/// A named condition for use with [`crate::wait`].
///
/// The message should complete the sentence "Waiting ...".
pub struct Condition<T, V> {
    message: String,
    evaluator: Evaluator<T, V>,
}

impl<T, V> Clone for Condition<T, V> {
    fn clone(&self) -> Self {
        Self {
            message: self.message.clone(),
            evaluator: self.evaluator.clone(),
        }
    }
}

impl<T, V> std::fmt::Debug for Condition<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Condition")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, V: Send + 'static> Condition<T, V> {
    /// Condition from a synchronous closure
    pub fn new<F>(message: impl Into<String>, func: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self::from_evaluator(message, Evaluator::from_fn(func))
    }

    /// Condition from a fallible synchronous closure
    pub fn try_new<F, E>(message: impl Into<String>, func: F) -> Self
    where
        F: Fn(&T) -> Result<V, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        Self::from_evaluator(message, Evaluator::try_from_fn(func))
    }

    /// Condition from an asynchronous closure
    pub fn new_async<F>(message: impl Into<String>, func: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> BoxFuture<'a, WaitResult<V>> + Send + Sync + 'static,
    {
        Self::from_evaluator(message, Evaluator::from_async(func))
    }
}

impl<T, V> Condition<T, V> {
    /// Condition from an existing evaluator
    pub fn from_evaluator(message: impl Into<String>, evaluator: Evaluator<T, V>) -> Self {
        Self {
            message: message.into(),
            evaluator,
        }
    }

    /// The raw message
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Description of this condition, recomputed on every call
    #[must_use]
    pub fn description(&self) -> String {
        format!("Waiting {}", self.message)
    }

    /// The evaluator
    #[must_use]
    pub const fn evaluator(&self) -> &Evaluator<T, V> {
        &self.evaluator
    }

    pub(crate) fn into_evaluator(self) -> Evaluator<T, V> {
        self.evaluator
    }
}

/// A condition whose value is a single located element.
///
/// Waiting on it yields an [`crate::ElementPromise`]; a value that turns out
/// not to be an element fails the wait with an invalid-result error.
pub struct ElementCondition<T, E> {
    condition: Condition<T, PageValue<E>>,
}

impl<T, E> Clone for ElementCondition<T, E> {
    fn clone(&self) -> Self {
        Self {
            condition: self.condition.clone(),
        }
    }
}

impl<T, E> std::fmt::Debug for ElementCondition<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementCondition")
            .field("message", &self.condition.message)
            .finish_non_exhaustive()
    }
}

impl<T: 'static, E: Send + 'static> ElementCondition<T, E> {
    /// Element condition from a synchronous closure. Return `None`/`Null`
    /// while the element is not there yet.
    pub fn new<F, R>(message: impl Into<String>, func: F) -> Self
    where
        F: Fn(&T) -> R + Send + Sync + 'static,
        R: Into<PageValue<E>>,
    {
        Self::from_evaluator(
            message,
            Evaluator::from_fn(move |input: &T| -> PageValue<E> { func(input).into() }),
        )
    }

    /// Element condition from an asynchronous closure
    pub fn new_async<F>(message: impl Into<String>, func: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> BoxFuture<'a, WaitResult<PageValue<E>>> + Send + Sync + 'static,
    {
        Self::from_evaluator(message, Evaluator::from_async(func))
    }
}

impl<T, E> ElementCondition<T, E> {
    /// Element condition from an existing evaluator
    pub fn from_evaluator(message: impl Into<String>, evaluator: Evaluator<T, PageValue<E>>) -> Self {
        Self {
            condition: Condition::from_evaluator(message, evaluator),
        }
    }

    /// The raw message
    #[must_use]
    pub fn message(&self) -> &str {
        self.condition.message()
    }

    /// Description of this condition
    #[must_use]
    pub fn description(&self) -> String {
        self.condition.description()
    }

    /// View as a plain condition
    #[must_use]
    pub const fn as_condition(&self) -> &Condition<T, PageValue<E>> {
        &self.condition
    }

    /// Drop the element tag. Waiting on the result skips the element check.
    #[must_use]
    pub fn into_condition(self) -> Condition<T, PageValue<E>> {
        self.condition
    }
}

/// A bare evaluator, polled without an automatic timeout message
pub struct FnCondition<T, V> {
    evaluator: Evaluator<T, V>,
}

impl<T, V> Clone for FnCondition<T, V> {
    fn clone(&self) -> Self {
        Self {
            evaluator: self.evaluator.clone(),
        }
    }
}

impl<T, V> std::fmt::Debug for FnCondition<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnCondition").finish_non_exhaustive()
    }
}

impl<T: 'static, V: Send + 'static> FnCondition<T, V> {
    /// From a synchronous closure
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            evaluator: Evaluator::from_fn(func),
        }
    }

    /// From a fallible synchronous closure
    pub fn try_new<F, E>(func: F) -> Self
    where
        F: Fn(&T) -> Result<V, E> + Send + Sync + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            evaluator: Evaluator::try_from_fn(func),
        }
    }

    /// From an asynchronous closure
    pub fn new_async<F>(func: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> BoxFuture<'a, WaitResult<V>> + Send + Sync + 'static,
    {
        Self {
            evaluator: Evaluator::from_async(func),
        }
    }
}

impl<T, V> FnCondition<T, V> {
    pub(crate) fn into_evaluator(self) -> Evaluator<T, V> {
        self.evaluator
    }
}

impl<T, V> From<Evaluator<T, V>> for FnCondition<T, V> {
    fn from(evaluator: Evaluator<T, V>) -> Self {
        Self { evaluator }
    }
}

/// An awaitable waited on directly instead of being polled.
pub struct PromiseCondition<V> {
    future: BoxFuture<'static, WaitResult<V>>,
}

impl<V> std::fmt::Debug for PromiseCondition<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromiseCondition").finish_non_exhaustive()
    }
}

impl<V: Send + 'static> PromiseCondition<V> {
    /// Wrap a future
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = WaitResult<V>> + Send + 'static,
    {
        Self {
            future: future.boxed(),
        }
    }

    /// Already settled with a value
    pub fn resolved(value: V) -> Self {
        Self::new(future::ready(Ok(value)))
    }

    /// Already settled with an error
    pub fn rejected(error: WaitError) -> Self {
        Self::new(future::ready(Err(error)))
    }
}

impl<V> PromiseCondition<V> {
    pub(crate) fn into_boxed(self) -> BoxFuture<'static, WaitResult<V>> {
        self.future
    }
}
