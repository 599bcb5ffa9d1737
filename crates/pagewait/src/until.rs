//! Ready-made conditions for common page states.
//!
//! ```no_run
//! # use pagewait::prelude::*;
//! # async fn demo<D: SearchContext + 'static>(document: D) -> WaitResult<()> {
//! let button = wait(
//!     WaitRequest::new(until::element_located(By::name("button")))
//!         .with_input(document)
//!         .with_timeout_ms(3000),
//! )?
//! .await?;
//! # let _ = button;
//! # Ok(())
//! # }
//! ```

use futures::future::{BoxFuture, FutureExt};

use crate::condition::{Condition, ElementCondition, Evaluate, Evaluator};
use crate::locator::{Locator, SearchContext, VisibilityOracle};
use crate::result::WaitResult;
use crate::value::PageValue;

struct FirstMatch<C: SearchContext> {
    locator: Locator<C>,
}

impl<C: SearchContext> Evaluate<C> for FirstMatch<C> {
    type Value = PageValue<C::Element>;

    fn evaluate<'a>(&'a self, context: &'a C) -> BoxFuture<'a, WaitResult<Self::Value>> {
        async move {
            let found = self.locator.find_all(context).await?;
            Ok(found.into_iter().next().into())
        }
        .boxed()
    }
}

struct AllMatches<C: SearchContext> {
    locator: Locator<C>,
}

impl<C: SearchContext> Evaluate<C> for AllMatches<C> {
    type Value = Option<Vec<C::Element>>;

    fn evaluate<'a>(&'a self, context: &'a C) -> BoxFuture<'a, WaitResult<Self::Value>> {
        async move {
            let found = self.locator.find_all(context).await?;
            Ok((!found.is_empty()).then_some(found))
        }
        .boxed()
    }
}

/// Wait until the locator finds an element; resolves to the first match.
pub fn element_located<C>(locator: impl Into<Locator<C>>) -> ElementCondition<C, C::Element>
where
    C: SearchContext + 'static,
{
    let locator = locator.into();
    ElementCondition::from_evaluator(
        format!("for element to be located {locator}"),
        Evaluator::from_evaluate(FirstMatch { locator }),
    )
}

/// Wait until the locator finds at least one element; resolves to all
/// matches.
pub fn elements_located<C>(locator: impl Into<Locator<C>>) -> Condition<C, Option<Vec<C::Element>>>
where
    C: SearchContext + 'static,
{
    let locator = locator.into();
    Condition::from_evaluator(
        format!("for at least one element to be located {locator}"),
        Evaluator::from_evaluate(AllMatches { locator }),
    )
}

/// Wait until `element` is visible
pub fn element_is_visible<T, E, O>(element: E, oracle: O) -> ElementCondition<T, E>
where
    T: 'static,
    E: Clone + Send + Sync + 'static,
    O: VisibilityOracle<E> + 'static,
{
    ElementCondition::new("until element is visible", move |_: &T| {
        oracle.is_shown(&element).then(|| element.clone())
    })
}

/// Wait until `element` is present but hidden
pub fn element_is_not_visible<T, E, O>(element: E, oracle: O) -> ElementCondition<T, E>
where
    T: 'static,
    E: Clone + Send + Sync + 'static,
    O: VisibilityOracle<E> + 'static,
{
    ElementCondition::new("until element is not visible", move |_: &T| {
        (!oracle.is_shown(&element)).then(|| element.clone())
    })
}

/// The condition factories bound to one search context type, as exported by
/// a namespace. Visibility factories take a plain `fn` oracle.
pub struct UntilFactories<C: SearchContext> {
    /// [`element_located`]
    pub element_located: fn(Locator<C>) -> ElementCondition<C, C::Element>,
    /// [`elements_located`]
    pub elements_located: fn(Locator<C>) -> Condition<C, Option<Vec<C::Element>>>,
    /// [`element_is_visible`]
    pub element_is_visible:
        fn(C::Element, fn(&C::Element) -> bool) -> ElementCondition<C, C::Element>,
    /// [`element_is_not_visible`]
    pub element_is_not_visible:
        fn(C::Element, fn(&C::Element) -> bool) -> ElementCondition<C, C::Element>,
}

impl<C> UntilFactories<C>
where
    C: SearchContext + 'static,
    C::Element: Clone,
{
    /// The standard factories for `C`
    #[must_use]
    pub fn new() -> Self {
        Self {
            element_located: |locator| element_located(locator),
            elements_located: |locator| elements_located(locator),
            element_is_visible: |element, oracle| element_is_visible(element, oracle),
            element_is_not_visible: |element, oracle| element_is_not_visible(element, oracle),
        }
    }
}

impl<C> Default for UntilFactories<C>
where
    C: SearchContext + 'static,
    C::Element: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<C: SearchContext> Clone for UntilFactories<C> {
    fn clone(&self) -> Self {
        Self {
            element_located: self.element_located,
            elements_located: self.elements_located,
            element_is_visible: self.element_is_visible,
            element_is_not_visible: self.element_is_not_visible,
        }
    }
}

impl<C: SearchContext> std::fmt::Debug for UntilFactories<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UntilFactories").finish_non_exhaustive()
    }
}
