//! Element locators.
//!
//! A [`By`] names one of the standard location strategies and is resolved by
//! the host through [`SearchContext`]. A function locator computes matches
//! itself from the context.

use std::fmt;

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::condition::Evaluator;
use crate::result::{WaitError, WaitResult};
use crate::value::PageValue;

/// Location strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Elements with a class name
    ClassName,
    /// CSS selector
    Css,
    /// `id` attribute
    Id,
    /// Links by exact visible text
    LinkText,
    /// `name` attribute
    Name,
    /// Links whose visible text contains a substring
    PartialLinkText,
    /// Tag name
    TagName,
    /// XPath expression
    XPath,
}

impl Strategy {
    /// Every strategy, in declaration order
    pub const ALL: [Self; 8] = [
        Self::ClassName,
        Self::Css,
        Self::Id,
        Self::LinkText,
        Self::Name,
        Self::PartialLinkText,
        Self::TagName,
        Self::XPath,
    ];

    /// Wire name of the strategy
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ClassName => "class name",
            Self::Css => "css selector",
            Self::Id => "id",
            Self::LinkText => "link text",
            Self::Name => "name",
            Self::PartialLinkText => "partial link text",
            Self::TagName => "tag name",
            Self::XPath => "xpath",
        }
    }

    /// Key used for the strategy in a locator hash
    #[must_use]
    pub const fn hash_key(self) -> &'static str {
        match self {
            Self::ClassName => "className",
            Self::Css => "css",
            Self::Id => "id",
            Self::LinkText => "linkText",
            Self::Name => "name",
            Self::PartialLinkText => "partialLinkText",
            Self::TagName => "tagName",
            Self::XPath => "xpath",
        }
    }

    fn from_hash_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.hash_key() == key)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A strategy plus the value to search for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct By {
    /// Strategy to use
    pub using: Strategy,
    /// Value to search for
    pub value: String,
}

impl By {
    /// Locator for an arbitrary strategy
    #[must_use]
    pub fn new(using: Strategy, value: impl Into<String>) -> Self {
        Self {
            using,
            value: value.into(),
        }
    }

    /// Elements that have a specific class name
    #[must_use]
    pub fn class_name(name: impl Into<String>) -> Self {
        Self::new(Strategy::ClassName, name)
    }

    /// Elements matching a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// Elements by `id` attribute
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::new(Strategy::Id, id)
    }

    /// Links whose visible text matches exactly
    #[must_use]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::LinkText, text)
    }

    /// Elements whose `name` attribute has the given value
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::new(Strategy::Name, name)
    }

    /// Links whose visible text contains the substring
    #[must_use]
    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::new(Strategy::PartialLinkText, text)
    }

    /// Elements with a given tag name
    #[must_use]
    pub fn tag_name(name: impl Into<String>) -> Self {
        Self::new(Strategy::TagName, name)
    }

    /// Elements matching an XPath expression
    #[must_use]
    pub fn xpath(xpath: impl Into<String>) -> Self {
        Self::new(Strategy::XPath, xpath)
    }

    /// Parse a locator hash such as `{"css": "button"}`.
    ///
    /// The first key naming a known strategy wins; its value must be a string.
    pub fn from_hash(hash: &Value) -> WaitResult<Self> {
        let Value::Object(map) = hash else {
            return Err(WaitError::invalid_argument(format!("Invalid locator: {hash}")));
        };
        map.iter()
            .find_map(|(key, value)| Strategy::from_hash_key(key).map(|using| (using, value)))
            .and_then(|(using, value)| value.as_str().map(|v| Self::new(using, v)))
            .ok_or_else(|| WaitError::invalid_argument(format!("Invalid locator: {hash}")))
    }

    /// The hash form of this locator
    #[must_use]
    pub fn to_hash(&self) -> Value {
        let mut map = Map::new();
        map.insert(self.using.hash_key().to_string(), Value::String(self.value.clone()));
        Value::Object(map)
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "By({}, {})", self.using, self.value)
    }
}

impl TryFrom<Value> for By {
    type Error = WaitError;

    fn try_from(value: Value) -> WaitResult<Self> {
        Self::from_hash(&value)
    }
}

impl From<By> for Value {
    fn from(by: By) -> Self {
        by.to_hash()
    }
}

/// The `By` factory set, as exported by a namespace
#[derive(Clone, Copy)]
pub struct ByFactories {
    /// [`By::class_name`]
    pub class_name: fn(&str) -> By,
    /// [`By::css`]
    pub css: fn(&str) -> By,
    /// [`By::id`]
    pub id: fn(&str) -> By,
    /// [`By::link_text`]
    pub link_text: fn(&str) -> By,
    /// [`By::name`]
    pub name: fn(&str) -> By,
    /// [`By::partial_link_text`]
    pub partial_link_text: fn(&str) -> By,
    /// [`By::tag_name`]
    pub tag_name: fn(&str) -> By,
    /// [`By::xpath`]
    pub xpath: fn(&str) -> By,
    /// [`By::from_hash`]
    pub from_hash: fn(&Value) -> WaitResult<By>,
}

impl ByFactories {
    /// The standard factories
    #[must_use]
    pub fn new() -> Self {
        Self {
            class_name: |value| By::class_name(value),
            css: |value| By::css(value),
            id: |value| By::id(value),
            link_text: |value| By::link_text(value),
            name: |value| By::name(value),
            partial_link_text: |value| By::partial_link_text(value),
            tag_name: |value| By::tag_name(value),
            xpath: |value| By::xpath(value),
            from_hash: By::from_hash,
        }
    }

    /// Strategies the factories cover
    #[must_use]
    pub const fn strategies(&self) -> [Strategy; 8] {
        Strategy::ALL
    }
}

impl Default for ByFactories {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ByFactories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByFactories")
            .field("strategies", &self.strategies())
            .finish_non_exhaustive()
    }
}

/// Something elements can be searched in, usually a document or an element.
#[async_trait]
pub trait SearchContext: Send + Sync {
    /// Element handle produced by searches
    type Element: Send + Sync + 'static;

    /// All elements matching `by`, in document order. No match is an empty list.
    async fn find_elements(&self, by: &By) -> WaitResult<Vec<Self::Element>>;
}

/// Strategy locator or function locator
pub enum Locator<C: SearchContext> {
    /// Resolved by the search context
    By(By),
    /// Computes matches from the context
    Function(Evaluator<C, PageValue<C::Element>>),
}

impl<C: SearchContext + 'static> Locator<C> {
    /// Function locator from a synchronous closure
    pub fn function<F, R>(func: F) -> Self
    where
        F: Fn(&C) -> R + Send + Sync + 'static,
        R: Into<PageValue<C::Element>>,
    {
        Self::Function(Evaluator::from_fn(move |ctx: &C| -> PageValue<C::Element> {
            func(ctx).into()
        }))
    }

    /// Function locator from an asynchronous closure
    pub fn function_async<F>(func: F) -> Self
    where
        F: for<'a> Fn(&'a C) -> BoxFuture<'a, WaitResult<PageValue<C::Element>>>
            + Send
            + Sync
            + 'static,
    {
        Self::Function(Evaluator::from_async(func))
    }
}

impl<C: SearchContext> Locator<C> {
    /// All current matches. Function results are coerced: an element becomes
    /// a one-item list, an array keeps only its elements, anything else is
    /// no match.
    pub async fn find_all(&self, context: &C) -> WaitResult<Vec<C::Element>> {
        match self {
            Self::By(by) => context.find_elements(by).await,
            Self::Function(func) => Ok(func.evaluate(context).await?.into_elements()),
        }
    }
}

impl<C: SearchContext> Clone for Locator<C> {
    fn clone(&self) -> Self {
        match self {
            Self::By(by) => Self::By(by.clone()),
            Self::Function(func) => Self::Function(func.clone()),
        }
    }
}

impl<C: SearchContext> fmt::Debug for Locator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::By(by) => f.debug_tuple("By").field(by).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

impl<C: SearchContext> fmt::Display for Locator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::By(by) => by.fmt(f),
            Self::Function(_) => f.write_str("by function()"),
        }
    }
}

impl<C: SearchContext> From<By> for Locator<C> {
    fn from(by: By) -> Self {
        Self::By(by)
    }
}

/// Decides whether an element is shown to the user
pub trait VisibilityOracle<E>: Send + Sync {
    /// Whether `element` is currently visible
    fn is_shown(&self, element: &E) -> bool;
}

impl<E, F> VisibilityOracle<E> for F
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn is_shown(&self, element: &E) -> bool {
        self(element)
    }
}
