//! Named registry of the public entry points.
//!
//! Hosts that expose the library to scripts under a single name build one
//! [`Namespace`] and hand clones of it around. Installing into an existing
//! namespace adds entries to it and leaves everything else in place.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::locator::{ByFactories, SearchContext};
use crate::result::ErrorKind;
use crate::until::UntilFactories;
use crate::wait::Waiter;

type Entry = Arc<dyn Any + Send + Sync>;

/// Shared, cloneable registry of named values
#[derive(Clone, Default)]
pub struct Namespace {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl Namespace {
    /// Empty namespace
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `value` under `name`, replacing only that entry
    pub fn attach<V: Any + Send + Sync>(&self, name: impl Into<String>, value: V) {
        let name = name.into();
        debug!(name = %name, "attaching namespace entry");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, Arc::new(value));
    }

    /// Entry under `name`, if present and of type `V`
    #[must_use]
    pub fn get<V: Any + Send + Sync>(&self, name: &str) -> Option<Arc<V>> {
        let entry = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()?;
        entry.downcast::<V>().ok()
    }

    /// Whether anything is attached under `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Attached names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Copy every entry of `other` into this namespace
    pub fn merge(&self, other: &Self) {
        if Arc::ptr_eq(&self.entries, &other.entries) {
            return;
        }
        let incoming: Vec<(String, Entry)> = other
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, entry)| (name.clone(), Arc::clone(entry)))
            .collect();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(incoming);
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is attached
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace")
            .field("names", &self.names())
            .finish()
    }
}

/// Condition and promise types a host can construct by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    /// [`crate::Condition`]
    Condition,
    /// [`crate::ElementCondition`]
    ElementCondition,
    /// [`crate::ElementPromise`]
    ElementPromise,
}

impl EntryPoint {
    /// All entry points
    pub const ALL: [Self; 3] = [Self::Condition, Self::ElementCondition, Self::ElementPromise];

    /// Name the entry point is attached under
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Condition => "Condition",
            Self::ElementCondition => "ElementCondition",
            Self::ElementPromise => "ElementPromise",
        }
    }
}

/// Attach the wait engine as `wait`, the [`EntryPoint`]s under their names,
/// and the error kinds as `TimeoutError` and `WebDriverError`. Reuses
/// `existing` when given.
pub fn install_core(existing: Option<Namespace>, waiter: Waiter) -> Namespace {
    let namespace = existing.unwrap_or_default();
    namespace.attach("wait", waiter);
    for entry in EntryPoint::ALL {
        namespace.attach(entry.name(), entry);
    }
    namespace.attach(ErrorKind::Timeout.name(), ErrorKind::Timeout);
    namespace.attach(ErrorKind::WebDriver.name(), ErrorKind::WebDriver);
    namespace
}

/// Everything [`install_core`] attaches, plus the locator factories as `By`
/// and the condition factories for `C` as `until`
pub fn install_all<C>(existing: Option<Namespace>, waiter: Waiter) -> Namespace
where
    C: SearchContext + 'static,
    C::Element: Clone,
{
    let namespace = install_core(existing, waiter);
    namespace.attach("By", ByFactories::new());
    namespace.attach("until", UntilFactories::<C>::new());
    namespace
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::WaitConfig;
    use crate::locator::By;
    use crate::result::WaitResult;
    use crate::value::PageValue;
    use async_trait::async_trait;

    struct Blank;

    #[async_trait]
    impl SearchContext for Blank {
        type Element = u32;

        async fn find_elements(&self, by: &By) -> WaitResult<Vec<u32>> {
            Ok(if by.value == "one" { vec![1] } else { Vec::new() })
        }
    }

    const CORE_NAMES: [&str; 6] = [
        "Condition",
        "ElementCondition",
        "ElementPromise",
        "TimeoutError",
        "WebDriverError",
        "wait",
    ];

    #[test]
    fn test_install_core_entries() {
        let namespace = install_core(None, Waiter::new());
        assert_eq!(namespace.names(), CORE_NAMES);
        assert_eq!(
            *namespace.get::<ErrorKind>("TimeoutError").unwrap(),
            ErrorKind::Timeout
        );
        assert_eq!(
            *namespace.get::<EntryPoint>("ElementPromise").unwrap(),
            EntryPoint::ElementPromise
        );
        assert!(namespace.get::<Waiter>("wait").is_some());
        assert!(namespace.get::<String>("wait").is_none());
        assert!(!namespace.contains("By"));
        assert!(!namespace.contains("until"));
    }

    #[tokio::test]
    async fn test_install_all_adds_factories() {
        let namespace = install_all::<Blank>(None, Waiter::new());
        let mut expected: Vec<&str> = CORE_NAMES.to_vec();
        expected.extend(["By", "until"]);
        expected.sort_unstable();
        assert_eq!(namespace.names(), expected);

        let by = namespace.get::<ByFactories>("By").unwrap();
        assert_eq!((by.css)("p"), By::css("p"));
        assert_eq!(by.strategies()[1].name(), "css selector");

        let until = namespace.get::<UntilFactories<Blank>>("until").unwrap();
        assert!(namespace.get::<ByFactories>("until").is_none());
        let located = (until.element_located)((by.id)("one").into());
        assert_eq!(
            located.as_condition().evaluator().evaluate(&Blank).await.unwrap(),
            PageValue::Element(1)
        );
        let hidden = (until.element_is_not_visible)(1, |_| false);
        assert_eq!(hidden.message(), "until element is not visible");
    }

    #[test]
    fn test_second_install_keeps_foreign_entries() {
        let host = Namespace::new();
        host.attach("version", "1.2.3");
        let first = install_core(Some(host.clone()), Waiter::new());
        let waiter = Waiter::with_config(WaitConfig::new().with_timeout_ms(50.0)).unwrap();
        let second = install_all::<Blank>(Some(first), waiter);

        assert_eq!(*host.get::<&str>("version").unwrap(), "1.2.3");
        assert!(host.contains("By"));
        assert!(host.contains("until"));
        assert_eq!(second.len(), 9);
        assert_eq!(host.get::<Waiter>("wait").unwrap().config().timeout_ms, 50.0);
    }

    #[test]
    fn test_merge() {
        let a = Namespace::new();
        let b = Namespace::new();
        a.attach("x", 1_u8);
        b.attach("y", 2_u8);
        a.merge(&b);
        a.merge(&a.clone());
        assert_eq!(a.names(), vec!["x", "y"]);
        assert!(b.get::<u8>("x").is_none());
        assert!(!a.is_empty());
    }
}
