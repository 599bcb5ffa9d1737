//! Shared fixtures: an in-memory document that elements can be added to
//! while a wait is running.

#![allow(dead_code, clippy::unwrap_used)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use pagewait::{By, SearchContext, Strategy, WaitResult};

pub const CONTENT_ID: &str = "content";
pub const CONTENT_TEXT: &str = "Hello, Jasmine!";
pub const TIMEOUT_MESSAGE: &str = "Spec timeout";

/// Install a test subscriber once; `RUST_LOG=pagewait=trace` shows the loop
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone)]
pub struct MockElement {
    pub id: String,
    pub tag: String,
    pub text: String,
    visible: Arc<AtomicBool>,
}

impl MockElement {
    pub fn new(id: &str, tag: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            tag: tag.to_string(),
            text: text.to_string(),
            visible: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    fn matches(&self, by: &By) -> bool {
        match by.using {
            Strategy::Id => self.id == by.value,
            Strategy::TagName => self.tag == by.value,
            Strategy::Css => by
                .value
                .strip_prefix('#')
                .map_or(self.tag == by.value, |id| self.id == id),
            Strategy::LinkText => self.tag == "a" && self.text == by.value,
            Strategy::PartialLinkText => self.tag == "a" && self.text.contains(&by.value),
            Strategy::ClassName | Strategy::Name | Strategy::XPath => false,
        }
    }
}

impl PartialEq for MockElement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockDocument {
    elements: Arc<RwLock<Vec<MockElement>>>,
}

impl MockDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, element: MockElement) {
        self.elements.write().unwrap().push(element);
    }

    /// Append `element` once `after` has elapsed on the tokio clock
    pub fn append_later(&self, element: MockElement, after: Duration) {
        let document = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            document.append(element);
        });
    }

    pub fn by_id(&self, id: &str) -> Option<MockElement> {
        self.elements
            .read()
            .unwrap()
            .iter()
            .find(|el| el.id == id)
            .cloned()
    }
}

#[async_trait]
impl SearchContext for MockDocument {
    type Element = MockElement;

    async fn find_elements(&self, by: &By) -> WaitResult<Vec<MockElement>> {
        Ok(self
            .elements
            .read()
            .unwrap()
            .iter()
            .filter(|el| el.matches(by))
            .cloned()
            .collect())
    }
}
