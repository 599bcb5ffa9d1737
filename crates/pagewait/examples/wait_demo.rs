//! Example: Waiting on a changing page
//!
//! Demonstrates: element conditions, locator conditions, timeouts and the
//! namespace registry against an in-memory document
//!
//! Run with: `RUST_LOG=pagewait=debug cargo run --example wait_demo`

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use pagewait::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Node {
    id: String,
    text: String,
}

#[derive(Debug, Clone, Default)]
struct Page {
    nodes: Arc<RwLock<Vec<Node>>>,
}

impl Page {
    fn insert_later(&self, id: &str, text: &str, after: Duration) {
        let page = self.clone();
        let node = Node {
            id: id.to_string(),
            text: text.to_string(),
        };
        tokio::spawn(async move {
            delayed(after).await;
            page.nodes
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(node);
        });
    }
}

#[async_trait]
impl SearchContext for Page {
    type Element = Node;

    async fn find_elements(&self, by: &By) -> WaitResult<Vec<Node>> {
        if by.using != Strategy::Id {
            return Err(WaitError::webdriver(format!("unsupported locator {by}")));
        }
        Ok(self
            .nodes
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|node| node.id == by.value)
            .cloned()
            .collect())
    }
}

#[tokio::main]
async fn main() -> WaitResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagewait=info")),
        )
        .init();

    println!("=== Wait Demo ===\n");

    // 1. Register the entry points once
    let namespace = install_all::<Page>(None, Waiter::new());
    println!("1. Namespace entries: {:?}", namespace.names());

    // 2. Wait for an element that shows up after 300ms
    println!("\n2. Waiting for #greeting...");
    let page = Page::default();
    page.insert_later("greeting", "Hello, Jasmine!", Duration::from_millis(300));
    let text = wait(
        WaitRequest::new(until::element_located(By::id("greeting")))
            .with_input(page.clone())
            .with_timeout_ms(2000)
            .with_poll_timeout_ms(50),
    )?
    .map(|node| node.text)
    .await?;
    println!("   Found: {text}");

    // 3. A wait that runs out of time
    println!("\n3. Waiting for #never with a 250ms budget...");
    let result = wait(
        WaitRequest::new(until::element_located(By::id("never")))
            .with_input(page)
            .with_timeout_ms(250)
            .with_message("The footer never rendered"),
    )?
    .await;
    if let Err(err) = result {
        println!("   {}: {}", err.kind(), err.to_string().replace('\n', " | "));
    }

    // 4. Race a slow promise against a timeout
    println!("\n4. Racing a slow promise...");
    let slow = PromiseCondition::new(async {
        delayed(Duration::from_secs(5)).await;
        Ok("too late")
    });
    match wait(WaitRequest::new(slow).with_timeout_ms(100))?.await {
        Ok(value) => println!("   Resolved: {value}"),
        Err(err) => println!("   {}: {err}", err.kind()),
    }

    println!("\n=== Done ===");
    Ok(())
}
