//! pagewait: asynchronous wait primitives for in-page automation
//!
//! Polls a condition against a page until it holds, fails, or a deadline
//! passes, with the same timeout and message rules as WebDriver's `wait`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      pagewait                                │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐    ┌────────────┐    ┌─────────────────┐     │
//! │  │ until::*   │    │ Condition  │    │ Waiter::wait    │     │
//! │  │ By/Locator │───►│ Element-   │───►│ poll / race     │───► │
//! │  │            │    │ Condition  │    │ WaitPromise     │     │
//! │  └────────────┘    └────────────┘    └─────────────────┘     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use pagewait::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> WaitResult<()> {
//! let title = Condition::new("for a title", |page: &String| {
//!     (!page.is_empty()).then(|| page.to_uppercase())
//! });
//! let value = wait(
//!     WaitRequest::new(title)
//!         .with_input("home".to_string())
//!         .with_timeout_ms(1000),
//! )?
//! .await?;
//! assert_eq!(value, "HOME");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod condition;
pub mod config;
pub mod locator;
pub mod namespace;
pub mod promise;
pub mod result;
pub mod until;
pub mod value;
pub mod wait;

pub use condition::{Condition, ElementCondition, Evaluate, Evaluator, FnCondition, PromiseCondition};
pub use config::WaitConfig;
pub use locator::{By, ByFactories, Locator, SearchContext, Strategy, VisibilityOracle};
pub use namespace::{install_all, install_core, EntryPoint, Namespace};
pub use until::UntilFactories;
pub use promise::{delayed, ElementPromise, WaitPromise};
pub use result::{BoxError, ErrorKind, WaitError, WaitResult};
pub use value::{PageValue, Truthy};
pub use wait::{
    wait, wait_until, IntoWait, WaitMessage, WaitPlan, WaitRequest, Waiter,
    DEFAULT_POLL_TIMEOUT_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::condition::*;
    pub use super::config::*;
    pub use super::locator::*;
    pub use super::namespace::*;
    pub use super::promise::*;
    pub use super::result::*;
    pub use super::until;
    pub use super::value::*;
    pub use super::wait::*;
}
