//! # Core Logic - Shared Utilities for the Rewards Bots
//!
//! Domain-neutral plumbing shared by the chain crates: typed errors,
//! run statistics, logging, proxy rotation, retry and key-pair storage.
//!
//! ## Modules
//!
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Run statistics and per-call results
//! - `utils` - Logger, proxy rotation, retry, shutdown, wallet store

pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use error::{AuthError, ConfigError, NetworkError, ValidationError, WalletError};
pub use traits::{RunStats, TaskResult};

pub use utils::{setup_logger, ProxyManager, Shutdown, WalletStore, TASK_RESULT};

pub use utils::retry::{with_retry_when, RetryError, RetryPolicy};
