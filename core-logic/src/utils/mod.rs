//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod logger;
pub(crate) mod proxy_manager;
pub(crate) mod retry;
pub(crate) mod runner;
pub(crate) mod wallet_store;

pub use logger::{setup_logger, TASK_RESULT};
pub use proxy_manager::ProxyManager;
pub use runner::Shutdown;
pub use wallet_store::WalletStore;
