//! # Fanable rewards bot
//!
//! Generates a throwaway EVM identity per iteration, trades a signed,
//! timestamped challenge for a bearer token, then submits the referral code,
//! the social tasks and reads back the wallet summary.
//!
//! ## Modules
//!
//! - [`config`] - Layered configuration and run parameters
//! - [`wallet`] - Key generation and personal-sign signatures
//! - [`client`] - HTTP transport and tagged replies
//! - [`session`] - Token acquisition with stale-timestamp retry
//! - [`tasks`] - Referral, social tasks and wallet details
//! - [`bot`] - Sequential iteration loop

pub mod bot;
pub mod client;
pub mod config;
pub mod session;
pub mod tasks;
pub mod wallet;

pub use bot::{Bot, IterationOutcome};
pub use client::{ApiReply, FanableClient, Reply, SessionGrant, TaskAck, WalletDetails};
pub use config::{FanableConfig, RunParams};
pub use session::{Session, SessionAcquirer};
pub use tasks::{SocialTask, TaskExecutor, TaskReport};
pub use wallet::{sign_message, KeyPair};
