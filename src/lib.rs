//! supportdesk: SDK and CLI for a customer-support platform REST API
//!
//! Typed wrappers for canned responses, automation rules, webhooks, inbox
//! members, agent bots, conversations, reports, and the public inbox API.
//! Every failure can be turned into a [`StructuredError`](error::StructuredError)
//! with a stable code, a retryability flag, and a remediation hint.
//!
//! # Quick Start
//!
//! ```no_run
//! use supportdesk::config::Config;
//! use supportdesk::error::classify;
//!
//! # async fn example() -> supportdesk::error::Result<()> {
//! let config = Config::load(None)?;
//! let client = supportdesk::Client::new(&config)?;
//! match client.agent_bots().list().await {
//!     Ok(bots) => println!("{} bots", bots.len()),
//!     Err(err) => {
//!         let structured = classify(&err);
//!         eprintln!("{} (retryable: {})", structured.message(), structured.is_retryable());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod services;
pub mod transport;

#[cfg(feature = "cli")]
pub mod cli;

pub use client::{public_client, Client};
