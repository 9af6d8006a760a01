//! # Colony Relay Client Library
//!
//! Client-side access to the colonization relay server. It covers the three
//! things a game frontend does against the relay:
//!
//! - Push player actions for other players to see
//! - Register a player
//! - Poll for the most recent action
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! `RelayClient`, one async method per relay endpoint. Non-2xx responses
//! are returned as errors.
//!
//! ### Poller Module (`poller`)
//! Fixed-interval polling that reports each message once. The relay only
//! exposes its newest record, so actions that happen between two polls are
//! never seen by the poller.
//!
//! ### Payload Module (`payload`)
//! Turns `key=value` arguments into free-form JSON payloads.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::RelayClient;
//! use client::payload::build_payload;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let relay = RelayClient::new("http://127.0.0.1:3000")?;
//!
//!     let payload = build_payload(Some("build"), Some("alice"), &[])?;
//!     relay.push_action(&payload).await?;
//!
//!     let update = relay.latest_update().await?;
//!     println!("{}", update.message);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod network;
pub mod payload;
pub mod poller;
