//! # Colony Relay Server Library
//!
//! This library provides the relay server for the colonization game. Clients
//! push player actions over HTTP, the server stamps and buffers them in
//! memory, and other clients poll for the most recent one.
//!
//! ## Core Responsibilities
//!
//! ### Action Buffering
//! Every pushed payload is enriched with a server-assigned ISO-8601
//! timestamp and appended to a bounded FIFO. Once the buffer holds
//! `MAX_BUFFER_SIZE` records, each new append evicts the oldest one.
//!
//! ### Polling
//! Pollers receive a one-line summary of the newest record
//! (`"<action> by <username>"`) or `"No recent actions"`. There are no
//! per-client cursors, so a poller that is slower than the action rate
//! misses intermediate actions.
//!
//! ### Registration
//! Registration payloads are acknowledged and logged. Nothing is stored.
//!
//! ## Architecture Design
//!
//! ### Shared Buffer
//! The buffer is the only process-wide state. It sits behind a
//! `tokio::sync::RwLock` in the router state: pushes take the write lock,
//! polls take the read lock, and the timestamp is assigned under the write
//! lock so buffer order and timestamp order always agree.
//!
//! ### Volatile State
//! Nothing is persisted. A restart starts from an empty buffer.
//!
//! ## Module Organization
//!
//! ### Buffer Module (`buffer`)
//! The bounded action buffer: append, latest and eviction.
//!
//! ### Config Module (`config`)
//! Command-line and environment configuration (host, port, allowed origin).
//!
//! ### Extract Module (`extract`)
//! Lenient JSON body extraction: requests without a JSON body are treated
//! as an empty payload, bodies that claim JSON but are malformed get a 400.
//!
//! ### Network Module (`network`)
//! Routing, handlers, CORS and the listener lifecycle.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use clap::Parser;
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::parse();
//!     let server = Server::bind(&config).await?;
//!
//!     server
//!         .run_until(async {
//!             let _ = tokio::signal::ctrl_c().await;
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod extract;
pub mod network;
