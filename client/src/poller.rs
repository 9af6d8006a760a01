//! Interval poller for the latest relayed action
//!
//! The relay only exposes its newest record, so the poller can only notice
//! *changes* in the reported message. Two identical actions in a row, or
//! several actions between two polls, collapse into a single observation.

use crate::error::ClientError;
use crate::network::RelayClient;
use log::{info, warn};
use shared::UpdateResponse;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Shortest period a poller will run at; `interval` rejects zero.
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

pub struct Poller {
    client: RelayClient,
    period: Duration,
    last_message: Option<String>,
    polls: u64,
    failures: u64,
}

impl Poller {
    /// Creates a poller; periods below `MIN_POLL_PERIOD` are raised to it
    pub fn new(client: RelayClient, period: Duration) -> Self {
        Self {
            client,
            period: period.max(MIN_POLL_PERIOD),
            last_message: None,
            polls: 0,
            failures: 0,
        }
    }

    /// Records an update and returns its message if it differs from the previous one
    ///
    /// The "no recent actions" sentinel is never reported.
    pub fn observe(&mut self, update: UpdateResponse) -> Option<String> {
        if update.is_empty() {
            return None;
        }
        if self.last_message.as_deref() == Some(update.message.as_str()) {
            return None;
        }

        self.last_message = Some(update.message.clone());
        Some(update.message)
    }

    /// Polls once, returning a newly seen message if there is one
    pub async fn poll_once(&mut self) -> Result<Option<String>, ClientError> {
        self.polls += 1;
        let update = self.client.latest_update().await?;
        Ok(self.observe(update))
    }

    /// Polls every `period` until `max_polls` is reached, or forever when None
    ///
    /// Request failures are logged and the loop keeps going. Every new message
    /// is logged and handed to `on_message`.
    pub async fn run<F>(&mut self, max_polls: Option<u64>, mut on_message: F)
    where
        F: FnMut(&str),
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Polling {} every {:?}",
            self.client.base_url(),
            self.period
        );

        loop {
            if let Some(max) = max_polls {
                if self.polls >= max {
                    break;
                }
            }

            ticker.tick().await;

            match self.poll_once().await {
                Ok(Some(message)) => {
                    info!("Update: {}", message);
                    on_message(&message);
                }
                Ok(None) => {}
                Err(e) => {
                    self.failures += 1;
                    warn!("Poll failed ({} so far): {}", self.failures, e);
                }
            }
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }
}
