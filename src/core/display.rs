//! Customer display channel.
//!
//! Order entry publishes what the customer should see (the order being rung up, or
//! the payment being taken) and the customer-facing display reads it, either by
//! short-polling [`DisplayChannel::latest`], long-polling [`DisplayChannel::next_after`]
//! or by holding a [`DisplayChannel::subscribe`] receiver. Only the newest event is kept. It disappears when it expires or when the
//! display acknowledges it.
//!
//! Publishing never blocks checkout: a send with no live subscribers is not an error.

use crate::{
    core::{money, sale::PaymentMethod},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration as StdDuration};
use tokio::sync::{
    RwLock,
    broadcast::{self, error::RecvError},
};
use tracing::{debug, trace};

const SUBSCRIBER_BUFFER: usize = 16;
const MAX_TTL_SECS: u64 = 86_400;

/// One line of a pending order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayLine {
    /// Item name
    pub name: String,
    /// Quantity
    pub quantity: u32,
    /// Line amount
    pub amount: f64,
}

/// What the customer display should show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DisplayPayload {
    /// An order being rung up
    PendingOrder {
        /// Order lines
        items: Vec<DisplayLine>,
        /// Before tax and service
        subtotal: f64,
        /// Amount due
        total: f64,
    },
    /// A payment being taken
    PendingPayment {
        /// Amount due
        total: f64,
        /// Amount handed over
        tendered: f64,
        /// Change to return
        change: f64,
        /// Tender method
        method: PaymentMethod,
    },
}

impl DisplayPayload {
    fn validate(&self) -> Result<()> {
        let amounts: Vec<f64> = match self {
            Self::PendingOrder {
                items,
                subtotal,
                total,
            } => items
                .iter()
                .map(|line| line.amount)
                .chain([*subtotal, *total])
                .collect(),
            Self::PendingPayment {
                total,
                tendered,
                change,
                ..
            } => vec![*total, *tendered, *change],
        };
        for amount in amounts {
            money::ensure_finite(amount)?;
            if amount < 0.0 {
                return Err(Error::InvalidAmount { amount });
            }
        }
        Ok(())
    }
}

/// A published payload with its id and lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEvent {
    /// Monotonic id, used to acknowledge
    pub id: u64,
    /// What to show
    pub payload: DisplayPayload,
    /// When it was published
    pub published_at: DateTime<Utc>,
    /// When it stops being shown
    pub expires_at: DateTime<Utc>,
}

impl DisplayEvent {
    /// True once `now` is past `expires_at`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Default)]
struct ChannelState {
    next_id: u64,
    current: Option<DisplayEvent>,
}

/// Shared handle to the display channel. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct DisplayChannel {
    state: Arc<RwLock<ChannelState>>,
    sender: broadcast::Sender<DisplayEvent>,
    ttl: Duration,
}

impl DisplayChannel {
    /// Creates a channel whose events live for `ttl_secs` (capped at one day).
    #[must_use]
    pub fn new(ttl_secs: u64) -> Self {
        let (sender, _) = broadcast::channel(SUBSCRIBER_BUFFER);
        let secs = i64::try_from(ttl_secs.min(MAX_TTL_SECS)).unwrap_or(0);
        Self {
            state: Arc::new(RwLock::new(ChannelState::default())),
            sender,
            ttl: Duration::seconds(secs),
        }
    }

    /// Publishes a payload now, replacing any current event.
    pub async fn publish(&self, payload: DisplayPayload) -> Result<DisplayEvent> {
        self.publish_at(payload, Utc::now()).await
    }

    /// Publishes a payload as of `now`.
    pub async fn publish_at(
        &self,
        payload: DisplayPayload,
        now: DateTime<Utc>,
    ) -> Result<DisplayEvent> {
        payload.validate()?;

        let event = {
            let mut state = self.state.write().await;
            state.next_id += 1;
            let event = DisplayEvent {
                id: state.next_id,
                payload,
                published_at: now,
                expires_at: now + self.ttl,
            };
            state.current = Some(event.clone());
            event
        };

        match self.sender.send(event.clone()) {
            Ok(receivers) => trace!(event_id = event.id, receivers, "Display event pushed"),
            Err(_) => trace!(event_id = event.id, "No display subscribers"),
        }
        debug!(event_id = event.id, "Display event published");
        Ok(event)
    }

    /// The current event, unless it expired or was acknowledged.
    pub async fn latest(&self, now: DateTime<Utc>) -> Option<DisplayEvent> {
        let state = self.state.read().await;
        state
            .current
            .as_ref()
            .filter(|event| !event.is_expired(now))
            .cloned()
    }

    /// Acknowledges the current event so it is no longer shown.
    ///
    /// # Errors
    /// [`Error::DisplayEventNotFound`] when `id` is not the current event.
    pub async fn ack(&self, id: u64) -> Result<()> {
        let mut state = self.state.write().await;
        match &state.current {
            Some(event) if event.id == id => {
                state.current = None;
                debug!(event_id = id, "Display event acknowledged");
                Ok(())
            }
            _ => Err(Error::DisplayEventNotFound { id }),
        }
    }

    /// Receives every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DisplayEvent> {
        self.sender.subscribe()
    }

    /// Long poll: the first live event with an id above `after`, waiting up to
    /// `timeout` for one to be published. `None` on timeout.
    pub async fn next_after(&self, after: Option<u64>, timeout: StdDuration) -> Option<DisplayEvent> {
        let is_newer = |event: &DisplayEvent| after.is_none_or(|id| event.id > id);

        // Subscribe before looking at the current event so a publish in between is not lost.
        let mut receiver = self.subscribe();
        if let Some(event) = self.latest(Utc::now()).await.filter(is_newer) {
            return Some(event);
        }

        let wait = async {
            loop {
                match receiver.recv().await {
                    Ok(event) if is_newer(&event) => return Some(event),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        trace!(skipped, "Display waiter lagged behind");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        };
        tokio::time::timeout(timeout, wait).await.ok().flatten()
    }
}
