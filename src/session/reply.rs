//! Delayed assistant replies
//!
//! Each committed user message gets its own timer. Timers run as tokio
//! tasks on the injected runtime and report back over a channel; the
//! session applies the results on its own thread in `poll_events`.
//! [`ReplySource`] is where a real backend would plug in.

use crate::config::ReplyConfig;
use crate::messages::{Message, MessageId};
use crate::utils::{notify, Notifier, ReplyChannels};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Produces the assistant content for a committed user message
pub trait ReplySource: Send + Sync {
    /// `history` holds every message in the session up to and including
    /// `trigger`.
    fn compose(&self, history: &[Message], trigger: &Message) -> String;
}

/// Always answers with the same fixed text
#[derive(Debug, Clone)]
pub struct PlaceholderReply {
    text: String,
}

impl PlaceholderReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl ReplySource for PlaceholderReply {
    fn compose(&self, _history: &[Message], _trigger: &Message) -> String {
        self.text.clone()
    }
}

/// Identifies one scheduled reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplyTicket(u64);

/// A reply whose delay has elapsed
#[derive(Debug, Clone)]
pub struct ReplyReady {
    pub ticket: ReplyTicket,
    pub in_reply_to: MessageId,
    pub content: String,
    /// When the delay elapsed, not when the reply was drained
    pub ready_at: DateTime<Utc>,
}

struct PendingReply {
    in_reply_to: MessageId,
    task: JoinHandle<()>,
}

pub struct ReplySimulator {
    delay: Duration,
    source: Arc<dyn ReplySource>,
    runtime: Handle,
    channels: ReplyChannels,
    pending: BTreeMap<ReplyTicket, PendingReply>,
    next_ticket: u64,
    notifier: Option<Notifier>,
}

impl ReplySimulator {
    pub fn new(delay: Duration, source: Arc<dyn ReplySource>, runtime: Handle) -> Self {
        Self {
            delay,
            source,
            runtime,
            channels: ReplyChannels::new(),
            pending: BTreeMap::new(),
            next_ticket: 0,
            notifier: None,
        }
    }

    /// Placeholder replies with the configured delay and text
    pub fn from_config(config: &ReplyConfig, runtime: Handle) -> Self {
        Self::new(
            config.delay(),
            Arc::new(PlaceholderReply::new(config.placeholder.clone())),
            runtime,
        )
    }

    pub fn set_notifier(&mut self, notifier: Option<Notifier>) {
        self.notifier = notifier;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Start the timer for `trigger`. Scheduling the same message twice
    /// returns the ticket that is already pending.
    pub fn schedule(&mut self, history: &[Message], trigger: &Message) -> ReplyTicket {
        if let Some((&ticket, _)) = self
            .pending
            .iter()
            .find(|(_, pending)| pending.in_reply_to == trigger.id)
        {
            return ticket;
        }

        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;

        let delay = self.delay;
        let source = Arc::clone(&self.source);
        let history = history.to_vec();
        let trigger = trigger.clone();
        let in_reply_to = trigger.id;
        let ready_tx = self.channels.ready_tx.clone();
        let notifier = self.notifier.clone();

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let content = source.compose(&history, &trigger);
            let ready = ReplyReady {
                ticket,
                in_reply_to,
                content,
                ready_at: Utc::now(),
            };
            if ready_tx.send(ready).is_ok() {
                notify(&notifier);
            }
        });

        debug!(?ticket, %in_reply_to, delay_ms = delay.as_millis() as u64, "Reply scheduled");
        self.pending.insert(ticket, PendingReply { in_reply_to, task });
        ticket
    }

    /// Cancel one pending reply. Returns false if it already completed
    /// or was never scheduled.
    pub fn cancel(&mut self, ticket: ReplyTicket) -> bool {
        match self.pending.remove(&ticket) {
            Some(pending) => {
                pending.task.abort();
                debug!(?ticket, "Reply cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancel every pending reply and discard anything already delivered
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.pending.len();
        for (_, pending) in std::mem::take(&mut self.pending) {
            pending.task.abort();
        }
        while self.channels.ready_rx.try_recv().is_ok() {}

        if cancelled > 0 {
            info!(cancelled, "Cancelled pending replies");
        }
        cancelled
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, ticket: ReplyTicket) -> bool {
        self.pending.contains_key(&ticket)
    }

    /// Collect replies whose delay has elapsed, in scheduling order.
    /// Results for cancelled tickets are dropped.
    pub fn drain_ready(&mut self) -> Vec<ReplyReady> {
        let mut ready = Vec::new();
        while let Ok(reply) = self.channels.ready_rx.try_recv() {
            if self.pending.remove(&reply.ticket).is_some() {
                ready.push(reply);
            } else {
                debug!(ticket = ?reply.ticket, "Discarding reply for cancelled ticket");
            }
        }
        ready.sort_by_key(|reply| reply.ticket);
        ready
    }
}

impl Drop for ReplySimulator {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
