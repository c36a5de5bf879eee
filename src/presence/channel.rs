//! Live delivery endpoints handed to the router by the transport layer.

use crate::model::Notification;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

static NEXT_CHANNEL: AtomicU64 = AtomicU64::new(1);

/// Identifies one connection ("room"). Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u64);

impl Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "channel_{}", self.0)
    }
}

/// Sending half of a live connection.
///
/// The transport keeps the matching receiver and relays whatever arrives on it to
/// the user's socket. Dropping that receiver is how a disconnect shows up here.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    id: ChannelId,
    sender: mpsc::Sender<Notification>,
}

impl ChannelHandle {
    /// Opens a channel with room for `buffer` undelivered notifications.
    pub fn open(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let id = ChannelId(NEXT_CHANNEL.fetch_add(1, Ordering::Relaxed));
        (Self { id, sender }, receiver)
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Non-blocking send.
    pub(crate) fn try_send(
        &self,
        notification: Notification,
    ) -> Result<(), mpsc::error::TrySendError<Notification>> {
        self.sender.try_send(notification)
    }
}
