//! # Presence Router
//!
//! Keeps the `user → live channel` table. The table belongs to a single task, the
//! same way a [`ResourceActor`](actor_framework::ResourceActor) owns its store, so
//! joins, leaves and pushes are applied one at a time without locks.
//!
//! Each user has at most one channel. A new join replaces the previous channel; a
//! `leave` only counts if it comes from the channel currently on record, so a
//! reconnect is never undone by the old connection's late disconnect.

use super::channel::{ChannelHandle, ChannelId};
use super::error::PresenceError;
use crate::model::{Notification, UserId};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, info, instrument};

#[derive(Debug)]
enum PresenceRequest {
    Join {
        user: UserId,
        channel: ChannelHandle,
        respond_to: oneshot::Sender<Option<ChannelId>>,
    },
    Leave {
        channel: ChannelId,
        respond_to: oneshot::Sender<Option<UserId>>,
    },
    Push {
        user: UserId,
        notification: Notification,
        respond_to: oneshot::Sender<bool>,
    },
    IsOnline {
        user: UserId,
        respond_to: oneshot::Sender<bool>,
    },
    OnlineCount {
        respond_to: oneshot::Sender<usize>,
    },
}

/// The task that owns the presence table.
pub struct PresenceActor {
    receiver: mpsc::Receiver<PresenceRequest>,
    rooms: HashMap<UserId, ChannelHandle>,
    members: HashMap<ChannelId, UserId>,
}

impl PresenceActor {
    fn join(&mut self, user: UserId, channel: ChannelHandle) -> Option<ChannelId> {
        let id = channel.id();
        // A channel serves one user; taking it over unbinds the previous one.
        if let Some(former) = self.members.insert(id, user.clone()) {
            if former != user && self.rooms.get(&former).map(ChannelHandle::id) == Some(id) {
                self.rooms.remove(&former);
            }
        }
        let previous = self
            .rooms
            .insert(user, channel)
            .map(|old| old.id())
            .filter(|old| *old != id);
        if let Some(old) = previous {
            self.members.remove(&old);
        }
        previous
    }

    fn leave(&mut self, channel: ChannelId) -> Option<UserId> {
        // Superseded channels were already dropped from `members`.
        let user = self.members.remove(&channel)?;
        self.rooms.remove(&user);
        Some(user)
    }

    fn push(&mut self, user: &UserId, notification: Notification) -> bool {
        let Some(channel) = self.rooms.get(user) else {
            return false;
        };
        match channel.try_send(notification) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!(%user, channel = %channel.id(), "Channel full");
                false
            }
            Err(TrySendError::Closed(_)) => {
                let id = channel.id();
                debug!(%user, channel = %id, "Channel closed, dropping");
                self.leave(id);
                false
            }
        }
    }

    /// Serves requests until every [`PresenceRouter`] handle is dropped.
    pub async fn run(mut self) {
        info!("Presence router started");
        while let Some(request) = self.receiver.recv().await {
            match request {
                PresenceRequest::Join {
                    user,
                    channel,
                    respond_to,
                } => {
                    let id = channel.id();
                    let superseded = self.join(user.clone(), channel);
                    info!(%user, channel = %id, ?superseded, online = self.rooms.len(), "Joined");
                    let _ = respond_to.send(superseded);
                }
                PresenceRequest::Leave {
                    channel,
                    respond_to,
                } => {
                    let user = self.leave(channel);
                    match &user {
                        Some(user) => info!(%user, %channel, online = self.rooms.len(), "Left"),
                        None => debug!(%channel, "Stale leave ignored"),
                    }
                    let _ = respond_to.send(user);
                }
                PresenceRequest::Push {
                    user,
                    notification,
                    respond_to,
                } => {
                    let delivered = self.push(&user, notification);
                    debug!(%user, delivered, "Push");
                    let _ = respond_to.send(delivered);
                }
                PresenceRequest::IsOnline { user, respond_to } => {
                    let _ = respond_to.send(self.rooms.contains_key(&user));
                }
                PresenceRequest::OnlineCount { respond_to } => {
                    let _ = respond_to.send(self.rooms.len());
                }
            }
        }
        info!("Presence router shutdown");
    }
}

/// Cloneable handle to the presence table.
#[derive(Clone)]
pub struct PresenceRouter {
    sender: mpsc::Sender<PresenceRequest>,
}

impl PresenceRouter {
    /// Creates the router task and a handle to it. Spawn `actor.run()` to start it.
    pub fn new(buffer_size: usize) -> (PresenceActor, Self) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = PresenceActor {
            receiver,
            rooms: HashMap::new(),
            members: HashMap::new(),
        };
        (actor, Self { sender })
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> PresenceRequest,
    ) -> Result<R, PresenceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| PresenceError::Unavailable)?;
        response.await.map_err(|_| PresenceError::Unavailable)
    }

    /// Makes `channel` the user's live channel. Returns the channel it replaced.
    #[instrument(skip(self, channel), fields(channel = %channel.id()))]
    pub async fn join(
        &self,
        user: UserId,
        channel: ChannelHandle,
    ) -> Result<Option<ChannelId>, PresenceError> {
        self.request(|respond_to| PresenceRequest::Join {
            user,
            channel,
            respond_to,
        })
        .await
    }

    /// Forgets `channel` if it is still some user's current channel.
    /// Returns that user, or `None` for a stale or unknown channel.
    #[instrument(skip(self))]
    pub async fn leave(&self, channel: ChannelId) -> Result<Option<UserId>, PresenceError> {
        self.request(|respond_to| PresenceRequest::Leave {
            channel,
            respond_to,
        })
        .await
    }

    /// Best-effort live delivery. `true` only if the notification was queued on the
    /// user's channel; an offline user, a full channel or a stopped router all
    /// yield `false`.
    pub async fn push(&self, user: UserId, notification: Notification) -> bool {
        self.request(|respond_to| PresenceRequest::Push {
            user,
            notification,
            respond_to,
        })
        .await
        .unwrap_or(false)
    }

    pub async fn is_online(&self, user: UserId) -> Result<bool, PresenceError> {
        self.request(|respond_to| PresenceRequest::IsOnline { user, respond_to })
            .await
    }

    pub async fn online_count(&self) -> Result<usize, PresenceError> {
        self.request(|respond_to| PresenceRequest::OnlineCount { respond_to })
            .await
    }
}
