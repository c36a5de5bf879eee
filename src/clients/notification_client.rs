//! # Notification Client
//!
//! Append, read back and acknowledge entries of the per-user notification log.
//! Reads are paged through [`CatchUp`], which remembers where it stopped.
use crate::model::{NewNotification, Notification, NotificationFilter, NotificationId, UserId};
use crate::notification_actor::{NotificationAction, NotificationError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Notification actor.
#[derive(Clone)]
pub struct NotificationClient {
    inner: ResourceClient<Notification>,
}

#[async_trait]
impl ActorClient<Notification> for NotificationClient {
    type Error = NotificationError;

    fn inner(&self) -> &ResourceClient<Notification> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        NotificationError::from(e)
    }
}

impl NotificationClient {
    pub fn new(inner: ResourceClient<Notification>) -> Self {
        Self { inner }
    }

    /// Appends one record to the recipient's log.
    #[instrument(skip(self, notification), fields(recipient = %notification.recipient, kind = %notification.kind))]
    pub async fn record(
        &self,
        notification: NewNotification,
    ) -> Result<NotificationId, NotificationError> {
        debug!("Sending request");
        self.inner
            .create(notification)
            .await
            .map_err(Self::map_error)
    }

    /// Reads `user`'s log in creation order, starting after `since`.
    ///
    /// Nothing is fetched until [`CatchUp::next_page`] is awaited.
    pub fn list_for(
        &self,
        user: UserId,
        since: Option<NotificationId>,
        page_size: usize,
    ) -> CatchUp {
        CatchUp {
            client: self.clone(),
            recipient: user,
            cursor: since,
            page_size: page_size.max(1),
            exhausted: false,
        }
    }

    /// Flags a record as delivered. Returns `false` if it already was.
    #[instrument(skip(self))]
    pub async fn mark_delivered(&self, id: NotificationId) -> Result<bool, NotificationError> {
        self.inner
            .perform_action(id, NotificationAction::MarkDelivered)
            .await
            .map_err(Self::map_error)
    }

    /// Number of records for `user` that no live push has reached.
    pub async fn unread_count(&self, user: UserId) -> Result<usize, NotificationError> {
        let pending = self
            .query(NotificationFilter::for_recipient(user).undelivered(), None)
            .await?;
        Ok(pending.len())
    }
}

/// Lazy, restartable walk over one user's notification log.
///
/// Each page starts strictly after the last id seen. Hand [`CatchUp::cursor`] to a
/// later [`NotificationClient::list_for`] to resume where this one stopped.
pub struct CatchUp {
    client: NotificationClient,
    recipient: UserId,
    cursor: Option<NotificationId>,
    page_size: usize,
    exhausted: bool,
}

impl CatchUp {
    /// Id of the last record returned so far.
    pub fn cursor(&self) -> Option<NotificationId> {
        self.cursor
    }

    /// Fetches the next page. An empty page means the log has been read to its end.
    pub async fn next_page(&mut self) -> Result<Vec<Notification>, NotificationError> {
        if self.exhausted {
            return Ok(Vec::new());
        }
        let filter = NotificationFilter::for_recipient(self.recipient.clone()).after(self.cursor);
        let page = self.client.query(filter, Some(self.page_size)).await?;

        if page.len() < self.page_size {
            self.exhausted = true;
        }
        if let Some(last) = page.last() {
            self.cursor = Some(last.id);
        }
        debug!(recipient = %self.recipient, count = page.len(), cursor = ?self.cursor, "Catch-up page");
        Ok(page)
    }

    /// Drains the remaining pages.
    pub async fn collect_all(mut self) -> Result<Vec<Notification>, NotificationError> {
        let mut all = Vec::new();
        loop {
            let page = self.next_page().await?;
            if page.is_empty() {
                return Ok(all);
            }
            all.extend(page);
        }
    }
}
