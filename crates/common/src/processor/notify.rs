use super::validate::ValidatedChange;
use super::{AffiliationProcessor, ProcessError};
use crate::identity::Jid;
use crate::outbox::OutboxError;
use crate::stanza::{AffiliationEvent, AffiliationRequest, NotificationTemplate};
use crate::store::ChannelStore;

impl<S: ChannelStore> AffiliationProcessor<S> {
    /// Broadcast an applied change to every current listener on the node
    ///  and every administrator.
    ///
    /// Listeners are looked up now, not when the change was authorized. An
    ///  identity that is both a listener and an admin gets two copies. One
    ///  failed enqueue does not stop the rest; the first failure is returned
    ///  once every copy has been attempted.
    pub(super) async fn notify(
        &self,
        request: &AffiliationRequest,
        change: &ValidatedChange,
    ) -> Result<usize, ProcessError> {
        let template = NotificationTemplate::new(
            request.to.clone(),
            AffiliationEvent {
                node: change.node.clone(),
                jid: change.target.clone(),
                affiliation: change.affiliation,
            },
        );

        let mut recipients: Vec<Jid> = match self
            .store
            .node_subscription_listeners(&change.node)
            .await
        {
            Ok(subscriptions) => subscriptions.into_iter().map(|s| s.listener).collect(),
            Err(e) => {
                // the requester already has their ack; admins still hear about it
                tracing::error!(
                    "failed to load listeners for {}, notifying admins only: {}",
                    change.node,
                    e
                );
                Vec::new()
            }
        };
        recipients.extend(self.admins.admin_users());

        let mut notified = 0;
        let mut first_error: Option<OutboxError> = None;
        for recipient in recipients {
            match self.outbox.enqueue(template.address(recipient.clone())).await {
                Ok(()) => notified += 1,
                Err(e) => {
                    tracing::warn!("failed to queue notification for {}: {}", recipient, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        tracing::debug!(
            "notified {} recipients of affiliation change on {}",
            notified,
            change.node
        );

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(notified),
        }
    }
}
