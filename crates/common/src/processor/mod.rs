//! # Affiliation change processing
//!
//! [`AffiliationProcessor`] takes one parsed [`AffiliationRequest`] through:
//!
//! ```text
//! validate ──▶ route ──┬──▶ delegate to hosting server        (remote node)
//!                      └──▶ guards ──▶ persist ──▶ ack ──▶ fan-out (local node)
//! ```
//!
//! Every path that does not delegate enqueues exactly one reply to the
//! requester. Rejections never reach the store mutation or the fan-out.
//!
//! The processor holds no mutable state of its own, so one instance may be
//! cloned into as many concurrent request tasks as the caller likes. The
//! store, locality and admin collaborators are injected at construction.

mod guards;
mod notify;
mod validate;

use std::sync::Arc;

use crate::directory::{AdminDirectory, NodeLocality};
use crate::identity::Jid;
use crate::node::NodeId;
use crate::outbox::{Outbox, OutboxError};
use crate::stanza::{AffiliationRequest, Reply, Stanza, StanzaError};
use crate::store::{ChannelStore, ChannelStoreError};

pub use guards::{authorize, Rejection};
pub use validate::{validate, ValidatedChange};

/// What happened to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Forwarded to the server hosting the node
    Delegated { to: Jid },
    /// Answered with an error reply
    Rejected(StanzaError),
    /// Persisted, acknowledged, and broadcast to `notified` recipients
    Applied { notified: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("outbox error: {0}")]
    Outbox(#[from] OutboxError),
}

#[derive(Clone)]
pub struct AffiliationProcessor<S> {
    store: S,
    locality: Arc<dyn NodeLocality>,
    admins: Arc<dyn AdminDirectory>,
    outbox: Outbox,
}

impl<S: std::fmt::Debug> std::fmt::Debug for AffiliationProcessor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AffiliationProcessor")
            .field("store", &self.store)
            .field("locality", &self.locality)
            .field("admins", &self.admins)
            .finish()
    }
}

impl<S: ChannelStore> AffiliationProcessor<S> {
    pub fn new(
        store: S,
        locality: Arc<dyn NodeLocality>,
        admins: Arc<dyn AdminDirectory>,
        outbox: Outbox,
    ) -> Self {
        Self {
            store,
            locality,
            admins,
            outbox,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one request to completion
    ///
    /// # Returns
    /// * `Ok(Outcome)` - Every stanza the outcome implies was queued
    /// * `Err(ProcessError)` - The outbox refused a stanza; the requester
    ///   may not have been answered
    pub async fn process(&self, request: AffiliationRequest) -> Result<Outcome, ProcessError> {
        tracing::debug!(
            "processing affiliation request {} from {}",
            request.id,
            request.from
        );

        let change = match validate(&request) {
            Ok(change) => change,
            Err(error) => return self.reject(&request, error).await,
        };

        if !self.locality.is_local_node(&change.node) {
            return self.delegate(&request, &change.node).await;
        }

        let actor = request.acting_jid().clone();
        match authorize(&self.store, &actor, &change).await {
            Ok(()) => {}
            Err(Rejection::Refused(error)) => return self.reject(&request, error).await,
            Err(Rejection::Store(e)) => return self.fail(&request, e).await,
        }

        if let Err(e) = self
            .store
            .set_user_affiliation(&change.node, &change.target, change.affiliation)
            .await
        {
            return self.fail(&request, e).await;
        }

        tracing::info!(
            node = %change.node,
            actor = %actor,
            target = %change.target,
            affiliation = %change.affiliation,
            "affiliation changed"
        );

        // Acknowledge before fan-out; the requester never waits on notifications
        self.outbox.enqueue(Reply::result(&request)).await?;

        let notified = self.notify(&request, &change).await?;
        Ok(Outcome::Applied { notified })
    }

    async fn reject(
        &self,
        request: &AffiliationRequest,
        error: StanzaError,
    ) -> Result<Outcome, ProcessError> {
        tracing::debug!("rejecting request {}: {}", request.id, error);
        self.outbox
            .enqueue(Reply::error(request, error.clone()))
            .await?;
        Ok(Outcome::Rejected(error))
    }

    async fn fail(
        &self,
        request: &AffiliationRequest,
        e: ChannelStoreError<S::Error>,
    ) -> Result<Outcome, ProcessError> {
        tracing::error!("channel store failed on request {}: {}", request.id, e);
        self.reject(request, StanzaError::internal_server_error()).await
    }

    async fn delegate(
        &self,
        request: &AffiliationRequest,
        node: &NodeId,
    ) -> Result<Outcome, ProcessError> {
        let host = match node.hosting_domain() {
            Ok(host) => host,
            Err(e) => {
                tracing::warn!("cannot route request {} to a remote server: {}", request.id, e);
                return self.reject(request, StanzaError::bad_request()).await;
            }
        };

        tracing::info!("delegating request {} for {} to {}", request.id, node, host);
        self.outbox
            .enqueue(Stanza::Delegation(request.delegate_to(host.clone())))
            .await?;
        Ok(Outcome::Delegated { to: host })
    }
}
