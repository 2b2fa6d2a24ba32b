use std::fmt::{Debug, Display};

use async_trait::async_trait;

use crate::affiliation::{Affiliation, Membership, Subscription};
use crate::identity::Jid;
use crate::node::NodeId;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelStoreError<T> {
    /// Anything the backing implementation fails with
    #[error("unhandled channel store error: {0}")]
    Provider(#[from] T),
    /// A mutation referenced a node the store does not know
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}

/// Lookup and mutation of channel nodes, memberships and subscriptions.
///
/// Implementations are injected into the affiliation pipeline and must be
/// safe to call concurrently from independent requests. Every call is a
/// fresh query; callers never rely on results being cached between calls.
#[async_trait]
pub trait ChannelStore: Send + Sync + std::fmt::Debug + Clone + 'static {
    type Error: Display + Debug + Send + Sync;

    async fn node_exists(&self, node: &NodeId) -> Result<bool, ChannelStoreError<Self::Error>>;

    /// Get the membership of `user` on `node`
    ///
    /// # Returns
    /// * `Ok(Membership)` - The membership; [`Affiliation::None`] when the
    ///   user holds no record on the node
    /// * `Err(ChannelStoreError)` - The lookup failed
    async fn node_membership(
        &self,
        node: &NodeId,
        user: &Jid,
    ) -> Result<Membership, ChannelStoreError<Self::Error>>;

    /// Set the affiliation of `user` on `node`, last write wins
    ///
    /// Should fail with `Err(ChannelStoreError::NodeNotFound)` if the node
    ///  does not exist.
    async fn set_user_affiliation(
        &self,
        node: &NodeId,
        user: &Jid,
        affiliation: Affiliation,
    ) -> Result<(), ChannelStoreError<Self::Error>>;

    /// Get every subscription currently listening for events on `node`
    async fn node_subscription_listeners(
        &self,
        node: &NodeId,
    ) -> Result<Vec<Subscription>, ChannelStoreError<Self::Error>>;
}
