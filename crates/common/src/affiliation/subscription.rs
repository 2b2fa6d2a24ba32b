use serde::{Deserialize, Serialize};

use crate::identity::Jid;
use crate::node::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
    #[default]
    None,
    Pending,
    Unconfigured,
    Subscribed,
}

/// A user's subscription to a node's event notifications.
///
/// `listener` is the entity notifications are delivered to. For local users
/// it is the user themselves; for users on federated servers it is usually
/// their home server, which relays to them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    pub node: NodeId,
    pub user: Jid,
    pub listener: Jid,
    #[serde(default)]
    pub state: SubscriptionState,
}

impl Subscription {
    pub fn new(node: NodeId, user: Jid, listener: Jid, state: SubscriptionState) -> Self {
        Self {
            node,
            user,
            listener,
            state,
        }
    }

    /// Whether this subscription should receive event notifications
    pub fn is_listening(&self) -> bool {
        self.state == SubscriptionState::Subscribed
    }
}
