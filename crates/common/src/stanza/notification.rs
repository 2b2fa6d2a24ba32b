use serde::{Deserialize, Serialize};

use crate::affiliation::Affiliation;
use crate::identity::Jid;
use crate::node::NodeId;

/// The `<affiliations node=".."><affiliation jid=".." affiliation=".."/>`
///  event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationEvent {
    pub node: NodeId,
    pub jid: Jid,
    pub affiliation: Affiliation,
}

/// An addressed `headline` message carrying an affiliation event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationNotification {
    pub from: Jid,
    pub to: Jid,
    /// Always `headline`
    #[serde(rename = "type")]
    pub message_type: String,
    /// Receiving servers must not try to discover the node's home server
    ///  from this notification
    pub remote_server_discover: bool,
    pub event: AffiliationEvent,
}

/// One event, ready to be addressed to any number of recipients
#[derive(Debug, Clone)]
pub struct NotificationTemplate {
    from: Jid,
    event: AffiliationEvent,
}

impl NotificationTemplate {
    pub fn new(from: Jid, event: AffiliationEvent) -> Self {
        Self { from, event }
    }

    /// An independent copy of the notification addressed to `to`
    pub fn address(&self, to: Jid) -> AffiliationNotification {
        AffiliationNotification {
            from: self.from.clone(),
            to,
            message_type: "headline".to_string(),
            remote_server_discover: false,
            event: self.event.clone(),
        }
    }
}
