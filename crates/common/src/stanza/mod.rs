//! Structured stanzas exchanged by the affiliation pipeline.
//!
//! Wire parsing and serialization belong to the transport; everything here
//!  is the already-parsed form. The pipeline consumes
//!  [`AffiliationRequest`]s and produces [`Stanza`]s for the outbox.

use serde::{Deserialize, Serialize};

mod error;
mod notification;
mod reply;
mod request;

pub use error::{
    ApplicationCondition, Condition, ErrorType, StanzaError, CAN_NOT_MODIFY_OWN_AFFILIATION,
    NODEID_REQUIRED,
};
pub use notification::{AffiliationEvent, AffiliationNotification, NotificationTemplate};
pub use reply::{Reply, ReplyKind};
pub use request::{ActingIdentity, AffiliationItem, AffiliationRequest};

use crate::identity::Jid;

pub const NS_PUBSUB_ERRORS: &str = "http://jabber.org/protocol/pubsub#errors";
pub const NS_BUDDYCLOUD_ERROR: &str = "http://buddycloud.org/v1#error";

/// Anything the pipeline hands to the outbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stanza {
    Reply(Reply),
    Notification(AffiliationNotification),
    /// A request forwarded to the server hosting the node
    Delegation(AffiliationRequest),
}

impl Stanza {
    /// Addressee of the stanza
    pub fn to(&self) -> &Jid {
        match self {
            Stanza::Reply(reply) => &reply.to,
            Stanza::Notification(notification) => &notification.to,
            Stanza::Delegation(request) => &request.to,
        }
    }
}

impl From<Reply> for Stanza {
    fn from(reply: Reply) -> Self {
        Stanza::Reply(reply)
    }
}

impl From<AffiliationNotification> for Stanza {
    fn from(notification: AffiliationNotification) -> Self {
        Stanza::Notification(notification)
    }
}
