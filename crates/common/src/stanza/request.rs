use serde::{Deserialize, Serialize};

use crate::identity::Jid;
use crate::node::NodeId;

/// Who the request is made on behalf of.
///
/// Requests normally act as their envelope sender. A trusted peer (or a
///  server relaying a federated request) names the true actor explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Jid>", into = "Option<Jid>")]
pub enum ActingIdentity {
    #[default]
    Sender,
    Explicit(Jid),
}

impl From<Option<Jid>> for ActingIdentity {
    fn from(jid: Option<Jid>) -> Self {
        match jid {
            Some(jid) => ActingIdentity::Explicit(jid),
            None => ActingIdentity::Sender,
        }
    }
}

impl From<ActingIdentity> for Option<Jid> {
    fn from(actor: ActingIdentity) -> Self {
        match actor {
            ActingIdentity::Sender => None,
            ActingIdentity::Explicit(jid) => Some(jid),
        }
    }
}

/// The `<affiliation jid=".." affiliation=".."/>` payload, as received.
///
/// Attributes stay raw strings until validation so that a malformed value
///  is reported as a bad request rather than failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AffiliationItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
}

impl AffiliationItem {
    pub fn new(jid: &str, affiliation: &str) -> Self {
        Self {
            jid: Some(jid.to_string()),
            affiliation: Some(affiliation.to_string()),
        }
    }
}

/// A request to change another identity's affiliation on a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationRequest {
    /// Stanza id, echoed on the reply
    pub id: String,
    /// Authenticated envelope sender
    pub from: Jid,
    /// Addressee; this server for inbound requests
    pub to: Jid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    #[serde(default)]
    pub actor: ActingIdentity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<AffiliationItem>,
}

impl AffiliationRequest {
    pub fn new(id: &str, from: Jid, to: Jid, node: NodeId, item: AffiliationItem) -> Self {
        Self {
            id: id.to_string(),
            from,
            to,
            node: Some(node),
            actor: ActingIdentity::Sender,
            item: Some(item),
        }
    }

    pub fn with_actor(mut self, actor: Jid) -> Self {
        self.actor = ActingIdentity::Explicit(actor);
        self
    }

    /// The identity whose rights authorize this request
    pub fn acting_jid(&self) -> &Jid {
        match &self.actor {
            ActingIdentity::Sender => &self.from,
            ActingIdentity::Explicit(jid) => jid,
        }
    }

    /// Copy of this request re-addressed to the server hosting the node,
    ///  carrying the sender's bare identity as the explicit actor.
    pub fn delegate_to(&self, host: Jid) -> AffiliationRequest {
        AffiliationRequest {
            to: host,
            actor: ActingIdentity::Explicit(self.from.to_bare()),
            ..self.clone()
        }
    }
}
