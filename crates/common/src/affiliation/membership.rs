use serde::{Deserialize, Serialize};

use super::Affiliation;
use crate::identity::Jid;
use crate::node::NodeId;

/// The affiliation record of one identity on one node.
///
/// Stores never return "no membership"; an identity without a record is
/// reported with [`Affiliation::None`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    pub node: NodeId,
    pub user: Jid,
    pub affiliation: Affiliation,
}

impl Membership {
    pub fn new(node: NodeId, user: Jid, affiliation: Affiliation) -> Self {
        Self {
            node,
            user,
            affiliation,
        }
    }

    /// Membership for an identity that has no record on the node
    pub fn none(node: NodeId, user: Jid) -> Self {
        Self::new(node, user, Affiliation::None)
    }

    pub fn is_affiliated(&self) -> bool {
        self.affiliation != Affiliation::None
    }
}
