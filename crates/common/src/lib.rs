/**
 * Affiliation roles, memberships and subscriptions
 *  on channel nodes.
 */
pub mod affiliation;
/**
 * Collaborator traits for process-wide knowledge:
 *  which nodes are hosted here, and who the
 *  administrators are.
 */
pub mod directory;
pub mod identity;
pub mod node;
/**
 * The outgoing stanza queue. The pipeline only
 *  produces into it; the network send loop
 *  consumes it elsewhere.
 */
pub mod outbox;
/**
 * The affiliation-change pipeline: validation,
 *  federation routing, authorization guards,
 *  persistence and notification fan-out.
 */
pub mod processor;
/**
 * Already-parsed request, reply and notification
 *  values. Wire encoding is the transport's job.
 */
pub mod stanza;
/**
 * Channel store provider trait and an in-memory
 *  implementation.
 */
pub mod store;

pub mod prelude {
    pub use crate::affiliation::{Affiliation, Membership, Subscription, SubscriptionState};
    pub use crate::directory::{AdminDirectory, LocalDomains, NodeLocality, StaticAdmins};
    pub use crate::identity::Jid;
    pub use crate::node::NodeId;
    pub use crate::outbox::{Outbox, OutboxReceiver};
    pub use crate::processor::{AffiliationProcessor, Outcome, ProcessError};
    pub use crate::stanza::{AffiliationItem, AffiliationRequest, Reply, Stanza, StanzaError};
    pub use crate::store::{ChannelStore, MemoryChannelStore};
}
