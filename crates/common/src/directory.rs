//! Process-wide knowledge the pipeline consults but does not own: which
//!  nodes this server hosts, and who administers it.

use std::collections::BTreeSet;

use crate::identity::Jid;
use crate::node::NodeId;

/// Decides whether a node is hosted by this server
pub trait NodeLocality: Send + Sync + std::fmt::Debug {
    fn is_local_node(&self, node: &NodeId) -> bool;
}

/// Source of the server's administrator identities
pub trait AdminDirectory: Send + Sync + std::fmt::Debug {
    fn admin_users(&self) -> Vec<Jid>;
}

/// Nodes are local when their hosting domain is one of ours.
///
/// A node id with no recognizable hosting component cannot be routed
///  anywhere else and is treated as local; the store then decides whether
///  it exists.
#[derive(Debug, Clone, Default)]
pub struct LocalDomains {
    domains: BTreeSet<String>,
}

impl LocalDomains {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|domain| domain.as_ref().trim().to_ascii_lowercase())
                .filter(|domain| !domain.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(&domain.trim().to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl NodeLocality for LocalDomains {
    fn is_local_node(&self, node: &NodeId) -> bool {
        match node.hosting_domain() {
            Ok(host) => self.contains(host.domain()),
            Err(e) => {
                tracing::debug!("treating node {} as local: {}", node, e);
                true
            }
        }
    }
}

/// A fixed administrator list, typically read from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticAdmins {
    admins: Vec<Jid>,
}

impl StaticAdmins {
    pub fn new(admins: Vec<Jid>) -> Self {
        Self { admins }
    }
}

impl AdminDirectory for StaticAdmins {
    fn admin_users(&self) -> Vec<Jid> {
        self.admins.clone()
    }
}
