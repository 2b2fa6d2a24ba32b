//! Channel node identifiers.
//!
//! Node ids are opaque strings of the form `/<kind>/<owner-jid>/<channel>`,
//! e.g. `/user/alice@example.com/posts`. The third `/`-separated component
//! names the jid that owns the channel, and its domain names the server
//! that hosts it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::Jid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeIdError {
    #[error("node id has no hosting component: {0}")]
    MissingHost(String),
    #[error("node id hosting component is not a jid: {0}")]
    InvalidHost(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The hosting component of the node id, as written
    pub fn host_component(&self) -> Option<&str> {
        self.0.split('/').nth(2).filter(|part| !part.is_empty())
    }

    /// The domain of the server responsible for this node
    pub fn hosting_domain(&self) -> Result<Jid, NodeIdError> {
        let host = self
            .host_component()
            .ok_or_else(|| NodeIdError::MissingHost(self.0.clone()))?;
        let jid: Jid = host
            .parse()
            .map_err(|_| NodeIdError::InvalidHost(self.0.clone()))?;
        Ok(Jid::domain_only(jid.domain()))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hosting_domain_from_owner_jid() {
        let node = NodeId::from("/user/alice@remote.org/posts");
        assert_eq!(node.host_component(), Some("alice@remote.org"));
        assert_eq!(node.hosting_domain().unwrap(), Jid::domain_only("remote.org"));
    }

    #[test]
    fn test_hosting_domain_from_bare_component() {
        let node = NodeId::from("/topic/news");
        assert_eq!(node.hosting_domain().unwrap(), Jid::domain_only("news"));
    }

    #[test]
    fn test_hosting_domain_missing() {
        let node = NodeId::from("posts");
        assert!(matches!(
            node.hosting_domain(),
            Err(NodeIdError::MissingHost(_))
        ));

        let node = NodeId::from("/user//posts");
        assert!(matches!(
            node.hosting_domain(),
            Err(NodeIdError::MissingHost(_))
        ));
    }
}
