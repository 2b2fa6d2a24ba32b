use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, RwLock};

use super::provider::{ChannelStore, ChannelStoreError};
use crate::affiliation::{Affiliation, Membership, Subscription};
use crate::identity::Jid;
use crate::node::NodeId;

/// In-memory channel store using HashMaps
#[derive(Debug, Clone)]
pub struct MemoryChannelStore {
    inner: Arc<RwLock<MemoryChannelStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryChannelStoreInner {
    nodes: HashSet<NodeId>,
    /// node -> bare user jid -> affiliation
    affiliations: HashMap<NodeId, HashMap<Jid, Affiliation>>,
    /// node -> bare user jid -> subscription, ordered for stable fan-out
    subscriptions: HashMap<NodeId, BTreeMap<Jid, Subscription>>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryChannelStoreError {
    #[error("memory store error: {0}")]
    Internal(String),
}

impl MemoryChannelStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryChannelStoreInner::default())),
        }
    }

    fn read(
        &self,
    ) -> Result<
        std::sync::RwLockReadGuard<'_, MemoryChannelStoreInner>,
        ChannelStoreError<MemoryChannelStoreError>,
    > {
        self.inner.read().map_err(|e| {
            ChannelStoreError::Provider(MemoryChannelStoreError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(
        &self,
    ) -> Result<
        std::sync::RwLockWriteGuard<'_, MemoryChannelStoreInner>,
        ChannelStoreError<MemoryChannelStoreError>,
    > {
        self.inner.write().map_err(|e| {
            ChannelStoreError::Provider(MemoryChannelStoreError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }

    /// Register a node. Creating nodes is not part of the affiliation
    ///  pipeline; this exists for seeding and tests.
    pub fn create_node(
        &self,
        node: NodeId,
        owner: &Jid,
    ) -> Result<(), ChannelStoreError<MemoryChannelStoreError>> {
        let mut inner = self.write()?;
        inner
            .affiliations
            .entry(node.clone())
            .or_default()
            .insert(owner.to_bare(), Affiliation::Owner);
        inner.nodes.insert(node);
        Ok(())
    }

    /// Add or replace a subscription on an existing node
    pub fn subscribe(
        &self,
        subscription: Subscription,
    ) -> Result<(), ChannelStoreError<MemoryChannelStoreError>> {
        let mut inner = self.write()?;
        if !inner.nodes.contains(&subscription.node) {
            return Err(ChannelStoreError::NodeNotFound(subscription.node));
        }
        inner
            .subscriptions
            .entry(subscription.node.clone())
            .or_default()
            .insert(subscription.user.to_bare(), subscription);
        Ok(())
    }

    /// Every membership recorded on a node, excluding `none`
    pub fn memberships(
        &self,
        node: &NodeId,
    ) -> Result<Vec<Membership>, ChannelStoreError<MemoryChannelStoreError>> {
        let inner = self.read()?;
        let mut memberships: Vec<_> = inner
            .affiliations
            .get(node)
            .map(|users| {
                users
                    .iter()
                    .filter(|(_, affiliation)| **affiliation != Affiliation::None)
                    .map(|(user, affiliation)| {
                        Membership::new(node.clone(), user.clone(), *affiliation)
                    })
                    .collect()
            })
            .unwrap_or_default();
        memberships.sort_by(|a, b| a.user.cmp(&b.user));
        Ok(memberships)
    }
}

impl Default for MemoryChannelStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelStore for MemoryChannelStore {
    type Error = MemoryChannelStoreError;

    async fn node_exists(&self, node: &NodeId) -> Result<bool, ChannelStoreError<Self::Error>> {
        let inner = self.read()?;
        Ok(inner.nodes.contains(node))
    }

    async fn node_membership(
        &self,
        node: &NodeId,
        user: &Jid,
    ) -> Result<Membership, ChannelStoreError<Self::Error>> {
        let inner = self.read()?;
        let user = user.to_bare();
        let affiliation = inner
            .affiliations
            .get(node)
            .and_then(|users| users.get(&user))
            .copied()
            .unwrap_or_default();
        Ok(Membership::new(node.clone(), user, affiliation))
    }

    async fn set_user_affiliation(
        &self,
        node: &NodeId,
        user: &Jid,
        affiliation: Affiliation,
    ) -> Result<(), ChannelStoreError<Self::Error>> {
        let mut inner = self.write()?;
        if !inner.nodes.contains(node) {
            return Err(ChannelStoreError::NodeNotFound(node.clone()));
        }
        inner
            .affiliations
            .entry(node.clone())
            .or_default()
            .insert(user.to_bare(), affiliation);
        Ok(())
    }

    async fn node_subscription_listeners(
        &self,
        node: &NodeId,
    ) -> Result<Vec<Subscription>, ChannelStoreError<Self::Error>> {
        let inner = self.read()?;
        Ok(inner
            .subscriptions
            .get(node)
            .map(|subscriptions| {
                subscriptions
                    .values()
                    .filter(|subscription| subscription.is_listening())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
