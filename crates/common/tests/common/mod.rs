//! Shared test utilities for affiliation pipeline integration tests
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;

use common::affiliation::{Affiliation, Membership, Subscription, SubscriptionState};
use common::directory::{LocalDomains, StaticAdmins};
use common::identity::Jid;
use common::node::NodeId;
use common::outbox::{Outbox, OutboxReceiver};
use common::processor::AffiliationProcessor;
use common::stanza::{AffiliationItem, AffiliationNotification, AffiliationRequest, Reply, Stanza};
use common::store::{ChannelStore, ChannelStoreError, MemoryChannelStore, MemoryChannelStoreError};

pub const SERVER: &str = "channels.example.com";
pub const NODE: &str = "/user/alice@example.com/posts";
pub const REMOTE_NODE: &str = "/user/dan@remote.org/posts";

pub const OWNER: &str = "alice@example.com";
pub const SECOND_OWNER: &str = "zed@example.com";
pub const MODERATOR: &str = "mod@example.com";
pub const PUBLISHER: &str = "pub@example.com";
pub const MEMBER: &str = "bob@example.com";
pub const OUTCAST: &str = "spam@example.com";
pub const STRANGER: &str = "eve@example.com";

pub const ADMIN: &str = "admin@example.com";
pub const OPS: &str = "ops@example.com";

pub fn jid(s: &str) -> Jid {
    s.parse().unwrap()
}

pub struct TestEnv<S> {
    pub processor: AffiliationProcessor<S>,
    pub outbox: OutboxReceiver,
}

/// Seed a store with one local node:
///
/// - alice (owner), zed (owner), mod (moderator), pub (publisher),
///   bob (member), spam (outcast)
/// - listeners: bob, dan@remote.org via channels.remote.org, and the admin
pub async fn seeded_store() -> MemoryChannelStore {
    let store = MemoryChannelStore::new();
    let node = NodeId::from(NODE);
    store.create_node(node.clone(), &jid(OWNER)).unwrap();

    for (user, affiliation) in [
        (SECOND_OWNER, Affiliation::Owner),
        (MODERATOR, Affiliation::Moderator),
        (PUBLISHER, Affiliation::Publisher),
        (MEMBER, Affiliation::Member),
        (OUTCAST, Affiliation::Outcast),
    ] {
        store
            .set_user_affiliation(&node, &jid(user), affiliation)
            .await
            .unwrap();
    }

    for (user, listener) in [
        (MEMBER, MEMBER),
        ("dan@remote.org", "channels.remote.org"),
        (ADMIN, ADMIN),
    ] {
        store
            .subscribe(Subscription::new(
                node.clone(),
                jid(user),
                jid(listener),
                SubscriptionState::Subscribed,
            ))
            .unwrap();
    }

    store
}

pub async fn setup_test_env() -> TestEnv<MemoryChannelStore> {
    setup_with_store(seeded_store().await)
}

pub fn setup_with_store<S: ChannelStore>(store: S) -> TestEnv<S> {
    let (outbox, rx) = Outbox::unbounded();
    let processor = AffiliationProcessor::new(
        store,
        Arc::new(LocalDomains::new(["example.com"])),
        Arc::new(StaticAdmins::new(vec![jid(ADMIN), jid(OPS)])),
        outbox,
    );
    TestEnv {
        processor,
        outbox: rx,
    }
}

/// A request from `from` to set `target` to `affiliation` on `node`
pub fn request(from: &str, node: &str, target: &str, affiliation: &str) -> AffiliationRequest {
    AffiliationRequest::new(
        "req-1",
        jid(from),
        jid(SERVER),
        NodeId::from(node),
        AffiliationItem::new(target, affiliation),
    )
}

pub async fn affiliation_of<S: ChannelStore>(store: &S, user: &str) -> Affiliation {
    store
        .node_membership(&NodeId::from(NODE), &jid(user))
        .await
        .map(|membership: Membership| membership.affiliation)
        .unwrap_or_else(|_| panic!("membership lookup failed for {}", user))
}

pub fn replies(stanzas: &[Stanza]) -> Vec<&Reply> {
    stanzas
        .iter()
        .filter_map(|stanza| match stanza {
            Stanza::Reply(reply) => Some(reply),
            _ => None,
        })
        .collect()
}

pub fn notifications(stanzas: &[Stanza]) -> Vec<&AffiliationNotification> {
    stanzas
        .iter()
        .filter_map(|stanza| match stanza {
            Stanza::Notification(notification) => Some(notification),
            _ => None,
        })
        .collect()
}

/// Which store operation a [`FailingStore`] should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    NodeExists,
    Membership,
    SetAffiliation,
    Listeners,
    Everything,
}

/// A store that wraps a seeded memory store and fails one kind of call
#[derive(Debug, Clone)]
pub struct FailingStore {
    inner: MemoryChannelStore,
    fail_on: FailOn,
}

impl FailingStore {
    pub fn new(inner: MemoryChannelStore, fail_on: FailOn) -> Self {
        Self { inner, fail_on }
    }

    pub fn inner(&self) -> &MemoryChannelStore {
        &self.inner
    }

    fn check(&self, op: FailOn) -> Result<(), ChannelStoreError<MemoryChannelStoreError>> {
        if self.fail_on == op || self.fail_on == FailOn::Everything {
            return Err(ChannelStoreError::Provider(MemoryChannelStoreError::Internal(
                format!("injected failure on {:?}", op),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelStore for FailingStore {
    type Error = MemoryChannelStoreError;

    async fn node_exists(&self, node: &NodeId) -> Result<bool, ChannelStoreError<Self::Error>> {
        self.check(FailOn::NodeExists)?;
        self.inner.node_exists(node).await
    }

    async fn node_membership(
        &self,
        node: &NodeId,
        user: &Jid,
    ) -> Result<Membership, ChannelStoreError<Self::Error>> {
        self.check(FailOn::Membership)?;
        self.inner.node_membership(node, user).await
    }

    async fn set_user_affiliation(
        &self,
        node: &NodeId,
        user: &Jid,
        affiliation: Affiliation,
    ) -> Result<(), ChannelStoreError<Self::Error>> {
        self.check(FailOn::SetAffiliation)?;
        self.inner.set_user_affiliation(node, user, affiliation).await
    }

    async fn node_subscription_listeners(
        &self,
        node: &NodeId,
    ) -> Result<Vec<Subscription>, ChannelStoreError<Self::Error>> {
        self.check(FailOn::Listeners)?;
        self.inner.node_subscription_listeners(node).await
    }
}
