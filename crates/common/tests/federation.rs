//! Integration tests for routing requests on remote nodes

mod common;

use std::sync::Arc;

use ::common::directory::{NodeLocality, StaticAdmins};
use ::common::identity::Jid;
use ::common::node::NodeId;
use ::common::outbox::Outbox;
use ::common::processor::{AffiliationProcessor, Outcome};
use ::common::stanza::{ActingIdentity, Stanza, StanzaError};
use common::*;

#[tokio::test]
async fn test_remote_node_is_delegated_to_hosting_server() {
    let env = setup_test_env().await;

    let outcome = env
        .processor
        .process(request("alice@example.com/laptop", REMOTE_NODE, MEMBER, "publisher"))
        .await
        .unwrap();
    assert_eq!(
        outcome,
        Outcome::Delegated {
            to: Jid::domain_only("remote.org")
        }
    );

    let stanzas = env.outbox.drain();
    assert_eq!(stanzas.len(), 1);
    let forwarded = match &stanzas[0] {
        Stanza::Delegation(forwarded) => forwarded,
        other => panic!("expected a delegation, got {:?}", other),
    };
    assert_eq!(forwarded.to, Jid::domain_only("remote.org"));
    assert_eq!(forwarded.actor, ActingIdentity::Explicit(jid(OWNER)));
    assert_eq!(forwarded.from, jid("alice@example.com/laptop"));
    assert_eq!(forwarded.node, Some(NodeId::from(REMOTE_NODE)));
    assert_eq!(forwarded.item, request(OWNER, REMOTE_NODE, MEMBER, "publisher").item);
}

#[tokio::test]
async fn test_delegation_touches_no_local_state() {
    let env = setup_with_store(FailingStore::new(seeded_store().await, FailOn::Everything));

    let outcome = env
        .processor
        .process(request(STRANGER, REMOTE_NODE, MEMBER, "owner"))
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Delegated { .. }));

    // no ack, no error, no notifications
    let stanzas = env.outbox.drain();
    assert!(replies(&stanzas).is_empty());
    assert!(notifications(&stanzas).is_empty());
    assert_eq!(
        affiliation_of(env.processor.store().inner(), MEMBER).await,
        ::common::affiliation::Affiliation::Member
    );
}

#[tokio::test]
async fn test_delegation_replaces_explicit_actor_with_sender() {
    let env = setup_test_env().await;

    let req = request(STRANGER, REMOTE_NODE, MEMBER, "publisher").with_actor(jid(OWNER));
    env.processor.process(req).await.unwrap();

    let stanzas = env.outbox.drain();
    match &stanzas[0] {
        Stanza::Delegation(forwarded) => {
            assert_eq!(forwarded.actor, ActingIdentity::Explicit(jid(STRANGER)));
        }
        other => panic!("expected a delegation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_remote_request_is_rejected_locally() {
    let env = setup_test_env().await;

    let outcome = env
        .processor
        .process(request(OWNER, REMOTE_NODE, MEMBER, "emperor"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Rejected(StanzaError::bad_request()));

    let stanzas = env.outbox.drain();
    assert_eq!(stanzas.len(), 1);
    assert!(matches!(stanzas[0], Stanza::Reply(_)));
}

#[tokio::test]
async fn test_unroutable_node_is_treated_as_local() {
    let env = setup_test_env().await;

    env.processor
        .process(request(OWNER, "orphan", MEMBER, "publisher"))
        .await
        .unwrap();

    let stanzas = env.outbox.drain();
    assert_eq!(
        replies(&stanzas)[0].stanza_error(),
        Some(&StanzaError::item_not_found())
    );
}

/// Locality that calls every node remote
#[derive(Debug)]
struct NothingIsLocal;

impl NodeLocality for NothingIsLocal {
    fn is_local_node(&self, _node: &NodeId) -> bool {
        false
    }
}

#[tokio::test]
async fn test_remote_node_without_host_is_bad_request() {
    let (outbox, rx) = Outbox::unbounded();
    let processor = AffiliationProcessor::new(
        seeded_store().await,
        Arc::new(NothingIsLocal),
        Arc::new(StaticAdmins::default()),
        outbox,
    );

    let outcome = processor
        .process(request(OWNER, "orphan", MEMBER, "publisher"))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Rejected(StanzaError::bad_request()));
    assert_eq!(rx.drain().len(), 1);
}
