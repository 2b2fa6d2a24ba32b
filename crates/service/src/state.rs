use std::sync::Arc;

use common::directory::{LocalDomains, StaticAdmins};
use common::identity::Jid;
use common::outbox::{Outbox, OutboxReceiver};
use common::processor::AffiliationProcessor;
use common::store::ChannelStore;

use super::config::{Config, ConfigError};

/// Main service state - the wired affiliation pipeline
#[derive(Debug, Clone)]
pub struct State<S> {
    server_jid: Jid,
    processor: AffiliationProcessor<S>,
}

impl<S: ChannelStore> State<S> {
    /// Wire a processor over `store` from configuration.
    ///
    /// Returns the state and the consumer side of its outbox; whoever
    ///  owns the receiver is responsible for delivering stanzas.
    pub fn from_config(config: &Config, store: S) -> Result<(Self, OutboxReceiver), StateSetupError> {
        config.validate()?;

        // 1. Identity and collaborators
        let server_jid = config.server_jid()?;
        let locality = LocalDomains::new(&config.local_domains);
        let admins = StaticAdmins::new(config.admin_jids()?);
        tracing::info!(
            "serving as {} for domains {:?}",
            server_jid,
            config.local_domains
        );
        tracing::debug!("{} administrators configured", config.admins.len());

        // 2. Outgoing queue
        let (outbox, receiver) = Outbox::with_capacity(config.outbox_capacity);

        // 3. Pipeline
        let processor = AffiliationProcessor::new(store, Arc::new(locality), Arc::new(admins), outbox);

        Ok((
            Self {
                server_jid,
                processor,
            },
            receiver,
        ))
    }

    pub fn server_jid(&self) -> &Jid {
        &self.server_jid
    }

    pub fn processor(&self) -> &AffiliationProcessor<S> {
        &self.processor
    }

    pub fn store(&self) -> &S {
        self.processor.store()
    }
}

impl<S> AsRef<AffiliationProcessor<S>> for State<S> {
    fn as_ref(&self) -> &AffiliationProcessor<S> {
        &self.processor
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::node::NodeId;
    use common::processor::Outcome;
    use common::stanza::{AffiliationItem, AffiliationRequest, Stanza, StanzaError};
    use common::store::MemoryChannelStore;

    fn config() -> Config {
        Config {
            server_jid: "channels.example.com".to_string(),
            local_domains: vec!["example.com".to_string()],
            admins: vec!["admin@example.com".to_string()],
            outbox_capacity: Some(16),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_state_routes_by_configured_domains() {
        let (state, receiver) = State::from_config(&config(), MemoryChannelStore::new()).unwrap();
        assert_eq!(state.server_jid().to_string(), "channels.example.com");

        let request = AffiliationRequest::new(
            "req-1",
            "alice@example.com".parse().unwrap(),
            state.server_jid().clone(),
            NodeId::from("/user/dan@remote.org/posts"),
            AffiliationItem::new("bob@example.com", "member"),
        );
        let outcome = state.processor().process(request).await.unwrap();
        assert!(matches!(outcome, Outcome::Delegated { .. }));
        assert!(matches!(receiver.try_recv(), Some(Stanza::Delegation(_))));
    }

    #[tokio::test]
    async fn test_state_notifies_configured_admins() {
        let store = MemoryChannelStore::new();
        let node = NodeId::from("/user/alice@example.com/posts");
        store
            .create_node(node.clone(), &"alice@example.com".parse().unwrap())
            .unwrap();
        store
            .set_user_affiliation(
                &node,
                &"bob@example.com".parse().unwrap(),
                common::affiliation::Affiliation::Member,
            )
            .await
            .unwrap();

        let (state, receiver) = State::from_config(&config(), store).unwrap();
        let request = AffiliationRequest::new(
            "req-1",
            "alice@example.com".parse().unwrap(),
            state.server_jid().clone(),
            node,
            AffiliationItem::new("bob@example.com", "publisher"),
        );
        let outcome = state.processor().process(request).await.unwrap();
        assert_eq!(outcome, Outcome::Applied { notified: 1 });

        let stanzas = receiver.drain();
        assert_eq!(stanzas.len(), 2);
        assert_eq!(stanzas[1].to().to_string(), "admin@example.com");
    }

    #[tokio::test]
    async fn test_padded_local_domain_still_matches() {
        let config = Config {
            local_domains: vec![" example.com ".to_string()],
            ..config()
        };
        let (state, receiver) = State::from_config(&config, MemoryChannelStore::new()).unwrap();

        let request = AffiliationRequest::new(
            "req-1",
            "alice@example.com".parse().unwrap(),
            state.server_jid().clone(),
            NodeId::from("/user/alice@example.com/posts"),
            AffiliationItem::new("bob@example.com", "member"),
        );
        // handled locally: the node is unknown here, not forwarded
        let outcome = state.processor().process(request).await.unwrap();
        assert_eq!(outcome, Outcome::Rejected(StanzaError::item_not_found()));
        assert!(matches!(receiver.try_recv(), Some(Stanza::Reply(_))));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            server_jid: "".to_string(),
            ..Config::default()
        };
        let err = State::from_config(&config, MemoryChannelStore::new()).unwrap_err();
        assert!(matches!(err, StateSetupError::Config(ConfigError::InvalidJid { .. })));
    }
}
