//! Populate a [`MemoryChannelStore`] from a JSON fixture.
//!
//! ```json
//! {
//!   "nodes": [
//!     {
//!       "id": "/user/alice@example.com/posts",
//!       "owner": "alice@example.com",
//!       "affiliations": [{ "user": "bob@example.com", "affiliation": "member" }],
//!       "subscriptions": [{ "user": "bob@example.com" }]
//!     }
//!   ]
//! }
//! ```
//!
//! A subscription's listener defaults to the subscribing user and its
//! state to `subscribed`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use common::affiliation::{Affiliation, Subscription, SubscriptionState};
use common::identity::Jid;
use common::node::NodeId;
use common::store::{ChannelStore, ChannelStoreError, MemoryChannelStore, MemoryChannelStoreError};

#[derive(Debug, Deserialize)]
struct Fixture {
    #[serde(default)]
    nodes: Vec<FixtureNode>,
}

#[derive(Debug, Deserialize)]
struct FixtureNode {
    id: NodeId,
    owner: Jid,
    #[serde(default)]
    affiliations: Vec<FixtureAffiliation>,
    #[serde(default)]
    subscriptions: Vec<FixtureSubscription>,
}

#[derive(Debug, Deserialize)]
struct FixtureAffiliation {
    user: Jid,
    affiliation: Affiliation,
}

#[derive(Debug, Deserialize)]
struct FixtureSubscription {
    user: Jid,
    #[serde(default)]
    listener: Option<Jid>,
    #[serde(default = "default_state")]
    state: SubscriptionState,
}

fn default_state() -> SubscriptionState {
    SubscriptionState::Subscribed
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse seed fixture: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to seed store: {0}")]
    Store(#[from] ChannelStoreError<MemoryChannelStoreError>),
}

/// Load a fixture file into a fresh store
pub async fn load(path: &Path) -> Result<MemoryChannelStore, SeedError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let store = from_json(&contents).await?;
    tracing::info!("seeded channel store from {}", path.display());
    Ok(store)
}

pub async fn from_json(contents: &str) -> Result<MemoryChannelStore, SeedError> {
    let fixture: Fixture = serde_json::from_str(contents)?;
    let store = MemoryChannelStore::new();

    for node in fixture.nodes {
        store.create_node(node.id.clone(), &node.owner)?;

        for entry in node.affiliations {
            store
                .set_user_affiliation(&node.id, &entry.user, entry.affiliation)
                .await?;
        }

        for entry in node.subscriptions {
            let listener = entry.listener.unwrap_or_else(|| entry.user.clone());
            store.subscribe(Subscription::new(
                node.id.clone(),
                entry.user,
                listener,
                entry.state,
            ))?;
        }

        tracing::debug!("seeded node {}", node.id);
    }

    Ok(store)
}
