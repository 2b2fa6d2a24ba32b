//! The ordered authorization checks for a local affiliation change.
//!
//! The order below decides which error a request that fails several checks
//!  receives, so it must not change:
//!
//! 1. the node exists
//! 2. the actor may authorize, and may grant the requested affiliation
//! 3. the target already holds an affiliation
//! 4. the actor is not the target
//! 5. the target is not an owner

use super::validate::ValidatedChange;
use crate::affiliation::{Affiliation, Membership};
use crate::identity::Jid;
use crate::stanza::StanzaError;
use crate::store::{ChannelStore, ChannelStoreError};

/// Why a guard stopped the pipeline
#[derive(Debug)]
pub enum Rejection<E> {
    /// The request is refused with this error
    Refused(StanzaError),
    /// The store failed while checking
    Store(ChannelStoreError<E>),
}

impl<E> From<ChannelStoreError<E>> for Rejection<E> {
    fn from(e: ChannelStoreError<E>) -> Self {
        Rejection::Store(e)
    }
}

impl<E> From<StanzaError> for Rejection<E> {
    fn from(e: StanzaError) -> Self {
        Rejection::Refused(e)
    }
}

/// Run every guard in order, stopping at the first failure
pub async fn authorize<S: ChannelStore>(
    store: &S,
    actor: &Jid,
    change: &ValidatedChange,
) -> Result<(), Rejection<S::Error>> {
    node_exists(store, change).await?;
    actor_may_grant(store, actor, change).await?;
    let current = target_is_affiliated(store, change).await?;
    not_own_affiliation(actor, change)?;
    target_is_not_owner(&current)?;
    Ok(())
}

async fn node_exists<S: ChannelStore>(
    store: &S,
    change: &ValidatedChange,
) -> Result<(), Rejection<S::Error>> {
    if !store.node_exists(&change.node).await? {
        tracing::debug!("node {} does not exist", change.node);
        return Err(StanzaError::item_not_found().into());
    }
    Ok(())
}

async fn actor_may_grant<S: ChannelStore>(
    store: &S,
    actor: &Jid,
    change: &ValidatedChange,
) -> Result<(), Rejection<S::Error>> {
    let membership = store.node_membership(&change.node, actor).await?;
    check_grant(membership.affiliation, change.affiliation)?;
    Ok(())
}

/// Owners may grant anything; moderators anything but moderator or owner
fn check_grant(actor: Affiliation, requested: Affiliation) -> Result<(), StanzaError> {
    if !actor.can_authorize() {
        return Err(StanzaError::not_authorized());
    }
    if actor == Affiliation::Owner {
        return Ok(());
    }
    if requested.requires_owner_grant() {
        return Err(StanzaError::forbidden());
    }
    Ok(())
}

/// Returns the target's current membership
async fn target_is_affiliated<S: ChannelStore>(
    store: &S,
    change: &ValidatedChange,
) -> Result<Membership, Rejection<S::Error>> {
    let current = store.node_membership(&change.node, &change.target).await?;
    if !current.is_affiliated() {
        tracing::debug!("{} has no affiliation on {}", change.target, change.node);
        return Err(StanzaError::unexpected_request().into());
    }
    Ok(current)
}

fn not_own_affiliation(actor: &Jid, change: &ValidatedChange) -> Result<(), StanzaError> {
    if actor.to_bare() == change.target {
        return Err(StanzaError::cannot_modify_own_affiliation());
    }
    Ok(())
}

/// No one can change an owner's affiliation through this path
fn target_is_not_owner(current: &Membership) -> Result<(), StanzaError> {
    if current.affiliation == Affiliation::Owner {
        return Err(StanzaError::not_acceptable());
    }
    Ok(())
}
