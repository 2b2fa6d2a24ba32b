use crate::affiliation::Affiliation;
use crate::identity::Jid;
use crate::node::NodeId;
use crate::stanza::{AffiliationRequest, StanzaError};

/// A structurally valid affiliation change, not yet authorized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedChange {
    pub node: NodeId,
    /// Bare identity whose affiliation changes
    pub target: Jid,
    pub affiliation: Affiliation,
}

/// Check the request shape and resolve the node, target and affiliation.
///
/// Does not touch the store.
pub fn validate(request: &AffiliationRequest) -> Result<ValidatedChange, StanzaError> {
    let node = match &request.node {
        Some(node) if !node.as_str().trim().is_empty() => node.clone(),
        _ => return Err(StanzaError::nodeid_required()),
    };

    let item = request.item.as_ref().ok_or_else(|| {
        tracing::debug!("request {} has no affiliation payload", request.id);
        StanzaError::bad_request()
    })?;

    let (Some(jid), Some(affiliation)) = (&item.jid, &item.affiliation) else {
        tracing::debug!("request {} has an incomplete affiliation payload", request.id);
        return Err(StanzaError::bad_request());
    };

    let target: Jid = jid.parse().map_err(|e| {
        tracing::debug!("request {} names an invalid jid: {}", request.id, e);
        StanzaError::bad_request()
    })?;

    let affiliation: Affiliation = affiliation.parse().map_err(|e| {
        tracing::debug!("request {}: {}", request.id, e);
        StanzaError::bad_request()
    })?;

    Ok(ValidatedChange {
        node,
        target: target.to_bare(),
        affiliation,
    })
}
