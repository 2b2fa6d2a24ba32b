use serde::{Deserialize, Serialize};

use super::error::StanzaError;
use super::request::AffiliationRequest;
use crate::identity::Jid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "error", rename_all = "lowercase")]
pub enum ReplyKind {
    /// Acknowledgment, no payload
    Result,
    Error(StanzaError),
}

/// The single reply a requester receives for a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: String,
    pub from: Jid,
    pub to: Jid,
    #[serde(flatten)]
    pub kind: ReplyKind,
}

impl Reply {
    fn for_request(request: &AffiliationRequest, kind: ReplyKind) -> Self {
        Self {
            id: request.id.clone(),
            from: request.to.clone(),
            to: request.from.clone(),
            kind,
        }
    }

    pub fn result(request: &AffiliationRequest) -> Self {
        Self::for_request(request, ReplyKind::Result)
    }

    pub fn error(request: &AffiliationRequest, error: StanzaError) -> Self {
        Self::for_request(request, ReplyKind::Error(error))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, ReplyKind::Error(_))
    }

    pub fn stanza_error(&self) -> Option<&StanzaError> {
        match &self.kind {
            ReplyKind::Result => None,
            ReplyKind::Error(error) => Some(error),
        }
    }
}
