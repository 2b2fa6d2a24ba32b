//! # Identities
//!
//! Every actor on the channel server is addressed by a [`Jid`]:
//! `local@domain/resource`, where only the domain is mandatory.
//!
//! Authorization decisions are always made against the *bare* form
//! (`local@domain`), never against a full jid with a resource.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur while parsing a jid
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JidError {
    #[error("jid is empty")]
    Empty,
    #[error("jid has an empty domain: {0}")]
    EmptyDomain(String),
    #[error("jid has an empty local part: {0}")]
    EmptyLocal(String),
    #[error("jid has an empty resource: {0}")]
    EmptyResource(String),
}

/// An entity address on the federated network.
///
/// Parsing is structural only; no stringprep or case folding is applied
/// beyond lowercasing the domain, which is case-insensitive on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Jid {
    local: Option<String>,
    domain: String,
    resource: Option<String>,
}

impl Jid {
    /// Build a bare jid for `local@domain`
    pub fn bare(local: &str, domain: &str) -> Self {
        Self {
            local: Some(local.to_string()),
            domain: domain.to_ascii_lowercase(),
            resource: None,
        }
    }

    /// Build a domain-only jid, as used to address a remote server
    pub fn domain_only(domain: &str) -> Self {
        Self {
            local: None,
            domain: domain.to_ascii_lowercase(),
            resource: None,
        }
    }

    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Strip the resource, leaving `local@domain`
    pub fn to_bare(&self) -> Jid {
        Jid {
            local: self.local.clone(),
            domain: self.domain.clone(),
            resource: None,
        }
    }

    pub fn is_bare(&self) -> bool {
        self.resource.is_none()
    }

    /// The bare form rendered as a string
    pub fn bare_string(&self) -> String {
        self.to_bare().to_string()
    }
}

impl FromStr for Jid {
    type Err = JidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(JidError::Empty);
        }

        let (rest, resource) = match s.split_once('/') {
            Some((_, "")) => return Err(JidError::EmptyResource(s.to_string())),
            Some((rest, resource)) => (rest, Some(resource.to_string())),
            None => (s, None),
        };

        let (local, domain) = match rest.split_once('@') {
            Some(("", _)) => return Err(JidError::EmptyLocal(s.to_string())),
            Some((local, domain)) => (Some(local.to_string()), domain),
            None => (None, rest),
        };

        if domain.is_empty() {
            return Err(JidError::EmptyDomain(s.to_string()));
        }

        Ok(Self {
            local,
            domain: domain.to_ascii_lowercase(),
            resource,
        })
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(local) = &self.local {
            write!(f, "{}@", local)?;
        }
        write!(f, "{}", self.domain)?;
        if let Some(resource) = &self.resource {
            write!(f, "/{}", resource)?;
        }
        Ok(())
    }
}

impl Serialize for Jid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Jid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Jid::from_str(&s).map_err(serde::de::Error::custom)
    }
}
