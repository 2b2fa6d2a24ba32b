//! # Affiliations
//!
//! An affiliation is the role an identity holds on a channel node. Roles
//! are not ranked; each carries a fixed set of capabilities:
//!
//! | affiliation | can authorize | notes                                   |
//! |-------------|---------------|-----------------------------------------|
//! | `owner`     | yes           | may grant any affiliation               |
//! | `moderator` | yes           | may not grant `moderator` or `owner`    |
//! | `publisher` | no            |                                         |
//! | `member`    | no            |                                         |
//! | `outcast`   | no            | banned from the node                    |
//! | `none`      | no            | no membership record                    |
//!
//! A [`Membership`] ties one identity to one node with one affiliation. The
//! absence of a membership is modelled as affiliation [`Affiliation::None`].
//!
//! [`Subscription`]s are separate from affiliations: they name the listener
//! that receives event notifications for a subscribed user.

mod membership;
mod subscription;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use membership::Membership;
pub use subscription::{Subscription, SubscriptionState};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown affiliation: {0}")]
pub struct AffiliationParseError(pub String);

/// The role of an identity on a channel node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Affiliation {
    Owner,
    Moderator,
    Publisher,
    Member,
    Outcast,
    #[default]
    None,
}

impl Affiliation {
    pub const ALL: [Affiliation; 6] = [
        Affiliation::Owner,
        Affiliation::Moderator,
        Affiliation::Publisher,
        Affiliation::Member,
        Affiliation::Outcast,
        Affiliation::None,
    ];

    /// Whether holders of this affiliation may change other identities'
    /// affiliations on the node.
    pub fn can_authorize(&self) -> bool {
        matches!(self, Affiliation::Owner | Affiliation::Moderator)
    }

    /// Affiliations only an owner may grant
    pub fn requires_owner_grant(&self) -> bool {
        matches!(self, Affiliation::Owner | Affiliation::Moderator)
    }

    /// Canonical wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Affiliation::Owner => "owner",
            Affiliation::Moderator => "moderator",
            Affiliation::Publisher => "publisher",
            Affiliation::Member => "member",
            Affiliation::Outcast => "outcast",
            Affiliation::None => "none",
        }
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Affiliation {
    type Err = AffiliationParseError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Affiliation::ALL
            .into_iter()
            .find(|affiliation| affiliation.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| AffiliationParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_owner_and_moderator_can_authorize() {
        let authorizers: Vec<_> = Affiliation::ALL
            .into_iter()
            .filter(Affiliation::can_authorize)
            .collect();
        assert_eq!(authorizers, vec![Affiliation::Owner, Affiliation::Moderator]);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Publisher".parse::<Affiliation>(), Ok(Affiliation::Publisher));
        assert_eq!(" OUTCAST ".parse::<Affiliation>(), Ok(Affiliation::Outcast));
        assert_eq!("none".parse::<Affiliation>(), Ok(Affiliation::None));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "admin".parse::<Affiliation>(),
            Err(AffiliationParseError("admin".to_string()))
        );
        assert!("".parse::<Affiliation>().is_err());
    }

    #[test]
    fn test_display_is_canonical() {
        for affiliation in Affiliation::ALL {
            assert_eq!(
                affiliation.to_string().parse::<Affiliation>(),
                Ok(affiliation)
            );
        }
        assert_eq!(Affiliation::Moderator.to_string(), "moderator");
    }
}
