use std::fmt;

use serde::{Deserialize, Serialize};

use super::{NS_BUDDYCLOUD_ERROR, NS_PUBSUB_ERRORS};

/// How the requester should react to an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    /// Do not retry
    Cancel,
    /// Retry after changing the request
    Modify,
    /// Retry after providing credentials or gaining rights
    Auth,
    /// Retry after waiting
    Wait,
}

/// Defined stanza error conditions this pipeline produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    BadRequest,
    ItemNotFound,
    NotAuthorized,
    Forbidden,
    UnexpectedRequest,
    NotAllowed,
    NotAcceptable,
    InternalServerError,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::BadRequest => "bad-request",
            Condition::ItemNotFound => "item-not-found",
            Condition::NotAuthorized => "not-authorized",
            Condition::Forbidden => "forbidden",
            Condition::UnexpectedRequest => "unexpected-request",
            Condition::NotAllowed => "not-allowed",
            Condition::NotAcceptable => "not-acceptable",
            Condition::InternalServerError => "internal-server-error",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An application-specific condition qualifying a defined condition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationCondition {
    pub name: String,
    pub namespace: String,
}

impl ApplicationCondition {
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
        }
    }
}

/// A structured error carried by an error reply
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StanzaError {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    pub condition: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<ApplicationCondition>,
}

pub const NODEID_REQUIRED: &str = "nodeid-required";
pub const CAN_NOT_MODIFY_OWN_AFFILIATION: &str = "can-not-modify-own-affiliation";

impl StanzaError {
    pub fn new(error_type: ErrorType, condition: Condition) -> Self {
        Self {
            error_type,
            condition,
            application: None,
        }
    }

    pub fn with_application(mut self, name: &str, namespace: &str) -> Self {
        self.application = Some(ApplicationCondition::new(name, namespace));
        self
    }

    pub fn bad_request() -> Self {
        Self::new(ErrorType::Modify, Condition::BadRequest)
    }

    pub fn nodeid_required() -> Self {
        Self::bad_request().with_application(NODEID_REQUIRED, NS_PUBSUB_ERRORS)
    }

    pub fn item_not_found() -> Self {
        Self::new(ErrorType::Cancel, Condition::ItemNotFound)
    }

    pub fn not_authorized() -> Self {
        Self::new(ErrorType::Auth, Condition::NotAuthorized)
    }

    pub fn forbidden() -> Self {
        Self::new(ErrorType::Auth, Condition::Forbidden)
    }

    pub fn unexpected_request() -> Self {
        Self::new(ErrorType::Modify, Condition::UnexpectedRequest)
    }

    pub fn cannot_modify_own_affiliation() -> Self {
        Self::new(ErrorType::Cancel, Condition::NotAllowed)
            .with_application(CAN_NOT_MODIFY_OWN_AFFILIATION, NS_BUDDYCLOUD_ERROR)
    }

    pub fn not_acceptable() -> Self {
        Self::new(ErrorType::Modify, Condition::NotAcceptable)
    }

    pub fn internal_server_error() -> Self {
        Self::new(ErrorType::Wait, Condition::InternalServerError)
    }

    /// Name of the application condition, if any
    pub fn application_name(&self) -> Option<&str> {
        self.application.as_ref().map(|app| app.name.as_str())
    }
}

impl fmt::Display for StanzaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{}", self.error_type, self.condition)?;
        if let Some(app) = &self.application {
            write!(f, " ({})", app.name)?;
        }
        Ok(())
    }
}
