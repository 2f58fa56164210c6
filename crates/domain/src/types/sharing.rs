//! Account sharing: invitations and the users an account is shared with

use serde::{Deserialize, Serialize};

use super::{AccountPrivileges, Identifiable};
use crate::errors::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitation_id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub privileges: AccountPrivileges,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_timestamp: Option<i64>,
}

impl Invitation {
    pub fn new(email: impl Into<String>, privileges: AccountPrivileges) -> Self {
        Self {
            invitation_id: None,
            email: email.into(),
            privileges,
            sender_name: None,
            expires_timestamp: None,
        }
    }

    /// # Errors
    /// Returns [`DomainError::InvalidField`] when the email is blank or has
    /// no `@`.
    pub fn validate(&self) -> Result<(), DomainError> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            let reason = format!("'{}' is not an email address", self.email);
            return Err(DomainError::invalid("email", reason));
        }
        Ok(())
    }
}

impl Identifiable for Invitation {
    const KIND: &'static str = "invitation";

    fn identifier(&self) -> Option<&str> {
        self.invitation_id.as_deref()
    }
}

/// A user with access to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUserSummary {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub privileges: AccountPrivileges,
}
