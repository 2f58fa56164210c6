//! User and account types

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Signed-in user as returned by `GET /v1/users/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub user_id: String,
    /// Login credential, usually the email address
    pub credential_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub account_access: Vec<AccountAccess>,
}

impl UserAccount {
    /// First account the user owns, falling back to the first account they
    /// can access at all.
    #[must_use]
    pub fn primary_account_id(&self) -> Option<&str> {
        self.account_access
            .iter()
            .find(|access| access.privileges.owner)
            .or_else(|| self.account_access.first())
            .map(|access| access.account.account_id.as_str())
    }
}

/// One account a user has been granted access to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAccess {
    pub account: AccountDescription,
    #[serde(default)]
    pub privileges: AccountPrivileges,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDescription {
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPrivileges {
    #[serde(default)]
    pub owner: bool,
    #[serde(default)]
    pub can_write: bool,
    #[serde(default)]
    pub can_share: bool,
}

/// Sign-up payload for `POST /v1/accounts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub credential: NewCredential,
    pub user: NewUser,
    pub account: NewAccountDescription,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCredential {
    pub credential_id: String,
    pub password: String,
    #[serde(rename = "type")]
    pub credential_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccountDescription {
    pub description: String,
}

impl NewAccount {
    /// Email/password sign-up.
    pub fn with_email(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        account_description: impl Into<String>,
    ) -> Self {
        Self {
            credential: NewCredential {
                credential_id: email.into(),
                password: password.into(),
                credential_type: "email".to_string(),
            },
            user: NewUser { first_name: first_name.into(), last_name: last_name.into() },
            account: NewAccountDescription { description: account_description.into() },
        }
    }

    /// # Errors
    /// Returns [`DomainError::InvalidField`] for a blank credential or password.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.credential.credential_id.trim().is_empty() {
            return Err(DomainError::invalid("credentialId", "email must not be empty"));
        }
        if self.credential.password.is_empty() {
            return Err(DomainError::invalid("password", "password must not be empty"));
        }
        Ok(())
    }
}

/// Mobile device registration used for push notifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileDeviceRegistration {
    pub mobile_device_id: String,
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_data: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn primary_account_prefers_owned() {
        let user: UserAccount = serde_json::from_value(json!({
            "userId": "u1",
            "credentialId": "jane@x.com",
            "accountAccess": [
                { "account": { "accountId": "shared" }, "privileges": { "owner": false } },
                {
                    "account": { "accountId": "mine", "type": "CUSTOMER" },
                    "privileges": { "owner": true }
                }
            ]
        }))
        .unwrap();

        assert_eq!(user.primary_account_id(), Some("mine"));
        assert_eq!(user.account_access[1].account.account_type.as_deref(), Some("CUSTOMER"));
    }

    #[test]
    fn missing_user_id_is_a_decode_error() {
        let result: Result<UserAccount, _> =
            serde_json::from_value(json!({ "credentialId": "jane@x.com" }));
        assert!(result.is_err());
    }

    #[test]
    fn new_account_validation() {
        let account = NewAccount::with_email("", "pw", "Jane", "Doe", "Home");
        assert!(account.validate().is_err());

        let account = NewAccount::with_email("jane@x.com", "pw", "Jane", "Doe", "Home");
        assert!(account.validate().is_ok());
        let wire = serde_json::to_value(&account).unwrap();
        assert_eq!(wire["credential"]["type"], "email");
    }
}
