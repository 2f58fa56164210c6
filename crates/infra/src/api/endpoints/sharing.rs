//! Account sharing: invitations and account users

use afero_domain::{AccountUserSummary, Identifiable, Invitation};
use tracing::{info, instrument};

use super::account_path;
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::transport::{encode_segment, EndpointRequest};

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn fetch_invitations(&self, account_id: &str) -> Result<Vec<Invitation>, ApiError> {
        let path = format!("{}/invitations", account_path(account_id)?);
        self.execute_many(&EndpointRequest::get(path)).await
    }

    /// Invite someone to the account by email.
    ///
    /// # Errors
    /// [`ApiError::BadParameter`] for an invitation that already has an id or
    /// whose email is blank.
    #[instrument(skip(self, invitation))]
    pub async fn send_invitation(
        &self,
        account_id: &str,
        invitation: &Invitation,
    ) -> Result<(), ApiError> {
        invitation.require_unsaved()?;
        invitation.validate()?;
        let path = format!("{}/invitations", account_path(account_id)?);
        self.execute_unit(&EndpointRequest::post(path).json(invitation)?).await?;
        info!("invitation sent");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_invitation(
        &self,
        account_id: &str,
        invitation_id: &str,
    ) -> Result<(), ApiError> {
        let path =
            format!("{}/invitations/{}", account_path(account_id)?, encode_segment(invitation_id)?);
        self.execute_unit(&EndpointRequest::delete(path)).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_account_users(
        &self,
        account_id: &str,
    ) -> Result<Vec<AccountUserSummary>, ApiError> {
        let path = format!("{}/accountUserSummary", account_path(account_id)?);
        self.execute_many(&EndpointRequest::get(path)).await
    }

    /// Revoke a user's access to the account.
    #[instrument(skip(self))]
    pub async fn remove_account_user(
        &self,
        account_id: &str,
        user_id: &str,
    ) -> Result<(), ApiError> {
        let path = format!("{}/users/{}", account_path(account_id)?, encode_segment(user_id)?);
        self.execute_unit(&EndpointRequest::delete(path)).await
    }
}
