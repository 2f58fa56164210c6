//! Accounts, users and credentials

use afero_domain::{MobileDeviceRegistration, NewAccount, UserAccount};
use serde_json::json;
use tracing::instrument;

use super::{account_path, user_path};
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::transport::{encode_segment, EndpointRequest};

impl ApiClient {
    /// The signed-in user and the accounts they can access.
    #[instrument(skip(self))]
    pub async fn fetch_account_info(&self) -> Result<UserAccount, ApiError> {
        self.execute_one(&EndpointRequest::get("/v1/users/me")).await
    }

    /// Create a user, credential and account. Does not need a session.
    #[instrument(skip(self, account))]
    pub async fn create_account(&self, account: &NewAccount) -> Result<UserAccount, ApiError> {
        account.validate()?;
        let request =
            EndpointRequest::post("/v1/accounts").json(account)?.attempt_refresh(false);
        self.execute_one(&request).await
    }

    /// Ask the service to mail a password reset code to `email`.
    #[instrument(skip(self, email))]
    pub async fn send_password_recovery_email(&self, email: &str) -> Result<(), ApiError> {
        let path = format!("/v1/credentials/{}/passwordReset", encode_segment(email)?);
        self.execute_unit(&EndpointRequest::post(path).attempt_refresh(false)).await
    }

    /// Set a new password using the code from a recovery email.
    #[instrument(skip_all)]
    pub async fn reset_password_with_code(
        &self,
        reset_code: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        require_password(new_password)?;
        let path = format!("/v1/shortvalues/{}/passwordReset", encode_segment(reset_code)?);
        let request = EndpointRequest::post(path)
            .json(&json!({ "password": new_password }))?
            .attempt_refresh(false);
        self.execute_unit(&request).await
    }

    #[instrument(skip(self, password))]
    pub async fn update_password(
        &self,
        user_id: &str,
        credential_id: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        require_password(password)?;
        let path = format!(
            "{}/credentials/{}/password",
            user_path(user_id)?,
            encode_segment(credential_id)?
        );
        let request = EndpointRequest::put(path).json(&json!({ "password": password }))?;
        self.execute_unit(&request).await
    }

    #[instrument(skip(self))]
    pub async fn update_account_description(
        &self,
        account_id: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        let path = format!("{}/description", account_path(account_id)?);
        let request = EndpointRequest::put(path).json(&json!({ "description": description }))?;
        self.execute_unit(&request).await
    }

    /// Register a phone or tablet for push notifications.
    #[instrument(skip(self, registration))]
    pub async fn register_mobile_device(
        &self,
        user_id: &str,
        registration: &MobileDeviceRegistration,
    ) -> Result<(), ApiError> {
        if registration.mobile_device_id.trim().is_empty() {
            return Err(ApiError::BadParameter("mobile device id must not be empty".to_string()));
        }
        let path = format!("{}/mobileDevices", user_path(user_id)?);
        self.execute_unit(&EndpointRequest::post(path).json(registration)?).await
    }

    #[instrument(skip(self))]
    pub async fn unregister_mobile_device(
        &self,
        user_id: &str,
        mobile_device_id: &str,
    ) -> Result<(), ApiError> {
        let path =
            format!("{}/mobileDevices/{}", user_path(user_id)?, encode_segment(mobile_device_id)?);
        self.execute_unit(&EndpointRequest::delete(path)).await
    }
}

fn require_password(password: &str) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::BadParameter("password must not be empty".to_string()));
    }
    Ok(())
}
