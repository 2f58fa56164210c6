//! Realtime channel access

use afero_domain::{ConclaveAccess, ConclaveAccessRequest};
use tracing::instrument;

use super::account_path;
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::transport::EndpointRequest;

impl ApiClient {
    /// Exchange the session for a conclave token and the hosts to connect to.
    #[instrument(skip(self))]
    pub async fn auth_conclave(
        &self,
        account_id: &str,
        user_id: &str,
        mobile_device_id: &str,
    ) -> Result<ConclaveAccess, ApiError> {
        if user_id.is_empty() || mobile_device_id.is_empty() {
            return Err(ApiError::BadParameter(
                "conclave access needs a user id and a mobile device id".to_string(),
            ));
        }
        let body = ConclaveAccessRequest {
            user_id: user_id.to_string(),
            mobile_device_id: mobile_device_id.to_string(),
        };
        let path = format!("{}/conclaveAccess", account_path(account_id)?);
        self.execute_one(&EndpointRequest::post(path).json(&body)?).await
    }
}
