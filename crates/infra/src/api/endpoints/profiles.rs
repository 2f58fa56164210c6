use afero_domain::DeviceProfile;
use tracing::instrument;

use super::{account_path, device_path};
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::transport::{encode_segment, EndpointRequest};

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn fetch_profiles(&self, account_id: &str) -> Result<Vec<DeviceProfile>, ApiError> {
        let path = format!("{}/deviceProfiles", account_path(account_id)?);
        self.execute_many(&EndpointRequest::get(path)).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_profile(
        &self,
        account_id: &str,
        profile_id: &str,
    ) -> Result<DeviceProfile, ApiError> {
        let path =
            format!("{}/deviceProfiles/{}", account_path(account_id)?, encode_segment(profile_id)?);
        self.execute_one(&EndpointRequest::get(path)).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_profile_for_device(
        &self,
        account_id: &str,
        device_id: &str,
    ) -> Result<DeviceProfile, ApiError> {
        let path = format!("{}/deviceProfile", device_path(account_id, device_id)?);
        self.execute_one(&EndpointRequest::get(path)).await
    }
}
