use afero_domain::{DeviceGroup, Identifiable};
use tracing::instrument;

use super::account_path;
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::transport::{encode_segment, EndpointRequest};

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn fetch_device_groups(
        &self,
        account_id: &str,
    ) -> Result<Vec<DeviceGroup>, ApiError> {
        let path = format!("{}/deviceGroups", account_path(account_id)?);
        self.execute_many(&EndpointRequest::get(path)).await
    }

    #[instrument(skip(self, group))]
    pub async fn create_device_group(
        &self,
        account_id: &str,
        group: &DeviceGroup,
    ) -> Result<DeviceGroup, ApiError> {
        group.require_unsaved()?;
        let path = format!("{}/deviceGroups", account_path(account_id)?);
        self.execute_one(&EndpointRequest::post(path).json(group)?).await
    }

    #[instrument(skip(self, group), fields(group_id = ?group.device_group_id))]
    pub async fn update_device_group(
        &self,
        account_id: &str,
        group: &DeviceGroup,
    ) -> Result<DeviceGroup, ApiError> {
        let group_id = group.require_identifier()?;
        let path =
            format!("{}/deviceGroups/{}", account_path(account_id)?, encode_segment(group_id)?);
        self.execute_one(&EndpointRequest::put(path).json(group)?).await
    }

    #[instrument(skip(self))]
    pub async fn delete_device_group(
        &self,
        account_id: &str,
        group_id: &str,
    ) -> Result<(), ApiError> {
        let path =
            format!("{}/deviceGroups/{}", account_path(account_id)?, encode_segment(group_id)?);
        self.execute_unit(&EndpointRequest::delete(path)).await
    }
}
