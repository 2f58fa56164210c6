//! Devices: association, naming, attribute writes, time zone and location

use afero_domain::{
    DeviceAssociation, DeviceExpansion, DeviceLocation, DeviceModel, DeviceRequest,
    DeviceRequestResponse, DeviceTimeZone,
};
use serde_json::json;
use tracing::{debug, instrument};

use super::{account_path, device_path, expansion_names};
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::transport::EndpointRequest;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn fetch_devices(
        &self,
        account_id: &str,
        expansions: &[DeviceExpansion],
    ) -> Result<Vec<DeviceModel>, ApiError> {
        let path = format!("{}/devices", account_path(account_id)?);
        let request = EndpointRequest::get(path).expansions(expansion_names(expansions));
        let devices: Vec<DeviceModel> = self.execute_many(&request).await?;
        debug!(count = devices.len(), "fetched devices");
        Ok(devices)
    }

    #[instrument(skip(self))]
    pub async fn fetch_device(
        &self,
        account_id: &str,
        device_id: &str,
        expansions: &[DeviceExpansion],
    ) -> Result<DeviceModel, ApiError> {
        let request = EndpointRequest::get(device_path(account_id, device_id)?)
            .expansions(expansion_names(expansions));
        self.execute_one(&request).await
    }

    /// Claim a device for the account using its association id.
    #[instrument(skip(self, association))]
    pub async fn associate_device(
        &self,
        account_id: &str,
        association: &DeviceAssociation,
    ) -> Result<DeviceModel, ApiError> {
        association.validate()?;
        let path = format!("{}/devices", account_path(account_id)?);
        self.execute_one(&EndpointRequest::post(path).json(association)?).await
    }

    #[instrument(skip(self))]
    pub async fn remove_device(&self, account_id: &str, device_id: &str) -> Result<(), ApiError> {
        self.execute_unit(&EndpointRequest::delete(device_path(account_id, device_id)?)).await
    }

    #[instrument(skip(self))]
    pub async fn set_device_friendly_name(
        &self,
        account_id: &str,
        device_id: &str,
        friendly_name: &str,
    ) -> Result<(), ApiError> {
        let path = format!("{}/friendlyName", device_path(account_id, device_id)?);
        let request = EndpointRequest::put(path).json(&json!({ "friendlyName": friendly_name }))?;
        self.execute_unit(&request).await
    }

    /// Send a batch of attribute writes. The service answers with one
    /// status per request, in order.
    #[instrument(skip(self, writes), fields(count = writes.len()))]
    pub async fn post_attribute_writes(
        &self,
        account_id: &str,
        device_id: &str,
        writes: &[DeviceRequest],
    ) -> Result<Vec<DeviceRequestResponse>, ApiError> {
        if writes.is_empty() {
            return Err(ApiError::BadParameter("attribute write batch is empty".to_string()));
        }
        let path = format!("{}/requests", device_path(account_id, device_id)?);
        self.execute_many(&EndpointRequest::post(path).json(writes)?).await
    }

    /// `None` when the device has no time zone set.
    #[instrument(skip(self))]
    pub async fn fetch_device_time_zone(
        &self,
        account_id: &str,
        device_id: &str,
    ) -> Result<Option<DeviceTimeZone>, ApiError> {
        let path = format!("{}/timezone", device_path(account_id, device_id)?);
        self.execute_optional(&EndpointRequest::get(path)).await
    }

    #[instrument(skip(self))]
    pub async fn set_device_time_zone(
        &self,
        account_id: &str,
        device_id: &str,
        time_zone: &DeviceTimeZone,
    ) -> Result<(), ApiError> {
        if time_zone.timezone.trim().is_empty() {
            return Err(ApiError::BadParameter("time zone must not be empty".to_string()));
        }
        let path = format!("{}/timezone", device_path(account_id, device_id)?);
        self.execute_unit(&EndpointRequest::put(path).json(time_zone)?).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_device_location(
        &self,
        account_id: &str,
        device_id: &str,
    ) -> Result<Option<DeviceLocation>, ApiError> {
        let path = format!("{}/location", device_path(account_id, device_id)?);
        self.execute_optional(&EndpointRequest::get(path)).await
    }

    #[instrument(skip(self, location))]
    pub async fn set_device_location(
        &self,
        account_id: &str,
        device_id: &str,
        location: &DeviceLocation,
    ) -> Result<(), ApiError> {
        let path = format!("{}/location", device_path(account_id, device_id)?);
        self.execute_unit(&EndpointRequest::put(path).json(location)?).await
    }
}
