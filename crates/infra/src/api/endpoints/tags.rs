//! Device tags
//!
//! Tags are not cached; every call goes to the service.

use afero_domain::DeviceTag;
use tracing::{debug, instrument};

use super::device_path;
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::transport::{encode_segment, EndpointRequest};

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn fetch_tags(
        &self,
        account_id: &str,
        device_id: &str,
    ) -> Result<Vec<DeviceTag>, ApiError> {
        self.execute_many(&EndpointRequest::get(tag_collection(account_id, device_id)?)).await
    }

    /// `None` when the service returns no body for the tag.
    #[instrument(skip(self))]
    pub async fn fetch_tag(
        &self,
        account_id: &str,
        device_id: &str,
        tag_id: &str,
    ) -> Result<Option<DeviceTag>, ApiError> {
        let path = tag_path(account_id, device_id, tag_id)?;
        self.execute_optional(&EndpointRequest::get(path)).await
    }

    /// Create the tag when it has no id, otherwise update it. Both go to the
    /// tag collection; the id travels in the body.
    ///
    /// # Errors
    /// [`ApiError::BadParameter`] for a blank key.
    #[instrument(skip(self, tag), fields(tag_id = ?tag.id))]
    pub async fn persist_tag(
        &self,
        tag: &DeviceTag,
        device_id: &str,
        account_id: &str,
    ) -> Result<DeviceTag, ApiError> {
        tag.validate()?;
        let collection = tag_collection(account_id, device_id)?;
        let request = if tag.is_persisted() {
            EndpointRequest::put(collection)
        } else {
            EndpointRequest::post(collection)
        };
        debug!(method = %request.method, "persisting tag");
        self.execute_one(&request.json(tag)?).await
    }

    #[instrument(skip(self))]
    pub async fn delete_tag(
        &self,
        tag_id: &str,
        device_id: &str,
        account_id: &str,
    ) -> Result<(), ApiError> {
        let path = tag_path(account_id, device_id, tag_id)?;
        self.execute_unit(&EndpointRequest::delete(path)).await
    }
}

fn tag_collection(account_id: &str, device_id: &str) -> Result<String, ApiError> {
    Ok(format!("{}/deviceTag", device_path(account_id, device_id)?))
}

fn tag_path(account_id: &str, device_id: &str, tag_id: &str) -> Result<String, ApiError> {
    Ok(format!("{}/{}", tag_collection(account_id, device_id)?, encode_segment(tag_id)?))
}
