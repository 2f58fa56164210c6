//! Device records and device-scoped requests

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Nested data the server can inline into device responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceExpansion {
    State,
    Tags,
    Attributes,
    Profile,
    Timezone,
    ExtendedData,
}

impl DeviceExpansion {
    /// Name used in the `expansions` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Tags => "tags",
            Self::Attributes => "attributes",
            Self::Profile => "profile",
            Self::Timezone => "timezone",
            Self::ExtendedData => "extendedData",
        }
    }
}

/// A device associated with an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceModel {
    pub device_id: String,
    pub profile_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(rename = "virtual", default)]
    pub is_virtual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_state: Option<DeviceState>,
    #[serde(default)]
    pub attributes: Vec<AttributeValue>,
    #[serde(default)]
    pub tags: Vec<super::DeviceTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_timestamp: Option<i64>,
}

impl DeviceModel {
    #[must_use]
    pub fn attribute(&self, id: i32) -> Option<&AttributeValue> {
        self.attributes.iter().find(|attribute| attribute.id == id)
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.device_state.as_ref().is_some_and(|state| state.available)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub dirty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_timestamp: Option<i64>,
}

/// Current value of a single device attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_timestamp: Option<i64>,
}

/// Payload for `POST /v1/accounts/{id}/devices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAssociation {
    pub association_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<DeviceLocation>,
}

impl DeviceAssociation {
    pub fn new(association_id: impl Into<String>) -> Self {
        Self { association_id: association_id.into(), verified: None, location: None }
    }

    /// # Errors
    /// Returns [`DomainError::InvalidField`] for a blank association id.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.association_id.trim().is_empty() {
            return Err(DomainError::invalid("associationId", "association id must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceRequestKind {
    AttributeWrite,
    NotifyViewing,
}

/// One entry of a batched device request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    #[serde(rename = "type")]
    pub kind: DeviceRequestKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DeviceRequest {
    /// Write `value` (hex encoded, as the device expects) to `attr_id`.
    pub fn attribute_write(attr_id: i32, value: impl Into<String>) -> Self {
        Self {
            kind: DeviceRequestKind::AttributeWrite,
            attr_id: Some(attr_id),
            value: Some(value.into()),
        }
    }

    #[must_use]
    pub fn notify_viewing() -> Self {
        Self { kind: DeviceRequestKind::NotifyViewing, attr_id: None, value: None }
    }
}

/// Per-request outcome returned by the batch endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequestResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<i64>,
}

impl DeviceRequestResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTimeZone {
    /// IANA zone name, e.g. `America/Los_Angeles`
    pub timezone: String,
    #[serde(default)]
    pub user_override: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLocation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_source_type: Option<String>,
    #[serde(default)]
    pub formatted_address_lines: Vec<String>,
}
