//! Device groups

use serde::{Deserialize, Serialize};

use super::Identifiable;

/// Named set of devices that rules can target as a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub device_ids: Vec<String>,
}

impl DeviceGroup {
    pub fn new(label: impl Into<String>, device_ids: Vec<String>) -> Self {
        Self { device_group_id: None, label: Some(label.into()), device_ids }
    }
}

impl Identifiable for DeviceGroup {
    const KIND: &'static str = "device group";

    fn identifier(&self) -> Option<&str> {
        self.device_group_id.as_deref()
    }
}
