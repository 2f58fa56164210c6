//! Device profiles
//!
//! A profile describes the attributes a device type exposes and how they may
//! be accessed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceProfile {
    pub profile_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDescriptor>,
    /// UI presentation hints, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presentation: Option<serde_json::Value>,
}

impl DeviceProfile {
    #[must_use]
    pub fn attribute(&self, id: i32) -> Option<&AttributeDescriptor> {
        self.attributes.iter().find(|attribute| attribute.id == id)
    }

    /// Whether clients may write `id`; unknown attributes are not writable.
    #[must_use]
    pub fn is_writable(&self, id: i32) -> bool {
        self.attribute(id).is_some_and(AttributeDescriptor::is_writable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    pub id: i32,
    pub data_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_type: Option<String>,
    #[serde(default)]
    pub operations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl AttributeDescriptor {
    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.operations.iter().any(|op| op.eq_ignore_ascii_case("WRITE"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn writable_attributes() {
        let profile: DeviceProfile = serde_json::from_value(json!({
            "profileId": "p1",
            "attributes": [
                { "id": 1, "dataType": "BOOLEAN", "operations": ["READ", "WRITE"] },
                { "id": 2, "dataType": "SINT8", "operations": ["READ"] }
            ],
            "presentation": { "label": "Lamp" }
        }))
        .unwrap();

        assert!(profile.is_writable(1));
        assert!(!profile.is_writable(2));
        assert!(!profile.is_writable(99));
        assert_eq!(profile.presentation.unwrap()["label"], "Lamp");
    }
}
