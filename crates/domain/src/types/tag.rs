//! Device tags
//!
//! Small key/value labels attached to a device, either by a user (`ACCOUNT`)
//! or by the service (`SYSTEM`).

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::Identifiable;
use crate::errors::DomainError;

/// Origin of a device tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceTagType {
    #[default]
    Account,
    System,
}

/// Label attached to a device
///
/// Identity is `id`. Two tags are equal when their id, value, type and
/// localization key match; `key` does not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceTag {
    #[serde(rename = "deviceTagId", default, skip_serializing_if = "is_unassigned")]
    pub id: Option<String>,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "deviceTagType", default)]
    pub tag_type: DeviceTagType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localization_key: Option<String>,
}

fn is_unassigned(id: &Option<String>) -> bool {
    id.as_deref().unwrap_or_default().is_empty()
}

impl DeviceTag {
    /// New, not yet persisted account tag.
    pub fn new(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            id: None,
            key: key.into(),
            value,
            tag_type: DeviceTagType::Account,
            localization_key: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Whether the server has assigned an id to this tag.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Checks the tag can be sent to the server.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidField`] when the key is blank.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.key.trim().is_empty() {
            return Err(DomainError::invalid("key", "tag key must not be empty"));
        }
        Ok(())
    }
}

impl PartialEq for DeviceTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.value == other.value
            && self.tag_type == other.tag_type
            && self.localization_key == other.localization_key
    }
}

impl Eq for DeviceTag {}

impl Hash for DeviceTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Identifiable for DeviceTag {
    const KIND: &'static str = "device tag";

    fn identifier(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_wire_shape() {
        let tag: DeviceTag = serde_json::from_value(json!({
            "deviceTagId": "t1",
            "key": "room",
            "value": "kitchen",
            "deviceTagType": "SYSTEM",
            "localizationKey": "tag.room"
        }))
        .unwrap();

        assert_eq!(tag.id.as_deref(), Some("t1"));
        assert_eq!(tag.tag_type, DeviceTagType::System);
        assert_eq!(tag.localization_key.as_deref(), Some("tag.room"));
    }

    #[test]
    fn new_tag_omits_id_on_the_wire() {
        let tag = DeviceTag::new("room", Some("kitchen".to_string()));
        let value = serde_json::to_value(&tag).unwrap();

        assert!(value.get("deviceTagId").is_none());
        assert_eq!(value["deviceTagType"], "ACCOUNT");
        assert!(!tag.is_persisted());
    }

    #[test]
    fn empty_id_is_not_sent() {
        let tag = DeviceTag::new("k", None).with_id("");
        let value = serde_json::to_value(&tag).unwrap();

        assert!(!tag.is_persisted());
        assert_eq!(value, json!({ "key": "k", "deviceTagType": "ACCOUNT" }));
    }

    #[test]
    fn equality_ignores_key_but_not_value() {
        let a = DeviceTag::new("room", Some("kitchen".to_string())).with_id("t1");
        let mut b = a.clone();
        b.key = "location".to_string();
        assert_eq!(a, b);

        let mut c = a.clone();
        c.value = Some("garage".to_string());
        assert_ne!(a, c);

        let mut d = a.clone();
        d.localization_key = Some("tag.room".to_string());
        assert_ne!(a, d);
    }

    #[test]
    fn hash_follows_identity() {
        let a = DeviceTag::new("room", None).with_id("t1");
        let b = DeviceTag::new("other", None).with_id("t1");

        let set: HashSet<DeviceTag> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn blank_key_is_rejected() {
        let tag = DeviceTag::new("  ", None);
        assert!(matches!(tag.validate(), Err(DomainError::InvalidField { field: "key", .. })));
    }
}
