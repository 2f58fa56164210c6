//! Realtime channel ("conclave") access
//!
//! Only the token exchange is modelled here; the stream protocol itself is
//! handled elsewhere.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/accounts/{id}/conclaveAccess`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConclaveAccessRequest {
    pub user_id: String,
    pub mobile_device_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConclaveAccess {
    pub conclave: ConclaveSession,
    #[serde(default)]
    pub conclave_hosts: Vec<ConclaveHost>,
}

impl ConclaveAccess {
    /// First host advertised for `host_type` (e.g. `socket`).
    #[must_use]
    pub fn host(&self, host_type: &str) -> Option<&ConclaveHost> {
        self.conclave_hosts.iter().find(|host| host.host_type.eq_ignore_ascii_case(host_type))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConclaveSession {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_timestamp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConclaveHost {
    pub host: String,
    pub port: u16,
    #[serde(rename = "type")]
    pub host_type: String,
}
