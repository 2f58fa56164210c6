//! Typed endpoint groups
//!
//! Each submodule adds an `impl ApiClient` block for one area of the REST
//! API. Guards run before anything is sent and fail with
//! [`ApiError::BadParameter`]; caller supplied path segments go through
//! [`encode_segment`].

mod accounts;
mod conclave;
mod devices;
mod groups;
mod profiles;
mod rules;
mod sharing;
mod tags;

use afero_domain::DeviceExpansion;

use super::errors::ApiError;
use super::transport::encode_segment;

fn account_path(account_id: &str) -> Result<String, ApiError> {
    Ok(format!("/v1/accounts/{}", encode_segment(account_id)?))
}

fn device_path(account_id: &str, device_id: &str) -> Result<String, ApiError> {
    Ok(format!("{}/devices/{}", account_path(account_id)?, encode_segment(device_id)?))
}

fn user_path(user_id: &str) -> Result<String, ApiError> {
    Ok(format!("/v1/users/{}", encode_segment(user_id)?))
}

fn expansion_names(expansions: &[DeviceExpansion]) -> impl Iterator<Item = &'static str> + '_ {
    expansions.iter().map(|expansion| expansion.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_encode_segments() {
        assert_eq!(account_path("a 1").unwrap(), "/v1/accounts/a%201");
        assert_eq!(device_path("a1", "d/1").unwrap(), "/v1/accounts/a1/devices/d%2F1");
        assert_eq!(user_path("u1").unwrap(), "/v1/users/u1");
    }

    #[test]
    fn empty_segments_are_rejected() {
        assert!(matches!(account_path(""), Err(ApiError::EncodingFailure(_))));
        assert!(matches!(device_path("a1", ""), Err(ApiError::EncodingFailure(_))));
    }

    #[test]
    fn expansion_names_follow_wire_spelling() {
        let names: Vec<_> =
            expansion_names(&[DeviceExpansion::State, DeviceExpansion::ExtendedData]).collect();
        assert_eq!(names, ["state", "extendedData"]);
    }
}
