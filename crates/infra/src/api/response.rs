//! Typed views of a transport result
//!
//! The transport yields `Option<Value>`; endpoints pick the shape they
//! expect. A body that does not match the shape is
//! [`ApiError::UnexpectedResultType`], never a defaulted value.

use std::any::type_name;

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::ApiError;

/// Discard the body.
pub fn unit(_body: Option<Value>) -> Result<(), ApiError> {
    Ok(())
}

/// Raw JSON, with an absent body as `Value::Null`.
pub fn json(body: Option<Value>) -> Result<Value, ApiError> {
    Ok(body.unwrap_or(Value::Null))
}

/// Exactly one `T`.
///
/// # Errors
/// [`ApiError::UnexpectedResultType`] when the body is absent or not a `T`.
pub fn one<T: DeserializeOwned>(body: Option<Value>) -> Result<T, ApiError> {
    let value = body.ok_or_else(|| {
        ApiError::UnexpectedResultType(format!("expected {}, got no body", type_name::<T>()))
    })?;
    decode(value)
}

/// A `T` if the server sent one.
///
/// # Errors
/// [`ApiError::UnexpectedResultType`] when a body is present but not a `T`.
pub fn optional<T: DeserializeOwned>(body: Option<Value>) -> Result<Option<T>, ApiError> {
    body.map(decode).transpose()
}

/// A JSON array of `T`.
///
/// # Errors
/// [`ApiError::UnexpectedResultType`] when the body is absent, not an array,
/// or has an element that is not a `T`.
pub fn many<T: DeserializeOwned>(body: Option<Value>) -> Result<Vec<T>, ApiError> {
    match body {
        Some(value @ Value::Array(_)) => decode(value),
        Some(other) => Err(ApiError::UnexpectedResultType(format!(
            "expected array of {}, got {}",
            type_name::<T>(),
            kind(&other)
        ))),
        None => Err(ApiError::UnexpectedResultType(format!(
            "expected array of {}, got no body",
            type_name::<T>()
        ))),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| {
        ApiError::UnexpectedResultType(format!("cannot decode {}: {e}", type_name::<T>()))
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
