//! Domain records
//!
//! Every record mirrors a JSON object of the REST API. Required fields are
//! plain values; fields the server may omit are `Option` or default to empty
//! collections, so a shape mismatch surfaces as a decode error instead of a
//! silently defaulted value.

pub mod conclave;
pub mod device;
pub mod group;
pub mod profile;
pub mod rules;
pub mod sharing;
pub mod tag;
pub mod user;

pub use conclave::{ConclaveAccess, ConclaveAccessRequest, ConclaveHost, ConclaveSession};
pub use device::{
    AttributeValue, DeviceAssociation, DeviceExpansion, DeviceLocation, DeviceModel,
    DeviceRequest, DeviceRequestKind, DeviceRequestResponse, DeviceState, DeviceTimeZone,
};
pub use group::DeviceGroup;
pub use profile::{AttributeDescriptor, DeviceProfile};
pub use rules::{Rule, RuleAction, Schedule};
pub use sharing::{AccountUserSummary, Invitation};
pub use tag::{DeviceTag, DeviceTagType};
pub use user::{
    AccountAccess, AccountDescription, AccountPrivileges, MobileDeviceRegistration, NewAccount,
    NewAccountDescription, NewCredential, NewUser, UserAccount,
};

use crate::errors::DomainError;

/// Records whose identifier is assigned by the server.
///
/// A record without an identifier has never been persisted; create endpoints
/// require that state and update/delete endpoints require the opposite.
pub trait Identifiable {
    /// Human readable record kind used in error messages.
    const KIND: &'static str;

    fn identifier(&self) -> Option<&str>;

    /// Identifier of a persisted record.
    ///
    /// # Errors
    /// Returns [`DomainError::MissingIdentifier`] when the record has no
    /// identifier (or an empty one).
    fn require_identifier(&self) -> Result<&str, DomainError> {
        match self.identifier() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(DomainError::MissingIdentifier { kind: Self::KIND }),
        }
    }

    /// Asserts the record has not been persisted yet.
    ///
    /// # Errors
    /// Returns [`DomainError::UnexpectedIdentifier`] when an identifier is
    /// already present.
    fn require_unsaved(&self) -> Result<(), DomainError> {
        match self.identifier() {
            Some(id) if !id.is_empty() => {
                Err(DomainError::UnexpectedIdentifier { kind: Self::KIND, id: id.to_string() })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing(Option<String>);

    impl Identifiable for Thing {
        const KIND: &'static str = "thing";

        fn identifier(&self) -> Option<&str> {
            self.0.as_deref()
        }
    }

    #[test]
    fn empty_identifier_counts_as_missing() {
        let thing = Thing(Some(String::new()));
        assert_eq!(
            thing.require_identifier(),
            Err(DomainError::MissingIdentifier { kind: "thing" })
        );
        assert!(thing.require_unsaved().is_ok());
    }

    #[test]
    fn present_identifier_rejects_create() {
        let thing = Thing(Some("t1".to_string()));
        assert_eq!(thing.require_identifier(), Ok("t1"));
        assert_eq!(
            thing.require_unsaved(),
            Err(DomainError::UnexpectedIdentifier { kind: "thing", id: "t1".to_string() })
        );
    }
}
