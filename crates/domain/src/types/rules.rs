//! Rules and schedules
//!
//! A rule runs a set of device actions when its schedule fires. Schedules can
//! also be managed on their own through the schedules endpoints.

use serde::{Deserialize, Serialize};

use super::{AttributeValue, Identifiable};
use crate::errors::DomainError;

/// Recurring time of day, on a set of weekdays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_id: Option<String>,
    /// ISO weekdays, 1 = Monday ... 7 = Sunday
    pub day_of_week: Vec<u8>,
    pub hour: u8,
    pub minute: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl Schedule {
    pub fn new(day_of_week: Vec<u8>, hour: u8, minute: u8) -> Self {
        Self { schedule_id: None, day_of_week, hour, minute, time_zone: None }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.schedule_id = Some(id.into());
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidField`] for out of range days or times.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.day_of_week.is_empty() {
            return Err(DomainError::invalid("dayOfWeek", "at least one day is required"));
        }
        if let Some(day) = self.day_of_week.iter().find(|day| !(1..=7).contains(*day)) {
            return Err(DomainError::invalid("dayOfWeek", format!("{day} is not in 1..=7")));
        }
        if self.hour > 23 {
            return Err(DomainError::invalid("hour", format!("{} is not in 0..=23", self.hour)));
        }
        if self.minute > 59 {
            return Err(DomainError::invalid("minute", format!("{} is not in 0..=59", self.minute)));
        }
        Ok(())
    }
}

impl Identifiable for Schedule {
    const KIND: &'static str = "schedule";

    fn identifier(&self) -> Option<&str> {
        self.schedule_id.as_deref()
    }
}

/// Attribute values to apply to one device when a rule fires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleAction {
    pub device_id: String,
    pub attributes: Vec<AttributeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub actions: Vec<RuleAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_group_id: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl Rule {
    /// # Errors
    /// Propagates schedule validation.
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(schedule) = &self.schedule {
            schedule.validate()?;
        }
        Ok(())
    }
}

impl Identifiable for Rule {
    const KIND: &'static str = "rule";

    fn identifier(&self) -> Option<&str> {
        self.rule_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn schedule_range_checks() {
        assert!(Schedule::new(vec![1, 7], 23, 59).validate().is_ok());
        assert!(Schedule::new(vec![], 8, 0).validate().is_err());
        assert!(Schedule::new(vec![0], 8, 0).validate().is_err());
        assert!(Schedule::new(vec![1], 24, 0).validate().is_err());
        assert!(Schedule::new(vec![1], 8, 60).validate().is_err());
    }

    #[test]
    fn rule_defaults_to_enabled() {
        let rule: Rule = serde_json::from_value(json!({
            "ruleId": "r1",
            "actions": [{ "deviceId": "d1", "attributes": [{ "id": 1, "value": "01" }] }]
        }))
        .unwrap();

        assert!(rule.enabled);
        assert_eq!(rule.require_identifier(), Ok("r1"));
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn fetched_rule_without_actions_can_be_saved_again() {
        let mut rule: Rule =
            serde_json::from_value(json!({ "ruleId": "r1", "label": "empty" })).unwrap();
        rule.enabled = false;

        assert!(rule.actions.is_empty());
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn rule_with_bad_schedule_is_invalid() {
        let rule = Rule {
            rule_id: None,
            label: None,
            enabled: true,
            schedule: Some(Schedule::new(vec![8], 7, 0)),
            actions: vec![],
            device_group_id: None,
        };
        assert!(matches!(
            rule.validate(),
            Err(DomainError::InvalidField { field: "dayOfWeek", .. })
        ));
    }
}
