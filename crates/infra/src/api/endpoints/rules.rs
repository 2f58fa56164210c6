//! Rules and schedules
//!
//! Create-or-update helpers dispatch on the record identifier: no id means
//! POST to the collection, an id means PUT to the record.

use afero_domain::{Identifiable, Rule, Schedule};
use tracing::{debug, instrument};

use super::{account_path, device_path};
use crate::api::client::ApiClient;
use crate::api::errors::ApiError;
use crate::api::transport::{encode_segment, EndpointRequest};

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn fetch_rules(&self, account_id: &str) -> Result<Vec<Rule>, ApiError> {
        let path = format!("{}/rules", account_path(account_id)?);
        self.execute_many(&EndpointRequest::get(path)).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_device_rules(
        &self,
        account_id: &str,
        device_id: &str,
    ) -> Result<Vec<Rule>, ApiError> {
        let path = format!("{}/rules", device_path(account_id, device_id)?);
        self.execute_many(&EndpointRequest::get(path)).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_group_rules(
        &self,
        account_id: &str,
        group_id: &str,
    ) -> Result<Vec<Rule>, ApiError> {
        let path = format!("{}/rules", group_path(account_id, group_id)?);
        self.execute_many(&EndpointRequest::get(path)).await
    }

    #[instrument(skip(self, rule), fields(rule_id = ?rule.rule_id))]
    pub async fn create_or_update_rule(
        &self,
        account_id: &str,
        rule: &Rule,
    ) -> Result<Rule, ApiError> {
        let collection = format!("{}/rules", account_path(account_id)?);
        self.persist_rule(collection, rule).await
    }

    /// Same as [`ApiClient::create_or_update_rule`] for a rule owned by a
    /// device group.
    #[instrument(skip(self, rule), fields(rule_id = ?rule.rule_id))]
    pub async fn create_or_update_group_rule(
        &self,
        account_id: &str,
        group_id: &str,
        rule: &Rule,
    ) -> Result<Rule, ApiError> {
        let collection = format!("{}/rules", group_path(account_id, group_id)?);
        self.persist_rule(collection, rule).await
    }

    #[instrument(skip(self))]
    pub async fn delete_rule(&self, account_id: &str, rule_id: &str) -> Result<(), ApiError> {
        let path = format!("{}/rules/{}", account_path(account_id)?, encode_segment(rule_id)?);
        self.execute_unit(&EndpointRequest::delete(path)).await
    }

    async fn persist_rule(&self, collection: String, rule: &Rule) -> Result<Rule, ApiError> {
        rule.validate()?;
        let request = match rule.identifier().filter(|id| !id.is_empty()) {
            None => EndpointRequest::post(collection),
            Some(id) => EndpointRequest::put(format!("{collection}/{}", encode_segment(id)?)),
        };
        debug!(method = %request.method, "persisting rule");
        self.execute_one(&request.json(rule)?).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_schedules(&self, account_id: &str) -> Result<Vec<Schedule>, ApiError> {
        let path = format!("{}/schedules", account_path(account_id)?);
        self.execute_many(&EndpointRequest::get(path)).await
    }

    /// Create a schedule that has not been saved yet.
    ///
    /// # Errors
    /// [`ApiError::BadParameter`] when the schedule already has an id or is
    /// not valid. Nothing is sent in that case.
    #[instrument(skip(self, schedule))]
    pub async fn create_schedule(
        &self,
        account_id: &str,
        schedule: &Schedule,
    ) -> Result<Schedule, ApiError> {
        schedule.require_unsaved()?;
        schedule.validate()?;
        let path = format!("{}/schedules", account_path(account_id)?);
        self.execute_one(&EndpointRequest::post(path).json(schedule)?).await
    }

    /// Replace a saved schedule.
    ///
    /// # Errors
    /// [`ApiError::BadParameter`] when the schedule has no id or is not
    /// valid. Nothing is sent in that case.
    #[instrument(skip(self, schedule), fields(schedule_id = ?schedule.schedule_id))]
    pub async fn update_schedule(
        &self,
        account_id: &str,
        schedule: &Schedule,
    ) -> Result<Schedule, ApiError> {
        let schedule_id = schedule.require_identifier()?;
        schedule.validate()?;
        let path =
            format!("{}/schedules/{}", account_path(account_id)?, encode_segment(schedule_id)?);
        self.execute_one(&EndpointRequest::put(path).json(schedule)?).await
    }

    #[instrument(skip(self, schedule), fields(schedule_id = ?schedule.schedule_id))]
    pub async fn create_or_update_schedule(
        &self,
        account_id: &str,
        schedule: &Schedule,
    ) -> Result<Schedule, ApiError> {
        if schedule.require_identifier().is_ok() {
            self.update_schedule(account_id, schedule).await
        } else {
            self.create_schedule(account_id, schedule).await
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_schedule(
        &self,
        account_id: &str,
        schedule_id: &str,
    ) -> Result<(), ApiError> {
        let path =
            format!("{}/schedules/{}", account_path(account_id)?, encode_segment(schedule_id)?);
        self.execute_unit(&EndpointRequest::delete(path)).await
    }
}

fn group_path(account_id: &str, group_id: &str) -> Result<String, ApiError> {
    Ok(format!("{}/deviceGroups/{}", account_path(account_id)?, encode_segment(group_id)?))
}
