use serde::Deserialize;

use unshift_core::{CustomerId, DomainResult, EventId, UserId};
use unshift_scheduling::{DateRange, ProfileUpdate, UpdateCustomerInput};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdArgs {
    pub user_id: String,
}

impl UserIdArgs {
    pub fn id(&self) -> DomainResult<UserId> {
        self.user_id.parse()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerIdArgs {
    pub cus_id: String,
}

impl CustomerIdArgs {
    pub fn id(&self) -> DomainResult<CustomerId> {
        self.cus_id.parse()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventIdArgs {
    pub evt_id: String,
}

impl EventIdArgs {
    pub fn id(&self) -> DomainResult<EventId> {
        self.evt_id.parse()
    }
}

/// Optional planned-date window. Missing and empty edges are open.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateArgs {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl DateArgs {
    pub fn range(&self) -> DomainResult<DateRange> {
        DateRange::parse(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileArgs {
    pub user_id: String,
    #[serde(flatten)]
    pub update: ProfileUpdate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerArgs {
    pub cus_id: String,
    #[serde(flatten)]
    pub update: UpdateCustomerInput,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleArgs {
    pub evt_id: String,
    pub plan_date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelArgs {
    pub evt_id: String,
    #[serde(default)]
    pub remark: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, serde::Serialize)]
pub struct Message {
    pub message: String,
}

impl From<String> for Message {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use unshift_core::ErrorKind;

    #[test]
    fn ids_parse_into_typed_ids() {
        let id = EventId::new();
        let args: EventIdArgs = serde_json::from_value(json!({ "evtId": id.to_string() })).unwrap();
        assert_eq!(args.id().unwrap(), id);

        let bad: CustomerIdArgs = serde_json::from_value(json!({ "cusId": "nope" })).unwrap();
        let err = bad.id().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(err.fields().unwrap().contains_key("cusId"));
    }

    #[test]
    fn date_args_default_to_unbounded() {
        let args: DateArgs = serde_json::from_value(json!({})).unwrap();
        assert_eq!(args.range().unwrap(), DateRange::unbounded());

        let args: DateArgs = serde_json::from_value(json!({ "startDate": "", "endDate": "2024-05-01" })).unwrap();
        let range = args.range().unwrap();
        assert!(range.start.is_none());
        assert!(range.end.is_some());
    }

    #[test]
    fn flattened_update_picks_up_optional_fields() {
        let args: UpdateCustomerArgs = serde_json::from_value(json!({
            "cusId": CustomerId::new().to_string(),
            "company": "Acme",
            "isShared": true,
        }))
        .unwrap();
        assert_eq!(args.update.company.as_deref(), Some("Acme"));
        assert_eq!(args.update.is_shared, Some(true));
        assert!(args.update.personal.is_none());

        let args: UpdateProfileArgs = serde_json::from_value(json!({
            "userId": UserId::new().to_string(),
            "password": "x",
            "confirmPassword": "x",
        }))
        .unwrap();
        assert_eq!(args.update.confirm_password.as_deref(), Some("x"));
    }
}
