use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unshift_core::{CustomerId, DomainError, DomainResult, Entity, UserId, ValueObject};

use crate::provided;

pub const PLACEHOLDER_TEXT: &str = "Info Needed";
pub const PLACEHOLDER_COMPANY_CONTACT: &str = "07 0001111";

/// Live customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    #[serde(rename = "userId")]
    pub owner: UserId,
    pub personal: String,
    pub company: String,
    pub position: String,
    pub personalcontact: String,
    pub companycontact: String,
    pub address: String,
    pub is_shared: bool,
    pub created_at: DateTime<Utc>,
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

impl Customer {
    pub fn create(owner: UserId, input: &CreateCustomerInput, now: DateTime<Utc>) -> DomainResult<Self> {
        input.validate()?;
        let text = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or_default().to_string();

        Ok(Self {
            id: CustomerId::new(),
            owner,
            personal: input.personal.trim().to_string(),
            company: text(&input.company),
            position: text(&input.position),
            personalcontact: text(&input.personalcontact),
            companycontact: text(&input.companycontact),
            address: text(&input.address),
            is_shared: input.is_shared,
            created_at: now,
        })
    }

    /// Stand-in customer for an event booked without a usable customer reference.
    pub fn placeholder(owner: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: CustomerId::new(),
            owner,
            personal: PLACEHOLDER_TEXT.to_string(),
            company: PLACEHOLDER_TEXT.to_string(),
            position: PLACEHOLDER_TEXT.to_string(),
            personalcontact: String::new(),
            companycontact: PLACEHOLDER_COMPANY_CONTACT.to_string(),
            address: PLACEHOLDER_TEXT.to_string(),
            is_shared: false,
            created_at: now,
        }
    }

    pub fn snapshot(&self) -> CustomerSnapshot {
        CustomerSnapshot {
            cus_id: self.id,
            personal: self.personal.clone(),
            position: self.position.clone(),
            company: self.company.clone(),
        }
    }

    /// Field-wise merge; blank or missing input fields leave the stored value.
    pub fn merge(&mut self, update: &UpdateCustomerInput) {
        let fields = [
            (&mut self.personal, &update.personal),
            (&mut self.company, &update.company),
            (&mut self.position, &update.position),
            (&mut self.personalcontact, &update.personalcontact),
            (&mut self.companycontact, &update.companycontact),
            (&mut self.address, &update.address),
        ];
        for (slot, value) in fields {
            if let Some(v) = provided(value.as_deref()) {
                *slot = v.trim().to_string();
            }
        }
        if let Some(shared) = update.is_shared {
            self.is_shared = shared;
        }
    }
}

/// Customer display fields cached inside an event.
///
/// This is a copy taken at booking time, not a live reference; it drifts when
/// the customer changes until a transition re-syncs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub cus_id: CustomerId,
    pub personal: String,
    pub position: String,
    pub company: String,
}

impl ValueObject for CustomerSnapshot {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerInput {
    pub personal: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub personalcontact: Option<String>,
    pub companycontact: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub is_shared: bool,
}

impl CreateCustomerInput {
    pub fn validate(&self) -> DomainResult<()> {
        if self.personal.trim().is_empty() {
            return Err(DomainError::invalid_field("personal", "Customer name must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerInput {
    pub personal: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub personalcontact: Option<String>,
    pub companycontact: Option<String>,
    pub address: Option<String>,
    pub is_shared: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use unshift_core::ErrorKind;

    fn customer() -> Customer {
        let input = CreateCustomerInput {
            personal: "Jane Roe".to_string(),
            company: Some("Acme".to_string()),
            position: Some("Buyer".to_string()),
            personalcontact: Some("555-1".to_string()),
            companycontact: Some("555-2".to_string()),
            address: Some("1 Main St".to_string()),
            is_shared: false,
        };
        Customer::create(UserId::new(), &input, Utc::now()).unwrap()
    }

    #[test]
    fn placeholder_has_fixed_fields() {
        let owner = UserId::new();
        let c = Customer::placeholder(owner, Utc::now());

        assert_eq!(c.owner, owner);
        assert_eq!(c.personal, "Info Needed");
        assert_eq!(c.company, "Info Needed");
        assert_eq!(c.position, "Info Needed");
        assert_eq!(c.address, "Info Needed");
        assert_eq!(c.personalcontact, "");
        assert_eq!(c.companycontact, "07 0001111");
        assert!(!c.is_shared);
    }

    #[test]
    fn create_requires_a_name() {
        let input = CreateCustomerInput {
            personal: "   ".to_string(),
            ..Default::default()
        };
        let err = Customer::create(UserId::new(), &input, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(err.fields().unwrap().contains_key("personal"));
    }

    #[test]
    fn empty_strings_leave_record_unchanged() {
        let mut c = customer();
        let before = c.clone();

        c.merge(&UpdateCustomerInput {
            personal: Some("".to_string()),
            company: Some("  ".to_string()),
            position: None,
            personalcontact: Some("".to_string()),
            companycontact: Some("".to_string()),
            address: Some("".to_string()),
            is_shared: None,
        });

        assert_eq!(c, before);
    }

    #[test]
    fn snapshot_copies_display_fields() {
        let c = customer();
        let snap = c.snapshot();
        assert_eq!(snap.cus_id, c.id);
        assert_eq!(snap.personal, "Jane Roe");
        assert_eq!(snap.company, "Acme");
        assert_eq!(snap.position, "Buyer");
    }

    #[test]
    fn owner_serializes_as_user_id() {
        let c = customer();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["userId"], serde_json::json!(c.owner));
        assert_eq!(json["isShared"], serde_json::json!(false));
    }

    proptest! {
        #[test]
        fn merge_is_field_independent(
            personal in proptest::option::of("[a-z ]{0,8}"),
            address in proptest::option::of("[a-z ]{0,8}"),
        ) {
            let update = UpdateCustomerInput {
                personal: personal.clone(),
                address: address.clone(),
                ..Default::default()
            };

            let mut all_at_once = customer();
            let mut one_by_one = all_at_once.clone();
            all_at_once.merge(&update);
            one_by_one.merge(&UpdateCustomerInput { address, ..Default::default() });
            one_by_one.merge(&UpdateCustomerInput { personal, ..Default::default() });

            prop_assert_eq!(all_at_once, one_by_one);
        }
    }
}
