use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unshift_core::{DomainError, DomainResult, Entity, FieldErrors, UserId};

use crate::provided;

/// Stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_manager: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

impl User {
    pub fn register(input: &RegisterInput, password_hash: String, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            email: input.email.trim().to_string(),
            username: input.username.trim().to_string(),
            password_hash,
            is_manager: input.is_manager,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a profile update. Blank fields keep the stored value.
    pub fn apply_profile(&mut self, update: &ProfileUpdate, password_hash: Option<String>, now: DateTime<Utc>) {
        if let Some(email) = provided(update.email.as_deref()) {
            self.email = email.trim().to_string();
        }
        if let Some(username) = provided(update.username.as_deref()) {
            self.username = username.trim().to_string();
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        self.updated_at = now;
    }

    /// Flip the manager flag.
    pub fn toggle_manager(&mut self, now: DateTime<Utc>) {
        self.is_manager = !self.is_manager;
        self.updated_at = now;
    }

    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            is_manager: self.is_manager,
            created_at: self.created_at,
        }
    }
}

/// Public shape of a user: never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub is_manager: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub is_manager: bool,
}

impl RegisterInput {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = FieldErrors::new();

        if self.username.trim().is_empty() {
            errors.insert("username".into(), "Username must not be empty".into());
        }
        if self.email.trim().is_empty() {
            errors.insert("email".into(), "Email must not be empty".into());
        } else if !looks_like_email(&self.email) {
            errors.insert("email".into(), "Email must be a valid email address".into());
        }
        if self.password.is_empty() {
            errors.insert("password".into(), "Password must not be empty".into());
        } else if self.password != self.confirm_password {
            errors.insert("confirmPassword".into(), "Passwords must match".into());
        }

        DomainError::check_fields(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn validate(&self) -> DomainResult<()> {
        let mut errors = FieldErrors::new();
        if self.email.trim().is_empty() {
            errors.insert("email".into(), "Email must not be empty".into());
        }
        if self.password.trim().is_empty() {
            errors.insert("password".into(), "Password must not be empty".into());
        }
        DomainError::check_fields(errors)
    }
}

/// Partial profile update; every field is optional and blank means "no change".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

impl ProfileUpdate {
    /// The new plain-text password, if one was provided and confirmed.
    pub fn new_password(&self) -> DomainResult<Option<&str>> {
        let Some(password) = provided(self.password.as_deref()) else {
            return Ok(None);
        };
        if self.confirm_password.as_deref() != Some(password) {
            return Err(DomainError::invalid_field("confirmPassword", "Incorrect Confirm Password"));
        }
        Ok(Some(password))
    }

    pub fn validate(&self) -> DomainResult<()> {
        if let Some(email) = provided(self.email.as_deref()) {
            if !looks_like_email(email) {
                return Err(DomainError::invalid_field("email", "Email must be a valid email address"));
            }
        }
        self.new_password().map(|_| ())
    }
}

fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
