use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use unshift_auth::{
    Hs256Jwt, Principal, TokenIssuer, ensure_owner_or_manager, hash_password, require_manager, verify_password,
};
use unshift_core::{DomainError, DomainResult, UserId};
use unshift_scheduling::{LoginInput, Notification, ProfileUpdate, RegisterInput, User, UserView};

use super::{Publisher, Stores, principal_of};
use crate::store::{Recency, UserQuery};

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    #[serde(flatten)]
    pub user: UserView,
    pub token: String,
}

#[derive(Clone)]
pub struct UserService {
    stores: Stores,
    publisher: Publisher,
    tokens: Arc<Hs256Jwt>,
}

impl UserService {
    pub(crate) fn new(stores: Stores, publisher: Publisher, tokens: Arc<Hs256Jwt>) -> Self {
        Self {
            stores,
            publisher,
            tokens,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> DomainResult<AuthPayload> {
        input.validate()?;
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::invalid_field("email", "This email has taken"));
        }

        let password_hash = hash_password(&input.password)?;
        let user = self.stores.users.insert(User::register(&input, password_hash, Utc::now())).await?;
        tracing::info!(user_id = %user.id, is_manager = user.is_manager, "user registered");

        self.publisher.publish(Notification::UserCreated(user.view()))?;
        self.payload(&user)
    }

    pub async fn login(&self, input: LoginInput) -> DomainResult<AuthPayload> {
        input.validate()?;
        let Some(user) = self.find_by_email(&input.email).await? else {
            return Err(DomainError::invalid_field("email", "Email not found"));
        };
        if !verify_password(&input.password, &user.password_hash)? {
            return Err(DomainError::invalid_field("password", "Wrong password"));
        }
        self.payload(&user)
    }

    /// Every user except the caller, newest first.
    pub async fn list(&self, principal: &Principal) -> DomainResult<Vec<UserView>> {
        let query = UserQuery {
            email: None,
            exclude: Some(principal.id),
        };
        let users = self.stores.users.find(query, Recency::NewestFirst).await?;
        Ok(users.iter().map(User::view).collect())
    }

    pub async fn get(&self, id: UserId) -> DomainResult<UserView> {
        Ok(self.load(id).await?.view())
    }

    /// Profile edit by the user or a manager. Blank fields are left alone.
    pub async fn update_profile(
        &self,
        principal: &Principal,
        id: UserId,
        update: ProfileUpdate,
    ) -> DomainResult<AuthPayload> {
        let current = self.load(id).await?;
        ensure_owner_or_manager(principal, current.id)?;
        update.validate()?;

        if let Some(email) = update.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            if let Some(other) = self.find_by_email(email).await? {
                if other.id != current.id {
                    return Err(DomainError::invalid_field("email", "This email has taken"));
                }
            }
        }
        let password_hash = match update.new_password()? {
            Some(password) => Some(hash_password(password)?),
            None => None,
        };

        let now = Utc::now();
        let user = self
            .stores
            .users
            .update(id, Box::new(move |u: &mut User| u.apply_profile(&update, password_hash, now)))
            .await?
            .ok_or_else(|| DomainError::not_found("User"))?;
        tracing::info!(user_id = %user.id, by = %principal.id, "profile updated");

        self.publisher.publish(Notification::UserUpdated(user.view()))?;
        self.payload(&user)
    }

    /// Manager-only: flip a user between staff and manager.
    pub async fn change_level(&self, principal: &Principal, id: UserId) -> DomainResult<UserView> {
        require_manager(principal)?;
        let now = Utc::now();
        let user = self
            .stores
            .users
            .update(id, Box::new(move |u: &mut User| u.toggle_manager(now)))
            .await?
            .ok_or_else(|| DomainError::not_found("User"))?;
        tracing::info!(user_id = %user.id, is_manager = user.is_manager, by = %principal.id, "user level changed");

        let view = user.view();
        self.publisher.publish(Notification::UserUpdated(view.clone()))?;
        Ok(view)
    }

    pub async fn delete(&self, principal: &Principal, id: UserId) -> DomainResult<String> {
        let current = self.load(id).await?;
        ensure_owner_or_manager(principal, current.id)?;
        self.stores
            .users
            .delete(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))?;
        tracing::info!(user_id = %id, by = %principal.id, "user deleted");
        Ok("User is deleted".to_string())
    }

    async fn load(&self, id: UserId) -> DomainResult<User> {
        self.stores
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User"))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let query = UserQuery {
            email: Some(email.trim().to_string()),
            exclude: None,
        };
        Ok(self.stores.users.find(query, Recency::NewestFirst).await?.into_iter().next())
    }

    fn payload(&self, user: &User) -> DomainResult<AuthPayload> {
        let token = self.tokens.issue(&principal_of(user), Utc::now())?;
        Ok(AuthPayload {
            user: user.view(),
            token,
        })
    }
}

