//! `unshift-auth` - authentication/authorization boundary.
//!
//! No HTTP and no storage here: the crate turns a
//! bearer credential into a [`Principal`] and answers "may this principal see
//! or touch that owner's record?".

pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod visibility;

pub use authorize::{AuthzError, ensure_owner, ensure_owner_or_manager, require_manager};
pub use claims::{Hs256Jwt, JwtClaims, JwtValidator, TokenIssuer, TokenValidationError, validate_claims};
pub use password::{PasswordError, hash_password, verify_password};
pub use principal::Principal;
pub use visibility::{OwnerFilter, Scope, can_receive, can_see};
