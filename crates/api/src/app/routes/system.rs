use axum::{Extension, Json, http::StatusCode};

use unshift_auth::Principal;

use crate::context::PrincipalContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(ctx): Extension<PrincipalContext>) -> Json<Principal> {
    Json(ctx.principal().clone())
}
