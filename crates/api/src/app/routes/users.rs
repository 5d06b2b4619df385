use std::sync::Arc;

use axum::{Extension, Json};

use unshift_infra::{AuthPayload, Services};
use unshift_scheduling::{LoginInput, RegisterInput, UserView};

use crate::app::dto::{self, Message};
use crate::app::errors::ApiResult;
use crate::app::extract::ApiJson;
use crate::context::PrincipalContext;

pub async fn register(
    Extension(services): Extension<Arc<Services>>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> ApiResult<AuthPayload> {
    Ok(Json(services.users.register(input).await?))
}

pub async fn login(
    Extension(services): Extension<Arc<Services>>,
    ApiJson(input): ApiJson<LoginInput>,
) -> ApiResult<AuthPayload> {
    Ok(Json(services.users.login(input).await?))
}

pub async fn get_users(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> ApiResult<Vec<UserView>> {
    Ok(Json(services.users.list(ctx.principal()).await?))
}

pub async fn get_user(
    Extension(services): Extension<Arc<Services>>,
    ApiJson(args): ApiJson<dto::UserIdArgs>,
) -> ApiResult<UserView> {
    Ok(Json(services.users.get(args.id()?).await?))
}

pub async fn update_profile(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::UpdateProfileArgs>,
) -> ApiResult<AuthPayload> {
    let id = args.user_id.parse()?;
    Ok(Json(services.users.update_profile(ctx.principal(), id, args.update).await?))
}

pub async fn change_user_level(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::UserIdArgs>,
) -> ApiResult<UserView> {
    Ok(Json(services.users.change_level(ctx.principal(), args.id()?).await?))
}

pub async fn delete_user(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::UserIdArgs>,
) -> ApiResult<Message> {
    let message = services.users.delete(ctx.principal(), args.id()?).await?;
    Ok(Json(message.into()))
}
