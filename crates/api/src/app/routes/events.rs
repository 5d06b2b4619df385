use std::sync::Arc;

use axum::{Extension, Json};

use unshift_auth::Scope;
use unshift_infra::Services;
use unshift_scheduling::{CreateEventInput, EventView, ResolvedEvent};

use crate::app::dto::{self, Message};
use crate::app::errors::ApiResult;
use crate::app::extract::{ApiJson, JsonOrDefault};
use crate::context::PrincipalContext;

// -------------------------
// Queries
// -------------------------

pub async fn get_self_events(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    JsonOrDefault(args): JsonOrDefault<dto::DateArgs>,
) -> ApiResult<Vec<ResolvedEvent>> {
    let events = services.events.list_resolved(ctx.principal(), Scope::Own, args.range()?).await?;
    Ok(Json(events))
}

pub async fn get_all_events(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    JsonOrDefault(args): JsonOrDefault<dto::DateArgs>,
) -> ApiResult<Vec<ResolvedEvent>> {
    let events = services.events.list_resolved(ctx.principal(), Scope::Peers, args.range()?).await?;
    Ok(Json(events))
}

pub async fn get_self_selected_events(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    JsonOrDefault(args): JsonOrDefault<dto::DateArgs>,
) -> ApiResult<Vec<EventView>> {
    let events = services.events.list_snapshots(ctx.principal(), Scope::Own, args.range()?).await?;
    Ok(Json(events))
}

pub async fn get_all_selected_events(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    JsonOrDefault(args): JsonOrDefault<dto::DateArgs>,
) -> ApiResult<Vec<EventView>> {
    let events = services.events.list_snapshots(ctx.principal(), Scope::Peers, args.range()?).await?;
    Ok(Json(events))
}

// -------------------------
// Mutations
// -------------------------

pub async fn create_event(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(input): ApiJson<CreateEventInput>,
) -> ApiResult<ResolvedEvent> {
    Ok(Json(services.events.create(ctx.principal(), input).await?))
}

pub async fn complete_event(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::EventIdArgs>,
) -> ApiResult<ResolvedEvent> {
    Ok(Json(services.events.complete(ctx.principal(), args.id()?).await?))
}

/// Back to forecast: clears completion.
pub async fn reopen_event(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::EventIdArgs>,
) -> ApiResult<ResolvedEvent> {
    Ok(Json(services.events.reopen(ctx.principal(), args.id()?).await?))
}

pub async fn reschedule_event(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::RescheduleArgs>,
) -> ApiResult<ResolvedEvent> {
    let id = args.evt_id.parse()?;
    Ok(Json(services.events.reschedule(ctx.principal(), id, &args.plan_date).await?))
}

pub async fn cancel_event(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::CancelArgs>,
) -> ApiResult<ResolvedEvent> {
    let id = args.evt_id.parse()?;
    Ok(Json(services.events.cancel(ctx.principal(), id, args.remark).await?))
}

pub async fn delete_event(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::EventIdArgs>,
) -> ApiResult<Message> {
    let message = services.events.delete(ctx.principal(), args.id()?).await?;
    Ok(Json(message.into()))
}
