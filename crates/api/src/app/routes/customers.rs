use std::sync::Arc;

use axum::{Extension, Json};

use unshift_infra::Services;
use unshift_scheduling::{CreateCustomerInput, Customer, CustomerView};

use crate::app::dto;
use crate::app::errors::ApiResult;
use crate::app::extract::ApiJson;
use crate::context::PrincipalContext;

pub async fn get_self_customers(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> ApiResult<Vec<CustomerView>> {
    Ok(Json(services.customers.list_own(ctx.principal()).await?))
}

/// Manager-only: customers owned by everyone else.
pub async fn get_other_customers(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
) -> ApiResult<Vec<CustomerView>> {
    Ok(Json(services.customers.list_others(ctx.principal()).await?))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(input): ApiJson<CreateCustomerInput>,
) -> ApiResult<CustomerView> {
    Ok(Json(services.customers.create(ctx.principal(), input).await?))
}

pub async fn update_customer(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::UpdateCustomerArgs>,
) -> ApiResult<CustomerView> {
    let id = args.cus_id.parse()?;
    Ok(Json(services.customers.update(ctx.principal(), id, args.update).await?))
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<Services>>,
    Extension(ctx): Extension<PrincipalContext>,
    ApiJson(args): ApiJson<dto::CustomerIdArgs>,
) -> ApiResult<Customer> {
    Ok(Json(services.customers.delete(ctx.principal(), args.id()?).await?))
}
