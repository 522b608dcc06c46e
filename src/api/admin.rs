use crate::api::{JsonBody, RequestContext};
use crate::common::error::ServiceResponse;
use crate::models::admin::{
    ChangePasswordArgs, ChangePasswordResponse, DASHBOARD_PATH, LoginArgs, LoginResponse,
};
use crate::usecases::admin;
use axum::Json;

pub async fn login(
    ctx: RequestContext,
    JsonBody(args): JsonBody<LoginArgs>,
) -> ServiceResponse<LoginResponse> {
    admin::login(&ctx, args).await?;
    Ok(Json(LoginResponse {
        success: true,
        redirect: DASHBOARD_PATH,
    }))
}

pub async fn change_password(
    ctx: RequestContext,
    JsonBody(args): JsonBody<ChangePasswordArgs>,
) -> ServiceResponse<ChangePasswordResponse> {
    admin::change_password(&ctx, args).await?;
    Ok(Json(ChangePasswordResponse {
        success: true,
        message: "Password changed",
    }))
}
