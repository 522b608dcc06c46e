use crate::api::{JsonBody, RequestContext};
use crate::common::error::{ServiceResponse, ServiceResult};
use crate::models::messages::{
    ListMessagesArgs, Message, MessageStats, ReplyArgs, ReplyResponse, SubmitMessageArgs,
    SubmitMessageResponse, SuccessResponse, ToggleReadArgs, ToggleReadResponse,
};
use crate::usecases::messages;
use axum::Json;
use axum::extract::{Path, Query};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::Local;

pub async fn submit(
    ctx: RequestContext,
    JsonBody(args): JsonBody<SubmitMessageArgs>,
) -> ServiceResult<(StatusCode, Json<SubmitMessageResponse>)> {
    let message = messages::submit(&ctx, args).await?;
    let response = SubmitMessageResponse {
        success: true,
        id: message.id,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn list(
    ctx: RequestContext,
    Query(args): Query<ListMessagesArgs>,
) -> ServiceResponse<Vec<Message>> {
    let listed = messages::list(&ctx, args).await?;
    Ok(Json(listed))
}

pub async fn stats(ctx: RequestContext) -> ServiceResponse<MessageStats> {
    let stats = messages::stats(&ctx).await?;
    Ok(Json(stats))
}

pub async fn export(
    ctx: RequestContext,
    Query(args): Query<ListMessagesArgs>,
) -> ServiceResult<impl IntoResponse> {
    let csv = messages::export(&ctx, args).await?;
    let file_name = format!("messages_{}.csv", Local::now().format("%Y-%m-%d"));
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, csv))
}

pub async fn toggle_read(
    ctx: RequestContext,
    Path(message_id): Path<String>,
    JsonBody(args): JsonBody<ToggleReadArgs>,
) -> ServiceResponse<ToggleReadResponse> {
    let message = messages::toggle_read(&ctx, &message_id, args).await?;
    Ok(Json(ToggleReadResponse {
        success: true,
        is_read: message.is_read,
    }))
}

pub async fn delete(
    ctx: RequestContext,
    Path(message_id): Path<String>,
) -> ServiceResponse<SuccessResponse> {
    messages::delete(&ctx, &message_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn reply(
    ctx: RequestContext,
    Path(message_id): Path<String>,
    JsonBody(args): JsonBody<ReplyArgs>,
) -> ServiceResponse<ReplyResponse> {
    let recipient = messages::reply(&ctx, &message_id, args).await?;
    Ok(Json(ReplyResponse {
        success: true,
        message: format!("Reply sent to {recipient}"),
    }))
}
