use crate::adapters::mail_relay;
use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::entities::messages::CreateMessageArgs;
use crate::models::messages::{
    ListMessagesArgs, Message, MessageFilter, MessageStats, ReplyArgs, SubmitMessageArgs,
    ToggleReadArgs,
};
use crate::repositories::messages;
use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use std::str::FromStr;
use tracing::{error, info, warn};

pub async fn submit<C: Context>(ctx: &C, args: SubmitMessageArgs) -> ServiceResult<Message> {
    let args = CreateMessageArgs {
        name: args.name.trim().to_string(),
        email: args.email.trim().to_string(),
        subject: args.subject.trim().to_string(),
        body: args.body.trim().to_string(),
    };
    let message = messages::create(ctx, &args).await?;
    info!(message_id = %message.id, email = %message.email, "Contact message received");
    Message::try_from(message)
}

pub async fn fetch_one<C: Context>(ctx: &C, message_id: &str) -> ServiceResult<Message> {
    match messages::fetch_one(ctx, message_id).await {
        Ok(message) => Message::try_from(message),
        Err(sqlx::Error::RowNotFound) => Err(AppError::MessagesNotFound),
        Err(e) => unexpected(e),
    }
}

/// Newest first, narrowed by read state and by a case-insensitive search over
/// name, email, subject and body.
pub async fn list<C: Context>(ctx: &C, args: ListMessagesArgs) -> ServiceResult<Vec<Message>> {
    let filter = match args.filter.as_deref() {
        Some(filter) => MessageFilter::from_str(filter)?,
        None => MessageFilter::All,
    };
    let needle = args
        .search
        .as_deref()
        .filter(|search| !search.is_empty())
        .map(str::to_lowercase);

    let rows = messages::fetch_all(ctx, filter.read_state()).await?;
    let mut listed = Vec::with_capacity(rows.len());
    for row in rows {
        let message = Message::try_from(row)?;
        if needle.as_deref().is_none_or(|needle| message.matches(needle)) {
            listed.push(message);
        }
    }
    Ok(listed)
}

pub async fn stats<C: Context>(ctx: &C) -> ServiceResult<MessageStats> {
    let since = local_midnight(Local::now());
    let summary = messages::summarize(ctx, since).await?;
    Ok(MessageStats::from(summary))
}

/// Sets the read state to the explicit value, or flips it when none is given.
pub async fn toggle_read<C: Context>(
    ctx: &C,
    message_id: &str,
    args: ToggleReadArgs,
) -> ServiceResult<Message> {
    let is_read = match args.is_read {
        Some(is_read) => is_read,
        None => !fetch_one(ctx, message_id).await?.is_read,
    };

    match messages::set_read(ctx, message_id, is_read).await {
        Ok(message) => Message::try_from(message),
        Err(sqlx::Error::RowNotFound) => Err(AppError::MessagesNotFound),
        Err(e) => unexpected(e),
    }
}

pub async fn delete<C: Context>(ctx: &C, message_id: &str) -> ServiceResult<()> {
    match messages::delete(ctx, message_id).await {
        Ok(0) => Err(AppError::MessagesNotFound),
        Ok(_) => {
            info!(message_id, "Message deleted");
            Ok(())
        }
        Err(e) => unexpected(e),
    }
}

/// Emails `args.response` to the author of the message, then marks it read.
/// Returns the recipient address.
pub async fn reply<C: Context>(
    ctx: &C,
    message_id: &str,
    args: ReplyArgs,
) -> ServiceResult<String> {
    let response = args.response.trim();
    if response.is_empty() {
        return Err(AppError::MessagesEmptyReply);
    }

    let message = fetch_one(ctx, message_id).await?;
    let Some(relay) = ctx.mail_relay() else {
        warn!(message_id, "Reply requested but no mail relay is configured");
        return Err(AppError::MailNotConfigured);
    };

    let email = mail_relay::compose_reply(&message, response, relay.sender_name());
    if let Err(e) = relay.send(&email).await {
        error!(message_id, error = %e, "Failed to deliver reply");
        return Err(AppError::MailDeliveryFailed(e.to_string()));
    }
    info!(message_id, to = %message.email, "Reply sent");

    match messages::set_read(ctx, message_id, true).await {
        Ok(_) => {}
        Err(sqlx::Error::RowNotFound) => {
            warn!(message_id, "Message was deleted while the reply was being sent")
        }
        Err(e) => return unexpected(e),
    }
    Ok(message.email)
}

/// CSV rendition of [`list`], as downloaded from the dashboard.
pub async fn export<C: Context>(ctx: &C, args: ListMessagesArgs) -> ServiceResult<String> {
    let listed = list(ctx, args).await?;

    let mut csv = String::from("Date,Name,Email,Subject,Message,Status\n");
    for message in &listed {
        let created_at = message
            .created_at
            .with_timezone(&Local)
            .format("%d/%m/%Y %H:%M:%S")
            .to_string();
        let status = if message.is_read { "Read" } else { "Unread" };
        let row = [
            created_at.as_str(),
            message.name.as_str(),
            message.email.as_str(),
            message.subject.as_str(),
            message.body.as_str(),
            status,
        ]
        .map(csv_field)
        .join(",");
        csv.push_str(&row);
        csv.push('\n');
    }
    Ok(csv)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Start of the current local day, as a UTC instant. When a DST gap swallows
/// midnight, the day starts at the first whole hour that exists.
fn local_midnight<Tz: TimeZone>(now: DateTime<Tz>) -> DateTime<Utc> {
    let zone = now.timezone();
    let day = now.date_naive();
    (0..24)
        .filter_map(|hour| NaiveTime::from_hms_opt(hour, 0, 0))
        .find_map(|time| day.and_time(time).and_local_timezone(zone.clone()).earliest())
        .map_or_else(|| now.with_timezone(&Utc), |start| start.with_timezone(&Utc))
}
