use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult};
use crate::entities::messages::{CreateMessageArgs, Message, MessagePredicate, MessageSummary};
use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

const TABLE_NAME: &str = "messages";
const READ_FIELDS: &str = "id, name, email, subject, body, is_read, created_at";

pub async fn initialize_schema(db: &Pool<Sqlite>) -> sqlx::Result<()> {
    const CREATE_TABLE: &str = const_str::concat!(
        "CREATE TABLE IF NOT EXISTS ",
        TABLE_NAME,
        " (",
        "id TEXT PRIMARY KEY NOT NULL, ",
        "name TEXT NOT NULL CHECK (name <> ''), ",
        "email TEXT NOT NULL CHECK (email <> ''), ",
        "subject TEXT NOT NULL CHECK (subject <> ''), ",
        "body TEXT NOT NULL CHECK (body <> ''), ",
        "is_read INTEGER NOT NULL DEFAULT 0, ",
        "created_at INTEGER NOT NULL",
        ")"
    );
    const CREATE_INDEX: &str = const_str::concat!(
        "CREATE INDEX IF NOT EXISTS idx_messages_created_at ON ",
        TABLE_NAME,
        " (created_at)"
    );
    sqlx::query(CREATE_TABLE).execute(db).await?;
    sqlx::query(CREATE_INDEX).execute(db).await?;
    Ok(())
}

pub async fn create<C: Context>(ctx: &C, args: &CreateMessageArgs) -> ServiceResult<Message> {
    create_with(ctx, args, Utc::now(), false).await
}

/// Inserts a message with an explicit timestamp and read state.
/// Blank or whitespace-only fields are rejected before reaching the database.
pub async fn create_with<C: Context>(
    ctx: &C,
    args: &CreateMessageArgs,
    created_at: DateTime<Utc>,
    is_read: bool,
) -> ServiceResult<Message> {
    let missing = args.missing_fields();
    if !missing.is_empty() {
        return Err(AppError::MessagesMissingFields(missing));
    }

    const QUERY: &str = const_str::concat!(
        "INSERT INTO ",
        TABLE_NAME,
        " (id, name, email, subject, body, is_read, created_at) ",
        "VALUES (?, ?, ?, ?, ?, ?, ?)"
    );
    let id = Uuid::new_v4().to_string();
    let created_at = created_at.timestamp_millis();
    sqlx::query(QUERY)
        .bind(&id)
        .bind(&args.name)
        .bind(&args.email)
        .bind(&args.subject)
        .bind(&args.body)
        .bind(is_read)
        .bind(created_at)
        .execute(ctx.db())
        .await?;
    Ok(Message {
        id,
        name: args.name.clone(),
        email: args.email.clone(),
        subject: args.subject.clone(),
        body: args.body.clone(),
        is_read,
        created_at,
    })
}

/// Newest first. `read_state` narrows the result to read or unread messages.
pub async fn fetch_all<C: Context>(ctx: &C, read_state: Option<bool>) -> sqlx::Result<Vec<Message>> {
    match read_state {
        None => {
            const QUERY: &str = const_str::concat!(
                "SELECT ",
                READ_FIELDS,
                " FROM ",
                TABLE_NAME,
                " ORDER BY created_at DESC, rowid DESC"
            );
            sqlx::query_as(QUERY).fetch_all(ctx.db()).await
        }
        Some(is_read) => {
            const QUERY: &str = const_str::concat!(
                "SELECT ",
                READ_FIELDS,
                " FROM ",
                TABLE_NAME,
                " WHERE is_read = ? ORDER BY created_at DESC, rowid DESC"
            );
            sqlx::query_as(QUERY)
                .bind(is_read)
                .fetch_all(ctx.db())
                .await
        }
    }
}

pub async fn fetch_one<C: Context>(ctx: &C, id: &str) -> sqlx::Result<Message> {
    const QUERY: &str = const_str::concat!(
        "SELECT ",
        READ_FIELDS,
        " FROM ",
        TABLE_NAME,
        " WHERE id = ?"
    );
    sqlx::query_as(QUERY).bind(id).fetch_one(ctx.db()).await
}

/// Fails with [`sqlx::Error::RowNotFound`] if no message has this id.
pub async fn set_read<C: Context>(ctx: &C, id: &str, is_read: bool) -> sqlx::Result<Message> {
    const QUERY: &str = const_str::concat!(
        "UPDATE ",
        TABLE_NAME,
        " SET is_read = ? WHERE id = ? RETURNING ",
        READ_FIELDS
    );
    sqlx::query_as(QUERY)
        .bind(is_read)
        .bind(id)
        .fetch_one(ctx.db())
        .await
}

/// Returns the number of deleted rows.
pub async fn delete<C: Context>(ctx: &C, id: &str) -> sqlx::Result<u64> {
    const QUERY: &str = const_str::concat!("DELETE FROM ", TABLE_NAME, " WHERE id = ?");
    let result = sqlx::query(QUERY).bind(id).execute(ctx.db()).await?;
    Ok(result.rows_affected())
}

pub async fn delete_all<C: Context>(ctx: &C) -> sqlx::Result<u64> {
    const QUERY: &str = const_str::concat!("DELETE FROM ", TABLE_NAME);
    let result = sqlx::query(QUERY).execute(ctx.db()).await?;
    Ok(result.rows_affected())
}

pub async fn count_where<C: Context>(ctx: &C, predicate: MessagePredicate) -> sqlx::Result<i64> {
    const COUNT: &str = const_str::concat!("SELECT COUNT(*) FROM ", TABLE_NAME);
    const COUNT_READ: &str = const_str::concat!(
        "SELECT COUNT(*) FROM ",
        TABLE_NAME,
        " WHERE is_read = ?"
    );
    const COUNT_SINCE: &str = const_str::concat!(
        "SELECT COUNT(*) FROM ",
        TABLE_NAME,
        " WHERE created_at >= ?"
    );
    let query = match predicate {
        MessagePredicate::All => sqlx::query_scalar::<Sqlite, i64>(COUNT),
        MessagePredicate::IsRead(is_read) => {
            sqlx::query_scalar::<Sqlite, i64>(COUNT_READ).bind(is_read)
        }
        MessagePredicate::CreatedSince(since) => {
            sqlx::query_scalar::<Sqlite, i64>(COUNT_SINCE).bind(since.timestamp_millis())
        }
    };
    query.fetch_one(ctx.db()).await
}

/// All counters come from a single statement so they describe the same snapshot.
pub async fn summarize<C: Context>(ctx: &C, since: DateTime<Utc>) -> sqlx::Result<MessageSummary> {
    const QUERY: &str = const_str::concat!(
        "SELECT COUNT(*) AS total, ",
        "COALESCE(SUM(CASE WHEN is_read THEN 1 ELSE 0 END), 0) AS read, ",
        "COALESCE(SUM(CASE WHEN created_at >= ? THEN 1 ELSE 0 END), 0) AS today ",
        "FROM ",
        TABLE_NAME
    );
    sqlx::query_as(QUERY)
        .bind(since.timestamp_millis())
        .fetch_one(ctx.db())
        .await
}
