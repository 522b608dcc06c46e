use crate::common::error::{AppError, ServiceResult};
use crate::entities::messages;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        [&self.name, &self.email, &self.subject, &self.body]
            .into_iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl TryFrom<messages::Message> for Message {
    type Error = AppError;

    fn try_from(message: messages::Message) -> ServiceResult<Self> {
        let created_at = DateTime::from_timestamp_millis(message.created_at)
            .ok_or_else(|| anyhow!("timestamp out of range"))?;
        Ok(Self {
            created_at,
            id: message.id,
            name: message.name,
            email: message.email,
            subject: message.subject,
            body: message.body,
            is_read: message.is_read,
        })
    }
}

/// Contact form payload. The french field names sent by older clients are
/// accepted as aliases.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitMessageArgs {
    #[serde(default, alias = "nom")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "sujet")]
    pub subject: String,
    #[serde(default, alias = "message")]
    pub body: String,
}

#[derive(Serialize)]
pub struct SubmitMessageResponse {
    pub success: bool,
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListMessagesArgs {
    pub search: Option<String>,
    pub filter: Option<String>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MessageFilter {
    #[default]
    All,
    Read,
    Unread,
}

impl MessageFilter {
    pub const fn read_state(self) -> Option<bool> {
        match self {
            MessageFilter::All => None,
            MessageFilter::Read => Some(true),
            MessageFilter::Unread => Some(false),
        }
    }
}

impl FromStr for MessageFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(MessageFilter::All),
            "read" => Ok(MessageFilter::Read),
            "unread" => Ok(MessageFilter::Unread),
            _ => Err(AppError::MessagesInvalidFilter),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct MessageStats {
    pub total: i64,
    pub read: i64,
    pub unread: i64,
    pub today: i64,
}

impl From<messages::MessageSummary> for MessageStats {
    fn from(summary: messages::MessageSummary) -> Self {
        Self {
            total: summary.total,
            read: summary.read,
            unread: summary.total - summary.read,
            today: summary.today,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReadArgs {
    #[serde(default, alias = "lu")]
    pub is_read: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleReadResponse {
    pub success: bool,
    pub is_read: bool,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReplyArgs {
    #[serde(default)]
    pub response: String,
}

#[derive(Serialize)]
pub struct ReplyResponse {
    pub success: bool,
    pub message: String,
}
