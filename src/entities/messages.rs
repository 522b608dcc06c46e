use chrono::{DateTime, Utc};

#[derive(sqlx::FromRow)]
pub struct Message {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
    pub is_read: bool,
    /// milliseconds since the unix epoch
    pub created_at: i64,
}

pub struct CreateMessageArgs {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub body: String,
}

impl CreateMessageArgs {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("body", &self.body),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

#[derive(Copy, Clone, Debug)]
pub enum MessagePredicate {
    All,
    IsRead(bool),
    CreatedSince(DateTime<Utc>),
}

#[derive(sqlx::FromRow)]
pub struct MessageSummary {
    pub total: i64,
    pub read: i64,
    pub today: i64,
}
