use crate::adapters::mail_relay::MailRelay;
use crate::repositories::credentials::CredentialStore;
use sqlx::{Pool, Sqlite};

pub trait Context: Sync + Send {
    fn db(&self) -> &Pool<Sqlite>;
    fn credentials(&self) -> &CredentialStore;
    /// `None` when the outbound mail relay is not configured.
    fn mail_relay(&self) -> Option<&dyn MailRelay>;
}
