use crate::adapters::mail_relay::MailRelay;
use crate::common::context::Context;
use crate::repositories::credentials::CredentialStore;
use sqlx::{Pool, Sqlite};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Pool<Sqlite>,
    pub credentials: Arc<CredentialStore>,
    pub mail_relay: Option<Arc<dyn MailRelay>>,
}

impl Context for AppState {
    fn db(&self) -> &Pool<Sqlite> {
        &self.db
    }

    fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn mail_relay(&self) -> Option<&dyn MailRelay> {
        self.mail_relay.as_deref()
    }
}
