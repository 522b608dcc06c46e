use crate::adapters::mail_relay::{MailRelay, OutgoingEmail};
use crate::common::state::AppState;
use crate::repositories::credentials::CredentialStore;
use crate::repositories::messages;
use anyhow::bail;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Records outgoing emails instead of sending them.
#[derive(Default)]
pub struct RecordingRelay {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail: bool,
}

impl RecordingRelay {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailRelay for RecordingRelay {
    fn sender_name(&self) -> &str {
        "SK Digitale"
    }

    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        if self.fail {
            bail!("relay unreachable");
        }
        self.sent.lock().unwrap().push(OutgoingEmail {
            to: email.to.clone(),
            subject: email.subject.clone(),
            html: email.html.clone(),
        });
        Ok(())
    }
}

/// Password file in the temp dir, default password `1234`, minimum bcrypt cost.
pub fn temp_credentials() -> CredentialStore {
    let path = std::env::temp_dir().join(format!("contact-service-{}.pw", Uuid::new_v4()));
    CredentialStore::new("admin".to_string(), "1234".to_string(), path, 4)
}

pub async fn test_state(mail_relay: Option<Arc<dyn MailRelay>>) -> AppState {
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    messages::initialize_schema(&db).await.unwrap();
    AppState {
        db,
        credentials: Arc::new(temp_credentials()),
        mail_relay,
    }
}
