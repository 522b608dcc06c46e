use crate::adapters::mail_relay::{HttpMailRelay, MailRelay};
use crate::common::state::AppState;
use crate::repositories::credentials::CredentialStore;
use crate::repositories::messages;
use crate::settings::AppSettings;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        // .json()
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub async fn initialize_state(settings: &AppSettings) -> anyhow::Result<AppState> {
    let db = initialize_db(settings).await?;
    messages::initialize_schema(&db).await?;
    info!("Database ready");

    let credentials = Arc::new(initialize_credentials(settings));
    let mail_relay = initialize_mail_relay(settings)?;
    Ok(AppState {
        db,
        credentials,
        mail_relay,
    })
}

pub async fn initialize_db(settings: &AppSettings) -> sqlx::Result<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(&settings.database_url)?.create_if_missing(true);
    SqlitePoolOptions::new()
        .acquire_timeout(settings.db_wait_timeout)
        .max_connections(settings.db_max_connections)
        .connect_with(options)
        .await
}

pub fn initialize_credentials(settings: &AppSettings) -> CredentialStore {
    CredentialStore::new(
        settings.admin_username.clone(),
        settings.admin_default_password.clone(),
        settings.admin_password_file.clone(),
        settings.bcrypt_cost,
    )
}

pub fn initialize_mail_relay(
    settings: &AppSettings,
) -> anyhow::Result<Option<Arc<dyn MailRelay>>> {
    let (Some(api_key), Some(from)) = (&settings.mail_api_key, &settings.mail_from) else {
        warn!("MAIL_API_KEY or MAIL_FROM not set, replies are disabled");
        return Ok(None);
    };

    let relay = HttpMailRelay::new(
        settings.mail_api_url.clone(),
        api_key.clone(),
        from.clone(),
        settings.mail_sender_name.clone(),
        settings.mail_timeout,
    )?;
    info!(from = %from, "Mail relay configured");
    Ok(Some(Arc::new(relay)))
}
