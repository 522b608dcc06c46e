use crate::common::env::{FromEnv, optional_var};
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

pub struct AppSettings {
    pub app_component: String,
    pub level: Level,
    pub app_host: IpAddr,
    pub app_port: u16,

    pub database_url: String,
    pub db_max_connections: u32,
    pub db_wait_timeout: Duration,

    pub admin_username: String,
    pub admin_default_password: String,
    pub admin_password_file: PathBuf,
    pub bcrypt_cost: u32,

    pub mail_api_url: String,
    pub mail_api_key: Option<String>,
    pub mail_from: Option<String>,
    pub mail_sender_name: String,
    pub mail_timeout: Duration,
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let app_component = String::from_env_or("APP_COMPONENT", "api".to_string())?;
        let level = Level::from_env_or("LOG_LEVEL", Level::INFO)?;
        let app_host = IpAddr::from_env_or("APP_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let app_port = u16::from_env_or("APP_PORT", 3000)?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let db_max_connections = u32::from_env_or("DB_MAX_CONNECTIONS", 5)?;
        let db_wait_timeout_secs = u64::from_env_or("DB_WAIT_TIMEOUT_SECS", 5)?;
        let db_wait_timeout = Duration::from_secs(db_wait_timeout_secs);

        let admin_username = String::from_env_or("ADMIN_USERNAME", "admin".to_string())?;
        let admin_default_password = String::from_env_or("ADMIN_PASSWORD", "1234".to_string())?;
        let admin_password_file =
            PathBuf::from_env_or("ADMIN_PASSWORD_FILE", PathBuf::from(".admin-password"))?;
        let bcrypt_cost = u32::from_env_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?;

        let mail_api_url = String::from_env_or(
            "MAIL_API_URL",
            "https://api.resend.com/emails".to_string(),
        )?;
        let mail_api_key = optional_var("MAIL_API_KEY");
        let mail_from = optional_var("MAIL_FROM");
        let mail_sender_name = String::from_env_or("MAIL_SENDER_NAME", "SK Digitale".to_string())?;
        let mail_timeout_secs = u64::from_env_or("MAIL_TIMEOUT_SECS", 10)?;
        let mail_timeout = Duration::from_secs(mail_timeout_secs);

        Ok(AppSettings {
            app_component,
            level,
            app_host,
            app_port,

            database_url,
            db_max_connections,
            db_wait_timeout,

            admin_username,
            admin_default_password,
            admin_password_file,
            bcrypt_cost,

            mail_api_url,
            mail_api_key,
            mail_from,
            mail_sender_name,
            mail_timeout,
        })
    }
}
