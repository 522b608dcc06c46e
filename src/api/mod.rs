use crate::adapters::mail_relay::MailRelay;
use crate::common::context::Context;
use crate::common::error::AppError;
use crate::common::init;
use crate::common::state::AppState;
use crate::repositories::credentials::CredentialStore;
use crate::settings::AppSettings;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use axum::routing::{delete, get, patch, post};
use serde::de::DeserializeOwned;
use sqlx::{Pool, Sqlite};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub mod admin;
pub mod messages;

pub struct RequestContext {
    pub db: Pool<Sqlite>,
    pub credentials: Arc<CredentialStore>,
    pub mail_relay: Option<Arc<dyn MailRelay>>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/messages", post(messages::submit).get(messages::list))
        .route("/api/messages/stats/summary", get(messages::stats))
        .route("/api/messages/export", get(messages::export))
        .route("/api/messages/{id}", delete(messages::delete))
        .route("/api/messages/{id}/read", patch(messages::toggle_read))
        .route("/api/messages/{id}/reply", post(messages::reply))
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/change-password", post(admin::change_password))
}

pub fn app(state: AppState) -> Router {
    router().layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn serve(settings: &AppSettings) -> anyhow::Result<()> {
    let state = init::initialize_state(settings).await?;
    let addr = SocketAddr::new(settings.app_host, settings.app_port);
    let listener = TcpListener::bind(addr).await?;
    info!("Serving contact-service on http://{addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

pub async fn index() -> &'static str {
    "Running contact-service v0.1"
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self {
            db: state.db.clone(),
            credentials: state.credentials.clone(),
            mail_relay: state.mail_relay.clone(),
        })
    }
}

impl Context for RequestContext {
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

/// JSON request body. Unlike `axum::Json` it does not require a content type,
/// reads an empty body as `{}`, and rejects with an [`AppError`].
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            debug!(error = %e, "Failed to read request body");
            AppError::DecodingRequestFailed
        })?;
        let payload: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };
        serde_json::from_slice(payload).map(JsonBody).map_err(|e| {
            debug!(error = %e, "Failed to decode request body");
            AppError::DecodingRequestFailed
        })
    }
}
