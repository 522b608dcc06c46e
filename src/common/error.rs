use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::borrow::Cow;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

#[derive(Debug)]
pub enum AppError {
    Unexpected,
    DecodingRequestFailed,

    /// Names of the required fields that were blank.
    MessagesMissingFields(Vec<&'static str>),
    MessagesNotFound,
    MessagesInvalidFilter,
    MessagesEmptyReply,

    AdminMissingCredentials,
    AdminMissingPasswords,
    AdminInvalidCredentials,
    AdminIncorrectPassword,
    AdminPasswordTooShort,

    MailNotConfigured,
    /// 0: provider or transport detail
    MailDeliveryFailed(String),
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",
            AppError::DecodingRequestFailed => "decoding_request_failed",

            AppError::MessagesMissingFields(_) => "messages.missing_fields",
            AppError::MessagesNotFound => "messages.not_found",
            AppError::MessagesInvalidFilter => "messages.invalid_filter",
            AppError::MessagesEmptyReply => "messages.empty_reply",

            AppError::AdminMissingCredentials => "admin.missing_credentials",
            AppError::AdminMissingPasswords => "admin.missing_passwords",
            AppError::AdminInvalidCredentials => "admin.invalid_credentials",
            AppError::AdminIncorrectPassword => "admin.incorrect_password",
            AppError::AdminPasswordTooShort => "admin.password_too_short",

            AppError::MailNotConfigured => "mail.not_configured",
            AppError::MailDeliveryFailed(_) => "mail.delivery_failed",
        }
    }

    pub fn message(&self) -> Cow<'static, str> {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.".into(),
            AppError::DecodingRequestFailed => "Failed to decode request".into(),

            AppError::MessagesMissingFields(fields) => {
                format!("Missing required fields: {}", fields.join(", ")).into()
            }
            AppError::MessagesNotFound => "Message not found".into(),
            AppError::MessagesInvalidFilter => {
                "Invalid filter (expected `all`, `read` or `unread`)".into()
            }
            AppError::MessagesEmptyReply => "The reply cannot be empty.".into(),

            AppError::AdminMissingCredentials => "Username and password are required.".into(),
            AppError::AdminMissingPasswords => {
                "Both the current and the new password are required.".into()
            }
            AppError::AdminInvalidCredentials => "Invalid username or password.".into(),
            AppError::AdminIncorrectPassword => "The current password is incorrect.".into(),
            AppError::AdminPasswordTooShort => {
                "The new password must be at least 4 characters long.".into()
            }

            AppError::MailNotConfigured => {
                "Email is not configured. Set MAIL_API_KEY and MAIL_FROM.".into()
            }
            AppError::MailDeliveryFailed(_) => "Failed to send the email.".into(),
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::DecodingRequestFailed
            | AppError::MessagesMissingFields(_)
            | AppError::MessagesInvalidFilter
            | AppError::MessagesEmptyReply
            | AppError::AdminMissingCredentials
            | AppError::AdminMissingPasswords
            | AppError::AdminPasswordTooShort => StatusCode::BAD_REQUEST,

            AppError::AdminInvalidCredentials | AppError::AdminIncorrectPassword => {
                StatusCode::UNAUTHORIZED
            }

            AppError::MessagesNotFound => StatusCode::NOT_FOUND,

            AppError::Unexpected
            | AppError::MailNotConfigured
            | AppError::MailDeliveryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.http_status_code();
        let details = match self {
            AppError::MailDeliveryFailed(details) => Some(details.clone()),
            _ => None,
        };
        let response = ErrorResponse {
            error: self.message(),
            code: self.code(),
            details,
        };
        (status, Json(response))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: Cow<'static, str>,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.response_parts().into_response()
    }
}
