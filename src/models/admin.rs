use serde::{Deserialize, Serialize};

/// Where the dashboard lives once the admin is logged in.
pub const DASHBOARD_PATH: &str = "/messages";

pub const MIN_PASSWORD_LENGTH: usize = 4;

#[derive(Default, Deserialize)]
pub struct LoginArgs {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub redirect: &'static str,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordArgs {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Serialize)]
pub struct ChangePasswordResponse {
    pub success: bool,
    pub message: &'static str,
}
