use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::models::admin::{ChangePasswordArgs, LoginArgs, MIN_PASSWORD_LENGTH};
use tracing::{info, warn};

/// Checks the supplied credentials. There is no session: every admin request
/// is expected to carry its own proof.
pub async fn login<C: Context>(ctx: &C, args: LoginArgs) -> ServiceResult<()> {
    if args.username.trim().is_empty() || args.password.is_empty() {
        return Err(AppError::AdminMissingCredentials);
    }

    let credentials = ctx.credentials();
    let username_matches = args.username.trim() == credentials.username();
    // verified even on a wrong username so both failures take the same path
    let password_matches = credentials.verify(&args.password).await?;
    if !(username_matches && password_matches) {
        warn!(username = args.username.trim(), "Rejected admin login");
        return Err(AppError::AdminInvalidCredentials);
    }

    info!(username = credentials.username(), "Admin logged in");
    Ok(())
}

pub async fn change_password<C: Context>(ctx: &C, args: ChangePasswordArgs) -> ServiceResult<()> {
    if args.current_password.is_empty() || args.new_password.is_empty() {
        return Err(AppError::AdminMissingPasswords);
    }

    let credentials = ctx.credentials();
    if !credentials.verify(&args.current_password).await? {
        warn!("Rejected password change: wrong current password");
        return Err(AppError::AdminIncorrectPassword);
    }
    if args.new_password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::AdminPasswordTooShort);
    }

    match credentials.set_password(&args.new_password).await {
        Ok(()) => {
            info!("Admin password changed");
            Ok(())
        }
        Err(e) => unexpected(e),
    }
}
