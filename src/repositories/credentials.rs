use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// The admin password as currently persisted.
pub enum StoredPassword {
    /// Nothing persisted yet, the configured default applies.
    Default(String),
    /// A bcrypt hash written by [`CredentialStore::set_password`].
    Hashed(String),
    /// A cleartext value left behind by an older deployment.
    Legacy(String),
}

/// File-backed store for the single admin credential.
///
/// Every read goes to disk, so a password change is visible to the very next
/// request.
pub struct CredentialStore {
    username: String,
    default_password: String,
    path: PathBuf,
    bcrypt_cost: u32,
}

impl CredentialStore {
    pub fn new(
        username: String,
        default_password: String,
        path: PathBuf,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            username,
            default_password,
            path,
            bcrypt_cost,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get_password(&self) -> io::Result<StoredPassword> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let value = contents.trim();
                if value.is_empty() {
                    Ok(StoredPassword::Default(self.default_password.clone()))
                } else if is_bcrypt_hash(value) {
                    Ok(StoredPassword::Hashed(value.to_string()))
                } else {
                    Ok(StoredPassword::Legacy(value.to_string()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Ok(StoredPassword::Default(self.default_password.clone()))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn verify(&self, candidate: &str) -> anyhow::Result<bool> {
        let verified = match self.get_password().await? {
            StoredPassword::Default(password) | StoredPassword::Legacy(password) => {
                password == candidate
            }
            StoredPassword::Hashed(hash) => bcrypt::verify(candidate, &hash)?,
        };
        Ok(verified)
    }

    /// Persists a bcrypt hash of `new_password`, replacing the file atomically.
    pub async fn set_password(&self, new_password: &str) -> anyhow::Result<()> {
        let hash = bcrypt::hash(new_password, self.bcrypt_cost)?;
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "admin-password".to_string());
        let tmp_path = self
            .path
            .with_file_name(format!("{file_name}.{}.tmp", Uuid::new_v4()));

        tokio::fs::write(&tmp_path, hash).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        Ok(())
    }
}

fn is_bcrypt_hash(value: &str) -> bool {
    value.len() == 60 && value.starts_with("$2")
}
