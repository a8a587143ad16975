//! Auth session backed by `.inspector/session`.
//!
//! The session file holds exactly one line: the signed-in user id. A
//! missing or malformed file means "signed out".

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, warn};

/// Abstraction over the signed-in user lookup.
pub trait AuthProvider {
    /// The current user id, or `None` when signed out.
    fn current_user_id(&self) -> Option<String>;
}

/// Auth provider that reads the signed-in user from a session file.
pub struct SessionFileAuth {
    session_path: PathBuf,
}

impl SessionFileAuth {
    pub fn new(session_path: PathBuf) -> Self {
        Self { session_path }
    }

    /// Write the session file, signing `user_id` in.
    pub fn sign_in(&self, user_id: &str) -> Result<()> {
        validate_user_id(user_id)?;
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&self.session_path, format!("{user_id}\n"))
            .with_context(|| format!("write session {}", self.session_path.display()))?;
        info!(user_id = %user_id, "signed in");
        Ok(())
    }

    /// Remove the session file. Signing out while signed out is fine.
    pub fn sign_out(&self) -> Result<()> {
        if !self.session_path.exists() {
            debug!("no session to remove");
            return Ok(());
        }
        fs::remove_file(&self.session_path)
            .with_context(|| format!("remove session {}", self.session_path.display()))?;
        info!("signed out");
        Ok(())
    }
}

impl AuthProvider for SessionFileAuth {
    fn current_user_id(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.session_path).ok()?;
        let user_id = contents.trim();
        if let Err(err) = validate_user_id(user_id) {
            warn!(path = %self.session_path.display(), error = %err, "ignoring malformed session file");
            return None;
        }
        Some(user_id.to_string())
    }
}

/// Validate that a user id is safe for storage and record fields.
pub fn validate_user_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(anyhow!("user id must not be empty"));
    }
    if id
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-'))
    {
        return Err(anyhow!("user id must be [A-Za-z0-9._-] only (got '{id}')"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_in(dir: &std::path::Path) -> SessionFileAuth {
        SessionFileAuth::new(dir.join("session"))
    }

    #[test]
    fn sign_in_then_current_user_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let auth = auth_in(temp.path());

        assert_eq!(auth.current_user_id(), None);
        auth.sign_in("rider-1").expect("sign in");
        assert_eq!(auth.current_user_id(), Some("rider-1".to_string()));
    }

    #[test]
    fn sign_out_clears_the_session() {
        let temp = tempfile::tempdir().expect("tempdir");
        let auth = auth_in(temp.path());

        auth.sign_in("rider-1").expect("sign in");
        auth.sign_out().expect("sign out");
        assert_eq!(auth.current_user_id(), None);

        // signing out twice is not an error
        auth.sign_out().expect("sign out again");
    }

    #[test]
    fn malformed_session_reads_as_signed_out() {
        let temp = tempfile::tempdir().expect("tempdir");
        let auth = auth_in(temp.path());

        std::fs::write(temp.path().join("session"), "bad user/id\n").expect("write");
        assert_eq!(auth.current_user_id(), None);
    }

    #[test]
    fn sign_in_rejects_invalid_ids() {
        let temp = tempfile::tempdir().expect("tempdir");
        let auth = auth_in(temp.path());

        assert!(auth.sign_in("").is_err());
        assert!(auth.sign_in("a b").is_err());
        assert!(auth.sign_in("a/b").is_err());
    }
}
