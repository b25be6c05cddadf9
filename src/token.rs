//! Personal access token storage
//!
//! Holds the single opaque bearer credential under the application config
//! directory, mirroring the reference behavior of one fixed key with
//! synchronous get/set/clear and no expiry handling. The credential is
//! always threaded through calls as an explicit [`Credential`] value;
//! nothing reads it ambiently.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TokenError;

const TOKEN_FILE: &str = "token";

/// An opaque bearer credential for the upstream wellness API
///
/// Debug output is redacted so the token never lands in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    /// Raw token value, for constructing the Authorization header
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Redacted form safe for logs and status output
    pub fn redacted(&self) -> String {
        crate::logging::redact(&self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential({})", self.redacted())
    }
}

/// File-backed store for the single credential
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at the platform config location (`<config_dir>/wellrs/token`)
    pub fn default_location() -> Result<Self, TokenError> {
        let base = dirs::config_dir().ok_or(TokenError::NoConfigDir)?;
        Ok(TokenStore {
            path: base.join("wellrs").join(TOKEN_FILE),
        })
    }

    /// Store at an explicit path (used by tests)
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored credential, if any
    pub fn get(&self) -> Result<Option<Credential>, TokenError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Credential::new(token)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(TokenError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Store the credential, replacing any previous one
    pub fn set(&self, credential: &Credential) -> Result<(), TokenError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| TokenError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, credential.expose()).map_err(|source| TokenError::Io {
            path: self.path.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|source| TokenError::Io {
                path: self.path.clone(),
                source,
            })?;
        }

        debug!(path = %self.path.display(), "stored credential");
        Ok(())
    }

    /// Remove the stored credential; succeeds if none was stored
    pub fn clear(&self) -> Result<(), TokenError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(TokenError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
