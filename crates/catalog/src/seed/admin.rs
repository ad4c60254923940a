//! Admin provisioning from environment settings.
//!
//! Creates at most one administrator account and never overwrites an
//! existing one. Every outcome is non-fatal: the caller gets a
//! [`ProvisionOutcome`] and the seeding run continues.

use std::fmt;

use chrono::Utc;
use secrecy::ExposeSecret;
use tracing::{error, info, instrument, warn};

use orebi_core::{Email, UserId, UserRole};

use crate::config::{AdminSettings, DEFAULT_ADMIN_NAME};
use crate::db::{CatalogStore, RepositoryError};
use crate::models::UserDocument;
use crate::password;

/// How the provisioning step reports its result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Log the plaintext password after creating the account.
    pub reveal_password: bool,
    /// Login link to show the operator.
    pub login_url: Option<String>,
}

/// Terminal state of one provisioning attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// Email or password not configured.
    Skipped,
    /// Configured values failed validation.
    Rejected { reason: String },
    /// An account with this email is already present. Left untouched.
    AlreadyExists { email: Email },
    /// A new admin account was stored.
    Created { id: UserId, email: Email },
    /// Hashing or persistence failed.
    Failed { reason: String },
}

impl ProvisionOutcome {
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped => f.write_str("skipped (ADMIN_EMAIL and ADMIN_PASSWORD not set)"),
            Self::Rejected { reason } => write!(f, "rejected ({reason})"),
            Self::AlreadyExists { email } => write!(f, "already exists ({email})"),
            Self::Created { email, .. } => write!(f, "created ({email})"),
            Self::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

/// Create the configured admin account if it does not exist yet.
///
/// The email is trimmed and lowercased before lookup and insert, the
/// password is stored only as a bcrypt hash.
#[instrument(skip_all)]
pub async fn provision<S: CatalogStore + ?Sized>(
    store: &S,
    settings: &AdminSettings,
    options: &ProvisionOptions,
) -> ProvisionOutcome {
    let (Some(raw_email), Some(password)) = (settings.email.as_deref(), settings.password.as_ref())
    else {
        info!("Skipping admin creation, set ADMIN_EMAIL and ADMIN_PASSWORD to enable it");
        return ProvisionOutcome::Skipped;
    };

    if let Err(e) = password::validate_password(password) {
        warn!(error = %e, "ADMIN_PASSWORD rejected");
        return ProvisionOutcome::Rejected {
            reason: e.to_string(),
        };
    }

    let email = match Email::parse(raw_email) {
        Ok(email) => email,
        Err(e) => {
            warn!(error = %e, "ADMIN_EMAIL rejected");
            return ProvisionOutcome::Rejected {
                reason: format!("invalid email: {e}"),
            };
        }
    };

    match store.user_exists(&email).await {
        Ok(true) => return already_exists(email, options),
        Ok(false) => {}
        Err(e) => return failed(&e.to_string()),
    }

    let hash = match password::hash_password(password) {
        Ok(hash) => hash,
        Err(e) => return failed(&e.to_string()),
    };

    let name = match settings.name.trim() {
        "" => DEFAULT_ADMIN_NAME.to_owned(),
        trimmed => trimmed.to_owned(),
    };
    let now = Utc::now();
    let user = UserDocument {
        id: None,
        name,
        email: email.clone(),
        password: hash,
        role: UserRole::Admin,
        is_active: true,
        created_at: now,
        updated_at: now,
    };

    let stored = match store.insert_user(user).await {
        Ok(stored) => stored,
        Err(RepositoryError::Conflict(_)) => return already_exists(email, options),
        Err(e) => return failed(&e.to_string()),
    };
    let Some(id) = stored.user_id() else {
        return failed("store returned the user without an id");
    };

    info!(email = %email, user_id = %id, "Admin created");
    if let Some(url) = &options.login_url {
        info!(url = %url, "Login");
    }
    if options.reveal_password {
        info!(email = %email, password = %password.expose_secret(), "Admin credentials");
        warn!("Change the admin password after first login!");
    }

    ProvisionOutcome::Created { id, email }
}

fn already_exists(email: Email, options: &ProvisionOptions) -> ProvisionOutcome {
    info!(email = %email, "Admin already exists, leaving it unchanged");
    if let Some(url) = &options.login_url {
        info!(url = %url, "Login");
    }
    ProvisionOutcome::AlreadyExists { email }
}

fn failed(reason: &str) -> ProvisionOutcome {
    error!(error = reason, "Admin creation failed");
    ProvisionOutcome::Failed {
        reason: reason.to_owned(),
    }
}
