//! Marketplace user: identity, credentials and validation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{ValidationErrors, messages};
use crate::id::UserId;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Persisted user record.
///
/// `password_hash` and `auth_token` are secrets; they never appear in a
/// serialized projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub auth_token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: UserId,
        email: String,
        password_hash: String,
        auth_token: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            auth_token,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an already-validated patch. The password arrives pre-hashed.
    pub fn apply(&mut self, patch: &UserPatch, password_hash: Option<String>, now: DateTime<Utc>) {
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        self.updated_at = now;
    }

    pub fn rotate_token(&mut self, token: String, now: DateTime<Utc>) {
        self.auth_token = token;
        self.updated_at = now;
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }
}

/// Signup payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

/// Signup payload that passed validation. The password is still plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUser {
    pub email: String,
    pub password: String,
}

impl UserInput {
    pub fn validate(self) -> Result<ValidUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = self.email.as_deref().map(normalize_email).unwrap_or_default();
        check_email(&email, &mut errors);

        let password = self.password.unwrap_or_default();
        if password.is_empty() {
            errors.add("password", messages::BLANK);
        } else {
            check_password(&password, self.password_confirmation.as_deref(), &mut errors);
        }

        errors.into_result(ValidUser { email, password })
    }
}

/// Partial self-service update; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserChanges {
    pub fn validate(self) -> Result<UserPatch, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = self.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            check_email(email, &mut errors);
        }

        if let Some(password) = &self.password {
            if password.is_empty() {
                errors.add("password", messages::BLANK);
            } else {
                check_password(password, self.password_confirmation.as_deref(), &mut errors);
            }
        }

        errors.into_result(UserPatch {
            email,
            password: self.password,
        })
    }
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

fn check_email(email: &str, errors: &mut ValidationErrors) {
    if email.is_empty() {
        errors.add("email", messages::BLANK);
    } else if !is_valid_email(email) {
        errors.add("email", messages::INVALID);
    }
}

fn check_password(password: &str, confirmation: Option<&str>, errors: &mut ValidationErrors) {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.add("password", messages::PASSWORD_TOO_SHORT);
    }
    if let Some(confirmation) = confirmation {
        if confirmation != password {
            errors.add("password_confirmation", messages::CONFIRMATION_MISMATCH);
        }
    }
}
