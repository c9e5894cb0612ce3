//! Email/password accounts.
//!
//! [`AuthProvider`] is the contract the application consumes: who is signed
//! in, and under which display name. [`LocalAuth`] implements it over a
//! [`StorageBackend`], hashing passwords with Argon2id (PHC string format, so
//! parameters and salt travel with the hash).

use super::backend::StorageBackend;
use crate::error::{BookshelfError, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Stored account row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
}

/// The signed-in user as seen by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
}

impl From<&Account> for User {
    fn from(account: &Account) -> Self {
        Self {
            uid: account.uid.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
        }
    }
}

pub trait AuthProvider {
    /// Create an account and sign it in. No display name is set yet.
    fn create_user(&self, email: &str, password: &str) -> Result<User>;

    /// Set the display name of the signed-in user.
    fn update_display_name(&self, display_name: &str) -> Result<User>;

    fn sign_in(&self, email: &str, password: &str) -> Result<User>;

    fn sign_out(&self) -> Result<()>;

    fn current_user(&self) -> Result<Option<User>>;
}

pub struct LocalAuth<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> LocalAuth<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BookshelfError::Auth(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| BookshelfError::Auth(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(BookshelfError::Auth(e.to_string())),
    }
}

impl<B: StorageBackend> AuthProvider for LocalAuth<B> {
    fn create_user(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        if !email.contains('@') {
            return Err(BookshelfError::Auth(
                "The email address is badly formatted.".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(BookshelfError::Auth(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let mut accounts = self.backend.load_accounts()?;
        if accounts.iter().any(|a| a.email == email) {
            return Err(BookshelfError::Auth(
                "The email address is already in use by another account.".to_string(),
            ));
        }

        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email,
            display_name: None,
            password_hash: hash_password(password)?,
        };
        let user = User::from(&account);
        accounts.push(account);
        self.backend.save_accounts(&accounts)?;
        self.backend.save_session(Some(&user.uid))?;
        tracing::debug!(uid = %user.uid, "account created");
        Ok(user)
    }

    fn update_display_name(&self, display_name: &str) -> Result<User> {
        let uid = self
            .backend
            .load_session()?
            .ok_or(BookshelfError::NotSignedIn)?;
        let mut accounts = self.backend.load_accounts()?;
        let account = accounts
            .iter_mut()
            .find(|a| a.uid == uid)
            .ok_or(BookshelfError::NotSignedIn)?;
        account.display_name = Some(display_name.to_string());
        let user = User::from(&*account);
        self.backend.save_accounts(&accounts)?;
        Ok(user)
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let email = normalize_email(email);
        let accounts = self.backend.load_accounts()?;
        let invalid = || {
            BookshelfError::Auth("The email address or password is incorrect.".to_string())
        };
        let account = accounts
            .iter()
            .find(|a| a.email == email)
            .ok_or_else(invalid)?;
        if !verify_password(password, &account.password_hash)? {
            return Err(invalid());
        }
        self.backend.save_session(Some(&account.uid))?;
        tracing::debug!(uid = %account.uid, "signed in");
        Ok(User::from(account))
    }

    fn sign_out(&self) -> Result<()> {
        self.backend.save_session(None)
    }

    fn current_user(&self) -> Result<Option<User>> {
        let Some(uid) = self.backend.load_session()? else {
            return Ok(None);
        };
        let accounts = self.backend.load_accounts()?;
        // A session pointing at a vanished account counts as signed out.
        Ok(accounts.iter().find(|a| a.uid == uid).map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn make_auth() -> LocalAuth<MemBackend> {
        LocalAuth::with_backend(MemBackend::new())
    }

    #[test]
    fn create_user_signs_in_without_display_name() {
        let auth = make_auth();
        let user = auth.create_user("alice@example.com", "secret1").unwrap();
        assert_eq!(user.display_name, None);
        assert_eq!(auth.current_user().unwrap(), Some(user));
    }

    #[test]
    fn password_is_not_stored_in_clear() {
        let auth = make_auth();
        auth.create_user("alice@example.com", "secret1").unwrap();
        let accounts = auth.backend().load_accounts().unwrap();
        assert!(accounts[0].password_hash.starts_with("$argon2id$"));
        assert!(!accounts[0].password_hash.contains("secret1"));
    }

    #[test]
    fn update_display_name_applies_to_current_user() {
        let auth = make_auth();
        auth.create_user("alice@example.com", "secret1").unwrap();
        let user = auth.update_display_name("Alice").unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
        assert_eq!(
            auth.current_user().unwrap().unwrap().display_name.as_deref(),
            Some("Alice")
        );
    }

    #[test]
    fn update_display_name_requires_session() {
        let auth = make_auth();
        assert!(matches!(
            auth.update_display_name("Alice"),
            Err(BookshelfError::NotSignedIn)
        ));
    }

    #[test]
    fn duplicate_email_rejected_case_insensitively() {
        let auth = make_auth();
        auth.create_user("alice@example.com", "secret1").unwrap();
        assert!(matches!(
            auth.create_user("Alice@Example.com", "secret2"),
            Err(BookshelfError::Auth(_))
        ));
    }

    #[test]
    fn weak_password_and_bad_email_rejected() {
        let auth = make_auth();
        assert!(auth.create_user("alice@example.com", "123").is_err());
        assert!(auth.create_user("not-an-email", "secret1").is_err());
    }

    #[test]
    fn sign_in_round_trip() {
        let auth = make_auth();
        auth.create_user("alice@example.com", "secret1").unwrap();
        auth.sign_out().unwrap();
        assert_eq!(auth.current_user().unwrap(), None);

        assert!(auth.sign_in("alice@example.com", "wrong-pass").is_err());
        assert!(auth.sign_in("bob@example.com", "secret1").is_err());

        let user = auth.sign_in(" alice@example.com ", "secret1").unwrap();
        assert_eq!(user.email, "alice@example.com");
        assert!(auth.current_user().unwrap().is_some());
    }
}
