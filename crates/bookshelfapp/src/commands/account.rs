use crate::commands::{CmdMessage, CmdResult};
use crate::error::{BookshelfError, Result};
use crate::store::auth::AuthProvider;

pub const SIGN_UP_EMPTY: &str = "Email, password and username cannot be empty!";
pub const SIGN_IN_EMPTY: &str = "User is not found. Please sign in.";

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Create an account, set its display name, and leave it signed in.
pub fn sign_up<A: AuthProvider>(
    auth: &A,
    email: &str,
    password: &str,
    display_name: &str,
) -> Result<CmdResult> {
    if blank(email) || blank(password) || blank(display_name) {
        return Err(BookshelfError::Api(SIGN_UP_EMPTY.to_string()));
    }

    auth.create_user(email, password)?;

    let mut result = CmdResult::default();
    // The account already exists at this point; a failed rename is only reported.
    match auth.update_display_name(display_name.trim()) {
        Ok(_) => result.add_message(CmdMessage::success("User added successfully")),
        Err(e) => {
            tracing::warn!(error = %e, "display name update failed");
            result.add_message(CmdMessage::warning(format!(
                "Account created, but the username could not be set: {}",
                e
            )))
        }
    }
    Ok(result)
}

pub fn sign_in<A: AuthProvider>(auth: &A, email: &str, password: &str) -> Result<CmdResult> {
    if blank(email) || blank(password) {
        return Err(BookshelfError::Api(SIGN_IN_EMPTY.to_string()));
    }

    let user = auth.sign_in(email, password)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Welcome back {}",
        user.display_name.as_deref().unwrap_or(&user.email)
    )));
    Ok(result)
}

pub fn sign_out<A: AuthProvider>(auth: &A) -> Result<CmdResult> {
    auth.sign_out()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info("Signed out"));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryAuth;

    #[test]
    fn sign_up_requires_all_fields() {
        let auth = InMemoryAuth::new();
        for (email, password, name) in [
            ("", "secret1", "Alice"),
            ("alice@example.com", "", "Alice"),
            ("alice@example.com", "secret1", "  "),
        ] {
            match sign_up(&auth, email, password, name) {
                Err(BookshelfError::Api(msg)) => assert_eq!(msg, SIGN_UP_EMPTY),
                other => panic!("Expected Api error, got {:?}", other),
            }
        }
        assert!(auth.current_user().unwrap().is_none());
    }

    #[test]
    fn sign_up_sets_display_name_and_signs_in() {
        let auth = InMemoryAuth::new();
        let result = sign_up(&auth, "alice@example.com", "secret1", "Alice").unwrap();
        assert_eq!(result.messages[0].content, "User added successfully");

        let user = auth.current_user().unwrap().unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn sign_in_greets_by_display_name() {
        let auth = InMemoryAuth::new();
        sign_up(&auth, "alice@example.com", "secret1", "Alice").unwrap();
        sign_out(&auth).unwrap();

        let result = sign_in(&auth, "alice@example.com", "secret1").unwrap();
        assert_eq!(result.messages[0].content, "Welcome back Alice");
    }

    #[test]
    fn sign_in_rejects_blank_and_wrong_credentials() {
        let auth = InMemoryAuth::new();
        sign_up(&auth, "alice@example.com", "secret1", "Alice").unwrap();
        sign_out(&auth).unwrap();

        match sign_in(&auth, "", "secret1") {
            Err(BookshelfError::Api(msg)) => assert_eq!(msg, SIGN_IN_EMPTY),
            other => panic!("Expected Api error, got {:?}", other),
        }
        assert!(matches!(
            sign_in(&auth, "alice@example.com", "nope-nope"),
            Err(BookshelfError::Auth(_))
        ));
    }
}
