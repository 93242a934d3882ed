use std::path::Path;

use colored::Colorize;
use inquire::Text;
use log::warn;
use validator::ValidateEmail;

use crate::{error::AppError, profile::User};

/// Menu entry that returns to the previous screen; never a valid id
pub const BACK_OPTION: &str = "back";

/// Maximum length for profile id
const MAX_ID_LENGTH: usize = 30;
/// Maximum length for Git username
const MAX_NAME_LENGTH: usize = 100;
/// Maximum length for Git email address
const MAX_EMAIL_LENGTH: usize = 100;

/// Prompts user for input until valid input is provided
pub fn prompt_until_valid<F>(prompt_message: &str, input_validation: F) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input: String = Text::new(prompt_message).prompt()?;
        match input_validation(&input) {
            Ok(_) => break Ok(input),
            Err(AppError::Validation(msg)) => println!("{}", msg.red()),
            Err(e) => return Err(e),
        }
    }
}

// Validate input helper functions

/// Validates profile id input
pub fn validate_input_id(id: &str, existing_users: &[User]) -> Result<(), AppError> {
    if id.is_empty() {
        Err(AppError::Validation("Id cannot be empty".to_string()))
    } else if id.len() > MAX_ID_LENGTH {
        Err(AppError::Validation(format!("Id too long (max {MAX_ID_LENGTH} characters)")))
    } else if id == BACK_OPTION {
        Err(AppError::Validation(format!("Id cannot be '{BACK_OPTION}'")))
    } else if id.chars().any(char::is_whitespace) {
        Err(AppError::Validation("Id cannot contain whitespace".to_string()))
    } else if existing_users.iter().any(|user| user.id == id) {
        Err(AppError::Validation("Id already exists".to_string()))
    } else {
        Ok(())
    }
}

/// Validates username input
pub fn validate_input_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        Err(AppError::Validation("Name cannot be empty".to_string()))
    } else if name.len() > MAX_NAME_LENGTH {
        Err(AppError::Validation(format!("Name too long (max {MAX_NAME_LENGTH} characters)")))
    } else {
        Ok(())
    }
}

/// Validates email input
pub fn validate_input_email(email: &str, existing_users: &[User]) -> Result<(), AppError> {
    if email.is_empty() {
        Err(AppError::Validation("Email cannot be empty".to_string()))
    } else if email.len() > MAX_EMAIL_LENGTH {
        Err(AppError::Validation(format!("Email too long (max {MAX_EMAIL_LENGTH} characters)")))
    } else if !email.validate_email() {
        Err(AppError::Validation("Invalid email format".to_string()))
    } else if existing_users.iter().any(|user| user.email == email) {
        Err(AppError::Validation("Email already exists".to_string()))
    } else {
        Ok(())
    }
}

/// Validates SSH private key path input
///
/// A path that does not exist yet is accepted with a warning.
pub fn validate_input_private_key(path: &str) -> Result<(), AppError> {
    if path.trim().is_empty() {
        return Err(AppError::Validation("Private key path cannot be empty".to_string()));
    }
    if path.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "Private key path cannot contain whitespace".to_string(),
        ));
    }
    if !Path::new(path).is_file() {
        warn!("private key '{path}' does not exist");
    }
    Ok(())
}

/// Validates GPG key input, which may be left empty
pub fn validate_input_gpg_key(key: &str) -> Result<(), AppError> {
    if key.chars().any(char::is_whitespace) {
        Err(AppError::Validation("GPG key cannot contain whitespace".to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing() -> Vec<User> {
        vec![User {
            id: "work".to_string(),
            name: "Alice".to_string(),
            email: "alice@work.com".to_string(),
            private_key: "/k/work".to_string(),
            gpg_key: String::new(),
        }]
    }

    #[test]
    fn test_validate_input_id() {
        let users = existing();
        assert!(validate_input_id("personal", &users).is_ok());
        assert!(validate_input_id("", &users).is_err());
        assert!(validate_input_id(BACK_OPTION, &users).is_err());
        assert!(validate_input_id("work", &users).is_err());
        assert!(validate_input_id("has space", &users).is_err());
        assert!(validate_input_id(&"x".repeat(MAX_ID_LENGTH + 1), &users).is_err());
    }

    #[test]
    fn test_validate_input_name() {
        assert!(validate_input_name("Alice Smith").is_ok());
        assert!(validate_input_name("   ").is_err());
        assert!(validate_input_name(&"x".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_input_email() {
        let users = existing();
        assert!(validate_input_email("alice@home.com", &users).is_ok());
        assert!(validate_input_email("", &users).is_err());
        assert!(validate_input_email("not-an-email", &users).is_err());
        assert!(validate_input_email("alice@work.com", &users).is_err());
    }

    #[test]
    fn test_validate_input_private_key() {
        assert!(validate_input_private_key("/definitely/missing/id_ed25519").is_ok());
        assert!(validate_input_private_key("").is_err());
        assert!(validate_input_private_key("/k/with space").is_err());
    }

    #[test]
    fn test_validate_input_gpg_key() {
        assert!(validate_input_gpg_key("").is_ok());
        assert!(validate_input_gpg_key("3AA5C34371567BD2").is_ok());
        assert!(validate_input_gpg_key("3AA5 C343").is_err());
    }

    #[test]
    fn test_validation_errors_are_validation_variant() {
        assert!(matches!(
            validate_input_name(""),
            Err(AppError::Validation(_))
        ));
    }
}
