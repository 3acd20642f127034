use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to start tracking a participant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 3,
        max = 24,
        message = "Handle must be between 3 and 24 characters"
    ))]
    #[validate(custom(function = "validate_handle"))]
    pub handle: String,

    #[validate(length(max = 64, message = "Display name must be at most 64 characters"))]
    pub display_name: Option<String>,
}

impl CreateUserRequest {
    pub fn new(handle: impl Into<String>, display_name: Option<String>) -> Self {
        Self {
            handle: handle.into(),
            display_name: display_name.filter(|name| !name.trim().is_empty()),
        }
    }
}

/// Request to change or clear a participant's display name.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 64, message = "Display name must be at most 64 characters"))]
    pub display_name: Option<String>,
}

impl UpdateUserRequest {
    pub fn new(display_name: Option<String>) -> Self {
        Self {
            display_name: display_name.filter(|name| !name.trim().is_empty()),
        }
    }
}

// Handles are matched verbatim against standings, so only the provider's own
// character set is accepted.
fn validate_handle(handle: &str) -> Result<(), validator::ValidationError> {
    let valid = handle
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("invalid_handle");
        error.message = Some("Handle may only contain letters, digits, '_', '-' and '.'".into());
        Err(error)
    }
}
