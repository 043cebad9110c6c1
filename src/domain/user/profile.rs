//! User profile - the small set of user-editable fields.

use crate::domain::foundation::{Timestamp, UserId, ValidationError};

/// Maximum display name length, in characters.
pub const DISPLAY_NAME_MAX_CHARS: usize = 150;

/// Maximum bio length, in characters.
pub const BIO_MAX_CHARS: usize = 1000;

/// Profile fields owned by a user.
///
/// A user who never saved a profile has an implicit empty one; `updated_at`
/// is `None` until the first save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    display_name: Option<String>,
    bio: Option<String>,
    pub updated_at: Option<Timestamp>,
}

/// Requested field changes.
///
/// The outer `Option` says whether a field is touched at all, the inner one
/// whether it is set or cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub display_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
}

impl ProfileChanges {
    /// Full replacement: every field is written, absent ones are cleared.
    pub fn replace_all(display_name: Option<String>, bio: Option<String>) -> Self {
        Self {
            display_name: Some(display_name),
            bio: Some(bio),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.bio.is_none()
    }
}

impl UserProfile {
    /// Empty profile for a user with no stored row.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            display_name: None,
            bio: None,
            updated_at: None,
        }
    }

    /// Rebuilds a profile from storage without re-validating.
    pub fn reconstitute(
        user_id: UserId,
        display_name: Option<String>,
        bio: Option<String>,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            user_id,
            display_name,
            bio,
            updated_at: Some(updated_at),
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    /// Applies changes after validating all of them.
    ///
    /// Nothing is modified when any field fails validation.
    pub fn apply(&mut self, changes: ProfileChanges) -> Result<(), ValidationError> {
        let display_name = changes
            .display_name
            .map(|v| normalize_field("display_name", v, DISPLAY_NAME_MAX_CHARS))
            .transpose()?;
        let bio = changes
            .bio
            .map(|v| normalize_field("bio", v, BIO_MAX_CHARS))
            .transpose()?;

        if let Some(display_name) = display_name {
            self.display_name = display_name;
        }
        if let Some(bio) = bio {
            self.bio = bio;
        }
        self.updated_at = Some(Timestamp::now());
        Ok(())
    }
}

/// Trims the value, maps blank to `None` and enforces the length limit.
fn normalize_field(
    field: &str,
    value: Option<String>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let len = trimmed.chars().count();
    if len > max {
        return Err(ValidationError::too_long(field, max, len));
    }
    Ok(Some(trimmed.to_string()))
}
