//! HTTP DTOs for profile endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::user::{ProfileChanges, UserProfile};

/// Body of `PUT /profile/`. Absent fields are cleared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplaceProfileRequest {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl From<ReplaceProfileRequest> for ProfileChanges {
    fn from(req: ReplaceProfileRequest) -> Self {
        ProfileChanges::replace_all(req.display_name, req.bio)
    }
}

/// Body of `PATCH /profile/`.
///
/// An absent field is left alone; an explicit `null` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchProfileRequest {
    #[serde(default, deserialize_with = "present")]
    pub display_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub bio: Option<Option<String>>,
}

impl From<PatchProfileRequest> for ProfileChanges {
    fn from(req: PatchProfileRequest) -> Self {
        ProfileChanges {
            display_name: req.display_name,
            bio: req.bio,
        }
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub updated_at: Option<String>,
}

impl ProfileResponse {
    pub fn new(profile: &UserProfile, email: impl Into<String>) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            email: email.into(),
            display_name: profile.display_name().map(str::to_string),
            bio: profile.bio().map(str::to_string),
            updated_at: profile.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}
