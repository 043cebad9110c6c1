//! User module - profile fields editable by subscribed users.

mod profile;

pub use profile::{ProfileChanges, UserProfile, BIO_MAX_CHARS, DISPLAY_NAME_MAX_CHARS};
