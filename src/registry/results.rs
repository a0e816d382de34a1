//! Registry result types
//!
//! The combined user + profile view returned by registration and lookup.

use serde::{Deserialize, Serialize};

use crate::storage::{ProfileRecord, UserRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub profile_picture: String,
}

/// A user joined with its profile. Never carries the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWithProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub profile: ProfileView,
}

impl UserWithProfile {
    pub fn assemble(user: UserRecord, profile: ProfileRecord) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            profile: ProfileView {
                profile_picture: profile.profile_picture_path,
            },
        }
    }
}
