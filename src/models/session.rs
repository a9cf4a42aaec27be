use crate::models::user::UserProfile;
use serde::{Deserialize, Serialize};

/// Authentication state of the single storefront profile
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub is_authenticated: bool,
    pub current_user: Option<UserProfile>,
}

impl Session {
    pub fn signed_in(profile: UserProfile) -> Self {
        Self {
            is_authenticated: true,
            current_user: Some(profile),
        }
    }
}
