//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{email::Email, user_id::UserId, user_password::UserPassword};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, lower-cased
    pub email: Email,
    pub password_hash: UserPassword,
    /// Accepted answers count; only ever incremented
    pub karma: i32,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: Email, password_hash: UserPassword) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            password_hash,
            karma: 0,
            created_at: Utc::now(),
        }
    }

    pub fn award_karma(&mut self) {
        self.karma = self.karma.saturating_add(1);
    }
}
