//! User management service
//!
//! Thin administrative CRUD over user accounts: registration happens out of
//! band, so this service only creates, lists, and removes accounts.

use tracing::{debug, info};

use crate::database::UserRepository;
use crate::models::user::{NewUser, User};
use crate::utils::errors::{EventHiveError, Result};

/// User management service
#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Register a new user account
    pub async fn create_user(&self, payload: NewUser) -> Result<User> {
        if self.users.exists_by_email(&payload.email).await? {
            return Err(EventHiveError::Conflict("Email must be unique".to_string()));
        }

        let user = self.users.create(payload).await?;
        info!(user_id = user.id, "User created");
        Ok(user)
    }

    /// List users, optionally restricted to a set of ids
    pub async fn get_users(
        &self,
        ids: Option<&[i64]>,
        from: i64,
        size: i64,
    ) -> Result<Vec<User>> {
        debug!(from = from, size = size, "Listing users");
        self.users.list(ids, size, from).await
    }

    /// Remove a user account
    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        let removed = self.users.delete(user_id).await?;
        if !removed {
            return Err(EventHiveError::UserNotFound { user_id });
        }
        info!(user_id = user_id, "User deleted");
        Ok(())
    }
}
