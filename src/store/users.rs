use chrono::Utc;
use log::info;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Role, User, UserEdit};
use crate::store::Store;

/// A user row for the admin overview, decorated with booking and
/// training counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithStats {
    #[serde(flatten)]
    pub user: User,
    pub total_bookings: usize,
    pub upcoming_bookings: usize,
    pub completed_trainings: usize,
    /// Bookings whose start has passed without being marked complete.
    pub not_finalized_trainings: usize,
}

impl Store {
    /// Full user collection in store order.
    pub async fn users(&self) -> Result<Vec<User>> {
        self.execute(|data| Ok(data.users.clone())).await
    }

    pub async fn user(&self, user_id: i64) -> Result<User> {
        self.execute(move |data| {
            data.users
                .iter()
                .find(|u| u.id == user_id)
                .cloned()
                .ok_or(Error::UserNotFound)
        })
        .await
    }

    /// Add an account (the approval workflow upstream decides who gets
    /// here). Email and display name must be unused.
    pub async fn add_user(&self, user: User) -> Result<User> {
        self.execute(move |data| {
            if data.users.iter().any(|u| u.email == user.email) {
                return Err(Error::EmailTaken);
            }
            if data.users.iter().any(|u| u.display_name == user.display_name) {
                return Err(Error::DisplayNameTaken);
            }

            data.users.push(user.clone());
            data.persist_users()?;

            info!("Added user {} ({})", user.id, user.display_name);
            Ok(user)
        })
        .await
    }

    pub async fn set_role(&self, user_id: i64, role: Role) -> Result<()> {
        self.execute(move |data| {
            let user = data
                .users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or(Error::UserNotFound)?;

            user.role = role;
            data.persist_users()?;

            info!("Set role of user {} to {}", user_id, role.as_str());
            Ok(())
        })
        .await
    }

    pub async fn set_humor(&self, user_id: i64, humor: bool) -> Result<()> {
        self.execute(move |data| {
            let user = data
                .users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or(Error::UserNotFound)?;

            user.humor = humor;
            data.persist_users()?;
            Ok(())
        })
        .await
    }

    /// Overwrite a user's profile. Email and display name must not be
    /// taken by a different user; the user's own current values pass.
    pub async fn edit_user(&self, user_id: i64, changes: UserEdit) -> Result<User> {
        self.execute(move |data| {
            if !data.users.iter().any(|u| u.id == user_id) {
                return Err(Error::UserNotFound);
            }
            if data
                .users
                .iter()
                .any(|u| u.email == changes.email && u.id != user_id)
            {
                return Err(Error::EmailTaken);
            }
            if data
                .users
                .iter()
                .any(|u| u.display_name == changes.display_name && u.id != user_id)
            {
                return Err(Error::DisplayNameTaken);
            }

            let user = data
                .users
                .iter_mut()
                .find(|u| u.id == user_id)
                .ok_or(Error::UserNotFound)?;

            user.first_name = changes.first_name;
            user.last_name = changes.last_name;
            user.display_name = changes.display_name;
            user.email = changes.email;
            user.humor = changes.humor;
            user.role = changes.role;
            let updated = user.clone();

            data.persist_users()?;

            info!("Edited user {}", user_id);
            Ok(updated)
        })
        .await
    }

    /// Remove an account together with all of its bookings and
    /// training sessions.
    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        self.execute(move |data| {
            let before = data.users.len();
            data.users.retain(|u| u.id != user_id);
            if data.users.len() == before {
                return Err(Error::UserNotFound);
            }

            data.bookings.retain(|b| b.user_id != user_id);
            data.sessions.retain(|s| s.user_id != user_id);
            data.persist_all()?;

            info!("Deleted user {} and their bookings and sessions", user_id);
            Ok(())
        })
        .await
    }

    /// Per-user booking and training counts for the admin overview.
    pub async fn users_with_stats(&self) -> Result<Vec<UserWithStats>> {
        self.execute(|data| {
            let now = Utc::now();
            let stats = data
                .users
                .iter()
                .map(|user| {
                    let total_bookings = data
                        .bookings
                        .iter()
                        .filter(|b| b.user_id == user.id)
                        .count();
                    let upcoming_bookings = data
                        .bookings
                        .iter()
                        .filter(|b| b.user_id == user.id && b.end_time > now)
                        .count();
                    let completed_trainings = data
                        .sessions
                        .iter()
                        .filter(|s| s.user_id == user.id)
                        .count();
                    let not_finalized_trainings = data
                        .bookings
                        .iter()
                        .filter(|b| b.user_id == user.id && !b.completed && b.start_time <= now)
                        .count();

                    UserWithStats {
                        user: user.clone(),
                        total_bookings,
                        upcoming_bookings,
                        completed_trainings,
                        not_finalized_trainings,
                    }
                })
                .collect();

            Ok(stats)
        })
        .await
    }
}
