//! Booking and training-log core for a shared rowing room.
//!
//! Members reserve non-overlapping time slots, mark bookings complete
//! with recorded training metrics, and appear on a distance
//! leaderboard; administrators manage accounts and roles. State lives
//! in flat JSON documents under a data directory, owned by a single
//! [`Store`] worker thread. Routing, authentication and rendering are
//! the caller's concern: every operation takes already-authenticated
//! identity and already-parsed timestamps.

mod error;
pub mod leaderboard;
mod models;
pub mod schedule;
mod store;

pub use error::{Error, Result};
pub use leaderboard::LeaderboardEntry;
pub use models::{Booking, Identity, Role, TrainingSession, User, UserEdit};
pub use store::{Store, UserWithStats};
