use crate::error::Result;
use crate::leaderboard::{self, LeaderboardEntry};
use crate::models::TrainingSession;
use crate::store::Store;

impl Store {
    /// Full training-session collection in store order.
    pub async fn training_sessions(&self) -> Result<Vec<TrainingSession>> {
        self.execute(|data| Ok(data.sessions.clone())).await
    }

    /// Ranked per-name totals over every recorded training session.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        self.execute(|data| Ok(leaderboard::rank(&data.sessions)))
            .await
    }
}
