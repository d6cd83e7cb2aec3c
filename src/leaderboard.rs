//! Leaderboard aggregation over training sessions.

use serde::{Deserialize, Serialize};

use crate::models::TrainingSession;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub display_name: String,
    pub total_distance: f64,
    pub total_duration: i64,
}

/// Fold sessions into per-name totals, then rank by total distance,
/// highest first. Grouping is by display name, so renaming a user
/// merges their history under the new name. The sort is stable: equal
/// distances keep their first-appearance order.
pub fn rank(sessions: &[TrainingSession]) -> Vec<LeaderboardEntry> {
    let mut totals: Vec<LeaderboardEntry> = Vec::new();

    for session in sessions {
        match totals
            .iter_mut()
            .find(|entry| entry.display_name == session.display_name)
        {
            Some(entry) => {
                entry.total_distance += session.distance;
                entry.total_duration += session.duration;
            }
            None => totals.push(LeaderboardEntry {
                display_name: session.display_name.clone(),
                total_distance: session.distance,
                total_duration: session.duration,
            }),
        }
    }

    totals.sort_by(|a, b| b.total_distance.total_cmp(&a.total_distance));
    totals
}
