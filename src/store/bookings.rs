use chrono::{DateTime, Utc};
use log::info;

use crate::error::{Error, Result};
use crate::models::{Booking, Identity, TrainingSession};
use crate::schedule;
use crate::store::Store;

impl Store {
    /// Reserve a time slot for the acting user. The validation,
    /// conflict scan and append all run as one task on the store
    /// worker, so a concurrent request cannot slip an overlapping
    /// booking in between the check and the write.
    pub async fn create_booking(
        &self,
        actor: &Identity,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Booking> {
        let actor = actor.clone();
        self.execute(move |data| {
            schedule::validate_time_range(start_time, end_time)?;

            if let Some(existing) = schedule::find_conflict(&data.bookings, start_time, end_time) {
                info!(
                    "Rejected booking for user {}: slot taken by booking {}",
                    actor.user_id, existing.id
                );
                return Err(Error::SlotTaken);
            }

            let booking = Booking {
                id: schedule::next_booking_id(&data.bookings, Utc::now()),
                user_id: actor.user_id,
                display_name: actor.display_name,
                start_time,
                end_time,
                completed: false,
                actual_duration: None,
                distance: None,
            };

            data.bookings.push(booking.clone());
            data.persist_bookings()?;

            info!("Created booking {} for user {}", booking.id, booking.user_id);
            Ok(booking)
        })
        .await
    }

    /// Mark one of the acting user's bookings complete and record the
    /// reported metrics as a training session. A booking owned by
    /// someone else looks exactly like a missing one. Metrics are
    /// stored as supplied; there is no range check.
    pub async fn complete_booking(
        &self,
        actor: &Identity,
        booking_id: i64,
        duration: i64,
        distance: f64,
    ) -> Result<TrainingSession> {
        let actor = actor.clone();
        self.execute(move |data| {
            let booking = data
                .bookings
                .iter_mut()
                .find(|b| b.id == booking_id && b.user_id == actor.user_id)
                .ok_or(Error::BookingNotFound)?;

            booking.completed = true;
            booking.actual_duration = Some(duration);
            booking.distance = Some(distance);

            let session = TrainingSession {
                user_id: actor.user_id,
                display_name: actor.display_name,
                duration,
                distance,
                date: Utc::now(),
            };
            data.sessions.push(session.clone());

            data.persist_bookings_and_sessions()?;

            info!(
                "Completed booking {} for user {}",
                booking_id, session.user_id
            );
            Ok(session)
        })
        .await
    }

    /// The acting user's bookings that have not yet ended, soonest
    /// first.
    pub async fn bookings_for_user(&self, user_id: i64) -> Result<Vec<Booking>> {
        self.execute(move |data| {
            let now = Utc::now();
            let mine: Vec<Booking> = data
                .bookings
                .iter()
                .filter(|b| b.user_id == user_id)
                .cloned()
                .collect();
            Ok(schedule::upcoming(&mine, now))
        })
        .await
    }

    /// Every booking that has not yet ended, soonest first.
    pub async fn upcoming_bookings(&self) -> Result<Vec<Booking>> {
        self.execute(|data| Ok(schedule::upcoming(&data.bookings, Utc::now())))
            .await
    }

    /// Full booking collection in store order.
    pub async fn bookings(&self) -> Result<Vec<Booking>> {
        self.execute(|data| Ok(data.bookings.clone())).await
    }
}
