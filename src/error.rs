use thiserror::Error;

/// Failures surfaced to the calling layer. The first group is
/// recoverable by the caller and leaves the store untouched; `Storage`
/// wraps persistence failures from the data directory.
#[derive(Debug, Error)]
pub enum Error {
    #[error("end time must be after start time")]
    EndNotAfterStart,

    #[error("the room is already booked during the requested time")]
    SlotTaken,

    #[error("booking not found")]
    BookingNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("email already in use")]
    EmailTaken,

    #[error("display name already in use")]
    DisplayNameTaken,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
