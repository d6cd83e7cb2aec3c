mod booking;
mod training;
mod user;

pub use booking::Booking;
pub use training::TrainingSession;
pub use user::{Identity, Role, User, UserEdit};
