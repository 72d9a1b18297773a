// HTTP handlers (controllers)

pub mod health;
pub mod problem_tracks;
pub mod register;
