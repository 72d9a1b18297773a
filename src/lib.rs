//! Team registration service
//!
//! A four-step registration wizard and the endpoint it submits to. Both
//! sides share one set of validation rules; the endpoint relays accepted
//! registrations to a spreadsheet webhook.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
