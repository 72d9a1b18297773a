// Ports to storage owned outside this service

pub mod registration_sink;

pub use registration_sink::{RegistrationSink, RelayAck, RelayError, RelayResult};
