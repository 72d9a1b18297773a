// Infrastructure layer module
// Contains adapters for external services: the spreadsheet webhook and the
// registration API client
// Follows Hexagonal Architecture

pub mod client;
pub mod repositories;
