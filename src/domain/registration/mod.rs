// Registration domain module
// Shared validation rules, value objects and the validated aggregate

#![allow(clippy::module_inception)]

pub mod catalog;
pub mod registration;
pub mod rules;
pub mod validation;
pub mod value_objects;

// Re-export main types for convenience
pub use catalog::{ProblemCatalog, ProblemTracksResponse};
pub use registration::{
    Member, Registration, SheetRecord, Submission, SubmissionMember, SubmissionResponse,
};
pub use rules::{Field, FieldErrors, Validation};
pub use validation::validate_submission;
