// Registration wizard module
// Step state machine, draft form and the port used to submit it

#![allow(clippy::module_inception)]

pub mod api;
pub mod step;
pub mod wizard;

// Re-export main types for convenience
pub use api::{ApiReply, ClientError, RegistrationApi};
pub use step::WizardStep;
pub use wizard::{MemberField, RegistrationForm, RegistrationWizard, SubmitOutcome};
