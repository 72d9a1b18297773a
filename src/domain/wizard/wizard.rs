use crate::domain::registration::rules::{
    self, Field, FieldErrors, MAX_ADDITIONAL_MEMBERS, MIN_ADDITIONAL_MEMBERS, MSG_EMAIL_PROMPT,
    MSG_PHONE_INVALID, MSG_REQUIRED, MSG_TOO_FEW_MEMBERS, MSG_TOO_MANY_MEMBERS, TEAM_SIZE_MIN,
};
use crate::domain::registration::{
    ProblemCatalog, Submission, SubmissionMember, SubmissionResponse,
};

use super::api::RegistrationApi;
use super::step::WizardStep;

/// Rows shown when the wizard opens
const INITIAL_MEMBER_ROWS: usize = 2;

/// Editable member row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberField {
    Name,
    Email,
}

/// Draft registration as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub team_name: String,
    pub team_leader_name: String,
    pub team_leader_email: String,
    pub team_leader_phone: String,
    pub team_size: u8,
    pub problem_track: String,
    pub members: Vec<SubmissionMember>,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self {
            team_name: String::new(),
            team_leader_name: String::new(),
            team_leader_email: String::new(),
            team_leader_phone: String::new(),
            team_size: TEAM_SIZE_MIN,
            problem_track: String::new(),
            members: vec![SubmissionMember::default(); INITIAL_MEMBER_ROWS],
        }
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Submission is only possible from the review step
    NotReady,
    /// Local validation failed; see the wizard's errors
    Invalid,
    /// The endpoint accepted the registration
    Registered { team_id: Option<String> },
    /// Message for the blocking alert shown to the user
    Failed { alert: String },
}

/// Four-step registration wizard
///
/// Holds the draft in memory, validates each step before moving forward and
/// sends exactly one request on submit.
///
/// # Example
/// ```
/// use teamreg::domain::registration::ProblemCatalog;
/// use teamreg::domain::wizard::{RegistrationWizard, WizardStep};
///
/// let mut wizard = RegistrationWizard::new(ProblemCatalog::new(["AI"]));
/// assert!(!wizard.advance());
/// assert_eq!(wizard.step(), WizardStep::TeamInfo);
///
/// wizard.set_team_name("Alpha");
/// wizard.set_team_leader_name("A");
/// wizard.set_team_leader_email("a@b.com");
/// wizard.set_team_leader_phone("9876543210");
/// assert!(wizard.advance());
/// assert_eq!(wizard.step(), WizardStep::ProblemTrack);
/// ```
#[derive(Debug, Clone)]
pub struct RegistrationWizard {
    step: WizardStep,
    form: RegistrationForm,
    errors: FieldErrors,
    is_submitting: bool,
    show_success: bool,
    catalog: ProblemCatalog,
}

impl RegistrationWizard {
    pub fn new(catalog: ProblemCatalog) -> Self {
        Self {
            step: WizardStep::TeamInfo,
            form: RegistrationForm::default(),
            errors: FieldErrors::new(),
            is_submitting: false,
            show_success: false,
            catalog,
        }
    }

    // ===== Getters =====

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn show_success(&self) -> bool {
        self.show_success
    }

    pub fn catalog(&self) -> &ProblemCatalog {
        &self.catalog
    }

    // ===== Input =====

    pub fn set_team_name(&mut self, value: impl Into<String>) {
        self.form.team_name = value.into();
    }

    pub fn set_team_leader_name(&mut self, value: impl Into<String>) {
        self.form.team_leader_name = value.into();
    }

    pub fn set_team_leader_email(&mut self, value: impl Into<String>) {
        self.form.team_leader_email = value.into();
    }

    pub fn set_team_leader_phone(&mut self, value: impl Into<String>) {
        self.form.team_leader_phone = value.into();
    }

    /// Picks a track; names outside the catalog are refused
    pub fn select_problem_track(&mut self, track: &str) -> Result<(), String> {
        if !self.catalog.contains(track) {
            return Err(format!("Unknown problem track: {}", track));
        }
        self.form.problem_track = track.to_string();
        Ok(())
    }

    pub fn update_member(
        &mut self,
        index: usize,
        field: MemberField,
        value: impl Into<String>,
    ) -> Result<(), String> {
        let member = self
            .form
            .members
            .get_mut(index)
            .ok_or_else(|| format!("No member row at index {}", index))?;

        match field {
            MemberField::Name => member.name = value.into(),
            MemberField::Email => member.email = value.into(),
        }
        Ok(())
    }

    /// Appends an empty member row unless the maximum is reached
    pub fn add_member(&mut self) {
        if self.form.members.len() < MAX_ADDITIONAL_MEMBERS {
            self.form.members.push(SubmissionMember::default());
        }
        self.sync_team_size();
    }

    /// Removes a member row, always keeping at least one
    pub fn remove_member(&mut self, index: usize) {
        if self.form.members.len() > MIN_ADDITIONAL_MEMBERS && index < self.form.members.len() {
            self.form.members.remove(index);
        }
        self.sync_team_size();
    }

    fn sync_team_size(&mut self) {
        self.form.team_size = (self.form.members.len() + 1) as u8;
    }

    // ===== Navigation =====

    /// Runs the checks for one step, replacing the current errors
    ///
    /// Returns true when the step has no errors.
    pub fn validate_step(&mut self, step: WizardStep) -> bool {
        self.errors = self.step_errors(step);
        self.errors.is_empty()
    }

    fn step_errors(&self, step: WizardStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let form = &self.form;

        match step {
            WizardStep::TeamInfo => {
                if rules::is_blank(&form.team_name) {
                    errors.insert(Field::TeamName, MSG_REQUIRED);
                }
                if rules::is_blank(&form.team_leader_name) {
                    errors.insert(Field::TeamLeaderName, MSG_REQUIRED);
                }
                if rules::is_blank(&form.team_leader_email) {
                    errors.insert(Field::TeamLeaderEmail, MSG_REQUIRED);
                } else if !rules::is_valid_email(&form.team_leader_email) {
                    errors.insert(Field::TeamLeaderEmail, MSG_EMAIL_PROMPT);
                }
                if rules::is_blank(&form.team_leader_phone) {
                    errors.insert(Field::TeamLeaderPhone, MSG_REQUIRED);
                } else if !rules::is_valid_phone(&form.team_leader_phone) {
                    errors.insert(Field::TeamLeaderPhone, MSG_PHONE_INVALID);
                }
            }
            WizardStep::ProblemTrack => {
                if form.problem_track.is_empty() {
                    errors.insert(Field::ProblemTrack, MSG_REQUIRED);
                }
            }
            WizardStep::Members => {
                // Rows without a name are placeholders and are skipped
                let named: Vec<&SubmissionMember> = form
                    .members
                    .iter()
                    .filter(|m| !rules::is_blank(&m.name))
                    .collect();

                if named.len() < MIN_ADDITIONAL_MEMBERS {
                    errors.insert(Field::Members, MSG_TOO_FEW_MEMBERS);
                } else if named.len() > MAX_ADDITIONAL_MEMBERS {
                    errors.insert(Field::Members, MSG_TOO_MANY_MEMBERS);
                } else if let Some(message) = named
                    .iter()
                    .enumerate()
                    .find_map(|(i, m)| member_error(i, m))
                {
                    errors.insert(Field::Members, message);
                }
            }
            WizardStep::Review => {}
        }

        errors
    }

    /// Validates the current step and moves forward when it passes
    pub fn advance(&mut self) -> bool {
        if !self.validate_step(self.step) {
            return false;
        }
        self.step = self.step.next();
        true
    }

    /// Moves back one step without validating
    pub fn retreat(&mut self) {
        self.step = self.step.previous();
    }

    /// Restores every piece of state to its initial value
    pub fn close(&mut self) {
        self.step = WizardStep::TeamInfo;
        self.form = RegistrationForm::default();
        self.errors.clear();
        self.is_submitting = false;
        self.show_success = false;
    }

    // ===== Submission =====

    /// Builds the request body from the draft
    ///
    /// Only rows with both a name and an email are sent, and the team size
    /// is derived from them rather than taken from the draft.
    pub fn build_submission(&self) -> Submission {
        let complete: Vec<&SubmissionMember> = self
            .form
            .members
            .iter()
            .filter(|m| !rules::is_blank(&m.name) && !rules::is_blank(&m.email))
            .collect();
        let actual_team_size = complete.len() + 1;

        let members = (0..actual_team_size - 1)
            .map(|i| complete.get(i).map(|m| (*m).clone()).unwrap_or_default())
            .collect();

        Submission {
            team_name: self.form.team_name.clone(),
            team_leader_name: self.form.team_leader_name.clone(),
            team_leader_email: self.form.team_leader_email.clone(),
            team_leader_phone: self.form.team_leader_phone.clone(),
            team_size: actual_team_size as u8,
            problem_track: self.form.problem_track.clone(),
            members,
        }
    }

    /// Sends the registration once
    ///
    /// Never retries. On failure the returned alert carries the most
    /// relevant message the endpoint gave.
    pub async fn submit<A>(&mut self, api: &A) -> SubmitOutcome
    where
        A: RegistrationApi + ?Sized,
    {
        if !self.step.is_last() {
            return SubmitOutcome::NotReady;
        }
        if !self.validate_step(self.step) {
            return SubmitOutcome::Invalid;
        }

        let submission = self.build_submission();
        tracing::debug!(
            team_size = submission.team_size,
            members = submission.members.len(),
            "submitting registration"
        );

        self.is_submitting = true;
        let result = api.register(&submission).await;
        self.is_submitting = false;

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "registration request failed");
                return SubmitOutcome::Failed {
                    alert: connection_alert(&e.to_string()),
                };
            }
        };

        if reply.is_success() {
            return match serde_json::from_str::<SubmissionResponse>(&reply.body) {
                Ok(response) => {
                    tracing::info!(team_id = ?response.team_id, "registration accepted");
                    self.show_success = true;
                    SubmitOutcome::Registered {
                        team_id: response.team_id,
                    }
                }
                Err(e) => SubmitOutcome::Failed {
                    alert: connection_alert(&e.to_string()),
                },
            };
        }

        let response = serde_json::from_str::<SubmissionResponse>(&reply.body)
            .unwrap_or_else(|_| plain_text_failure(&reply.body));
        tracing::warn!(
            status = reply.status,
            error = response.preferred_error(),
            "registration rejected"
        );

        SubmitOutcome::Failed {
            alert: format!(
                "Registration failed: {}. Please check the console for details.",
                response.preferred_error()
            ),
        }
    }
}

fn member_error(index: usize, member: &SubmissionMember) -> Option<String> {
    let position = rules::member_position(index);
    if rules::is_blank(&member.name) {
        Some(format!("Member {} name is required", position))
    } else if rules::is_blank(&member.email) {
        Some(format!("Member {} email is required", position))
    } else if !rules::is_valid_email(&member.email) {
        Some(format!("Member {} needs a valid email", position))
    } else {
        None
    }
}

/// Wraps a non-JSON error body so it reads like an endpoint error
fn plain_text_failure(body: &str) -> SubmissionResponse {
    if body.is_empty() {
        SubmissionResponse::general_error("Unknown error")
    } else {
        SubmissionResponse::general_error(body)
    }
}

fn connection_alert(reason: &str) -> String {
    format!(
        "Registration failed: {}. Please check your connection and try again.",
        reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wizard::api::{ApiReply, ClientError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubApi {
        reply: Result<ApiReply, String>,
        sent: Mutex<Vec<Submission>>,
    }

    impl StubApi {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Ok(ApiReply {
                    status,
                    body: body.to_string(),
                }),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing(reason: &str) -> Self {
            Self {
                reply: Err(reason.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<Submission> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RegistrationApi for StubApi {
        async fn register(&self, submission: &Submission) -> Result<ApiReply, ClientError> {
            self.sent.lock().unwrap().push(submission.clone());
            self.reply.clone().map_err(ClientError::Network)
        }
    }

    fn wizard() -> RegistrationWizard {
        RegistrationWizard::new(ProblemCatalog::new(["AI", "Health"]))
    }

    fn filled_wizard() -> RegistrationWizard {
        let mut wizard = wizard();
        wizard.set_team_name("Alpha");
        wizard.set_team_leader_name("A");
        wizard.set_team_leader_email("a@b.com");
        wizard.set_team_leader_phone("9876543210");
        wizard.select_problem_track("AI").unwrap();
        wizard.update_member(0, MemberField::Name, "B").unwrap();
        wizard.update_member(0, MemberField::Email, "b@c.com").unwrap();
        wizard
    }

    fn at_review() -> RegistrationWizard {
        let mut wizard = filled_wizard();
        assert!(wizard.advance());
        assert!(wizard.advance());
        assert!(wizard.advance());
        assert_eq!(wizard.step(), WizardStep::Review);
        wizard
    }

    #[test]
    fn starts_with_defaults() {
        let wizard = wizard();
        assert_eq!(wizard.step(), WizardStep::TeamInfo);
        assert_eq!(wizard.form().members.len(), 2);
        assert_eq!(wizard.form().team_size, 2);
        assert!(wizard.errors().is_empty());
        assert!(!wizard.show_success());
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn team_info_reports_each_missing_field() {
        let mut wizard = wizard();
        assert!(!wizard.validate_step(WizardStep::TeamInfo));

        let errors = wizard.errors();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(Field::TeamName), Some(MSG_REQUIRED));
        assert_eq!(errors.get(Field::TeamLeaderPhone), Some(MSG_REQUIRED));
    }

    #[test]
    fn team_info_checks_formats() {
        let mut wizard = filled_wizard();
        wizard.set_team_leader_email("not-an-email");
        wizard.set_team_leader_phone("12ab");

        assert!(!wizard.validate_step(WizardStep::TeamInfo));
        assert_eq!(wizard.errors().get(Field::TeamLeaderEmail), Some(MSG_EMAIL_PROMPT));
        assert_eq!(wizard.errors().get(Field::TeamLeaderPhone), Some(MSG_PHONE_INVALID));
    }

    #[test]
    fn validation_only_covers_requested_step() {
        let mut wizard = wizard();
        wizard.set_team_name("Alpha");
        // Leader details are missing, but step 1 does not look at them
        wizard.select_problem_track("Health").unwrap();
        assert!(wizard.validate_step(WizardStep::ProblemTrack));
    }

    #[test]
    fn problem_track_required() {
        let mut wizard = wizard();
        assert!(!wizard.validate_step(WizardStep::ProblemTrack));
        assert_eq!(wizard.errors().get(Field::ProblemTrack), Some(MSG_REQUIRED));
    }

    #[test]
    fn problem_track_must_come_from_catalog() {
        let mut wizard = wizard();
        assert!(wizard.select_problem_track("Robotics").is_err());
        assert_eq!(wizard.form().problem_track, "");
    }

    #[test]
    fn members_step_needs_one_named_member() {
        let mut wizard = wizard();
        assert!(!wizard.validate_step(WizardStep::Members));
        assert_eq!(wizard.errors().get(Field::Members), Some(MSG_TOO_FEW_MEMBERS));
    }

    #[test]
    fn members_step_tolerates_blank_rows() {
        let wizard = filled_wizard();
        assert_eq!(wizard.form().members[1], SubmissionMember::default());

        let mut wizard = wizard;
        assert!(wizard.validate_step(WizardStep::Members));
    }

    #[test]
    fn members_step_checks_emails_of_named_rows() {
        let mut wizard = filled_wizard();
        wizard.update_member(1, MemberField::Name, "C").unwrap();
        assert!(!wizard.validate_step(WizardStep::Members));
        assert_eq!(
            wizard.errors().get(Field::Members),
            Some("Member 3 email is required")
        );

        wizard.update_member(1, MemberField::Email, "c-at-d").unwrap();
        assert!(!wizard.validate_step(WizardStep::Members));
        assert_eq!(
            wizard.errors().get(Field::Members),
            Some("Member 3 needs a valid email")
        );
    }

    #[test]
    fn member_positions_follow_named_rows() {
        let mut wizard = wizard();
        // First row left blank, second row named with a bad email
        wizard.update_member(1, MemberField::Name, "C").unwrap();
        wizard.update_member(1, MemberField::Email, "bad").unwrap();

        assert!(!wizard.validate_step(WizardStep::Members));
        assert_eq!(
            wizard.errors().get(Field::Members),
            Some("Member 2 needs a valid email")
        );
    }

    #[test]
    fn update_member_out_of_range() {
        let mut wizard = wizard();
        assert!(wizard.update_member(5, MemberField::Name, "X").is_err());
    }

    #[test]
    fn advance_blocked_by_errors() {
        let mut wizard = wizard();
        assert!(!wizard.advance());
        assert_eq!(wizard.step(), WizardStep::TeamInfo);
        assert!(!wizard.errors().is_empty());
    }

    #[test]
    fn advance_clears_errors_and_moves_forward() {
        let mut wizard = filled_wizard();
        wizard.set_team_name("");
        assert!(!wizard.advance());

        wizard.set_team_name("Alpha");
        assert!(wizard.advance());
        assert!(wizard.errors().is_empty());
        assert_eq!(wizard.step(), WizardStep::ProblemTrack);
    }

    #[test]
    fn advance_is_capped_at_review() {
        let mut wizard = at_review();
        assert!(wizard.advance());
        assert_eq!(wizard.step(), WizardStep::Review);
    }

    #[test]
    fn retreat_skips_validation_and_floors() {
        let mut wizard = at_review();
        wizard.set_team_name("");
        wizard.retreat();
        wizard.retreat();
        wizard.retreat();
        wizard.retreat();
        assert_eq!(wizard.step(), WizardStep::TeamInfo);
    }

    #[test]
    fn team_size_tracks_member_rows() {
        let mut wizard = wizard();

        wizard.remove_member(0);
        assert_eq!(wizard.form().members.len(), 1);
        assert_eq!(wizard.form().team_size, 2);

        wizard.remove_member(0);
        assert_eq!(wizard.form().members.len(), 1);
        assert_eq!(wizard.form().team_size, 2);

        wizard.add_member();
        assert_eq!(wizard.form().members.len(), 2);
        assert_eq!(wizard.form().team_size, 3);

        wizard.add_member();
        assert_eq!(wizard.form().members.len(), 2);
        assert_eq!(wizard.form().team_size, 3);
    }

    #[test]
    fn team_size_invariant_over_any_sequence() {
        let mut wizard = wizard();
        let ops = [0, 1, 1, 0, 0, 1, 2, 0, 1, 1, 1, 0];
        for (i, op) in ops.iter().enumerate() {
            match op {
                0 => wizard.add_member(),
                _ => wizard.remove_member(i % 3),
            }
            let form = wizard.form();
            assert_eq!(form.team_size as usize, form.members.len() + 1);
            assert!((1..=2).contains(&form.members.len()));
        }
    }

    #[test]
    fn close_resets_everything() {
        let mut wizard = at_review();
        wizard.add_member();
        wizard.close();

        assert_eq!(wizard.step(), WizardStep::TeamInfo);
        assert_eq!(wizard.form(), &RegistrationForm::default());
        assert!(wizard.errors().is_empty());
        assert!(!wizard.show_success());
    }

    #[test]
    fn submission_sends_only_complete_members() {
        let wizard = filled_wizard();
        let submission = wizard.build_submission();

        assert_eq!(submission.team_size, 2);
        assert_eq!(
            submission.members,
            vec![SubmissionMember {
                name: "B".to_string(),
                email: "b@c.com".to_string()
            }]
        );
        assert_eq!(submission.problem_track, "AI");
    }

    #[test]
    fn submission_json_shape() {
        let json = serde_json::to_value(filled_wizard().build_submission()).unwrap();
        assert_eq!(json["teamLeaderEmail"], "a@b.com");
        assert_eq!(json["teamSize"], 2);
        assert_eq!(json["members"][0], serde_json::json!({"name": "B", "email": "b@c.com"}));
    }

    #[tokio::test]
    async fn submit_requires_review_step() {
        let mut wizard = filled_wizard();
        let api = StubApi::replying(200, r#"{"success":true}"#);

        assert_eq!(wizard.submit(&api).await, SubmitOutcome::NotReady);
        assert!(api.sent().is_empty());
    }

    #[tokio::test]
    async fn submit_success_sets_flag() {
        let mut wizard = at_review();
        let api = StubApi::replying(
            200,
            r#"{"success":true,"message":"Registration completed successfully","teamId":"evt-1-abcdef"}"#,
        );

        let outcome = wizard.submit(&api).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Registered {
                team_id: Some("evt-1-abcdef".to_string())
            }
        );
        assert!(wizard.show_success());
        assert!(!wizard.is_submitting());
        assert_eq!(api.sent().len(), 1);
    }

    #[tokio::test]
    async fn submit_surfaces_preferred_error() {
        let mut wizard = at_review();
        let api = StubApi::replying(
            400,
            r#"{"success":false,"errors":{"members":"Expected 2 members, got 1"}}"#,
        );

        let outcome = wizard.submit(&api).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Failed {
                alert: "Registration failed: Expected 2 members, got 1. Please check the console for details."
                    .to_string()
            }
        );
        assert!(!wizard.show_success());
    }

    #[tokio::test]
    async fn submit_uses_plain_text_error_body() {
        let mut wizard = at_review();
        let api = StubApi::replying(502, "Bad Gateway");

        match wizard.submit(&api).await {
            SubmitOutcome::Failed { alert } => assert!(alert.contains(": Bad Gateway.")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn submit_empty_error_body_is_unknown() {
        let mut wizard = at_review();
        let api = StubApi::replying(500, "");

        match wizard.submit(&api).await {
            SubmitOutcome::Failed { alert } => assert!(alert.contains(": Unknown error.")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn submit_network_failure_asks_to_check_connection() {
        let mut wizard = at_review();
        let api = StubApi::failing("connection refused");

        assert_eq!(
            wizard.submit(&api).await,
            SubmitOutcome::Failed {
                alert: "Registration failed: connection refused. Please check your connection and try again."
                    .to_string()
            }
        );
        assert!(!wizard.is_submitting());
    }
}
