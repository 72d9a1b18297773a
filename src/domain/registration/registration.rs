use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::rules::Field;
use super::value_objects::{Email, Phone, TeamSize};

/// A team member other than the leader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub email: Email,
}

/// A fully validated registration
///
/// Only produced by [`validate_submission`](super::validation::validate_submission),
/// so every instance satisfies the registration rules.
///
/// # Invariants
/// - Text fields are non-blank
/// - `members.len() == team_size - 1`
/// - Every member has a non-blank name and a valid email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    team_name: String,
    team_leader_name: String,
    team_leader_email: Email,
    team_leader_phone: Phone,
    team_size: TeamSize,
    problem_track: String,
    members: Vec<Member>,
}

impl Registration {
    /// Assembles a registration from parts that already passed validation
    pub(super) fn from_validated(
        team_name: String,
        team_leader_name: String,
        team_leader_email: Email,
        team_leader_phone: Phone,
        team_size: TeamSize,
        problem_track: String,
        members: Vec<Member>,
    ) -> Self {
        debug_assert_eq!(members.len(), team_size.additional_members());
        Self {
            team_name,
            team_leader_name,
            team_leader_email,
            team_leader_phone,
            team_size,
            problem_track,
            members,
        }
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn team_leader_name(&self) -> &str {
        &self.team_leader_name
    }

    pub fn team_leader_email(&self) -> &Email {
        &self.team_leader_email
    }

    pub fn team_leader_phone(&self) -> &Phone {
        &self.team_leader_phone
    }

    pub fn team_size(&self) -> TeamSize {
        self.team_size
    }

    pub fn problem_track(&self) -> &str {
        &self.problem_track
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Trimmed member names joined with `", "`
    pub fn member_names(&self) -> String {
        self.members
            .iter()
            .map(|m| m.name.trim())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Flattens the registration into the row written to the spreadsheet
    pub fn to_sheet_record(&self, submitted_at: DateTime<Utc>) -> SheetRecord {
        SheetRecord {
            timestamp: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            team_name: self.team_name.clone(),
            team_leader_name: self.team_leader_name.clone(),
            team_leader_email: self.team_leader_email.to_string(),
            team_leader_phone: self.team_leader_phone.to_string(),
            team_size: self.team_size.get(),
            member_names: self.member_names(),
            problem_track: self.problem_track.clone(),
        }
    }
}

/// One spreadsheet row as sent to the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRecord {
    pub timestamp: String,
    pub team_name: String,
    pub team_leader_name: String,
    pub team_leader_email: String,
    pub team_leader_phone: String,
    pub team_size: u8,
    pub member_names: String,
    pub problem_track: String,
}

impl SheetRecord {
    /// Every field as a `(name, value)` pair, in declaration order
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("timestamp", self.timestamp.clone()),
            ("teamName", self.team_name.clone()),
            ("teamLeaderName", self.team_leader_name.clone()),
            ("teamLeaderEmail", self.team_leader_email.clone()),
            ("teamLeaderPhone", self.team_leader_phone.clone()),
            ("teamSize", self.team_size.to_string()),
            ("memberNames", self.member_names.clone()),
            ("problemTrack", self.problem_track.clone()),
        ]
    }
}

/// Member entry in a submission body. There is no phone field; only the
/// leader's phone is collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionMember {
    pub name: String,
    pub email: String,
}

/// Request body sent from the wizard to `POST /api/register`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub team_name: String,
    pub team_leader_name: String,
    pub team_leader_email: String,
    pub team_leader_phone: String,
    pub team_size: u8,
    pub problem_track: String,
    pub members: Vec<SubmissionMember>,
}

/// Response body of `POST /api/register`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<std::collections::BTreeMap<String, String>>,
}

impl SubmissionResponse {
    /// Fields consulted for a failure message, most relevant first
    const ERROR_PREFERENCE: [Field; 4] = [
        Field::General,
        Field::Members,
        Field::TeamLeaderEmail,
        Field::TeamLeaderPhone,
    ];

    /// A failure response carrying a single `general` error
    pub fn general_error(message: impl Into<String>) -> Self {
        let mut errors = std::collections::BTreeMap::new();
        errors.insert(Field::General.as_str().to_string(), message.into());
        Self {
            success: false,
            errors: Some(errors),
            ..Self::default()
        }
    }

    /// The most relevant error text: `general`, `members`, leader email,
    /// leader phone, then `message`. Empty strings are skipped.
    pub fn preferred_error(&self) -> &str {
        let non_empty = |s: &&String| !s.is_empty();
        Self::ERROR_PREFERENCE
            .iter()
            .find_map(|field| {
                self.errors
                    .as_ref()
                    .and_then(|errors| errors.get(field.as_str()))
                    .filter(non_empty)
            })
            .or(self.message.as_ref().filter(non_empty))
            .map(String::as_str)
            .unwrap_or("Unknown error")
    }
}
