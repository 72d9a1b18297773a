use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Smallest team, leader included
pub const TEAM_SIZE_MIN: u8 = 2;
/// Largest team, leader included
pub const TEAM_SIZE_MAX: u8 = 3;
pub const MIN_ADDITIONAL_MEMBERS: usize = (TEAM_SIZE_MIN - 1) as usize;
pub const MAX_ADDITIONAL_MEMBERS: usize = (TEAM_SIZE_MAX - 1) as usize;

pub const MSG_REQUIRED: &str = "This field is required";
pub const MSG_EMAIL_INVALID: &str = "Invalid email format";
pub const MSG_EMAIL_PROMPT: &str = "Please enter a valid email address";
pub const MSG_PHONE_INVALID: &str = "Invalid phone format";
pub const MSG_TEAM_SIZE: &str = "Team must have 2-3 members";
pub const MSG_MEMBERS_FORMAT: &str = "Invalid members data format";
pub const MSG_TOO_FEW_MEMBERS: &str = "At least 1 additional member required";
pub const MSG_TOO_MANY_MEMBERS: &str = "Maximum 2 additional members allowed";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9\s\-()]{10,15}$").expect("phone pattern compiles"));

/// Returns true when the value is empty after trimming
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks the `local@domain.tld` shape.
///
/// The value is matched as given, so surrounding whitespace makes it invalid.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Checks a phone number after all whitespace has been removed.
///
/// ASCII digits, hyphens, parentheses and one leading `+` are allowed; the
/// whitespace-free length must be 10 to 15 characters.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(&strip_whitespace(value))
}

/// Removes every whitespace character
pub fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 1-indexed team position of an additional member; the leader is member 1
pub fn member_position(index: usize) -> usize {
    index + 2
}

/// Names of the keys an error can be reported under
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    General,
    TeamName,
    TeamLeaderName,
    TeamLeaderEmail,
    TeamLeaderPhone,
    TeamSize,
    ProblemTrack,
    Members,
}

impl Field {
    /// The wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::General => "general",
            Field::TeamName => "teamName",
            Field::TeamLeaderName => "teamLeaderName",
            Field::TeamLeaderEmail => "teamLeaderEmail",
            Field::TeamLeaderPhone => "teamLeaderPhone",
            Field::TeamSize => "teamSize",
            Field::ProblemTrack => "problemTrack",
            Field::Members => "members",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mapping of field to the reason it was rejected
///
/// Serializes as a flat JSON object, e.g. `{"teamLeaderEmail": "Invalid email format"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mapping holding a single error
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Records an error, replacing any earlier message for the same field
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Converts into the tagged result: `Ok(value)` when nothing was recorded
    pub fn into_result<T>(self, value: T) -> Validation<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let described = self
            .0
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&described)
    }
}

impl std::error::Error for FieldErrors {}

/// Outcome of a validation pass: `Ok` is Valid, `Err` is Invalid
pub type Validation<T> = Result<T, FieldErrors>;
