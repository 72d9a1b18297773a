use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::rules::{self, TEAM_SIZE_MAX, TEAM_SIZE_MIN};

/// Email value object
///
/// # Invariants
/// - Matches the `local@domain.tld` shape (no whitespace, exactly one `@`)
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use teamreg::domain::registration::value_objects::Email;
    ///
    /// let email = Email::new("lead@example.com").expect("valid email");
    /// assert_eq!(email.as_str(), "lead@example.com");
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into();
        if rules::is_valid_email(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Phone number value object
///
/// Keeps the number exactly as entered; validity is judged on the
/// whitespace-free form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    pub fn new(phone: impl Into<String>) -> Result<Self, String> {
        let phone = phone.into();
        if rules::is_valid_phone(&phone) {
            Ok(Phone(phone))
        } else {
            Err(format!("Invalid phone: {}", phone))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number with all whitespace removed
    pub fn normalized(&self) -> String {
        rules::strip_whitespace(&self.0)
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of people on a team, leader included
///
/// # Example
/// ```
/// use teamreg::domain::registration::value_objects::TeamSize;
///
/// let size = TeamSize::new(3).expect("valid size");
/// assert_eq!(size.additional_members(), 2);
/// assert!(TeamSize::new(4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamSize(u8);

impl TeamSize {
    pub fn new(size: i64) -> Result<Self, String> {
        if (TEAM_SIZE_MIN as i64..=TEAM_SIZE_MAX as i64).contains(&size) {
            Ok(TeamSize(size as u8))
        } else {
            Err(format!(
                "Team size {} is outside {}-{}",
                size, TEAM_SIZE_MIN, TEAM_SIZE_MAX
            ))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Members besides the leader
    pub fn additional_members(&self) -> usize {
        self.0 as usize - 1
    }
}

impl fmt::Display for TeamSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier handed back to a team after a successful registration
///
/// Format: `<event-prefix>-<unix millis>-<6 char suffix>`. It is not checked
/// for uniqueness and is never used to look anything up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    const SUFFIX_LEN: usize = 6;

    pub fn mint(prefix: &str, at: DateTime<Utc>) -> Self {
        let random = Uuid::new_v4().simple().to_string();
        TeamId(format!(
            "{}-{}-{}",
            prefix,
            at.timestamp_millis(),
            &random[..Self::SUFFIX_LEN]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
