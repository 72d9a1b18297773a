//! Server-side validation of a raw registration body.
//!
//! Checks run in a fixed order and the first failing stage wins:
//! presence, format, members shape, member count, then each member.

use serde_json::{Map, Value};

use super::registration::{Member, Registration};
use super::rules::{
    self, Field, FieldErrors, Validation, MSG_EMAIL_INVALID, MSG_MEMBERS_FORMAT,
    MSG_PHONE_INVALID, MSG_TEAM_SIZE,
};
use super::value_objects::{Email, Phone, TeamSize};

/// Fields that must be present and non-blank, in reporting order
const REQUIRED: [Field; 6] = [
    Field::TeamName,
    Field::TeamLeaderName,
    Field::TeamLeaderEmail,
    Field::TeamLeaderPhone,
    Field::TeamSize,
    Field::ProblemTrack,
];

/// Validates a submission body and builds the typed [`Registration`].
///
/// # Example
/// ```
/// use serde_json::json;
/// use teamreg::domain::registration::validation::validate_submission;
///
/// let body = json!({
///     "teamName": "Alpha",
///     "teamLeaderName": "A",
///     "teamLeaderEmail": "a@b.com",
///     "teamLeaderPhone": "9876543210",
///     "teamSize": 2,
///     "members": [{"name": "B", "email": "b@c.com"}],
///     "problemTrack": "AI"
/// });
///
/// let registration = validate_submission(&body).expect("valid");
/// assert_eq!(registration.members().len(), 1);
/// ```
pub fn validate_submission(body: &Value) -> Validation<Registration> {
    let empty = Map::new();
    let object = body.as_object().unwrap_or(&empty);

    let missing: Vec<&str> = REQUIRED
        .iter()
        .filter(|field| !is_present(*field, object.get(field.as_str())))
        .map(|field| field.as_str())
        .collect();
    if !missing.is_empty() {
        return Err(FieldErrors::single(
            Field::General,
            format!("Missing required fields: {}", missing.join(", ")),
        ));
    }

    let team_name = text(object, Field::TeamName);
    let team_leader_name = text(object, Field::TeamLeaderName);
    let problem_track = text(object, Field::ProblemTrack);

    let team_leader_email = Email::new(text(object, Field::TeamLeaderEmail))
        .map_err(|_| FieldErrors::single(Field::TeamLeaderEmail, MSG_EMAIL_INVALID))?;

    let team_leader_phone = Phone::new(text(object, Field::TeamLeaderPhone))
        .map_err(|_| FieldErrors::single(Field::TeamLeaderPhone, MSG_PHONE_INVALID))?;

    let team_size = object
        .get(Field::TeamSize.as_str())
        .and_then(parse_team_size)
        .and_then(|size| TeamSize::new(size).ok())
        .ok_or_else(|| FieldErrors::single(Field::TeamSize, MSG_TEAM_SIZE))?;

    let entries = object
        .get(Field::Members.as_str())
        .and_then(Value::as_array)
        .ok_or_else(|| FieldErrors::single(Field::Members, MSG_MEMBERS_FORMAT))?;

    let expected = team_size.additional_members();
    if entries.len() != expected {
        return Err(FieldErrors::single(
            Field::Members,
            format!("Expected {} members, got {}", expected, entries.len()),
        ));
    }

    let members = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| validate_member(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Registration::from_validated(
        team_name,
        team_leader_name,
        team_leader_email,
        team_leader_phone,
        team_size,
        problem_track,
        members,
    ))
}

fn validate_member(index: usize, entry: &Value) -> Validation<Member> {
    let position = rules::member_position(index);
    let fail = |message: String| FieldErrors::single(Field::Members, message);

    let object = entry
        .as_object()
        .ok_or_else(|| fail(format!("Member {} data is invalid", position)))?;

    let name = object.get("name").and_then(non_blank_str);
    let email = object.get("email").and_then(non_blank_str);

    let (name, email) = match (name, email) {
        (Some(name), Some(email)) => (name, email),
        (name, email) => {
            return Err(fail(format!(
                "Member {} details incomplete (name: {}, email: {})",
                position,
                name.is_some(),
                email.is_some()
            )))
        }
    };

    let email = Email::new(email)
        .map_err(|_| fail(format!("Member {} has invalid email format", position)))?;

    Ok(Member {
        name: name.to_string(),
        email,
    })
}

fn is_present(field: &Field, value: Option<&Value>) -> bool {
    match field {
        Field::TeamSize => value.is_some_and(is_truthy),
        _ => value.and_then(non_blank_str).is_some(),
    }
}

/// Text field value as received; callers have already checked presence
fn text(object: &Map<String, Value>, field: Field) -> String {
    object
        .get(field.as_str())
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn non_blank_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !rules::is_blank(s))
}

/// `null`, `false`, zero and the empty string count as absent
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reads a team size from a number or from the leading integer of a string.
///
/// Fractional numbers are truncated; strings like `"3"` or `"2 people"`
/// parse, strings without a leading integer do not.
pub fn parse_team_size(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
