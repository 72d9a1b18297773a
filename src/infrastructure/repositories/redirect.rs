//! Parsing for the spreadsheet webhook's "Moved Temporarily" replies.
//!
//! Instead of a usable `Location` the webhook answers a POST with a small
//! HTML page whose anchor holds the real target. The row is then delivered
//! with a GET carrying every field as a query parameter.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use crate::domain::registration::SheetRecord;
use crate::domain::repositories::RelayError;

pub const MOVED_TEMPORARILY: &str = "Moved Temporarily";

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"HREF="([^"]+)""#).expect("href pattern compiles"));

/// True when the webhook signalled a redirect, by status or by body text
pub fn is_redirect(status: u16, body: &str) -> bool {
    status == 302 || body.contains(MOVED_TEMPORARILY)
}

/// Pulls the first `HREF="..."` target out of the body and decodes `&amp;`
pub fn extract_href(body: &str) -> Option<String> {
    HREF_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace("&amp;", "&"))
}

/// Builds the fallback GET URL: the redirect target plus every record field
pub fn fallback_url(target: &str, record: &SheetRecord) -> Result<Url, RelayError> {
    let mut url = Url::parse(target).map_err(|e| RelayError::InvalidRedirectUrl {
        url: target.to_string(),
        reason: e.to_string(),
    })?;

    {
        let mut query = url.query_pairs_mut();
        for (name, value) in record.query_pairs() {
            query.append_pair(name, &value);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> SheetRecord {
        SheetRecord {
            timestamp: "2025-03-01T00:00:00.000Z".to_string(),
            team_name: "Alpha Team".to_string(),
            team_leader_name: "A".to_string(),
            team_leader_email: "a@b.com".to_string(),
            team_leader_phone: "+91 9876543210".to_string(),
            team_size: 2,
            member_names: "B".to_string(),
            problem_track: "AI".to_string(),
        }
    }

    const MOVED_BODY: &str = r#"<HTML><HEAD><TITLE>Moved Temporarily</TITLE></HEAD>
<BODY><H1>Moved Temporarily</H1>
The document has moved <A HREF="https://sheets.example.com/echo?user_content_key=abc&amp;lib=xyz">here</A>.
</BODY></HTML>"#;

    #[test]
    fn detects_redirect_by_status() {
        assert!(is_redirect(302, ""));
    }

    #[test]
    fn detects_redirect_by_body() {
        assert!(is_redirect(200, MOVED_BODY));
    }

    #[test]
    fn plain_success_is_not_redirect() {
        assert!(!is_redirect(200, r#"{"result":"success"}"#));
        assert!(!is_redirect(301, ""));
    }

    #[test]
    fn extracts_and_decodes_href() {
        assert_eq!(
            extract_href(MOVED_BODY).as_deref(),
            Some("https://sheets.example.com/echo?user_content_key=abc&lib=xyz")
        );
    }

    #[test]
    fn missing_href_yields_none() {
        assert_eq!(extract_href("<H1>Moved Temporarily</H1>"), None);
        assert_eq!(extract_href(r#"<a href="lowercase">x</a>"#), None);
    }

    #[test]
    fn fallback_url_appends_record_fields() {
        let url = fallback_url(
            "https://sheets.example.com/echo?user_content_key=abc&lib=xyz",
            &record(),
        )
        .unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("user_content_key".to_string(), "abc".to_string()));
        assert_eq!(pairs[1], ("lib".to_string(), "xyz".to_string()));
        assert_eq!(pairs[3], ("teamName".to_string(), "Alpha Team".to_string()));
        assert_eq!(pairs[6], ("teamLeaderPhone".to_string(), "+91 9876543210".to_string()));
        assert_eq!(pairs[7], ("teamSize".to_string(), "2".to_string()));
        assert_eq!(pairs.len(), 10);
    }

    #[test]
    fn fallback_url_rejects_relative_target() {
        let err = fallback_url("/echo?x=1", &record()).unwrap_err();
        assert!(matches!(err, RelayError::InvalidRedirectUrl { .. }));
    }
}
