//! Cross-application session handoff.
//!
//! The sign-in application hands a freshly granted session to another app
//! through the redirect URL itself: either an `authData` query parameter
//! carrying the URL-encoded session JSON, or a URL fragment with
//! `access_token`, `refresh_token` and `user` fields. [`absorb`] consumes
//! whichever form is present, installs the session, and returns the URL
//! with the credentials stripped so they never survive in history or logs.

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::store::{Session, UserProfile};
use super::SessionManager;
use crate::api::ApiError;

const AUTH_DATA_PARAM: &str = "authData";

/// Builds the redirect URL that carries a session to another application.
///
/// # Errors
/// Returns an error if `target` is not a valid absolute URL.
pub fn outbound_url(target: &str, session: &Session) -> Result<String, ApiError> {
    let mut url = Url::parse(target)
        .map_err(|err| ApiError::UnexpectedResponse(format!("invalid handoff target: {err}")))?;

    let payload = serde_json::to_string(session)
        .map_err(|err| ApiError::UnexpectedResponse(format!("session encode: {err}")))?;
    url.query_pairs_mut().append_pair(AUTH_DATA_PARAM, &payload);

    Ok(url.to_string())
}

#[derive(Debug, Deserialize)]
struct FragmentUser(UserProfile);

/// Absorbs a handed-off session from a URL, if one is present.
///
/// Installs the session into the manager and returns the cleaned URL
/// (credential parameters and fragment removed). Returns `Ok(None)` when
/// the URL carries no handoff payload; a malformed payload is discarded
/// with a warning rather than surfaced, so a mangled redirect cannot wedge
/// startup.
///
/// # Errors
/// Returns an error only if a valid session cannot be persisted.
pub fn absorb(raw: &str, manager: &SessionManager) -> Result<Option<String>, ApiError> {
    let Ok(url) = Url::parse(raw) else {
        return Ok(None);
    };

    if let Some(session) = session_from_query(&url).or_else(|| session_from_fragment(&url)) {
        manager.adopt_session(session)?;
        debug!("absorbed handed-off session");
        return Ok(Some(cleaned(&url)));
    }

    Ok(None)
}

fn session_from_query(url: &Url) -> Option<Session> {
    let payload = url
        .query_pairs()
        .find(|(key, _)| key == AUTH_DATA_PARAM)
        .map(|(_, value)| value.into_owned())?;

    match serde_json::from_str(&payload) {
        Ok(session) => Some(session),
        Err(err) => {
            warn!(error = %err, "discarding malformed authData payload");
            None
        }
    }
}

fn session_from_fragment(url: &Url) -> Option<Session> {
    let fragment = url.fragment()?;

    let mut access_token = None;
    let mut refresh_token = None;
    let mut user = None;
    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "user" => match serde_json::from_str::<FragmentUser>(&value) {
                Ok(FragmentUser(profile)) => user = Some(profile),
                Err(err) => {
                    warn!(error = %err, "discarding malformed user payload in fragment");
                    return None;
                }
            },
            _ => {}
        }
    }

    Some(Session {
        access_token: access_token?,
        refresh_token: refresh_token?,
        user: user?,
    })
}

/// The URL with credential material removed: the `authData` parameter is
/// dropped (other query parameters survive) and the fragment is cleared.
fn cleaned(url: &Url) -> String {
    let mut cleaned = url.clone();

    let remaining: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != AUTH_DATA_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    cleaned.set_query(None);
    if !remaining.is_empty() {
        let mut pairs = cleaned.query_pairs_mut();
        for (key, value) in &remaining {
            pairs.append_pair(key, value);
        }
    }
    cleaned.set_fragment(None);

    cleaned.to_string()
}
