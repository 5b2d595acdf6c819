//! Access-token claims and their mapping onto the session [`User`] record.
//!
//! The auth backend issues compact JWS tokens. Signature verification is the
//! issuer's concern; this module only decodes the payload segment, checks
//! expiry, and normalises the claims. A token that fails any of those steps
//! is treated as unauthenticated, never as a server error.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::user::{Organization, User};

/// Failures decoding or validating an access token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    /// The token is not a three-segment compact JWS or its payload is not
    /// valid base64url JSON.
    #[error("access token is malformed")]
    Malformed,
    /// The token carried no usable subject identifier.
    #[error("access token has no subject")]
    MissingSubject,
    /// The `exp` claim is absent or in the past.
    #[error("access token is expired")]
    Expired,
}

/// Raw claims carried in the access-token payload.
///
/// `user_id` may arrive as a string or a number depending on the issuer
/// version, so it is held as a JSON value until mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    organization_role: Option<String>,
    #[serde(default)]
    organization_id: Option<String>,
    #[serde(default)]
    organization_name: Option<String>,
    #[serde(default)]
    is_superuser: Option<bool>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decode an access token's payload and map it onto a [`User`] record.
///
/// # Errors
///
/// - [`ClaimsError::Malformed`] when the token shape or payload JSON is bad.
/// - [`ClaimsError::Expired`] when `exp` is missing or not after `now`.
/// - [`ClaimsError::MissingSubject`] when neither `user_id` nor `sub` is set.
///
/// # Examples
/// ```
/// use backend::domain::decode_access_token;
/// use chrono::Utc;
///
/// let err = decode_access_token("not-a-token", Utc::now()).unwrap_err();
/// assert_eq!(err, backend::domain::ClaimsError::Malformed);
/// ```
pub fn decode_access_token(token: &str, now: DateTime<Utc>) -> Result<User, ClaimsError> {
    let claims = decode_payload(token)?;

    let exp = claims.exp.ok_or(ClaimsError::Expired)?;
    if exp <= now.timestamp() {
        return Err(ClaimsError::Expired);
    }

    user_from_claims(claims)
}

fn decode_payload(token: &str) -> Result<AccessClaims, ClaimsError> {
    let mut segments = token.split('.');
    let parts = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    );
    let (Some(_), Some(payload), Some(_), None) = parts else {
        return Err(ClaimsError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| ClaimsError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| ClaimsError::Malformed)
}

fn user_from_claims(claims: AccessClaims) -> Result<User, ClaimsError> {
    let id = claims
        .user_id
        .as_ref()
        .and_then(value_to_string)
        .or(claims.sub)
        .ok_or(ClaimsError::MissingSubject)?;

    let email = claims.email.unwrap_or_default();
    let name = claims
        .name
        .filter(|name| !name.trim().is_empty())
        .or_else(|| email.split('@').next().map(ToOwned::to_owned))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "User".to_owned());

    let organization = claims.organization_id.map(|org_id| Organization {
        id: org_id,
        name: claims
            .organization_name
            .unwrap_or_else(|| "Organization".to_owned()),
    });

    Ok(User {
        id,
        name,
        email,
        role: claims.role,
        organization_role: claims.organization_role,
        is_superuser: claims.is_superuser.unwrap_or(false),
        organization,
    })
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Build an unsigned compact token carrying the given payload.
///
/// Only the fixture auth provider and tests mint tokens; real tokens come
/// signed from the auth backend.
pub(crate) fn unsigned_token_with_payload(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.unsigned")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone as _;
    use rstest::rstest;
    use serde_json::json;

    fn token_with_payload(payload: &Value) -> String {
        unsigned_token_with_payload(payload)
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid instant")
    }

    #[test]
    fn maps_full_claims_onto_a_user() {
        let token = token_with_payload(&json!({
            "user_id": "42",
            "email": "ada@example.com",
            "name": "Ada Lovelace",
            "role": "admin",
            "organization_role": "project_manager",
            "organization_id": "org-1",
            "organization_name": "Example Corp",
            "exp": fixed_now().timestamp() + 3600,
        }));
        let user = decode_access_token(&token, fixed_now()).expect("decodes");
        assert_eq!(user.id, "42");
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.organization_role.as_deref(), Some("project_manager"));
        let org = user.organization.expect("organization mapped");
        assert_eq!(org.name, "Example Corp");
    }

    #[test]
    fn numeric_user_id_and_sub_fallback() {
        let token = token_with_payload(&json!({
            "user_id": 7,
            "email": "ada@example.com",
            "exp": fixed_now().timestamp() + 60,
        }));
        let user = decode_access_token(&token, fixed_now()).expect("decodes");
        assert_eq!(user.id, "7");

        let token = token_with_payload(&json!({
            "sub": "abc-123",
            "exp": fixed_now().timestamp() + 60,
        }));
        let user = decode_access_token(&token, fixed_now()).expect("decodes");
        assert_eq!(user.id, "abc-123");
    }

    #[test]
    fn name_falls_back_to_email_local_part() {
        let token = token_with_payload(&json!({
            "user_id": "1",
            "email": "ada@example.com",
            "exp": fixed_now().timestamp() + 60,
        }));
        let user = decode_access_token(&token, fixed_now()).expect("decodes");
        assert_eq!(user.name, "ada");
    }

    #[rstest]
    #[case::no_exp(json!({"user_id": "1"}))]
    #[case::past_exp(json!({"user_id": "1", "exp": 0}))]
    fn missing_or_past_expiry_is_rejected(#[case] payload: Value) {
        let token = token_with_payload(&payload);
        assert_eq!(
            decode_access_token(&token, fixed_now()),
            Err(ClaimsError::Expired)
        );
    }

    #[rstest]
    #[case("")]
    #[case("only-one-segment")]
    #[case("a.b")]
    #[case("a.b.c.d")]
    #[case("a.!!!not-base64!!!.c")]
    fn malformed_tokens_are_rejected(#[case] token: &str) {
        assert_eq!(
            decode_access_token(token, fixed_now()),
            Err(ClaimsError::Malformed)
        );
    }

    #[test]
    fn token_without_any_subject_is_rejected() {
        let token = token_with_payload(&json!({
            "email": "ada@example.com",
            "exp": fixed_now().timestamp() + 60,
        }));
        assert_eq!(
            decode_access_token(&token, fixed_now()),
            Err(ClaimsError::MissingSubject)
        );
    }
}
