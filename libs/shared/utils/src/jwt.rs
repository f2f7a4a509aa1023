use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use shared_models::auth::{JwtClaims, JwtHeader, Role, User};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

/// Tokens are valid for exactly one day; there is no refresh.
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is missing")]
    Missing,

    #[error("Token is malformed: {0}")]
    Malformed(&'static str),

    #[error("Token expired")]
    Expired,
}

fn sign(signing_input: &str, secret: &str) -> Result<Vec<u8>, TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| TokenError::Malformed("unusable secret"))?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

pub fn issue_token(subject_id: &str, role: Role, secret: &str) -> Result<String, TokenError> {
    issue_token_at(subject_id, role, secret, Utc::now().timestamp())
}

/// Issues a token as if the current time were `issued_at` (unix seconds).
pub fn issue_token_at(subject_id: &str, role: Role, secret: &str, issued_at: i64) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Missing);
    }

    let header = JwtHeader {
        alg: ALGORITHM.to_string(),
        typ: "JWT".to_string(),
    };
    let header = serde_json::to_vec(&header).map_err(|_| TokenError::Malformed("unserialisable header"))?;
    let claims = JwtClaims {
        id: subject_id.to_string(),
        role: role.as_str().to_string(),
        iat: issued_at,
        exp: issued_at + Duration::hours(SESSION_TTL_HOURS).num_seconds(),
    };
    let claims = serde_json::to_vec(&claims).map_err(|_| TokenError::Malformed("unserialisable claims"))?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(claims),
    );
    let signature = URL_SAFE_NO_PAD.encode(sign(&signing_input, secret)?);

    Ok(format!("{}.{}", signing_input, signature))
}

pub fn validate_token(token: &str, secret: &str) -> Result<User, TokenError> {
    if token.is_empty() || secret.is_empty() {
        return Err(TokenError::Missing);
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed("expected three segments"));
    }

    let header_b64 = parts[0];
    let claims_b64 = parts[1];
    let signature_b64 = parts[2];

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::Malformed("signature encoding"))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| TokenError::Malformed("unusable secret"))?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::Malformed("signature mismatch"));
    }

    let header: JwtHeader = URL_SAFE_NO_PAD
        .decode(header_b64)
        .ok()
        .and_then(|raw| serde_json::from_slice(&raw).ok())
        .ok_or(TokenError::Malformed("header format"))?;
    if header.alg != ALGORITHM {
        debug!("Rejecting token signed with {}", header.alg);
        return Err(TokenError::Malformed("unsupported algorithm"));
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::Malformed("claims encoding"))?;

    let claims: JwtClaims = serde_json::from_slice(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        TokenError::Malformed("claims format")
    })?;

    let now = Utc::now().timestamp();
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err(TokenError::Expired);
    }

    let role = claims
        .role
        .parse::<Role>()
        .map_err(|_| TokenError::Malformed("unknown role"))?;

    debug!("Token validated successfully for user: {}", claims.id);
    Ok(User { id: claims.id, role })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn issued_token_round_trips_identity() {
        let token = issue_token("abc", Role::Doctor, SECRET).unwrap();
        let user = validate_token(&token, SECRET).unwrap();

        assert_eq!(user, User { id: "abc".to_string(), role: Role::Doctor });
    }

    #[test]
    fn token_older_than_a_day_is_expired() {
        let issued = Utc::now().timestamp() - Duration::hours(25).num_seconds();
        let token = issue_token_at("abc", Role::Patient, SECRET, issued).unwrap();

        assert_eq!(validate_token(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn token_just_inside_a_day_is_valid() {
        let issued = Utc::now().timestamp() - Duration::hours(23).num_seconds();
        let token = issue_token_at("abc", Role::Patient, SECRET, issued).unwrap();

        assert!(validate_token(&token, SECRET).is_ok());
    }

    #[test]
    fn altered_signature_is_malformed() {
        let token = issue_token("abc", Role::Doctor, SECRET).unwrap();
        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { "B" } else { "A" };
        let tampered = format!("{}.{}{}", unsigned, flipped, &signature[1..]);

        assert_matches!(validate_token(&tampered, SECRET), Err(TokenError::Malformed(_)));
    }

    #[test]
    fn wrong_secret_is_malformed() {
        let token = issue_token("abc", Role::Doctor, "another-secret").unwrap();
        assert_matches!(validate_token(&token, SECRET), Err(TokenError::Malformed(_)));
    }

    #[test]
    fn garbage_is_malformed() {
        assert_matches!(validate_token("not-a-token", SECRET), Err(TokenError::Malformed(_)));
        assert_matches!(validate_token("a.b.c", SECRET), Err(TokenError::Malformed(_)));
    }

    #[test]
    fn header_must_name_hs256() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"id":"abc","role":"Doctor","iat":0,"exp":{}}}"#,
            Utc::now().timestamp() + 3600
        ));
        let signing_input = format!("{}.{}", header, claims);
        let signature = URL_SAFE_NO_PAD.encode(sign(&signing_input, SECRET).unwrap());
        let token = format!("{}.{}", signing_input, signature);

        assert_eq!(
            validate_token(&token, SECRET),
            Err(TokenError::Malformed("unsupported algorithm"))
        );
    }

    #[test]
    fn issued_header_names_hs256() {
        let token = issue_token("abc", Role::Doctor, SECRET).unwrap();
        let raw = URL_SAFE_NO_PAD.decode(token.split('.').next().unwrap()).unwrap();
        let header: JwtHeader = serde_json::from_slice(&raw).unwrap();

        assert_eq!(header.alg, "HS256");
        assert_eq!(header.typ, "JWT");
    }

    #[test]
    fn empty_token_is_missing() {
        assert_eq!(validate_token("", SECRET), Err(TokenError::Missing));
    }
}
