use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey};
use serde::Serialize;
use std::fmt;

use crate::auth::Auth;
use crate::error::{Result, WeatherKitError};
use crate::key::decode_key;

/// Signing algorithm required by the WeatherKit API
const ALGORITHM: &str = "ES256";

/// JOSE header of a developer token.
///
/// Alongside the standard fields Apple requires an `id` field holding
/// `"{team_id}.{bundle_id}"`.
#[derive(Serialize)]
struct Header<'a> {
    alg: &'static str,
    typ: &'static str,
    kid: &'a str,
    id: String,
}

/// Registered claims of a developer token
#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    sub: &'a str,
    iat: i64,
    exp: i64,
}

/// A WeatherKit developer token minted from an ES256 signing key.
///
/// The token is signed once, at construction, and is valid for the configured
/// lifetime. Expiry is not tracked; build a new token (or a new client) when
/// one expires.
#[derive(Clone)]
pub struct JwtToken {
    token: String,
}

impl JwtToken {
    /// Mint a developer token.
    ///
    /// Claims are `iss` = team ID, `sub` = bundle ID, `iat` = now and
    /// `exp` = now + `token_ttl` seconds; a lifetime too large for the epoch
    /// arithmetic saturates to a far-future expiry. The signature is the raw
    /// 64-byte `r || s` form that JWS requires, not DER.
    pub fn new(
        key: &SigningKey,
        key_id: &str,
        team_id: &str,
        bundle_id: &str,
        token_ttl: u64,
    ) -> Result<Self> {
        let now = Utc::now().timestamp();
        let header = Header {
            alg: ALGORITHM,
            typ: "JWT",
            kid: key_id,
            id: format!("{}.{}", team_id, bundle_id),
        };
        let claims = Claims {
            iss: team_id,
            sub: bundle_id,
            iat: now,
            exp: now.saturating_add(i64::try_from(token_ttl).unwrap_or(i64::MAX)),
        };

        let header_json = serde_json::to_vec(&header).map_err(WeatherKitError::token_generation)?;
        let claims_json = serde_json::to_vec(&claims).map_err(WeatherKitError::token_generation)?;

        let mut token = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(claims_json)
        );

        let signature: Signature = key
            .try_sign(token.as_bytes())
            .map_err(WeatherKitError::token_generation)?;

        token.push('.');
        token.push_str(&URL_SAFE_NO_PAD.encode(signature.to_bytes()));

        Ok(JwtToken { token })
    }

    /// Get the compact serialized token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Consume the token, returning the compact serialization
    pub fn into_token(self) -> String {
        self.token
    }
}

// Implement Debug manually to avoid leaking the token into logs
impl fmt::Debug for JwtToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtToken")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Resolve the bearer credential for an auth configuration.
///
/// A pre-generated token passes through untouched. Signed auth decodes the
/// key and mints a token; the key is dropped as soon as signing is done.
pub(crate) fn resolve_bearer(auth: &Auth) -> Result<String> {
    match auth {
        Auth::Token { jwt } => Ok(jwt.clone()),
        Auth::SignedKey {
            key_source,
            key_id,
            team_id,
            bundle_id,
            token_ttl,
        } => {
            let key = decode_key(key_source)?;
            let token = JwtToken::new(&key, key_id, team_id, bundle_id, *token_ttl)?;
            Ok(token.into_token())
        }
    }
}
