use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use metrics_exporter_prometheus::PrometheusHandle;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use jobboard::board::credentials::{CredentialError, Credentials};
use jobboard::board::domain::UserId;
use jobboard::config::AuthConfig;

type HmacSha256 = Hmac<Sha256>;

const SALT_LEN: usize = 16;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Signed bearer payload. `sub` is the user id; times are unix seconds.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: u64,
    iat: i64,
    exp: i64,
}

/// Credential service backed by HMAC-SHA256 password digests keyed by a
/// per-user random salt, and HMAC-SHA256 signed bearer tokens in the
/// `header.claims.signature` shape. Digest checks go through
/// `Mac::verify_slice`, which compares in constant time.
pub(crate) struct HmacCredentials {
    secret: Vec<u8>,
    token_ttl: Duration,
}

impl HmacCredentials {
    pub(crate) fn new(config: &AuthConfig) -> Self {
        Self {
            secret: config.token_secret.as_bytes().to_vec(),
            token_ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    fn mac(&self) -> Result<HmacSha256, CredentialError> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| CredentialError::TokenIssue(err.to_string()))
    }

    fn sign(&self, message: &str) -> Result<String, CredentialError> {
        let mut mac = self.mac()?;
        mac.update(message.as_bytes());
        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    fn password_mac(salt: &[u8], password: &str) -> Result<HmacSha256, CredentialError> {
        let mut mac = HmacSha256::new_from_slice(salt)
            .map_err(|err| CredentialError::Hashing(err.to_string()))?;
        mac.update(password.as_bytes());
        Ok(mac)
    }
}

impl Credentials for HmacCredentials {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::password_mac(&salt, password)?.finalize().into_bytes();
        Ok(format!(
            "{}${}",
            URL_SAFE_NO_PAD.encode(salt),
            URL_SAFE_NO_PAD.encode(digest)
        ))
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        let (salt, stored) = hash
            .split_once('$')
            .ok_or_else(|| CredentialError::Hashing("stored hash is malformed".to_string()))?;
        let salt = URL_SAFE_NO_PAD
            .decode(salt)
            .map_err(|err| CredentialError::Hashing(err.to_string()))?;
        let stored = URL_SAFE_NO_PAD
            .decode(stored)
            .map_err(|err| CredentialError::Hashing(err.to_string()))?;

        Ok(Self::password_mac(&salt, password)?.verify_slice(&stored).is_ok())
    }

    fn issue_token(&self, user: UserId) -> Result<String, CredentialError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.0,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&claims).map_err(|err| CredentialError::TokenIssue(err.to_string()))?,
        );
        let message = format!("{header}.{claims}");
        let signature = self.sign(&message)?;
        Ok(format!("{message}.{signature}"))
    }

    fn verify_token(&self, token: &str) -> Result<UserId, CredentialError> {
        let mut parts = token.splitn(3, '.');
        let (header, claims, signature) = match (parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(claims), Some(signature)) => (header, claims, signature),
            _ => return Err(CredentialError::TokenRejected),
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| CredentialError::TokenRejected)?;
        let mut mac = self.mac()?;
        mac.update(format!("{header}.{claims}").as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| CredentialError::TokenRejected)?;

        let claims = URL_SAFE_NO_PAD
            .decode(claims)
            .map_err(|_| CredentialError::TokenRejected)?;
        let claims: Claims =
            serde_json::from_slice(&claims).map_err(|_| CredentialError::TokenRejected)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(CredentialError::TokenRejected);
        }
        Ok(UserId(claims.sub))
    }
}
