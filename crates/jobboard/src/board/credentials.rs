use super::domain::UserId;

/// Credential failure. `TokenRejected` covers everything that should read
/// as "not logged in"; the other variants are internal faults.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token issuance failed: {0}")]
    TokenIssue(String),
    #[error("token rejected")]
    TokenRejected,
}

/// Opaque credential service: the core never hashes passwords or mints
/// tokens itself. The deployable binary supplies the real implementation;
/// tests use a transparent stub.
pub trait Credentials: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError>;
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
    fn issue_token(&self, user: UserId) -> Result<String, CredentialError>;
    fn verify_token(&self, token: &str) -> Result<UserId, CredentialError>;
}
