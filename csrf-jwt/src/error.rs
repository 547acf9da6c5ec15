use csrf_jwt_core::Error as CoreError;
use thiserror::Error;

/// The only message a rejected request ever sees.
pub const INVALID_JWT: &str = "INVALID_JWT";

/// Startup-time configuration failures. The guard refuses to build.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("MISSING_SECRET")]
    MissingSecret,

    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("Invalid secret encoding: {0}")]
    InvalidSecret(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Why a protected request was turned away.
///
/// Kept distinct for logs and tests; on the wire every reason reads
/// [`INVALID_JWT`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Header or cookie not sent
    #[error("MISSING_TOKEN")]
    MissingToken,

    /// Header and cookie differ, or the token sits in the wrong cookie
    #[error("TOKEN_MISMATCH")]
    TokenMismatch,

    /// Bad signature or malformed token
    #[error("INVALID_JWT")]
    InvalidJwt,

    /// Well-formed and correctly signed, but past its expiry
    #[error("TOKEN_EXPIRED")]
    Expired,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::MissingToken => "MISSING_TOKEN",
            RejectReason::TokenMismatch => "TOKEN_MISMATCH",
            RejectReason::InvalidJwt => "INVALID_JWT",
            RejectReason::Expired => "TOKEN_EXPIRED",
        }
    }

    /// Externally visible message, identical for every reason.
    pub fn public_message(&self) -> &'static str {
        INVALID_JWT
    }
}

/// Failures of the signing/verification primitive.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signing failed: {0}")]
    Signing(String),
}

#[derive(Error, Debug)]
pub enum CsrfError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("CSRF check failed: {0}")]
    Rejected(RejectReason),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

pub type Result<T> = std::result::Result<T, CsrfError>;

impl From<RejectReason> for CsrfError {
    fn from(reason: RejectReason) -> Self {
        CsrfError::Rejected(reason)
    }
}

impl From<CsrfError> for CoreError {
    fn from(err: CsrfError) -> Self {
        match err {
            CsrfError::Rejected(reason) => CoreError::BadRequest(reason.public_message().to_string()),
            other => CoreError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_message() {
        assert_eq!(ConfigError::MissingSecret.to_string(), "MISSING_SECRET");
    }

    #[test]
    fn test_every_rejection_is_invalid_jwt_on_the_wire() {
        for reason in [
            RejectReason::MissingToken,
            RejectReason::TokenMismatch,
            RejectReason::InvalidJwt,
            RejectReason::Expired,
        ] {
            let core: CoreError = CsrfError::Rejected(reason).into();
            assert_eq!(core.status_code(), 400);
            assert_eq!(core.message(), INVALID_JWT);
        }
    }

    #[test]
    fn test_codec_failure_is_server_error() {
        let core: CoreError = CsrfError::Codec(CodecError::Signing("boom".into())).into();
        assert_eq!(core.status_code(), 500);
    }
}
