use crate::config::GuardConfig;
use crate::error::{CodecError, RejectReason};
use crate::token::{CsrfToken, TokenCodec};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Checks the double-submitted token on a state-changing request.
#[derive(Clone)]
pub struct TokenValidator {
    config: Arc<GuardConfig>,
    codec: Arc<dyn TokenCodec>,
}

impl TokenValidator {
    pub fn new(config: Arc<GuardConfig>, codec: Arc<dyn TokenCodec>) -> Self {
        Self { config, codec }
    }

    /// Validate the header token against the request cookies.
    ///
    /// The header must equal a cookie under one of the token cookie names, the
    /// token must verify, and the cookie it arrived in must be the one it was
    /// issued into.
    pub fn validate(
        &self,
        header: Option<&str>,
        cookies: &[(String, String)],
    ) -> Result<CsrfToken, RejectReason> {
        let header = header.filter(|h| !h.is_empty()).ok_or(RejectReason::MissingToken)?;

        let names = self.config.token_cookie_names();
        let candidates: Vec<&(String, String)> = cookies
            .iter()
            .filter(|(name, value)| !value.is_empty() && names.contains(&name.as_str()))
            .collect();

        if candidates.is_empty() {
            return Err(RejectReason::MissingToken);
        }

        let matched: Vec<&str> = candidates
            .iter()
            .filter(|(_, value)| bool::from(value.as_bytes().ct_eq(header.as_bytes())))
            .map(|(name, _)| name.as_str())
            .collect();

        if matched.is_empty() {
            return Err(RejectReason::TokenMismatch);
        }

        let claims = self.codec.verify(header).map_err(|e| match e {
            CodecError::Expired => RejectReason::Expired,
            _ => RejectReason::InvalidJwt,
        })?;

        if !matched.contains(&claims.sub.as_str()) {
            return Err(RejectReason::TokenMismatch);
        }

        Ok(CsrfToken::new(header.to_string(), claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuer::TokenIssuer;
    use crate::token::{CsrfClaims, JwtCodec};
    use chrono::Utc;

    struct Fixture {
        issuer: TokenIssuer,
        validator: TokenValidator,
        codec: Arc<JwtCodec>,
    }

    fn fixture() -> Fixture {
        let config = Arc::new(GuardConfig::new("test").unwrap());
        let codec = Arc::new(JwtCodec::new(&config.secret, 0));
        Fixture {
            issuer: TokenIssuer::new(config.clone(), codec.clone()),
            validator: TokenValidator::new(config, codec.clone()),
            codec,
        }
    }

    fn cookie(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn test_issued_token_validates() {
        let f = fixture();
        let token = f.issuer.issue().unwrap();

        let validated = f
            .validator
            .validate(Some(token.value()), &[cookie("jwt", token.value())])
            .unwrap();

        assert_eq!(validated.nonce(), token.nonce());
    }

    #[test]
    fn test_rotated_token_validates() {
        let f = fixture();
        let token = f.issuer.rotate().unwrap();

        assert!(
            f.validator
                .validate(Some(token.value()), &[cookie("x-csrf-jwt", token.value())])
                .is_ok()
        );
    }

    #[test]
    fn test_missing_header() {
        let f = fixture();
        let token = f.issuer.issue().unwrap();

        assert_eq!(
            f.validator.validate(None, &[cookie("jwt", token.value())]),
            Err(RejectReason::MissingToken)
        );
        assert_eq!(
            f.validator.validate(Some(""), &[cookie("jwt", token.value())]),
            Err(RejectReason::MissingToken)
        );
    }

    #[test]
    fn test_missing_cookie() {
        let f = fixture();
        let token = f.issuer.issue().unwrap();

        assert_eq!(
            f.validator
                .validate(Some(token.value()), &[cookie("session", "abc")]),
            Err(RejectReason::MissingToken)
        );
    }

    #[test]
    fn test_mismatch() {
        let f = fixture();
        let a = f.issuer.issue().unwrap();
        let b = f.issuer.issue().unwrap();

        assert_eq!(
            f.validator.validate(Some(a.value()), &[cookie("jwt", b.value())]),
            Err(RejectReason::TokenMismatch)
        );
    }

    #[test]
    fn test_issued_token_in_rotation_cookie_is_rejected() {
        let f = fixture();
        let token = f.issuer.issue().unwrap();

        assert_eq!(
            f.validator
                .validate(Some(token.value()), &[cookie("x-csrf-jwt", token.value())]),
            Err(RejectReason::TokenMismatch)
        );
    }

    #[test]
    fn test_matching_cookie_among_several() {
        let f = fixture();
        let stale = f.issuer.issue().unwrap();
        let fresh = f.issuer.rotate().unwrap();

        let cookies = [
            cookie("jwt", stale.value()),
            cookie("x-csrf-jwt", fresh.value()),
        ];
        assert!(f.validator.validate(Some(fresh.value()), &cookies).is_ok());
    }

    #[test]
    fn test_forged_token() {
        let f = fixture();
        let forged = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJqd3QifQ.bogus";

        assert_eq!(
            f.validator.validate(Some(forged), &[cookie("jwt", forged)]),
            Err(RejectReason::InvalidJwt)
        );
    }

    #[test]
    fn test_expired_token() {
        let f = fixture();
        let now = Utc::now().timestamp();
        let claims = CsrfClaims {
            jti: "nonce".to_string(),
            sub: "jwt".to_string(),
            iat: now - 120,
            exp: now - 60,
        };
        let value = f.codec.sign(&claims).unwrap();

        assert_eq!(
            f.validator.validate(Some(&value), &[cookie("jwt", &value)]),
            Err(RejectReason::Expired)
        );
    }
}
